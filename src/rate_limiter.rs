//! Auto-reply gating: a per-(channel, user) cooldown plus a per-channel
//! rolling-window cap. Uses DashMap so checks for different keys never
//! contend; check-and-record for one key happens under its entry guard.
//!
//! Neither map evicts keys. The bot is a single long-lived low-traffic
//! process, so unbounded growth here is an accepted tradeoff.

use dashmap::DashMap;
use std::time::{Duration, Instant};

struct Bucket {
    count: u32,
    window_start: Instant,
}

pub struct ReplyGate {
    cooldowns: DashMap<(u64, u64), Instant>,
    buckets: DashMap<u64, Bucket>,
    window: Duration,
}

impl ReplyGate {
    /// Production callers pass a 60 second window; tests shrink it.
    pub fn new(window: Duration) -> Self {
        ReplyGate {
            cooldowns: DashMap::new(),
            buckets: DashMap::new(),
            window,
        }
    }

    /// Returns true and records usage only when both gates pass: the
    /// (channel, user) cooldown has elapsed and the channel's window count
    /// is below `cap`. A denied call records nothing.
    pub fn can_reply(&self, channel_id: u64, user_id: u64, cooldown: Duration, cap: u32) -> bool {
        self.check_at(channel_id, user_id, cooldown, cap, Instant::now())
    }

    fn check_at(
        &self,
        channel_id: u64,
        user_id: u64,
        cooldown: Duration,
        cap: u32,
        now: Instant,
    ) -> bool {
        let key = (channel_id, user_id);
        if let Some(last) = self.cooldowns.get(&key) {
            if now.duration_since(*last) < cooldown {
                return false;
            }
        }

        let mut bucket = self.buckets.entry(channel_id).or_insert_with(|| Bucket {
            count: 0,
            window_start: now,
        });
        // Lazy window reset: no background timer, the first check after the
        // window elapses starts a fresh one.
        if now.duration_since(bucket.window_start) > self.window {
            bucket.count = 0;
            bucket.window_start = now;
        }
        if bucket.count >= cap {
            return false;
        }
        bucket.count += 1;
        drop(bucket);

        self.cooldowns.insert(key, now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_cooldown_blocks_second_call() {
        let gate = ReplyGate::new(MINUTE);
        let t0 = Instant::now();
        assert!(gate.check_at(1, 1, Duration::from_secs(8), 20, t0));
        // 5s later: still inside the 8s cooldown.
        assert!(!gate.check_at(1, 1, Duration::from_secs(8), 20, t0 + Duration::from_secs(5)));
        // 9s later: cooldown elapsed.
        assert!(gate.check_at(1, 1, Duration::from_secs(8), 20, t0 + Duration::from_secs(9)));
    }

    #[test]
    fn test_channel_cap_blocks_regardless_of_user() {
        let gate = ReplyGate::new(MINUTE);
        let t0 = Instant::now();
        // Three different users, cap of 3 per channel.
        for user in 1..=3 {
            assert!(gate.check_at(7, user, Duration::ZERO, 3, t0));
        }
        // Fourth user in the same window: denied by the channel cap even
        // though their own cooldown would allow it.
        assert!(!gate.check_at(7, 4, Duration::ZERO, 3, t0 + Duration::from_secs(1)));
    }

    #[test]
    fn test_window_resets_lazily() {
        let gate = ReplyGate::new(MINUTE);
        let t0 = Instant::now();
        assert!(gate.check_at(7, 1, Duration::ZERO, 1, t0));
        assert!(!gate.check_at(7, 2, Duration::ZERO, 1, t0 + Duration::from_secs(30)));
        // Past the window: count resets on this very check.
        assert!(gate.check_at(7, 3, Duration::ZERO, 1, t0 + Duration::from_secs(61)));
    }

    #[test]
    fn test_denied_call_records_nothing() {
        let gate = ReplyGate::new(MINUTE);
        let t0 = Instant::now();
        assert!(gate.check_at(7, 1, Duration::from_secs(8), 2, t0));
        // Denied by cooldown; must not consume window budget.
        assert!(!gate.check_at(7, 1, Duration::from_secs(8), 2, t0 + Duration::from_secs(1)));
        // The second and last slot under cap 2 is still free because the
        // denial above did not count.
        assert!(gate.check_at(7, 2, Duration::from_secs(8), 2, t0 + Duration::from_secs(2)));
    }

    #[test]
    fn test_keys_are_isolated() {
        let gate = ReplyGate::new(MINUTE);
        let t0 = Instant::now();
        assert!(gate.check_at(1, 1, Duration::from_secs(8), 20, t0));
        // Same user, different channel: separate cooldown key.
        assert!(gate.check_at(2, 1, Duration::from_secs(8), 20, t0));
        // Different user, first channel: separate cooldown, same bucket.
        assert!(gate.check_at(1, 2, Duration::from_secs(8), 20, t0));
    }
}
