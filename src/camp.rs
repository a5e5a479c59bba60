//! Camp knowledge base: a JSON document on disk, deep-merged over compiled-in
//! defaults, hot-reloaded while the bot runs.
//!
//! Admins edit `camp.config.json` (or use `!set ...`); the bot never requires
//! the file to exist or to be complete — every field has a default.

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampConfig {
    pub camp: Camp,
    pub venues: Vec<Venue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camp {
    pub title: String,
    pub desc: String,
    pub where1: String,
    pub where2: String,
    pub forms: Forms,
    pub pricing: Pricing,
    pub schedule_summary: String,
    pub schedule: Schedule,
    pub eligibility: Vec<String>,
    pub perks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forms {
    pub individual: String,
    pub team: String,
    pub line: String,
    pub facebook: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub spectator: u64,
    pub individual: u64,
    pub team: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub workshop: Vec<ScheduleDay>,
    pub launch: Vec<ScheduleDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    pub label: String,
    #[serde(default)]
    pub thai_date: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
}

impl Default for CampConfig {
    fn default() -> Self {
        CampConfig {
            camp: Camp {
                title: "AC x KMUTT Rocket Camp 2025 — Operated by DTI".to_string(),
                desc: [
                    "ค่ายพัฒนาด้านวิศวกรรมศาสตร์ ชวนสัมผัสโปรเจคอวกาศจนกลายเป็นวิศวกรตัวจริง!",
                    "ร่วมมือ: SPACE AC × KMUTT × DTI × PTT",
                    "ภารกิจ: ออกแบบ/สร้าง/ทดสอบ Sounding Rocket ขนาด 5 นิ้ว ยาว ~1.5 ม. ยิงสูง ~1 กม.",
                ]
                .join("\n"),
                where1: "Workshop 1–3 ต.ค. 2025 @ โรงเรียนอัสสัมชัญ".to_string(),
                where2: "Launch 6–10 ต.ค. 2025 @ วังจันทร์วัลเลย์ จ.ระยอง".to_string(),
                forms: Forms {
                    individual: "https://go.spaceac.tech/rocket-camp-2025-form".to_string(),
                    team: "https://go.spaceac.tech/rocket-camp-2025-team".to_string(),
                    line: "https://lin.ee/W4dKV7D".to_string(),
                    facebook: "https://go.spaceac.tech/facebook".to_string(),
                },
                pricing: Pricing {
                    spectator: 2000,
                    individual: 12345,
                    team: 100000,
                },
                schedule_summary:
                    "Workshop 1–3 ต.ค. 2568 (3 วัน) และ Launch 6–10 ต.ค. 2568 (5 วัน) รวม 8 วัน"
                        .to_string(),
                schedule: Schedule {
                    workshop: Vec::new(),
                    launch: Vec::new(),
                },
                eligibility: Vec::new(),
                perks: Vec::new(),
            },
            venues: vec![
                Venue {
                    name: "วังจันทร์วัลเลย์ ระยอง (Wangchan Valley)".to_string(),
                    url: "https://maps.app.goo.gl/rmx8v35oLzxpFVXx7".to_string(),
                },
                Venue {
                    name: "The EnCony @Wangchan Valley (ที่พัก)".to_string(),
                    url: "https://maps.app.goo.gl/Kyy2FwxVzWXQaRvx9".to_string(),
                },
                Venue {
                    name: "ศูนย์ DREAM Maker Space @โรงเรียนอัสสัมชัญ".to_string(),
                    url: "https://maps.app.goo.gl/YWmYkq8vHaWsAeyN9".to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub url: String,
}

/// Merge `overlay` over `base`, key by key.
///
/// Objects recurse; arrays are replaced wholesale (no element-wise merge);
/// scalars override. A JSON `null` counts as "not provided" and keeps the
/// base value, so a partial document can omit keys either way.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(b), Value::Object(o)) => {
            let mut out = b.clone();
            for (key, over) in o {
                let merged = match b.get(key) {
                    Some(under) => deep_merge(under, over),
                    None => over.clone(),
                };
                out.insert(key.clone(), merged);
            }
            Value::Object(out)
        }
        (_, Value::Null) => base.clone(),
        _ => overlay.clone(),
    }
}

/// Live configuration tree plus the path it round-trips through.
///
/// `load` and `save` never propagate errors: a broken or missing file falls
/// back to defaults, a failed save keeps the in-memory state. Readers always
/// see a fully-built tree — `load` assembles the replacement before taking
/// the write lock.
pub struct ConfigStore {
    path: PathBuf,
    state: RwLock<CampConfig>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ConfigStore {
            path: path.into(),
            state: RwLock::new(CampConfig::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the on-disk document (if any), merge it over the defaults and
    /// swap the result in.
    pub fn load(&self) {
        let next = match std::fs::read_to_string(&self.path) {
            Ok(raw) => match merge_over_defaults(&raw) {
                Ok(cfg) => {
                    info!("Loaded {}", self.path.display());
                    cfg
                }
                Err(e) => {
                    error!("Failed to parse {}: {e}; using defaults", self.path.display());
                    CampConfig::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("{} not found; using defaults", self.path.display());
                CampConfig::default()
            }
            Err(e) => {
                error!("Failed to read {}: {e}; using defaults", self.path.display());
                CampConfig::default()
            }
        };
        *write_lock(&self.state) = next;
    }

    /// Persist the live tree. Failure is logged and otherwise ignored; the
    /// in-memory state is the source of truth.
    pub fn save(&self) {
        let snapshot = self.snapshot();
        let body = match serde_json::to_string_pretty(&snapshot) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to serialize config: {e}");
                return;
            }
        };
        match std::fs::write(&self.path, body) {
            Ok(()) => info!("Saved {}", self.path.display()),
            Err(e) => error!("Failed to save {}: {e}", self.path.display()),
        }
    }

    pub fn snapshot(&self) -> CampConfig {
        read_lock(&self.state).clone()
    }

    /// Mutate the live tree under the write lock. Callers persist with
    /// [`ConfigStore::save`] afterwards if the change should survive restart.
    pub fn update<F: FnOnce(&mut CampConfig)>(&self, f: F) {
        f(&mut write_lock(&self.state));
    }
}

fn merge_over_defaults(raw: &str) -> anyhow::Result<CampConfig> {
    let overlay: Value = serde_json::from_str(raw)?;
    let base = serde_json::to_value(CampConfig::default())?;
    let merged = deep_merge(&base, &overlay);
    Ok(serde_json::from_value(merged)?)
}

// A poisoned lock only means another thread panicked mid-access; the tree is
// always left whole, so recover the guard rather than propagate.
fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

/// Watch the config file for external edits and reload on change.
///
/// Polls the mtime every 2 seconds; the poll interval doubles as the
/// debounce, and a single task owning the loop keeps reloads from
/// interleaving.
pub fn spawn_watch_task(store: Arc<ConfigStore>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(2));
        let mut last_seen = file_mtime(store.path());
        loop {
            interval.tick().await;
            let current = file_mtime(store.path());
            if current != last_seen {
                last_seen = current;
                warn!("Detected change in {}; reloading...", store.path().display());
                store.load();
            }
        }
    })
}

fn file_mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("rocketcamp-{name}-{}.json", std::process::id()));
        path
    }

    #[test]
    fn test_merge_empty_overlay_is_identity() {
        let base = serde_json::to_value(CampConfig::default()).unwrap();
        let merged = deep_merge(&base, &json!({}));
        assert_eq!(merged, base);
    }

    #[test]
    fn test_merge_overrides_single_scalar() {
        let cfg = merge_over_defaults(r#"{"camp":{"pricing":{"individual":9999}}}"#).unwrap();
        let defaults = CampConfig::default();
        assert_eq!(cfg.camp.pricing.individual, 9999);
        assert_eq!(cfg.camp.pricing.team, defaults.camp.pricing.team);
        assert_eq!(cfg.camp.pricing.spectator, defaults.camp.pricing.spectator);
        assert_eq!(cfg.camp.title, defaults.camp.title);
    }

    #[test]
    fn test_merge_replaces_arrays_wholesale() {
        let cfg = merge_over_defaults(
            r#"{"venues":[{"name":"Somewhere","url":"https://example.com"}]}"#,
        )
        .unwrap();
        assert_eq!(cfg.venues.len(), 1);
        assert_eq!(cfg.venues[0].name, "Somewhere");
    }

    #[test]
    fn test_merge_null_keeps_default() {
        let cfg = merge_over_defaults(r#"{"camp":{"title":null}}"#).unwrap();
        assert_eq!(cfg.camp.title, CampConfig::default().camp.title);
    }

    #[test]
    fn test_merge_idempotent() {
        let overlay = json!({"camp": {"pricing": {"team": 50000}}});
        let base = serde_json::to_value(CampConfig::default()).unwrap();
        let once = deep_merge(&base, &overlay);
        let twice = deep_merge(&once, &overlay);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let store = ConfigStore::new(temp_path("missing"));
        store.load();
        assert_eq!(store.snapshot(), CampConfig::default());
    }

    #[test]
    fn test_load_malformed_file_uses_defaults() {
        let path = temp_path("malformed");
        std::fs::write(&path, "{not json").unwrap();
        let store = ConfigStore::new(&path);
        store.load();
        assert_eq!(store.snapshot(), CampConfig::default());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_save_then_load_round_trips_updates() {
        let path = temp_path("roundtrip");
        let store = ConfigStore::new(&path);
        store.update(|cfg| cfg.camp.pricing.individual = 13000);
        store.save();

        let reloaded = ConfigStore::new(&path);
        reloaded.load();
        assert_eq!(reloaded.snapshot().camp.pricing.individual, 13000);
        std::fs::remove_file(&path).ok();
    }
}
