//! Canned answers rendered from the live camp config.
//!
//! Everything here is a pure function of (intent, config) — no I/O, no
//! network. The handler decides what to send; these functions only build
//! the payloads.

use crate::camp::CampConfig;
use crate::intents::Intent;

pub const DISCORD_MAX_MSG: usize = 2000;
pub const SAFE_REPLY_LEN: usize = 1900;
pub const EMBED_FIELD_MAX: usize = 1024;

/// A rich-embed payload, kept platform-agnostic so rendering stays testable.
/// The handler maps it onto serenity's embed builder at the send site.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedAnswer {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<(String, String)>,
    pub footer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleKind {
    Workshop,
    Launch,
}

const TRUNC_MARKER: &str = "\n...[truncated]";

/// Bound `s` to at most `n` characters, marking the cut. The marker counts
/// against the bound so the result never exceeds a platform limit.
pub fn trunc(s: &str, n: usize) -> String {
    if s.chars().count() <= n {
        return s.to_string();
    }
    let marker_len = TRUNC_MARKER.chars().count();
    if n <= marker_len {
        return s.chars().take(n).collect();
    }
    let kept: String = s.chars().take(n - marker_len).collect();
    format!("{kept}{TRUNC_MARKER}")
}

fn format_baht(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Plain-text answer for a matched intent. Every known intent renders;
/// the caller never sees an empty reply for a real match.
pub fn answer(intent: Intent, cfg: &CampConfig, prefix: &str) -> String {
    match intent {
        Intent::About => about(cfg),
        Intent::Price => price(cfg),
        Intent::Apply => apply(cfg),
        Intent::Contact => contact(cfg),
        Intent::Venue => venue(cfg),
        Intent::Schedule => schedule(cfg, prefix),
        Intent::Duration => duration(cfg),
        Intent::Eligibility => eligibility(cfg),
        Intent::Perks => perks(cfg),
    }
}

fn about(cfg: &CampConfig) -> String {
    let c = &cfg.camp;
    [
        format!("ℹ️ **เกี่ยวกับค่าย {}**", c.title),
        c.desc.clone(),
        format!("📍 {}", c.where1),
        format!("📍 {}", c.where2),
        format!("📝 สมัคร: เดี่ยว {} | ทีม {}", c.forms.individual, c.forms.team),
    ]
    .join("\n")
}

pub fn price(cfg: &CampConfig) -> String {
    let p = &cfg.camp.pricing;
    [
        "💰 **ค่าสมัคร / Pricing**".to_string(),
        format!("• Spectator: **{}** บาท", format_baht(p.spectator)),
        format!("• เดี่ยว: **{}** บาท", format_baht(p.individual)),
        format!("• ทีม (5–7 คน): **{}** บาท", format_baht(p.team)),
    ]
    .join("\n")
}

pub fn apply(cfg: &CampConfig) -> String {
    let f = &cfg.camp.forms;
    format!("📝 สมัครได้ที่\n• เดี่ยว: {}\n• ทีม: {}", f.individual, f.team)
}

pub fn contact(cfg: &CampConfig) -> String {
    let f = &cfg.camp.forms;
    format!("ติดต่อสอบถาม\n• LINE OA: {}\n• Facebook: {}", f.line, f.facebook)
}

fn venue(cfg: &CampConfig) -> String {
    cfg.venues
        .iter()
        .map(|v| format!("• {}: {}", v.name, v.url))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn schedule(cfg: &CampConfig, prefix: &str) -> String {
    format!(
        "📆 กำหนดการโดยสรุป: {}\nดูรายละเอียด: `{prefix}schedule workshop` หรือ `{prefix}schedule launch`",
        cfg.camp.schedule_summary
    )
}

fn duration(cfg: &CampConfig) -> String {
    format!("⏱️ ระยะเวลาโดยสรุป: {}", cfg.camp.schedule_summary)
}

fn eligibility(cfg: &CampConfig) -> String {
    let e = &cfg.camp.eligibility;
    if e.is_empty() {
        "คุณสมบัติ: โปรดติดต่อทีมงาน".to_string()
    } else {
        format!("คุณสมบัติผู้สมัคร\n- {}", e.join("\n- "))
    }
}

fn perks(cfg: &CampConfig) -> String {
    let p = &cfg.camp.perks;
    if p.is_empty() {
        "สิทธิพิเศษ: โปรดติดต่อทีมงาน".to_string()
    } else {
        format!("สิทธิพิเศษ\n- {}", p.join("\n- "))
    }
}

pub fn overview_embed(cfg: &CampConfig) -> EmbedAnswer {
    let c = &cfg.camp;
    EmbedAnswer {
        title: format!("🚀 {}", c.title),
        description: Some(c.desc.clone()),
        fields: vec![
            (
                "สถานที่/เวลา".to_string(),
                format!("• {}\n• {}", c.where1, c.where2),
            ),
            (
                "ค่าสมัคร".to_string(),
                format!(
                    "Spectator: {} บาท\nเดี่ยว: {} บาท\nทีม: {} บาท",
                    c.pricing.spectator, c.pricing.individual, c.pricing.team
                ),
            ),
            (
                "ลิงก์สมัคร".to_string(),
                format!("เดี่ยว: {}\nทีม: {}", c.forms.individual, c.forms.team),
            ),
            ("กำหนดการย่อ".to_string(), c.schedule_summary.clone()),
        ],
        footer: Some(
            "สอบถาม: ติดต่อ staff ในเซิร์ฟเวอร์ | LINE OA @spaceac | Facebook: go.spaceac.tech/facebook"
                .to_string(),
        ),
    }
}

pub fn venue_embed(cfg: &CampConfig) -> EmbedAnswer {
    EmbedAnswer {
        title: "🗺️ สถานที่ / Venues".to_string(),
        description: Some(
            cfg.venues
                .iter()
                .map(|v| format!("• [{}]({})", v.name, v.url))
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        fields: Vec::new(),
        footer: None,
    }
}

/// Per-day schedule embed. Days without items are skipped; each field value
/// is bounded to the platform field limit.
pub fn schedule_embed(cfg: &CampConfig, kind: ScheduleKind) -> EmbedAnswer {
    let (days, title) = match kind {
        ScheduleKind::Workshop => (
            &cfg.camp.schedule.workshop,
            "📆 Workshop Days (1–3 ต.ค. 2568)",
        ),
        ScheduleKind::Launch => (&cfg.camp.schedule.launch, "📆 Launch Days (6–10 ต.ค. 2568)"),
    };

    let mut fields = Vec::new();
    for day in days {
        let name = match &day.thai_date {
            Some(d) if !d.is_empty() => format!("• {} / {}", day.label, d),
            _ => format!("• {}", day.label),
        };
        let value = day
            .items
            .iter()
            .map(|x| format!("- {x}"))
            .collect::<Vec<_>>()
            .join("\n");
        if !value.is_empty() {
            fields.push((name, trunc(&value, EMBED_FIELD_MAX)));
        }
    }

    EmbedAnswer {
        title: title.to_string(),
        description: None,
        fields,
        footer: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camp::{CampConfig, ScheduleDay};

    #[test]
    fn test_trunc_bounds_and_marks() {
        let long = "x".repeat(3000);
        let cut = trunc(&long, SAFE_REPLY_LEN);
        assert_eq!(cut.chars().count(), SAFE_REPLY_LEN);
        assert!(cut.ends_with("...[truncated]"));
        assert_eq!(trunc("short", SAFE_REPLY_LEN), "short");
    }

    #[test]
    fn test_trunc_never_exceeds_bound() {
        let long = "x".repeat(3000);
        for n in [10, 15, 16, 100, EMBED_FIELD_MAX, SAFE_REPLY_LEN] {
            assert!(trunc(&long, n).chars().count() <= n, "bound {n} exceeded");
        }
    }

    #[test]
    fn test_trunc_respects_char_boundaries() {
        // Thai codepoints are multi-byte; slicing by chars must not panic.
        let thai = "ราคา".repeat(1000);
        let cut = trunc(&thai, 100);
        assert!(cut.ends_with("...[truncated]"));
    }

    #[test]
    fn test_format_baht() {
        assert_eq!(format_baht(0), "0");
        assert_eq!(format_baht(2000), "2,000");
        assert_eq!(format_baht(12345), "12,345");
        assert_eq!(format_baht(100000), "100,000");
        assert_eq!(format_baht(1234567), "1,234,567");
    }

    #[test]
    fn test_price_answer_contains_all_tiers() {
        let cfg = CampConfig::default();
        let text = answer(Intent::Price, &cfg, "!");
        assert!(text.contains("2,000"));
        assert!(text.contains("12,345"));
        assert!(text.contains("100,000"));
    }

    #[test]
    fn test_every_intent_renders_nonempty() {
        let cfg = CampConfig::default();
        for intent in [
            Intent::About,
            Intent::Price,
            Intent::Apply,
            Intent::Contact,
            Intent::Venue,
            Intent::Schedule,
            Intent::Duration,
            Intent::Eligibility,
            Intent::Perks,
        ] {
            assert!(!answer(intent, &cfg, "!").is_empty());
        }
    }

    #[test]
    fn test_schedule_answer_mentions_prefix() {
        let cfg = CampConfig::default();
        let text = answer(Intent::Schedule, &cfg, "?");
        assert!(text.contains("`?schedule workshop`"));
    }

    #[test]
    fn test_eligibility_fallback_when_unset() {
        let cfg = CampConfig::default();
        assert!(answer(Intent::Eligibility, &cfg, "!").contains("โปรดติดต่อทีมงาน"));
    }

    #[test]
    fn test_overview_embed_shape() {
        let cfg = CampConfig::default();
        let embed = overview_embed(&cfg);
        assert!(embed.title.contains("Rocket Camp"));
        assert_eq!(embed.fields.len(), 4);
        assert!(embed.footer.is_some());
    }

    #[test]
    fn test_schedule_embed_skips_empty_days_and_bounds_fields() {
        let mut cfg = CampConfig::default();
        cfg.camp.schedule.workshop = vec![
            ScheduleDay {
                label: "Day 1".to_string(),
                thai_date: Some("1 ต.ค.".to_string()),
                items: vec!["อบรม".repeat(800)],
            },
            ScheduleDay {
                label: "Day 2".to_string(),
                thai_date: None,
                items: Vec::new(),
            },
        ];
        let embed = schedule_embed(&cfg, ScheduleKind::Workshop);
        assert_eq!(embed.fields.len(), 1);
        assert!(embed.fields[0].1.chars().count() <= EMBED_FIELD_MAX);
    }

    #[test]
    fn test_schedule_embed_field_stays_under_platform_limit() {
        let mut cfg = CampConfig::default();
        cfg.camp.schedule.launch = vec![ScheduleDay {
            label: "Launch Day".to_string(),
            thai_date: None,
            items: vec!["x".repeat(2000)],
        }];
        let embed = schedule_embed(&cfg, ScheduleKind::Launch);
        let value = &embed.fields[0].1;
        assert!(
            value.chars().count() <= EMBED_FIELD_MAX,
            "field value is {} chars, over the {} limit",
            value.chars().count(),
            EMBED_FIELD_MAX
        );
        assert!(value.ends_with("...[truncated]"));
    }

    #[test]
    fn test_venue_embed_links_all_venues() {
        let cfg = CampConfig::default();
        let embed = venue_embed(&cfg);
        let desc = embed.description.unwrap();
        for v in &cfg.venues {
            assert!(desc.contains(&v.url));
        }
    }
}
