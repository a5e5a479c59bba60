//! Keyword intent matching over the camp knowledge base.
//!
//! Matching is deliberately plain substring containment against a normalized
//! input: the camp audience writes Thai (no word boundaries) mixed with
//! English, so token-level matching would lose more than it gains.

/// A named category of user question with a canned answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    About,
    Price,
    Apply,
    Contact,
    Venue,
    Schedule,
    Duration,
    Eligibility,
    Perks,
}

/// Ordered mapping of intent → trigger phrases.
///
/// The order is load-bearing: on a score tie the first intent declared here
/// wins. Keep new intents at the end unless they should outrank existing
/// ones on ties.
pub struct IntentCatalog {
    entries: Vec<(Intent, &'static [&'static str])>,
    extra_tokens: &'static [&'static str],
}

const ABOUT: &[&str] = &[
    "ค่ายคืออะไร", "เกี่ยวกับค่าย", "ภาพรวม", "รายละเอียดค่าย", "คืออะไร",
    "about", "overview", "info", "information", "รายละเอียด",
];
const PRICE: &[&str] = &[
    "ราคา", "ค่าสมัคร", "ค่าใช้จ่าย", "เท่าไร", "เท่าไหร่", "ค่าธรรมเนียม", "ค่าค่าย", "กี่บาท",
    "fee", "fees", "cost", "pricing", "how much",
];
const APPLY: &[&str] = &[
    "สมัคร", "สมัครยังไง", "ลงทะเบียน", "ฟอร์ม", "แบบฟอร์ม", "สมัครที่ไหน", "กรอกฟอร์ม", "สมัครได้ที่ไหน",
    "apply", "application", "register", "registration", "form",
];
const CONTACT: &[&str] = &[
    "ติดต่อ", "สอบถาม", "แอดมิน", "แอดมินค่าย", "คอนแทค", "line", "ไลน์", "facebook", "เพจ", "เพจเฟซ",
    "contact", "admin", "staff", "support",
];
const VENUE: &[&str] = &[
    "ที่ไหน", "สถานที่", "แผนที่", "อยู่ที่", "location", "map", "ที่พัก", "โรงแรม",
    "วังจันทร์", "wangchan", "encony", "assumption", "dream maker", "kmutt", "dti", "space ac",
];
const SCHEDULE: &[&str] = &[
    "ตาราง", "กำหนดการ", "วันเวลา", "วันที่จัด", "เมื่อไหร่", "เริ่มเมื่อไหร่", "จบเมื่อไหร่", "วันไหน",
    "schedule", "date", "dates", "when", "time", "timeline", "workshop", "launch",
];
const DURATION: &[&str] = &[
    "กี่วัน", "ใช้เวลากี่วัน", "รวมกี่วัน", "อยู่กี่วัน", "ทั้งหมดกี่วัน",
    "how many days", "duration", "days",
];
const ELIGIBILITY: &[&str] = &[
    "คุณสมบัติ", "รับใครบ้าง", "รับเฉพาะ", "เงื่อนไข", "ข้อกำหนด", "สุขภาพ", "ม.ปลาย", "อายุ", "ผ่านเกณฑ์",
    "eligibility", "requirements",
];
const PERKS: &[&str] = &[
    "สิทธิพิเศษ", "top 3", "รางวัล", "benefit", "benefits", "perks", "สัมภาษณ์", "ได้อะไร", "สิทธิ์", "ของแถม",
];

// Tokens that mark a message as camp-related even when no intent scores.
const CAMP_TOKENS: &[&str] = &[
    "rocket", "จรวด", "ค่าย", "camp", "workshop", "launch", "kmutt", "dti", "space ac",
    "assumption", "dream maker",
];

impl IntentCatalog {
    pub fn new() -> Self {
        IntentCatalog {
            entries: vec![
                (Intent::About, ABOUT),
                (Intent::Price, PRICE),
                (Intent::Apply, APPLY),
                (Intent::Contact, CONTACT),
                (Intent::Venue, VENUE),
                (Intent::Schedule, SCHEDULE),
                (Intent::Duration, DURATION),
                (Intent::Eligibility, ELIGIBILITY),
                (Intent::Perks, PERKS),
            ],
            extra_tokens: CAMP_TOKENS,
        }
    }

    /// Best-scoring intent for the given text, or `None` when nothing
    /// matches. Score is the number of trigger phrases contained in the
    /// normalized input; ties keep the earliest catalog entry.
    pub fn score(&self, text: &str) -> Option<(Intent, usize)> {
        let t = normalize(text);
        if t.is_empty() {
            return None;
        }
        let mut best: Option<(Intent, usize)> = None;
        for (intent, phrases) in &self.entries {
            let score = phrases.iter().filter(|p| t.contains(*p)).count();
            if score > best.map_or(0, |(_, s)| s) {
                best = Some((*intent, score));
            }
        }
        best
    }

    /// True if the input mentions the camp at all — any trigger phrase from
    /// any intent, or one of the standalone camp tokens. Gates the polite
    /// out-of-scope decline before the LLM fallback is even considered.
    pub fn is_topic_related(&self, text: &str) -> bool {
        let t = normalize(text);
        if t.is_empty() {
            return false;
        }
        self.entries
            .iter()
            .flat_map(|(_, phrases)| phrases.iter())
            .chain(self.extra_tokens.iter())
            .any(|p| t.contains(p))
    }
}

impl Default for IntentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase and collapse internal whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_and_lowercases() {
        assert_eq!(normalize("  How   MUCH \t is it "), "how much is it");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \t\n "), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for s in ["  A  B ", "ราคา เท่าไหร่", "", "already normal"] {
            assert_eq!(normalize(&normalize(s)), normalize(s));
        }
    }

    #[test]
    fn test_thai_price_question_scores_price() {
        let catalog = IntentCatalog::new();
        let (intent, score) = catalog.score("ราคาค่าสมัครเท่าไหร่").unwrap();
        assert_eq!(intent, Intent::Price);
        assert!(score >= 1);
    }

    #[test]
    fn test_no_trigger_scores_none_and_unrelated() {
        let catalog = IntentCatalog::new();
        assert_eq!(catalog.score("สวัสดีครับ"), None);
        assert!(!catalog.is_topic_related("สวัสดีครับ"));
        assert_eq!(catalog.score(""), None);
        assert!(!catalog.is_topic_related("   "));
    }

    #[test]
    fn test_camp_token_related_without_intent() {
        let catalog = IntentCatalog::new();
        // "จรวด" (rocket) is a camp token but no intent trigger.
        assert!(catalog.is_topic_related("จรวด"));
        assert_eq!(catalog.score("จรวด"), None);
    }

    #[test]
    fn test_tie_keeps_catalog_order() {
        let catalog = IntentCatalog::new();
        // One About trigger and one Price trigger; About is declared first.
        let (intent, score) = catalog.score("about ราคา").unwrap();
        assert_eq!(score, 1);
        assert_eq!(intent, Intent::About);
    }

    #[test]
    fn test_higher_score_beats_earlier_intent() {
        let catalog = IntentCatalog::new();
        // Two Price triggers vs one About trigger.
        let (intent, score) = catalog.score("about ราคา กี่บาท").unwrap();
        assert_eq!(intent, Intent::Price);
        assert_eq!(score, 2);
    }

    #[test]
    fn test_multi_word_english_phrase() {
        let catalog = IntentCatalog::new();
        let (intent, _) = catalog.score("so...  how   much is the camp fee?").unwrap();
        assert_eq!(intent, Intent::Price);
    }

    #[test]
    fn test_schedule_keywords() {
        let catalog = IntentCatalog::new();
        let (intent, _) = catalog.score("ตาราง workshop").unwrap();
        assert_eq!(intent, Intent::Schedule);
    }
}
