//! Prefix command surface.
//!
//! Raw text after the prefix is decoded once into a [`Command`] and matched
//! exhaustively by the handler, so an unhandled command is a compile error
//! rather than a silent no-op.

pub mod admin;

use crate::answers::ScheduleKind;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Overview,
    Price,
    Apply,
    Contact,
    Venue,
    Schedule(Option<ScheduleKind>),
    Ask(String),
    ReloadConfig,
    SaveConfig,
    Set(SetCommand),
    Admin(AdminCommand),
    /// Syntactically recognized command with bad arguments; the payload is
    /// the usage line (without prefix) to echo back.
    Malformed(String),
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTier {
    Spectator,
    Individual,
    Team,
}

impl PriceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTier::Spectator => "spectator",
            PriceTier::Individual => "individual",
            PriceTier::Team => "team",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "spectator" => Some(PriceTier::Spectator),
            "individual" => Some(PriceTier::Individual),
            "team" => Some(PriceTier::Team),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Individual,
    Team,
    Line,
    Facebook,
}

impl FormKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Individual => "individual",
            FormKind::Team => "team",
            FormKind::Line => "line",
            FormKind::Facebook => "facebook",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(FormKind::Individual),
            "team" => Some(FormKind::Team),
            "line" => Some(FormKind::Line),
            "facebook" => Some(FormKind::Facebook),
            _ => None,
        }
    }
}

/// Persistent knowledge-base mutations (`!set ...`); each one saves the
/// config file after applying.
#[derive(Debug, Clone, PartialEq)]
pub enum SetCommand {
    Price { tier: PriceTier, value: u64 },
    Form { kind: FormKind, url: String },
    ScheduleSummary(String),
    VenueAdd { name: String, url: String },
    /// 1-based index as shown by the venue listing.
    VenueRemove(usize),
}

/// Runtime-only operational toggles (`!admin ...`); never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminCommand {
    AutoReply(bool),
    Cooldown(u64),
    MaxPerMin(u32),
    ChannelAdd(u64),
    ChannelRemove(u64),
    ChannelClear,
    Debug(bool),
    Status,
}

const USAGE_SCHEDULE: &str = "schedule workshop|launch";
const USAGE_ASK: &str = "ask <คำถาม>";
const USAGE_SET: &str = "set <price|forms|schedule|venue> ...";
const USAGE_SET_PRICE: &str = "set price <spectator|individual|team> <number>";
const USAGE_SET_FORMS: &str = "set forms <individual|team|line|facebook> <url>";
const USAGE_SET_SCHEDULE: &str = "set schedule \"<summary text>\"";
const USAGE_SET_VENUE: &str = "set venue <add|remove> ...";
const USAGE_SET_VENUE_ADD: &str = "set venue add \"Name\" \"URL\"";
const USAGE_SET_VENUE_REMOVE: &str = "set venue remove <index>";
const USAGE_ADMIN: &str =
    "admin <autoreply|cooldown|maxpermin|channels|debug|status> ...";

/// Parse the text following the command prefix.
pub fn parse(input: &str) -> Command {
    let args = split_args(input);
    let Some((cmd, rest)) = args.split_first() else {
        return Command::Unknown(String::new());
    };

    match cmd.to_lowercase().as_str() {
        "help" => Command::Help,
        "rocketcamp" => Command::Overview,
        "price" => Command::Price,
        "apply" => Command::Apply,
        "contact" => Command::Contact,
        "venue" => Command::Venue,
        "schedule" => match rest.first().map(|s| s.to_lowercase()).as_deref() {
            Some("workshop") => Command::Schedule(Some(ScheduleKind::Workshop)),
            Some("launch") => Command::Schedule(Some(ScheduleKind::Launch)),
            _ => Command::Schedule(None),
        },
        "ask" => {
            let q = rest.join(" ");
            if q.is_empty() {
                Command::Malformed(USAGE_ASK.to_string())
            } else {
                Command::Ask(q)
            }
        }
        "reloadconfig" => Command::ReloadConfig,
        "saveconfig" => Command::SaveConfig,
        "set" => parse_set(rest),
        "admin" => parse_admin(rest),
        other => Command::Unknown(other.to_string()),
    }
}

fn parse_set(args: &[String]) -> Command {
    let Some((section, rest)) = args.split_first() else {
        return Command::Malformed(USAGE_SET.to_string());
    };
    match section.to_lowercase().as_str() {
        "price" => {
            let tier = rest.first().and_then(|s| PriceTier::parse(&s.to_lowercase()));
            let value = rest.get(1).and_then(|s| s.parse().ok());
            match (tier, value) {
                (Some(tier), Some(value)) => Command::Set(SetCommand::Price { tier, value }),
                _ => Command::Malformed(USAGE_SET_PRICE.to_string()),
            }
        }
        "forms" | "form" => {
            let kind = rest.first().and_then(|s| FormKind::parse(&s.to_lowercase()));
            match (kind, rest.get(1)) {
                (Some(kind), Some(url)) => Command::Set(SetCommand::Form {
                    kind,
                    url: url.clone(),
                }),
                _ => Command::Malformed(USAGE_SET_FORMS.to_string()),
            }
        }
        "schedule" => {
            let summary = rest.join(" ");
            if summary.is_empty() {
                Command::Malformed(USAGE_SET_SCHEDULE.to_string())
            } else {
                Command::Set(SetCommand::ScheduleSummary(summary))
            }
        }
        "venue" | "venues" => match rest.first().map(|s| s.to_lowercase()).as_deref() {
            Some("add") => match (rest.get(1), rest.get(2)) {
                (Some(name), Some(url)) => Command::Set(SetCommand::VenueAdd {
                    name: name.clone(),
                    url: url.clone(),
                }),
                _ => Command::Malformed(USAGE_SET_VENUE_ADD.to_string()),
            },
            Some("remove") => match rest.get(1).and_then(|s| s.parse().ok()) {
                Some(idx) => Command::Set(SetCommand::VenueRemove(idx)),
                None => Command::Malformed(USAGE_SET_VENUE_REMOVE.to_string()),
            },
            _ => Command::Malformed(USAGE_SET_VENUE.to_string()),
        },
        _ => Command::Malformed(USAGE_SET.to_string()),
    }
}

fn parse_admin(args: &[String]) -> Command {
    let Some((sub, rest)) = args.split_first() else {
        return Command::Malformed(USAGE_ADMIN.to_string());
    };
    let first = rest.first().map(|s| s.to_lowercase());
    match sub.to_lowercase().as_str() {
        "autoreply" => match first.as_deref() {
            Some("on") => Command::Admin(AdminCommand::AutoReply(true)),
            Some("off") => Command::Admin(AdminCommand::AutoReply(false)),
            _ => Command::Malformed("admin autoreply <on|off>".to_string()),
        },
        "cooldown" => match first.and_then(|s| s.parse().ok()) {
            Some(secs) => Command::Admin(AdminCommand::Cooldown(secs)),
            None => Command::Malformed("admin cooldown <seconds>".to_string()),
        },
        "maxpermin" => match first.and_then(|s| s.parse().ok()) {
            Some(n) => Command::Admin(AdminCommand::MaxPerMin(n)),
            None => Command::Malformed("admin maxpermin <n>".to_string()),
        },
        "channels" => match first.as_deref() {
            Some("add") => match rest.get(1).and_then(|s| s.parse().ok()) {
                Some(id) => Command::Admin(AdminCommand::ChannelAdd(id)),
                None => Command::Malformed("admin channels add <channel id>".to_string()),
            },
            Some("remove") => match rest.get(1).and_then(|s| s.parse().ok()) {
                Some(id) => Command::Admin(AdminCommand::ChannelRemove(id)),
                None => Command::Malformed("admin channels remove <channel id>".to_string()),
            },
            Some("clear") => Command::Admin(AdminCommand::ChannelClear),
            _ => Command::Malformed("admin channels <add|remove|clear> [id]".to_string()),
        },
        "debug" => match first.as_deref() {
            Some("on") => Command::Admin(AdminCommand::Debug(true)),
            Some("off") => Command::Admin(AdminCommand::Debug(false)),
            _ => Command::Malformed("admin debug <on|off>".to_string()),
        },
        "status" => Command::Admin(AdminCommand::Status),
        _ => Command::Malformed(USAGE_ADMIN.to_string()),
    }
}

/// Whitespace splitting with double-quote grouping, so venue names with
/// spaces survive: `set venue add "DREAM Maker Space" "https://..."`.
fn split_args(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in input.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Command list for `!help`, localized for the camp's Thai audience.
pub fn help_text(prefix: &str) -> String {
    [
        "คำสั่ง:".to_string(),
        format!("• `{prefix}rocketcamp` — ภาพรวมค่าย"),
        format!("• `{prefix}price` — ค่าสมัคร"),
        format!("• `{prefix}apply` — สมัคร"),
        format!("• `{prefix}contact` — ติดต่อ"),
        format!("• `{prefix}venue` — สถานที่/แผนที่"),
        format!("• `{prefix}schedule workshop|launch` — ตารางกิจกรรมละเอียด"),
        format!("• `{prefix}ask <คำถาม>` — ถาม AI (โหมดประหยัดโควต้า Gemini)"),
    ]
    .join("\n")
}
