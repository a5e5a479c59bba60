//! Applies admin-gated commands to the live state.
//!
//! `set` mutations go through the config store and persist to disk; `admin`
//! mutations touch runtime toggles only and are lost on restart.

use crate::commands::{AdminCommand, FormKind, PriceTier, SetCommand};
use crate::context::AppContext;

/// Apply a `!set ...` mutation and return the confirmation text.
pub fn apply_set(cmd: &SetCommand, app: &AppContext) -> String {
    let reply = match cmd {
        SetCommand::Price { tier, value } => {
            app.store.update(|cfg| {
                let p = &mut cfg.camp.pricing;
                match tier {
                    PriceTier::Spectator => p.spectator = *value,
                    PriceTier::Individual => p.individual = *value,
                    PriceTier::Team => p.team = *value,
                }
            });
            format!("Updated price {} = {}", tier.as_str(), value)
        }
        SetCommand::Form { kind, url } => {
            app.store.update(|cfg| {
                let f = &mut cfg.camp.forms;
                match kind {
                    FormKind::Individual => f.individual = url.clone(),
                    FormKind::Team => f.team = url.clone(),
                    FormKind::Line => f.line = url.clone(),
                    FormKind::Facebook => f.facebook = url.clone(),
                }
            });
            format!("Updated form {} = {}", kind.as_str(), url)
        }
        SetCommand::ScheduleSummary(summary) => {
            app.store
                .update(|cfg| cfg.camp.schedule_summary = summary.clone());
            "Updated schedule summary".to_string()
        }
        SetCommand::VenueAdd { name, url } => {
            app.store.update(|cfg| {
                cfg.venues.push(crate::camp::Venue {
                    name: name.clone(),
                    url: url.clone(),
                });
            });
            format!("Added venue: {name}")
        }
        SetCommand::VenueRemove(index) => {
            let mut removed = None;
            app.store.update(|cfg| {
                if *index >= 1 && *index <= cfg.venues.len() {
                    removed = Some(cfg.venues.remove(index - 1));
                }
            });
            match removed {
                Some(venue) => format!("Removed venue: {}", venue.name),
                // Nothing changed; skip the save below.
                None => return format!("No venue at index {index}"),
            }
        }
    };
    app.store.save();
    reply
}

/// Apply a `!admin ...` toggle and return the confirmation text.
pub fn apply_admin(cmd: &AdminCommand, app: &AppContext) -> String {
    match cmd {
        AdminCommand::AutoReply(enabled) => {
            app.update_runtime(|rt| rt.auto_reply = *enabled);
            format!("Auto-reply is now {}", if *enabled { "ON" } else { "OFF" })
        }
        AdminCommand::Cooldown(secs) => {
            app.update_runtime(|rt| rt.cooldown_secs = *secs);
            format!("Auto-reply cooldown = {secs}s")
        }
        AdminCommand::MaxPerMin(n) => {
            app.update_runtime(|rt| rt.max_per_min = *n);
            format!("Auto-reply cap = {n}/min per channel")
        }
        AdminCommand::ChannelAdd(id) => {
            app.update_runtime(|rt| {
                if !rt.allowed_channels.contains(id) {
                    rt.allowed_channels.push(*id);
                }
            });
            format!("Added channel {id} to auto-reply allowlist")
        }
        AdminCommand::ChannelRemove(id) => {
            app.update_runtime(|rt| rt.allowed_channels.retain(|c| c != id));
            format!("Removed channel {id} from auto-reply allowlist")
        }
        AdminCommand::ChannelClear => {
            app.update_runtime(|rt| rt.allowed_channels.clear());
            "Cleared auto-reply allowlist (all channels allowed)".to_string()
        }
        AdminCommand::Debug(enabled) => {
            app.update_runtime(|rt| rt.debug = *enabled);
            format!("Debug logging is now {}", if *enabled { "ON" } else { "OFF" })
        }
        AdminCommand::Status => {
            let rt = app.runtime();
            let channels = if rt.allowed_channels.is_empty() {
                "ALL".to_string()
            } else {
                rt.allowed_channels
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            [
                format!(
                    "Auto-reply: {} ({})",
                    if rt.auto_reply { "ON" } else { "OFF" },
                    rt.mode
                ),
                format!("Allowed channels: {channels}"),
                format!("Cooldown: {}s | Cap: {}/min", rt.cooldown_secs, rt.max_per_min),
                format!("Debug: {}", if rt.debug { "ON" } else { "OFF" }),
            ]
            .join("\n")
        }
    }
}
