//! Process-wide application state, owned explicitly rather than as globals
//! so each test can construct a fresh one.

use crate::camp::ConfigStore;
use crate::config::Settings;
use crate::intents::IntentCatalog;
use crate::llm::LlmClient;
use crate::rate_limiter::ReplyGate;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Operational knobs admins can flip at runtime with `!admin ...`.
/// Seeded from the environment; never persisted. The admin identity set
/// itself lives in [`Settings`] and is immutable after startup.
#[derive(Debug, Clone)]
pub struct RuntimeToggles {
    pub auto_reply: bool,
    pub mode: String,
    pub allowed_channels: Vec<u64>,
    pub cooldown_secs: u64,
    pub max_per_min: u32,
    pub debug: bool,
}

pub struct AppContext {
    pub settings: Settings,
    /// Shared with the file-watch task, which reloads it on external edits.
    pub store: Arc<ConfigStore>,
    pub catalog: IntentCatalog,
    pub gate: ReplyGate,
    pub llm: LlmClient,
    runtime: RwLock<RuntimeToggles>,
}

impl AppContext {
    pub fn new(settings: Settings) -> Self {
        let runtime = RuntimeToggles {
            auto_reply: settings.auto_reply,
            mode: settings.auto_reply_mode.clone(),
            allowed_channels: settings.allowed_channels.clone(),
            cooldown_secs: settings.cooldown_secs,
            max_per_min: settings.max_per_min,
            debug: settings.debug,
        };
        AppContext {
            store: Arc::new(ConfigStore::new(&settings.config_path)),
            catalog: IntentCatalog::new(),
            gate: ReplyGate::new(Duration::from_secs(60)),
            llm: LlmClient::from_settings(&settings),
            runtime: RwLock::new(runtime),
            settings,
        }
    }

    /// An empty admin list means every user may run admin commands, matching
    /// the single-server deployments this bot is written for.
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.settings.admin_ids.is_empty() || self.settings.admin_ids.contains(&user_id)
    }

    pub fn runtime(&self) -> RuntimeToggles {
        self.runtime
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn update_runtime<F: FnOnce(&mut RuntimeToggles)>(&self, f: F) {
        f(&mut self.runtime.write().unwrap_or_else(|e| e.into_inner()));
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> AppContext {
    use crate::config::LlmProvider;
    use std::sync::atomic::{AtomicU64, Ordering};

    // Tests run in parallel; every context gets its own config file so
    // saves and cleanup cannot collide.
    static SEQ: AtomicU64 = AtomicU64::new(0);
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    let mut path = std::env::temp_dir();
    path.push(format!("rocketcamp-ctx-{}-{seq}.json", std::process::id()));
    AppContext::new(Settings {
        discord_token: "test-token".to_string(),
        prefix: "!".to_string(),
        auto_reply: true,
        auto_reply_mode: "all".to_string(),
        allowed_channels: Vec::new(),
        cooldown_secs: 8,
        max_per_min: 20,
        debug: false,
        admin_ids: vec![42],
        log_level: "info".to_string(),
        config_path: path.to_string_lossy().into_owned(),
        llm_provider: LlmProvider::Google,
        llm_api_key: String::new(),
        llm_model: "gemini-1.5-flash".to_string(),
        llm_max_output_tokens: 256,
        llm_max_input_chars: 3000,
        llm_endpoint: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_gate() {
        let app = test_context();
        assert!(app.is_admin(42));
        assert!(!app.is_admin(7));
    }

    #[test]
    fn test_empty_admin_list_allows_everyone() {
        let mut app = test_context();
        app.settings.admin_ids.clear();
        assert!(app.is_admin(7));
    }

    #[test]
    fn test_runtime_toggles_update() {
        let app = test_context();
        assert!(app.runtime().auto_reply);
        app.update_runtime(|rt| {
            rt.auto_reply = false;
            rt.cooldown_secs = 30;
        });
        let rt = app.runtime();
        assert!(!rt.auto_reply);
        assert_eq!(rt.cooldown_secs, 30);
    }
}
