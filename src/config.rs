use anyhow::Result;
use std::env;

/// Which generative-text backend `!ask` falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Google,
    Generic,
}

/// Process-level settings read once from the environment at startup.
///
/// The camp knowledge base itself lives in `camp.config.json` (see
/// [`crate::camp`]); this struct only carries credentials, gating knobs and
/// LLM parameters.
#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: String,
    pub prefix: String,
    pub auto_reply: bool,
    pub auto_reply_mode: String,
    pub allowed_channels: Vec<u64>,
    pub cooldown_secs: u64,
    pub max_per_min: u32,
    pub debug: bool,
    pub admin_ids: Vec<u64>,
    pub log_level: String,
    pub config_path: String,
    pub llm_provider: LlmProvider,
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_max_output_tokens: u32,
    pub llm_max_input_chars: usize,
    pub llm_endpoint: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Ok(Settings {
            discord_token: env::var("DISCORD_TOKEN")
                .map_err(|_| anyhow::anyhow!("DISCORD_TOKEN environment variable not set"))?,
            prefix: env::var("PREFIX").unwrap_or_else(|_| "!".to_string()),
            auto_reply: parse_switch(&env::var("AUTO_REPLY").unwrap_or_default()),
            auto_reply_mode: env::var("AUTO_REPLY_MODE")
                .unwrap_or_else(|_| "all".to_string())
                .to_lowercase(),
            allowed_channels: parse_id_list(&env::var("AUTO_REPLY_CHANNELS").unwrap_or_default()),
            cooldown_secs: parse_num(&env::var("AUTO_REPLY_COOLDOWN_SECONDS").unwrap_or_default(), 8),
            max_per_min: parse_num(&env::var("AUTO_REPLY_MAX_PER_MIN").unwrap_or_default(), 20),
            debug: parse_switch(&env::var("DEBUG").unwrap_or_default()),
            admin_ids: parse_id_list(&env::var("ADMIN_IDS").unwrap_or_default()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            config_path: env::var("CONFIG_PATH").unwrap_or_else(|_| "camp.config.json".to_string()),
            llm_provider: match env::var("GEMINI_PROVIDER")
                .unwrap_or_default()
                .to_lowercase()
                .as_str()
            {
                "generic" => LlmProvider::Generic,
                _ => LlmProvider::Google,
            },
            llm_api_key: env::var("GEMINI_API_KEY").unwrap_or_default(),
            llm_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            llm_max_output_tokens: parse_num(
                &env::var("GEMINI_MAX_OUTPUT_TOKENS").unwrap_or_default(),
                256,
            ),
            llm_max_input_chars: parse_num(
                &env::var("GEMINI_MAX_INPUT_CHARS").unwrap_or_default(),
                3000,
            ),
            llm_endpoint: env::var("GEMINI_ENDPOINT").ok().filter(|s| !s.is_empty()),
        })
    }
}

/// "on"/"off" style env switch; anything other than "on" (case-insensitive)
/// is off.
fn parse_switch(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("on")
}

/// Comma-separated snowflake list; malformed entries are skipped.
fn parse_id_list(raw: &str) -> Vec<u64> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

fn parse_num<T: std::str::FromStr>(raw: &str, default: T) -> T {
    raw.trim().parse().unwrap_or(default)
}
