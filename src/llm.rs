//! Generative-text fallback for questions the knowledge base cannot answer.
//!
//! One POST per question, no retries. The caller converts any `Err` into a
//! short user-visible apology; nothing from the upstream body reaches the
//! chat surface.

use crate::answers::trunc;
use crate::camp::CampConfig;
use crate::config::{LlmProvider, Settings};
use anyhow::{anyhow, Context, Result};
use log::debug;
use serde_json::{json, Value};

pub struct LlmClient {
    provider: LlmProvider,
    api_key: String,
    model: String,
    max_output_tokens: u32,
    max_input_chars: usize,
    endpoint: Option<String>,
    http: reqwest::Client,
}

impl LlmClient {
    pub fn from_settings(settings: &Settings) -> Self {
        LlmClient {
            provider: settings.llm_provider,
            api_key: settings.llm_api_key.clone(),
            model: settings.llm_model.clone(),
            max_output_tokens: settings.llm_max_output_tokens,
            max_input_chars: settings.llm_max_input_chars,
            endpoint: settings.llm_endpoint.clone(),
            http: reqwest::Client::new(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// System preamble + condensed config facts + the verbatim question,
    /// bounded to the input character budget.
    pub fn build_context(&self, cfg: &CampConfig, question: &str) -> String {
        let c = &cfg.camp;
        let venues = cfg
            .venues
            .iter()
            .map(|v| v.name.as_str())
            .collect::<Vec<_>>()
            .join(" | ");
        let parts = [
            format!("You are the info bot for \"{}\".", c.title),
            "Answer in Thai, concise; use short bullet points where helpful.".to_string(),
            format!("Overview:\n{}", c.desc),
            format!("Schedule (short): {}", c.schedule_summary),
            format!("Apply: individual {} | team {}", c.forms.individual, c.forms.team),
            format!(
                "Pricing: spectator {} THB, individual {} THB, team {} THB",
                c.pricing.spectator, c.pricing.individual, c.pricing.team
            ),
            format!("Venues: {venues}"),
            format!("Question: {question}"),
        ];
        trunc(&parts.join("\n"), self.max_input_chars)
    }

    /// Single request to the configured endpoint. Fails fast when no API key
    /// is set; never retries.
    pub async fn ask(&self, prompt: &str) -> Result<String> {
        if !self.is_configured() {
            return Err(anyhow!("LLM not configured: GEMINI_API_KEY is empty"));
        }
        match self.provider {
            LlmProvider::Google => self.ask_google(prompt).await,
            LlmProvider::Generic => self.ask_generic(prompt).await,
        }
    }

    async fn ask_google(&self, prompt: &str) -> Result<String> {
        let endpoint = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "maxOutputTokens": self.max_output_tokens,
                "temperature": 0.2,
                "topP": 0.9,
                "topK": 40
            }
        });

        let resp = self
            .http
            .post(&endpoint)
            .json(&body)
            .send()
            .await
            .context("LLM request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
            debug!("LLM error body: {body}");
            return Err(anyhow!("LLM HTTP {status}"));
        }

        let json: Value = resp.json().await.context("LLM response was not JSON")?;
        let text = extract_google_text(&json);
        Ok(if text.is_empty() { "ไม่มีข้อมูล".to_string() } else { text })
    }

    async fn ask_generic(&self, prompt: &str) -> Result<String> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| anyhow!("LLM not configured: GEMINI_ENDPOINT is empty"))?;
        let body = json!({
            "prompt": prompt,
            "max_tokens": self.max_output_tokens,
            "temperature": 0.2
        });

        let resp = self
            .http
            .post(endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("LLM request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_else(|_| "<no body>".to_string());
            debug!("LLM error body: {body}");
            return Err(anyhow!("LLM HTTP {status}"));
        }

        let json: Value = resp.json().await.context("LLM response was not JSON")?;
        extract_generic_text(&json).ok_or_else(|| anyhow!("LLM response had no text field"))
    }
}

fn extract_google_text(json: &Value) -> String {
    json["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn extract_generic_text(json: &Value) -> Option<String> {
    json["text"]
        .as_str()
        .or_else(|| json["output"].as_str())
        .map(|s| s.trim().to_string())
}
