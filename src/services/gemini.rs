use crate::config::settings::DEFAULT_GEMINI_MODEL;
use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};

/// Tried in order after the configured model.
pub const FALLBACK_MODELS: &[&str] = &[DEFAULT_GEMINI_MODEL, "gemini-2.0-flash-lite", "gemini-2.0-flash"];
const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
    pub api_key: String,
    pub model: String,
    pub system_prompt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStatus {
    Done,
    MissingKey,
    ApiError,
    NetworkError,
}

impl PromptStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PromptStatus::Done => "Done",
            PromptStatus::MissingKey => "Configuration required",
            PromptStatus::ApiError => "Gemini request failed",
            PromptStatus::NetworkError => "Network error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptReply {
    pub prompt: String,
    pub status: PromptStatus,
    /// Model that answered, or the configured one when none did.
    pub model: String,
    pub text: String,
}

impl PromptReply {
    pub fn is_error(&self) -> bool {
        self.status != PromptStatus::Done
    }
}

/// Configured model first, then the fallbacks, without repeats or blanks.
pub fn models_to_try(primary: &str) -> Vec<String> {
    let mut models: Vec<String> = Vec::new();
    for m in std::iter::once(primary.trim()).chain(FALLBACK_MODELS.iter().copied()) {
        if !m.is_empty() && !models.iter().any(|x| x == m) {
            models.push(m.to_string());
        }
    }
    models
}

pub fn request_body(prompt: &str, system_prompt: &str) -> Value {
    let mut body = json!({
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
    });
    if !system_prompt.trim().is_empty() {
        body["systemInstruction"] = json!({
            "role": "system",
            "parts": [{ "text": system_prompt }]
        });
    }
    body
}

/// Text parts of the first candidate, newline-joined.
pub fn extract_text(response: &Value) -> Option<String> {
    let parts = response
        .pointer("/candidates/0/content/parts")?
        .as_array()?;
    let text = parts
        .iter()
        .map(|p| p.get("text").and_then(Value::as_str).unwrap_or(""))
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn api_error_message(response: &Value, status: reqwest::StatusCode) -> String {
    response
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed ({}).", status.as_u16()))
}

enum Attempt {
    Answered(Value),
    Rejected(String),
}

async fn attempt(client: &Client, base_url: &str, model: &str, req: &PromptRequest) -> Result<Attempt> {
    let url = format!(
        "{}/v1beta/models/{}:generateContent?key={}",
        base_url,
        urlencoding::encode(model),
        urlencoding::encode(&req.api_key)
    );
    let response = client
        .post(url)
        .timeout(TIMEOUT)
        .json(&request_body(&req.prompt, &req.system_prompt))
        .send()
        .await?;

    let status = response.status();
    let data: Value = response
        .json()
        .await
        .map_err(|e| anyhow!("Unreadable response ({}): {}", status.as_u16(), e))?;
    if status.is_success() {
        Ok(Attempt::Answered(data))
    } else {
        Ok(Attempt::Rejected(api_error_message(&data, status)))
    }
}

pub async fn ask(client: &Client, base_url: &str, req: &PromptRequest) -> PromptReply {
    let primary = if req.model.trim().is_empty() { DEFAULT_GEMINI_MODEL } else { req.model.trim() };
    let reply = |status, model: &str, text: String| PromptReply {
        prompt: req.prompt.clone(),
        status,
        model: model.to_string(),
        text,
    };

    if req.api_key.trim().is_empty() {
        return reply(
            PromptStatus::MissingKey,
            primary,
            "Missing Gemini API key. Open :config and set \"Gemini API Key\".".to_string(),
        );
    }

    let mut last_error = String::new();
    for model in models_to_try(primary) {
        match attempt(client, base_url, &model, req).await {
            Ok(Attempt::Answered(data)) => {
                info!(model = %model, "Prompt answered");
                let text = extract_text(&data).unwrap_or_else(|| "No text response returned.".to_string());
                return reply(PromptStatus::Done, &model, text);
            }
            Ok(Attempt::Rejected(message)) => {
                warn!(model = %model, "Prompt rejected: {}", message);
                last_error = message;
            }
            Err(e) => {
                warn!("Prompt request failed: {}", e);
                return reply(PromptStatus::NetworkError, primary, format!("Request failed: {}", e));
            }
        }
    }

    reply(PromptStatus::ApiError, primary, format!("Gemini error: {}", last_error))
}
