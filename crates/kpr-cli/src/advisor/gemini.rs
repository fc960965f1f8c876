//! Google Gemini client behind the advisory [`ChatModel`] seam.
//!
//! The CLI is synchronous, so the client owns a small tokio runtime and
//! blocks on each `generateContent` call. One request is in flight at a time.

use std::time::Duration;

use kpr_core::advisory::{AdvisorSettings, ChatMessage, ChatModel, ChatRole};
use kpr_core::{KprError, KprResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;
use tracing::{debug, warn};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    client: Client,
    runtime: Runtime,
    base_url: String,
    api_key: String,
    settings: AdvisorSettings,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl GeminiClient {
    pub fn new(
        api_key: String,
        settings: AdvisorSettings,
        timeout_seconds: u64,
    ) -> KprResult<Self> {
        if api_key.trim().is_empty() {
            return Err(KprError::Advisor("API key is empty".into()));
        }
        settings.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| KprError::Advisor(format!("HTTP client setup failed: {e}")))?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| KprError::Advisor(format!("runtime setup failed: {e}")))?;

        Ok(Self {
            client,
            runtime,
            base_url: BASE_URL.to_string(),
            api_key,
            settings,
        })
    }

    pub fn settings(&self) -> &AdvisorSettings {
        &self.settings
    }

    async fn generate(&self, messages: &[ChatMessage]) -> KprResult<String> {
        let url = format!(
            "{}/{}:generateContent",
            self.base_url, self.settings.model
        );
        let request = build_request(messages, self.settings.temperature);
        debug!(model = %self.settings.model, messages = messages.len(), "calling Gemini");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| KprError::Advisor(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Gemini returned an error");
            return Err(KprError::Advisor(format!("{status}: {}", body.trim())));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| KprError::Advisor(format!("unreadable response: {e}")))?;
        extract_text(body)
    }
}

impl ChatModel for GeminiClient {
    fn complete(&self, messages: &[ChatMessage]) -> KprResult<String> {
        self.runtime.block_on(self.generate(messages))
    }
}

/// System messages become the system instruction; the rest keep their order,
/// with the assistant speaking as `model`.
fn build_request(messages: &[ChatMessage], temperature: f32) -> GenerateRequest {
    let system: Vec<Part> = messages
        .iter()
        .filter(|m| m.role == ChatRole::System)
        .map(|m| Part {
            text: m.content.clone(),
        })
        .collect();

    let contents = messages
        .iter()
        .filter_map(|m| {
            let role = match m.role {
                ChatRole::System => return None,
                ChatRole::User => "user",
                ChatRole::Assistant => "model",
            };
            Some(Content {
                role: Some(role),
                parts: vec![Part {
                    text: m.content.clone(),
                }],
            })
        })
        .collect();

    GenerateRequest {
        system_instruction: (!system.is_empty()).then_some(Content {
            role: None,
            parts: system,
        }),
        contents,
        generation_config: GenerationConfig { temperature },
    }
}

fn extract_text(response: GenerateResponse) -> KprResult<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| KprError::Advisor("no candidates in response".into()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
        return Err(KprError::Advisor(format!(
            "empty answer (finish reason: {reason})"
        )));
    }
    Ok(text)
}
