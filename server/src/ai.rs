//! Gemini fallback for chat queries the catalog cannot answer.
//!
//! Candidate models are tried in order until one returns text. Every remote
//! failure is swallowed and logged at debug level, so the only outcomes a
//! caller sees are a model reply or one of the two canned apologies. Both
//! degraded modes are normal responses, not errors.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Reply when no API key is configured.
pub const AI_NOT_CONFIGURED: &str = "Извините, AI пока не настроен.";

/// Reply when every candidate model failed.
pub const AI_UNAVAILABLE: &str = "Извините, сейчас AI недоступен. Попробуйте позже.";

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiClient {
    api_key: Option<String>,
    models: Vec<String>,
    client: Client,
}

impl GeminiClient {
    /// The timeout applies per attempt, so one stalled model cannot eat the
    /// whole fallback chain.
    pub fn new(api_key: Option<String>, models: Vec<String>, timeout: Duration) -> Self {
        if api_key.is_none() {
            warn!("GEMINI_API_KEY not set, AI replies disabled");
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("HTTP client misconfigured!");

        Self {
            api_key,
            models,
            client,
        }
    }

    /// Short answer from the first model that responds with non-empty text.
    pub async fn ask_short(&self, message: &str, max_sentences: u32) -> String {
        let Some(api_key) = &self.api_key else {
            return AI_NOT_CONFIGURED.to_string();
        };

        let prompt = format!(
            "Ты — вежливый консультант в кондитерской. Очень кратко (1–{max_sentences} предложения) \
             ответь на запрос клиента: \"{message}\""
        );

        for model in &self.models {
            match self.generate(api_key, model, &prompt).await {
                Ok(text) if !text.trim().is_empty() => return text.trim().to_string(),
                Ok(_) => debug!(model = %model, "model returned empty text"),
                Err(e) => debug!(model = %model, error = %e, "model attempt failed"),
            }
        }

        AI_UNAVAILABLE.to_string()
    }

    async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
    ) -> Result<String, reqwest::Error> {
        let url = format!("{GEMINI_ENDPOINT}/{model}:generateContent?key={api_key}");
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let generated: GenerateResponse = response.json().await?;

        Ok(generated.text())
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_returns_canned_reply() {
        let client = GeminiClient::new(
            None,
            vec!["gemini-1.5-flash".to_string()],
            Duration::from_secs(1),
        );

        let reply = client.ask_short("Есть ли у вас Медовик?", 2).await;
        assert_eq!(reply, AI_NOT_CONFIGURED);
    }

    #[tokio::test]
    async fn exhausted_model_list_returns_unavailable() {
        // no models to try, so the chain falls straight through
        let client = GeminiClient::new(
            Some("test-key".to_string()),
            Vec::new(),
            Duration::from_secs(1),
        );

        let reply = client.ask_short("привет", 2).await;
        assert_eq!(reply, AI_UNAVAILABLE);
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let raw = r#"{
            "candidates": [
                { "content": { "parts": [{ "text": "Здравствуйте! " }, { "text": "Чем помочь?" }] } },
                { "content": { "parts": [{ "text": "второй кандидат" }] } }
            ]
        }"#;

        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text(), "Здравствуйте! Чем помочь?");
    }

    #[test]
    fn response_without_candidates_is_empty() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.text(), "");
    }
}
