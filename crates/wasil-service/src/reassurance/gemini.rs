//! Client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use wasil_core::config::ReassuranceConfig;
use wasil_core::{AppError, AppResult};

use super::service::TextGenerator;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// HTTP client for Gemini text generation.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(config: &ReassuranceConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                top_p: 0.9,
            },
        };

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::external(format!("Text generation request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external(format!(
                "Text generation returned HTTP {status}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::external(format!("Malformed text generation response: {e}")))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
            .unwrap_or_default();

        debug!(model = %self.model, chars = text.len(), "Generated reassurance text");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_p: 0.9,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert!(json["generationConfig"]["topP"].is_number());
    }

    #[test]
    fn test_response_text_is_joined() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"All "},{"text":"good."}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let text: String = parsed.candidates[0]
            .content
            .as_ref()
            .unwrap()
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(text, "All good.");
    }

    #[test]
    fn test_url_uses_model() {
        let mut config = ReassuranceConfig::default();
        config.endpoint = "http://localhost:9999/v1beta/".into();
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.url(),
            "http://localhost:9999/v1beta/models/gemini-flash-latest:generateContent"
        );
    }
}
