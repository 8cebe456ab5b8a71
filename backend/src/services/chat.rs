//! AI chat proxy
//!
//! Forwards a user prompt to the configured generative-AI HTTP API
//! (Gemini-style `generateContent`) and returns the first candidate's text.
//! The upstream key never reaches the client; upstream failures map to 502.

use crate::config::AiConfig;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outbound request body
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Upstream response, reduced to the fields consumed here
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
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

/// Chat proxy service
#[derive(Clone)]
pub struct ChatService {
    client: reqwest::Client,
    config: AiConfig,
}

impl ChatService {
    pub fn new(config: AiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { client, config })
    }

    /// Proxy a prompt to the generative API and return the reply text
    pub async fn generate(&self, prompt: &str) -> Result<String, ApiError> {
        if !self.config.enabled || self.config.api_key.is_empty() {
            return Err(ApiError::BadRequest("AI chat is disabled".to_string()));
        }

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_url.trim_end_matches('/'),
            self.config.model,
            self.config.api_key,
        );

        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ApiError::Upstream(format!(
                "generative API returned {}",
                response.status()
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(format!("unreadable response: {}", e)))?;

        let reply: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if reply.is_empty() {
            return Err(ApiError::Upstream("empty completion".to_string()));
        }

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(url: &str) -> AiConfig {
        AiConfig {
            enabled: true,
            api_url: url.to_string(),
            api_key: "test-key".to_string(),
            model: "gemini-1.5-flash".to_string(),
        }
    }

    #[tokio::test]
    async fn returns_the_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Hello "}, {"text": "there"}]}
                }]
            })))
            .mount(&server)
            .await;

        let service = ChatService::new(test_config(&server.uri())).unwrap();
        let reply = service.generate("hi").await.unwrap();
        assert_eq!(reply, "Hello there");
    }

    #[tokio::test]
    async fn upstream_error_maps_to_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let service = ChatService::new(test_config(&server.uri())).unwrap();
        let err = service.generate("hi").await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
    }

    #[tokio::test]
    async fn disabled_service_refuses() {
        let mut config = test_config("http://localhost:1");
        config.enabled = false;

        let service = ChatService::new(config).unwrap();
        let err = service.generate("hi").await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn empty_candidates_are_an_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&server)
            .await;

        let service = ChatService::new(test_config(&server.uri())).unwrap();
        assert!(service.generate("hi").await.is_err());
    }
}
