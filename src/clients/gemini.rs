//! Pass-through client for the hosted Gemini `generateContent` endpoint.
//!
//! Deliberately thin: one request, no retry or backoff. Callers degrade to a
//! fallback answer when the key is missing or the call fails.

use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(
                config.request_timeout_seconds.into(),
            ))
            .user_agent("Guardia/1.0")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build Gemini HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// False when no usable key is configured; callers return their fallback
    /// result without making a request.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && self.api_key != "SUA_CHAVE_AQUI"
    }

    /// Free-form text generation.
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        self.generate(prompt, None).await
    }

    /// Generation constrained to a JSON response body.
    pub async fn generate_json(&self, prompt: &str) -> Result<String> {
        self.generate(
            prompt,
            Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        )
        .await
    }

    async fn generate(&self, prompt: &str, config: Option<GenerationConfig>) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: config,
        };

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Gemini API error: {} - {}", status, body));
        }

        let response: GenerateContentResponse = response.json().await?;

        let text = response
            .candidates
            .and_then(|mut c| if c.is_empty() { None } else { Some(c.remove(0)) })
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|mut p| if p.is_empty() { None } else { Some(p.remove(0)) })
            .and_then(|p| p.text)
            .ok_or_else(|| anyhow::anyhow!("Gemini API returned an empty candidate"))?;

        Ok(text)
    }
}
