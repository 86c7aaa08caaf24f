//! Gemini `generateContent` backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AssistantBackend, AssistantContext, AssistantError};

const SYSTEM_PROMPT: &str = "You are a revenue analyst for a basketball franchise. \
Answer the question using only the JSON aggregates provided. Amounts are in euro, \
occupancy, comp_rate and revenue_share are fractions between 0 and 1. \
Answer concisely in the language of the question.";

pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(
        base_url: String,
        model: String,
        api_key: String,
        timeout_seconds: u64,
    ) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| AssistantError::BackendUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// Gemini API request format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

/// Gemini API response format.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

fn build_request(question: &str, context: &AssistantContext) -> Result<GenerateRequest, AssistantError> {
    let aggregates = serde_json::to_string(context)
        .map_err(|e| AssistantError::BackendUnavailable(e.to_string()))?;

    Ok(GenerateRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: SYSTEM_PROMPT.to_string(),
            }],
        },
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part {
                text: format!("Aggregates:\n{aggregates}\n\nQuestion: {question}"),
            }],
        }],
        generation_config: GenerationConfig {
            temperature: 0.2,
            max_output_tokens: 1024,
        },
    })
}

/// Concatenated text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String, AssistantError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AssistantError::ResponseParseError(
            "no text in first candidate".to_string(),
        ));
    }
    Ok(text.trim().to_string())
}

#[async_trait]
impl AssistantBackend for GeminiBackend {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn answer(
        &self,
        question: &str,
        context: &AssistantContext,
    ) -> Result<String, AssistantError> {
        let url = self.endpoint();
        let request = build_request(question, context)?;

        debug!("Sending request to Gemini: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::BackendUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Status { status, body });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::ResponseParseError(e.to_string()))?;

        extract_text(parsed)
    }
}
