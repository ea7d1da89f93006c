use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{build_prompt, clean_suggestions};
use crate::error::SuggestionError;
use crate::storage::SuggestionsConfig;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SuggestionPayload {
    #[serde(default)]
    suggestions: Vec<String>,
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    url: url::Url,
    api_key: String,
}

impl GeminiClient {
    /// # Errors
    /// Returns an error if the endpoint is not a valid URL or the HTTP
    /// client cannot be built.
    pub fn new(config: &SuggestionsConfig, api_key: impl Into<String>) -> Result<Self, SuggestionError> {
        let base = config.endpoint.trim_end_matches('/');
        let url = url::Url::parse(&format!(
            "{base}/v1beta/models/{}:generateContent",
            config.model
        ))
        .map_err(|e| SuggestionError::Malformed(format!("invalid endpoint: {e}")))?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url,
            api_key: api_key.into(),
        })
    }

    /// Ask the model for habit suggestions.
    ///
    /// # Errors
    /// Any transport, HTTP or decoding failure, or an answer with no usable
    /// suggestions.
    pub async fn suggest(&self, interests: &str, goals: &str) -> Result<Vec<String>, SuggestionError> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": build_prompt(interests, goals) }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json"
            }
        });

        tracing::debug!(url = %self.url, "requesting habit suggestions");
        let resp = self
            .client
            .post(self.url.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "suggestion request failed");
            return Err(SuggestionError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| SuggestionError::Malformed(e.to_string()))?;
        let text = extract_text(&parsed);
        let suggestions = parse_suggestions(&text)?;
        tracing::info!(count = suggestions.len(), "received habit suggestions");
        Ok(suggestions)
    }
}

fn extract_text(resp: &GenerateResponse) -> String {
    resp.candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Decode the model's JSON answer, tolerating a Markdown code fence.
fn parse_suggestions(text: &str) -> Result<Vec<String>, SuggestionError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SuggestionError::Empty);
    }
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| rest.trim_end().trim_end_matches("```"))
        .unwrap_or(trimmed)
        .trim();
    let payload: SuggestionPayload =
        serde_json::from_str(unfenced).map_err(|e| SuggestionError::Malformed(e.to_string()))?;
    clean_suggestions(payload.suggestions)
}
