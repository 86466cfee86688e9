//! Approach hints from a hosted text-generation model.
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_HINT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_HINT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const EMPTY_HINT: &str = "No hint generated.";

pub type Result<T> = std::result::Result<T, HintError>;

#[derive(Debug, Error)]
pub enum HintError {
    #[error("API key for hint generation is not configured")]
    MissingApiKey,
    #[error("failed to fetch hint: {0}")]
    GenerationFailed(String),
}

impl From<reqwest::Error> for HintError {
    fn from(e: reqwest::Error) -> Self {
        HintError::GenerationFailed(e.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct HintConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl HintConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: String::from(DEFAULT_HINT_MODEL),
            base_url: String::from(DEFAULT_HINT_API_URL),
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

#[async_trait]
pub trait HintGenerator {
    async fn generate_hint(&self, title: &str, difficulty: &str) -> Result<String>;
}

pub fn build_prompt(title: &str, difficulty: &str) -> String {
    format!(
        "I am solving a LeetCode problem titled \"{title}\" which is rated as {difficulty}.\n\
         Without giving me the full code solution, please provide:\n\
         1. A conceptual hint or intuition on how to approach it.\n\
         2. Any specific data structures or algorithms that are commonly used for this type of problem.\n\
         Keep the response concise and under 150 words."
    )
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
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
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        let text: String = self
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            String::from(EMPTY_HINT)
        } else {
            text
        }
    }
}

pub struct GeminiHintGenerator {
    config: HintConfig,
    client: Client,
}

impl GeminiHintGenerator {
    pub fn new(config: HintConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { config, client })
    }

    fn endpoint(&self, api_key: &str) -> Result<Url> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        Url::parse_with_params(&url, &[("key", api_key)])
            .map_err(|e| HintError::GenerationFailed(e.to_string()))
    }
}

#[async_trait]
impl HintGenerator for GeminiHintGenerator {
    async fn generate_hint(&self, title: &str, difficulty: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(HintError::MissingApiKey)?;

        let prompt = build_prompt(title, difficulty);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        tracing::info!("request hint for {:?} ({})", title, difficulty);
        let res = self
            .client
            .post(self.endpoint(api_key)?)
            .json(&body)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            tracing::error!("hint generation failed with status {}", status);
            return Err(HintError::GenerationFailed(format!("status {}", status)));
        }

        let response: GenerateResponse = res.json().await?;
        Ok(response.text())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn prompt_mentions_problem() {
        let prompt = build_prompt("Two Sum", "Easy");
        assert!(prompt.contains("titled \"Two Sum\""));
        assert!(prompt.contains("rated as Easy"));
        assert!(prompt.contains("under 150 words"));
    }

    #[test]
    fn blank_key_is_missing() {
        assert!(HintConfig::new(Some(String::from("  "))).api_key.is_none());
        let config = HintConfig::new(Some(String::from("k"))).with_model("gemini-pro");
        assert_eq!(config.model, "gemini-pro");
    }

    #[tokio::test]
    async fn missing_key_fails_before_request() {
        let generator = GeminiHintGenerator::new(HintConfig::new(None)).unwrap();
        let err = generator.generate_hint("Two Sum", "Easy").await.unwrap_err();
        assert!(matches!(err, HintError::MissingApiKey));
    }

    #[test]
    fn endpoint_carries_model_and_key() {
        let generator = GeminiHintGenerator::new(HintConfig::new(None)).unwrap();
        assert_eq!(
            generator.endpoint("abc").unwrap().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key=abc"
        );
    }

    #[test]
    fn response_text() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Use a "},{"text":"hash map."}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), "Use a hash map.");

        let response: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(response.text(), EMPTY_HINT);
    }
}
