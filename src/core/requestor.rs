use crate::core::prompt::build_prompt;
use crate::domain::model::{GenerationSettings, RecommendationRequest};
use crate::domain::ports::{AssistantSettings, Requestor};
use crate::utils::error::{AssistantError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationSettings,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Requestor backed by the Gemini `generateContent` endpoint.
pub struct GeminiRequestor<C: AssistantSettings> {
    config: C,
    client: Client,
}

impl<C: AssistantSettings> GeminiRequestor<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.model_endpoint().trim_end_matches('/'),
            self.config.model_name()
        )
    }
}

#[async_trait]
impl<C: AssistantSettings> Requestor for GeminiRequestor<C> {
    async fn request(&self, request: &RecommendationRequest) -> Result<String> {
        let api_key = self
            .config
            .api_key()
            .ok_or_else(|| AssistantError::MissingConfigError {
                field: "GEMINI_API_KEY".to_string(),
            })?;

        let prompt = build_prompt(request, self.config.currency())?;
        let body = GenerateContentBody {
            contents: vec![Content {
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: self.config.generation(),
        };

        let url = self.generate_url();
        tracing::debug!(
            "Requesting recommendation from {} ({} candidates)",
            url,
            request.providers.len()
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .timeout(self.config.request_timeout())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Model API response status: {}", status);

        if !status.is_success() {
            return Err(AssistantError::ExternalServiceError {
                status: status.as_u16(),
            });
        }

        let envelope: GenerateContentResponse = response.json().await?;
        envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| AssistantError::MalformedModelOutputError {
                message: "response has no candidates[0].content.parts[0].text".to_string(),
            })
    }
}
