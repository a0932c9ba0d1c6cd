use crate::domain::model::{GenerationSettings, RecommendationRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

/// Settings the recommendation path needs, whatever the configuration source.
pub trait AssistantSettings: Send + Sync {
    /// Base URL of the generative-language API, without the model segment.
    fn model_endpoint(&self) -> &str;
    fn model_name(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn request_timeout(&self) -> Duration;
    fn generation(&self) -> GenerationSettings;
    fn currency(&self) -> &str;
    fn strict_totals(&self) -> bool;
}

/// One outbound call to a text-generation service for a recommendation.
#[async_trait]
pub trait Requestor: Send + Sync {
    async fn request(&self, request: &RecommendationRequest) -> Result<String>;
}
