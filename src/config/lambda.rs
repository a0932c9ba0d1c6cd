use crate::config::{
    usable_api_key, API_KEY_ENV, DEFAULT_CURRENCY, DEFAULT_MODEL_ENDPOINT, DEFAULT_MODEL_NAME,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::domain::model::GenerationSettings;
use crate::domain::ports::AssistantSettings;
use crate::utils::error::{AssistantError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub model_endpoint: String,
    pub model_name: String,
    pub api_key: String,
    pub timeout_seconds: u64,
    pub currency: String,
    pub strict_totals: bool,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(API_KEY_ENV).ok();
        let api_key = usable_api_key(api_key.as_deref())
            .map(str::to_string)
            .ok_or_else(|| AssistantError::MissingConfigError {
                field: API_KEY_ENV.to_string(),
            })?;

        Ok(Self {
            model_endpoint: env::var("MODEL_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_MODEL_ENDPOINT.to_string()),
            model_name: env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL_NAME.to_string()),
            api_key,
            timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            currency: env::var("CURRENCY").unwrap_or_else(|_| DEFAULT_CURRENCY.to_string()),
            strict_totals: env::var("STRICT_TOTALS")
                .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
        })
    }
}

impl AssistantSettings for LambdaConfig {
    fn model_endpoint(&self) -> &str {
        &self.model_endpoint
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn api_key(&self) -> Option<&str> {
        Some(&self.api_key)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn generation(&self) -> GenerationSettings {
        GenerationSettings::default()
    }

    fn currency(&self) -> &str {
        &self.currency
    }

    fn strict_totals(&self) -> bool {
        self.strict_totals
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_url("MODEL_ENDPOINT", &self.model_endpoint)?;
        validate_non_empty_string("MODEL_NAME", &self.model_name)?;
        validate_non_empty_string("CURRENCY", &self.currency)?;
        // a Lambda invocation cannot outlive 15 minutes
        validate_range("REQUEST_TIMEOUT_SECONDS", self.timeout_seconds, 1, 900)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
