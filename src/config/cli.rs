use crate::config::{
    usable_api_key, ServerSettings, API_KEY_ENV, DEFAULT_CURRENCY, DEFAULT_MODEL_ENDPOINT,
    DEFAULT_MODEL_NAME, DEFAULT_PROVIDERS_FILE,
};
use crate::domain::model::GenerationSettings;
use crate::domain::ports::AssistantSettings;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_url, Validate,
};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "fest-assistant")]
#[command(about = "Event-services marketplace backend with an AI planning assistant")]
pub struct CliConfig {
    #[arg(long, default_value = "0.0.0.0")]
    pub bind_address: String,

    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// Load settings from a TOML file instead of the flags below
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, default_value = DEFAULT_MODEL_ENDPOINT)]
    pub model_endpoint: String,

    #[arg(long, default_value = DEFAULT_MODEL_NAME)]
    pub model: String,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, default_value = "30")]
    pub timeout_seconds: u64,

    #[arg(long, default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    #[arg(long, default_value = DEFAULT_PROVIDERS_FILE)]
    pub providers_file: String,

    /// Return model output even when totalCost disagrees with the item prices
    #[arg(long)]
    pub lenient_totals: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn server_settings(&self) -> ServerSettings {
        ServerSettings {
            bind_address: self.bind_address.clone(),
            port: self.port,
            providers_file: self.providers_file.clone(),
        }
    }
}

impl AssistantSettings for CliConfig {
    fn model_endpoint(&self) -> &str {
        &self.model_endpoint
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn api_key(&self) -> Option<&str> {
        usable_api_key(self.api_key.as_deref())
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
        !self.lenient_totals
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("bind_address", &self.bind_address)?;
        validate_url("model_endpoint", &self.model_endpoint)?;
        validate_non_empty_string("model", &self.model)?;
        validate_positive_number("timeout_seconds", self.timeout_seconds, 1)?;
        validate_non_empty_string("currency", &self.currency)?;
        validate_path("providers_file", &self.providers_file)?;

        if self.api_key().is_none() {
            tracing::warn!(
                "{} is not set; every recommendation will use the automatic fallback",
                API_KEY_ENV
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_command_line() {
        let config = CliConfig::parse_from(["fest-assistant", "--api-key", "k"]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.model_name(), "gemini-pro");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.api_key(), Some("k"));
        assert!(config.strict_totals());
        assert!(config.validate().is_ok());
        assert_eq!(config.server_settings().socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let config = CliConfig::parse_from([
            "fest-assistant",
            "--model-endpoint",
            "not a url",
            "--lenient-totals",
        ]);
        assert!(!config.strict_totals());
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["fest-assistant", "--timeout-seconds", "0"]);
        assert!(config.validate().is_err());
    }
}
