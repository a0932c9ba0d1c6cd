use crate::config::{
    usable_api_key, ServerSettings, API_KEY_ENV, DEFAULT_CURRENCY, DEFAULT_MODEL_ENDPOINT,
    DEFAULT_MODEL_NAME, DEFAULT_PROVIDERS_FILE, DEFAULT_TIMEOUT_SECONDS,
};
use crate::domain::model::GenerationSettings;
use crate::domain::ports::AssistantSettings;
use crate::utils::error::{AssistantError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_range,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerSection>,
    pub model: ModelSection,
    pub generation: Option<GenerationSection>,
    pub resolver: Option<ResolverSection>,
    pub catalog: Option<CatalogSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSection {
    pub endpoint: Option<String>,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSection {
    pub temperature: Option<f64>,
    pub top_k: Option<u32>,
    pub top_p: Option<f64>,
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSection {
    pub strict_totals: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSection {
    pub providers_file: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: TomlConfig =
            toml::from_str(&processed_content).map_err(|e| AssistantError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;

        if usable_api_key(config.model.api_key.as_deref()).is_none() {
            config.model.api_key = std::env::var(API_KEY_ENV).ok();
        }

        Ok(config)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AssistantError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn server_settings(&self) -> ServerSettings {
        let server = self.server.as_ref();
        ServerSettings {
            bind_address: server
                .and_then(|s| s.bind_address.clone())
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: server.and_then(|s| s.port).unwrap_or(8080),
            providers_file: self
                .catalog
                .as_ref()
                .and_then(|c| c.providers_file.clone())
                .unwrap_or_else(|| DEFAULT_PROVIDERS_FILE.to_string()),
        }
    }
}

impl AssistantSettings for TomlConfig {
    fn model_endpoint(&self) -> &str {
        self.model.endpoint.as_deref().unwrap_or(DEFAULT_MODEL_ENDPOINT)
    }

    fn model_name(&self) -> &str {
        self.model.name.as_deref().unwrap_or(DEFAULT_MODEL_NAME)
    }

    fn api_key(&self) -> Option<&str> {
        usable_api_key(self.model.api_key.as_deref())
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.model.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    fn generation(&self) -> GenerationSettings {
        let defaults = GenerationSettings::default();
        match &self.generation {
            Some(g) => GenerationSettings {
                temperature: g.temperature.unwrap_or(defaults.temperature),
                top_k: g.top_k.unwrap_or(defaults.top_k),
                top_p: g.top_p.unwrap_or(defaults.top_p),
                max_output_tokens: g.max_output_tokens.unwrap_or(defaults.max_output_tokens),
            },
            None => defaults,
        }
    }

    fn currency(&self) -> &str {
        self.model.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    fn strict_totals(&self) -> bool {
        self.resolver
            .as_ref()
            .and_then(|r| r.strict_totals)
            .unwrap_or(true)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("model.endpoint", self.model_endpoint())?;
        validate_non_empty_string("model.name", self.model_name())?;
        validate_non_empty_string("model.currency", self.currency())?;
        if let Some(timeout) = self.model.timeout_seconds {
            validate_positive_number("model.timeout_seconds", timeout, 1)?;
        }

        let generation = self.generation();
        validate_range("generation.temperature", generation.temperature, 0.0, 2.0)?;
        validate_range("generation.top_p", generation.top_p, 0.0, 1.0)?;
        validate_positive_number("generation.top_k", u64::from(generation.top_k), 1)?;
        validate_positive_number(
            "generation.max_output_tokens",
            u64::from(generation.max_output_tokens),
            1,
        )?;

        let server = self.server_settings();
        validate_non_empty_string("server.bind_address", &server.bind_address)?;
        validate_path("catalog.providers_file", &server.providers_file)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
bind_address = "127.0.0.1"
port = 9000

[model]
endpoint = "https://models.example.com/v1beta"
name = "gemini-1.5-flash"
api_key = "inline-key"
timeout_seconds = 10
currency = "USD"

[generation]
temperature = 0.1
max_output_tokens = 1024

[resolver]
strict_totals = false

[catalog]
providers_file = "seed/providers.json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.model_name(), "gemini-1.5-flash");
        assert_eq!(config.api_key(), Some("inline-key"));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.generation().temperature, 0.1);
        assert_eq!(config.generation().top_k, 1);
        assert_eq!(config.generation().max_output_tokens, 1024);
        assert!(!config.strict_totals());
        assert_eq!(config.server_settings().socket_addr(), "127.0.0.1:9000");
        assert_eq!(config.server_settings().providers_file, "seed/providers.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("[model]\n").unwrap();

        assert_eq!(config.model_endpoint(), DEFAULT_MODEL_ENDPOINT);
        assert_eq!(config.currency(), "MXN");
        assert!(config.strict_totals());
        assert_eq!(config.generation(), GenerationSettings::default());
        assert_eq!(config.server_settings().port, 8080);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FEST_TEST_MODEL_ENDPOINT", "https://test.api.com/v1beta");

        let toml_content = r#"
[model]
endpoint = "${FEST_TEST_MODEL_ENDPOINT}"
api_key = "${FEST_TEST_UNSET_KEY_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.model_endpoint(), "https://test.api.com/v1beta");
        assert_ne!(config.model.api_key.as_deref(), Some("${FEST_TEST_UNSET_KEY_VAR}"));

        std::env::remove_var("FEST_TEST_MODEL_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[model]
endpoint = "invalid-url"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[model]

[generation]
temperature = 3.5
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[model]\nname = \"file-model\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.model_name(), "file-model");
    }
}
