#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

pub const DEFAULT_MODEL_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL_NAME: &str = "gemini-pro";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_CURRENCY: &str = "MXN";
pub const DEFAULT_PROVIDERS_FILE: &str = "data/providers.json";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Where the HTTP server listens and what it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind_address: String,
    pub port: u16,
    pub providers_file: String,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Treats empty keys and unsubstituted `${VAR}` placeholders as absent.
pub(crate) fn usable_api_key(key: Option<&str>) -> Option<&str> {
    key.map(str::trim)
        .filter(|k| !k.is_empty() && !(k.starts_with("${") && k.ends_with('}')))
}
