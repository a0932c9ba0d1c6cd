use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Malformed request: {message}")]
    MalformedRequestError { message: String },

    #[error("External service request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("External service returned status {status}")]
    ExternalServiceError { status: u16 },

    #[error("Model output does not match the recommendation schema: {message}")]
    MalformedModelOutputError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{entity} '{id}' not found")]
    NotFoundError { entity: String, id: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Client,
    ExternalService,
    ModelOutput,
    Configuration,
    System,
}

impl AssistantError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AssistantError::MalformedRequestError { .. }
            | AssistantError::NotFoundError { .. }
            | AssistantError::ValidationError { .. } => ErrorCategory::Client,
            AssistantError::ApiError(_) | AssistantError::ExternalServiceError { .. } => {
                ErrorCategory::ExternalService
            }
            AssistantError::MalformedModelOutputError { .. } => ErrorCategory::ModelOutput,
            AssistantError::ConfigError { .. }
            | AssistantError::MissingConfigError { .. }
            | AssistantError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AssistantError::IoError(_) | AssistantError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    /// HTTP status used when the error reaches a caller of the server.
    pub fn status_code(&self) -> u16 {
        match self {
            AssistantError::MalformedRequestError { .. }
            | AssistantError::ValidationError { .. } => 400,
            AssistantError::NotFoundError { .. } => 404,
            AssistantError::ApiError(e) if e.is_timeout() => 504,
            AssistantError::ApiError(_)
            | AssistantError::ExternalServiceError { .. }
            | AssistantError::MalformedModelOutputError { .. } => 502,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Client => format!("The request could not be processed: {}", self),
            ErrorCategory::ExternalService => {
                "The recommendation service is currently unavailable".to_string()
            }
            ErrorCategory::ModelOutput => {
                "The recommendation service returned an unexpected answer".to_string()
            }
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => "An internal error occurred".to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AssistantError::MalformedRequestError { .. } => {
                "Send budget, location and a non-empty providers list"
            }
            AssistantError::ApiError(e) if e.is_timeout() => {
                "Increase model.timeout_seconds or check network latency to the model endpoint"
            }
            AssistantError::ApiError(_) | AssistantError::ExternalServiceError { .. } => {
                "Check the model endpoint and that GEMINI_API_KEY is valid"
            }
            AssistantError::MalformedModelOutputError { .. } => {
                "Lower generation.temperature so the model keeps to the JSON format"
            }
            AssistantError::MissingConfigError { .. } => {
                "Set the missing value in the config file or environment"
            }
            AssistantError::ConfigError { .. } | AssistantError::InvalidConfigValueError { .. } => {
                "Review the configuration file against the documented sections"
            }
            AssistantError::NotFoundError { .. } => "Refresh the list and retry with a current id",
            AssistantError::ValidationError { .. } => "Correct the submitted fields and retry",
            AssistantError::IoError(_) => "Check file paths and permissions",
            AssistantError::SerializationError(_) => "Check that the JSON input is well formed",
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;
