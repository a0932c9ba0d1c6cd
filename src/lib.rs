pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "lambda")]
pub use config::lambda::LambdaConfig;

pub use adapters::LocalStorage;
pub use config::TomlConfig;
pub use core::{assistant::Assistant, requestor::GeminiRequestor, resolver::Resolver};
pub use domain::model::{
    Provider, RecommendationItem, RecommendationRequest, RecommendationResult, Resolution,
    ResolutionSource,
};
pub use utils::error::{AssistantError, Result};
