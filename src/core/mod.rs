pub mod assistant;
pub mod bookings;
pub mod catalog;
pub mod prompt;
pub mod requestor;
pub mod resolver;
pub mod services;

pub use crate::domain::model::{RecommendationRequest, RecommendationResult, Resolution};
pub use crate::domain::ports::{AssistantSettings, Requestor, Storage};
pub use crate::utils::error::Result;
