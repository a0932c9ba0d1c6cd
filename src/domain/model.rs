use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Well-known kinds of event service.
///
/// Providers keep their category label exactly as supplied; this only tells
/// which labels name the same kind, so "Comida" and "Food" filter together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Music,
    Decoration,
    Photography,
    Venue,
}

impl Category {
    /// Recognises English and Spanish labels, ignoring case.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "food" | "comida" | "catering" => Some(Category::Food),
            "music" | "música" | "musica" => Some(Category::Music),
            "decoration" | "decoración" | "decoracion" => Some(Category::Decoration),
            "photography" | "fotografía" | "fotografia" => Some(Category::Photography),
            "venue" | "lugar" | "salón" | "salon" => Some(Category::Venue),
            _ => None,
        }
    }

    /// True when both labels name the same category. Unrecognised labels
    /// only match themselves, case-insensitively.
    pub fn same(a: &str, b: &str) -> bool {
        match (Self::from_label(a), Self::from_label(b)) {
            (Some(x), Some(y)) => x == y,
            (None, None) => a.trim().to_lowercase() == b.trim().to_lowercase(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    pub budget: f64,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    pub providers: Vec<Provider>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub rating: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResult {
    pub recommendations: Vec<RecommendationItem>,
    pub total_cost: f64,
    pub summary: String,
}

impl RecommendationResult {
    pub fn item_total(&self) -> f64 {
        self.recommendations.iter().map(|item| item.price).sum()
    }
}

/// Which path of the resolver produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    Model,
    Fallback,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionSource::Model => "model",
            ResolutionSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub result: RecommendationResult,
    pub source: ResolutionSource,
    /// Model output as parsed, extra fields and number formatting intact.
    pub relayed: Option<serde_json::Value>,
}

impl Resolution {
    /// JSON returned to callers: the model's object when it was accepted,
    /// otherwise the typed result.
    pub fn into_body(self) -> serde_json::Value {
        match self.relayed {
            Some(value) => value,
            None => serde_json::to_value(self.result).unwrap_or_default(),
        }
    }
}

/// Sampling parameters sent with every generation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            top_k: 1,
            top_p: 1.0,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "accepted" => Ok(BookingStatus::Accepted),
            "rejected" => Ok(BookingStatus::Rejected),
            other => Err(format!("unknown booking status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Accept,
    Reject,
}

impl BookingAction {
    pub fn target_status(&self) -> BookingStatus {
        match self {
            BookingAction::Accept => BookingStatus::Accepted,
            BookingAction::Reject => BookingStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub id: String,
    pub client_name: String,
    pub event_date: NaiveDate,
    pub event_type: String,
    pub service: String,
    pub location: String,
    pub guests: u32,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBookingRequest {
    pub client_name: String,
    pub event_date: NaiveDate,
    pub event_type: String,
    pub service: String,
    pub location: String,
    pub guests: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BookingSummary {
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewService {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
}
