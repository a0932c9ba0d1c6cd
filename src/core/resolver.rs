use crate::domain::model::{
    RecommendationItem, RecommendationRequest, RecommendationResult, Resolution, ResolutionSource,
};
use crate::utils::error::{AssistantError, Result};
use serde::Deserialize;

pub const FALLBACK_PICK_COUNT: usize = 3;
pub const FALLBACK_REASON: &str = "automatic selection based on availability";
pub const FALLBACK_SUMMARY: &str = "basic package selected automatically";

/// Allowed drift between `totalCost` and the summed item prices.
const TOTAL_TOLERANCE: f64 = 0.01;

/// Turns the requestor's outcome into a recommendation. Never fails.
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    strict_totals: bool,
}

impl Resolver {
    pub fn new(strict_totals: bool) -> Self {
        Self { strict_totals }
    }

    pub fn resolve(
        &self,
        outcome: Result<String>,
        request: &RecommendationRequest,
    ) -> Resolution {
        let parsed = outcome.and_then(|raw| {
            self.parse(&raw, request).inspect_err(|e| {
                tracing::warn!("Failed to parse model output ({}): {}", e, raw);
            })
        });

        match parsed {
            Ok(resolution) => resolution,
            Err(e) => {
                tracing::warn!(
                    "⚠️ Falling back to automatic selection (category: {:?}): {}",
                    e.category(),
                    e
                );
                Resolution {
                    result: fallback(request),
                    source: ResolutionSource::Fallback,
                    relayed: None,
                }
            }
        }
    }

    /// Parses raw model text against the recommendation schema. The parsed
    /// object is kept alongside the typed result so it can be relayed as is.
    pub fn parse(&self, raw: &str, request: &RecommendationRequest) -> Result<Resolution> {
        let malformed = |e: serde_json::Error| AssistantError::MalformedModelOutputError {
            message: e.to_string(),
        };
        let value: serde_json::Value = serde_json::from_str(raw.trim()).map_err(malformed)?;
        let result = RecommendationResult::deserialize(&value).map_err(malformed)?;

        if self.strict_totals {
            check_consistency(&result, request.providers.len())?;
        }

        Ok(Resolution {
            result,
            source: ResolutionSource::Model,
            relayed: Some(value),
        })
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(true)
    }
}

fn check_consistency(result: &RecommendationResult, candidate_count: usize) -> Result<()> {
    let count = result.recommendations.len();
    if count == 0 {
        return Err(AssistantError::MalformedModelOutputError {
            message: "recommendations list is empty".to_string(),
        });
    }
    if count > candidate_count {
        return Err(AssistantError::MalformedModelOutputError {
            message: format!(
                "{} recommendations for only {} candidates",
                count, candidate_count
            ),
        });
    }

    let item_total = result.item_total();
    if (item_total - result.total_cost).abs() > TOTAL_TOLERANCE {
        return Err(AssistantError::MalformedModelOutputError {
            message: format!(
                "totalCost {} does not match item prices summing to {}",
                result.total_cost, item_total
            ),
        });
    }

    Ok(())
}

/// First candidates in input order, no sorting or category deduplication.
pub fn fallback(request: &RecommendationRequest) -> RecommendationResult {
    let recommendations: Vec<RecommendationItem> = request
        .providers
        .iter()
        .take(FALLBACK_PICK_COUNT)
        .map(|provider| RecommendationItem {
            id: provider.id.clone(),
            name: provider.name.clone(),
            category: provider.category.clone(),
            price: provider.price,
            rating: provider.rating,
            reason: FALLBACK_REASON.to_string(),
        })
        .collect();
    let total_cost = recommendations.iter().map(|item| item.price).sum();

    RecommendationResult {
        recommendations,
        total_cost,
        summary: FALLBACK_SUMMARY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Provider;

    fn provider(id: &str, category: &str, price: f64) -> Provider {
        Provider {
            id: id.to_string(),
            name: format!("Provider {}", id),
            category: category.to_string(),
            price,
            rating: 4.5,
            distance: None,
            description: None,
            location: None,
            reviews: None,
            services: vec![],
        }
    }

    fn request_with(providers: Vec<Provider>) -> RecommendationRequest {
        RecommendationRequest {
            budget: 5000.0,
            location: "Polanco".to_string(),
            event_type: Some("cumpleanos".to_string()),
            providers,
        }
    }

    fn four_candidates() -> RecommendationRequest {
        request_with(vec![
            provider("a", "Food", 25.0),
            provider("b", "Music", 150.0),
            provider("c", "Decoration", 200.0),
            provider("d", "Food", 10.0),
        ])
    }

    const MODEL_REPLY: &str = r#"{
        "recommendations": [
            {"id": "d", "name": "Provider d", "category": "Food", "price": 10, "rating": 4.9, "reason": "cheapest, best rated"},
            {"id": "b", "name": "Provider b", "category": "Music", "price": 150.5, "rating": 4.5, "reason": "close by"}
        ],
        "totalCost": 160.5,
        "summary": "Two great picks"
    }"#;

    #[test]
    fn test_well_formed_output_is_returned_unchanged() {
        let request = four_candidates();
        let resolution = Resolver::default().resolve(Ok(MODEL_REPLY.to_string()), &request);

        assert_eq!(resolution.source, ResolutionSource::Model);
        let result = resolution.result;
        assert_eq!(result.recommendations.len(), 2);
        assert_eq!(result.recommendations[0].id, "d");
        assert_eq!(result.recommendations[0].reason, "cheapest, best rated");
        assert_eq!(result.recommendations[1].price, 150.5);
        assert_eq!(result.total_cost, 160.5);
        assert_eq!(result.summary, "Two great picks");
    }

    #[test]
    fn test_accepted_output_is_relayed_with_extra_fields() {
        let request = four_candidates();
        let raw = r#"{"recommendations":[{"id":"a","name":"Provider a","category":"Comida","price":25,"rating":4.5,"reason":"cheap","distance":2.5}],"totalCost":25,"summary":"one pick","currency":"MXN"}"#;
        let resolution = Resolver::default().resolve(Ok(raw.to_string()), &request);

        assert_eq!(resolution.source, ResolutionSource::Model);
        let body = resolution.into_body();
        assert_eq!(body, serde_json::from_str::<serde_json::Value>(raw).unwrap());
        assert_eq!(body["totalCost"].to_string(), "25");
        assert_eq!(body["currency"], "MXN");
    }

    #[test]
    fn test_fallback_body_is_typed_result() {
        let request = four_candidates();
        let resolution = Resolver::default().resolve(Ok("nope".to_string()), &request);

        assert!(resolution.relayed.is_none());
        let body = resolution.into_body();
        assert_eq!(body["summary"], FALLBACK_SUMMARY);
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_json_falls_back_to_first_three_in_order() {
        let request = four_candidates();
        let resolution =
            Resolver::default().resolve(Ok("not valid json at all".to_string()), &request);

        assert_eq!(resolution.source, ResolutionSource::Fallback);
        let ids: Vec<&str> = resolution
            .result
            .recommendations
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(resolution
            .result
            .recommendations
            .iter()
            .all(|item| item.reason == FALLBACK_REASON));
        assert_eq!(resolution.result.total_cost, 375.0);
        assert_eq!(resolution.result.summary, FALLBACK_SUMMARY);
    }

    #[test]
    fn test_missing_top_level_field_falls_back() {
        let request = four_candidates();
        let raw = r#"{"recommendations": [], "summary": "no total"}"#;
        let resolution = Resolver::new(false).resolve(Ok(raw.to_string()), &request);

        assert_eq!(resolution.source, ResolutionSource::Fallback);
        assert_eq!(resolution.result.recommendations.len(), 3);
    }

    #[test]
    fn test_requestor_error_falls_back() {
        let request = four_candidates();
        let outcome = Err(AssistantError::ExternalServiceError { status: 500 });
        let resolution = Resolver::default().resolve(outcome, &request);

        assert_eq!(resolution.source, ResolutionSource::Fallback);
        assert_eq!(resolution.result.recommendations.len(), 3);
    }

    #[test]
    fn test_fallback_with_fewer_than_three_candidates() {
        let request = request_with(vec![
            provider("a", "Food", 25.0),
            provider("b", "Music", 150.0),
        ]);
        let result = fallback(&request);

        assert_eq!(result.recommendations.len(), 2);
        assert_eq!(result.total_cost, 175.0);
        assert_eq!(result.recommendations[1].category, "Music");
    }

    #[test]
    fn test_fallback_echoes_provider_category_labels() {
        let request = request_with(vec![
            provider("a", "Comida", 25.0),
            provider("b", "Pasteleria", 80.0),
            provider("c", "Flores", 60.0),
        ]);
        let categories: Vec<String> = fallback(&request)
            .recommendations
            .into_iter()
            .map(|item| item.category)
            .collect();

        assert_eq!(categories, vec!["Comida", "Pasteleria", "Flores"]);
    }

    #[test]
    fn test_fallback_total_equals_sum_of_selected_prices() {
        let price_sets: [&[f64]; 4] = [
            &[0.1, 0.2, 0.3, 99.0],
            &[1999.99],
            &[12.5, 7.25, 3.125],
            &[1e6, 2e6, 3e6, 4e6, 5e6],
        ];

        for prices in price_sets {
            let providers = prices
                .iter()
                .enumerate()
                .map(|(i, price)| provider(&i.to_string(), "Other", *price))
                .collect();
            let request = request_with(providers);
            let result = fallback(&request);

            let expected: f64 = prices.iter().take(FALLBACK_PICK_COUNT).sum();
            assert_eq!(result.total_cost, expected);
            assert_eq!(result.total_cost, result.item_total());
            assert!(!result.recommendations.is_empty());
            assert!(result.recommendations.len() <= prices.len());
        }
    }

    #[test]
    fn test_strict_mode_rejects_inconsistent_total() {
        let request = four_candidates();
        let raw = MODEL_REPLY.replace("160.5", "999");

        let strict = Resolver::new(true).resolve(Ok(raw.clone()), &request);
        assert_eq!(strict.source, ResolutionSource::Fallback);

        let trusting = Resolver::new(false).resolve(Ok(raw), &request);
        assert_eq!(trusting.source, ResolutionSource::Model);
        assert_eq!(trusting.result.total_cost, 999.0);
    }

    #[test]
    fn test_strict_mode_rejects_empty_and_oversized_lists() {
        let request = request_with(vec![provider("a", "Food", 25.0)]);

        let empty = r#"{"recommendations": [], "totalCost": 0, "summary": "none"}"#;
        let err = Resolver::new(true).parse(empty, &request).unwrap_err();
        assert!(err.to_string().contains("empty"));

        let err = Resolver::new(true).parse(MODEL_REPLY, &request).unwrap_err();
        assert!(err.to_string().contains("2 recommendations for only 1 candidates"));
    }
}
