use crate::core::resolver::Resolver;
use crate::domain::model::{RecommendationRequest, Resolution};
use crate::domain::ports::Requestor;
use crate::utils::error::{AssistantError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_amount, validate_range, Validate,
};

impl Validate for RecommendationRequest {
    fn validate(&self) -> Result<()> {
        validate_positive_amount("budget", self.budget)?;
        if self.providers.is_empty() {
            return Err(AssistantError::ValidationError {
                message: "providers must contain at least one candidate".to_string(),
            });
        }

        for (index, provider) in self.providers.iter().enumerate() {
            validate_non_empty_string(&format!("providers[{}].id", index), &provider.id)?;
            validate_positive_amount(&format!("providers[{}].price", index), provider.price)?;
            validate_range(
                &format!("providers[{}].rating", index),
                provider.rating,
                0.0,
                5.0,
            )?;
            if let Some(distance) = provider.distance {
                validate_range(
                    &format!("providers[{}].distance", index),
                    distance,
                    0.0,
                    f64::MAX,
                )?;
            }
        }

        Ok(())
    }
}

/// Runs one recommendation: validate, ask the model, resolve.
pub struct Assistant<R: Requestor> {
    requestor: R,
    resolver: Resolver,
}

impl<R: Requestor> Assistant<R> {
    pub fn new(requestor: R, resolver: Resolver) -> Self {
        Self {
            requestor,
            resolver,
        }
    }

    pub fn requestor(&self) -> &R {
        &self.requestor
    }

    /// Only request validation can fail; model and transport failures are
    /// absorbed by the resolver's fallback.
    pub async fn recommend(&self, request: &RecommendationRequest) -> Result<Resolution> {
        request
            .validate()
            .map_err(|e| AssistantError::MalformedRequestError {
                message: e.to_string(),
            })?;

        tracing::info!(
            "🎉 Recommending for budget {} at '{}' from {} candidates",
            request.budget,
            request.location,
            request.providers.len()
        );

        let outcome = self.requestor.request(request).await;
        if let Err(e) = &outcome {
            tracing::warn!(
                "❌ Model request failed: {} (💡 {})",
                e,
                e.recovery_suggestion()
            );
        }

        let resolution = self.resolver.resolve(outcome, request);
        tracing::info!(
            "✅ Resolved {} recommendations via {} (total {})",
            resolution.result.recommendations.len(),
            resolution.source.as_str(),
            resolution.result.total_cost
        );

        Ok(resolution)
    }
}
