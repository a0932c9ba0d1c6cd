use crate::domain::model::RecommendationRequest;
use crate::utils::error::Result;

const DEFAULT_EVENT_TYPE: &str = "General party";

/// Builds the planning instruction sent to the model for one request.
///
/// The output contract in the instruction must stay in step with
/// `RecommendationResult`/`RecommendationItem`, since the resolver parses the
/// reply against those types.
pub fn build_prompt(request: &RecommendationRequest, currency: &str) -> Result<String> {
    let providers_json = serde_json::to_string_pretty(&request.providers)?;
    let event_type = request
        .event_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_EVENT_TYPE);
    let budget = format_amount(request.budget);

    Ok(format!(
        r#"You are an expert event-planning assistant. Recommend a package of providers for an event based on the following parameters:

Budget: ${budget} {currency}
Event location: {location}
Event type: {event_type}

Available providers:
{providers_json}

INSTRUCTIONS:
1. Select EXACTLY one provider from each category present among the available providers (for example Food, Music, Decoration).
2. The total cost MUST NOT exceed the budget of ${budget} {currency}.
3. Among providers of the same category, prefer higher rating and shorter distance.
4. Reply ONLY with a JSON object with exactly this structure:

{{
  "recommendations": [
    {{
      "id": "provider_id",
      "name": "provider_name",
      "category": "category",
      "price": numeric_price,
      "rating": numeric_rating,
      "reason": "short_reason_for_selection"
    }}
  ],
  "totalCost": numeric_total_cost,
  "summary": "short_summary_of_the_recommended_package"
}}

Do NOT include any additional text, only the JSON."#,
        location = request.location,
    ))
}

/// Whole amounts print without a fractional part.
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
