use fest_assistant::utils::{logger, validation::Validate};
use fest_assistant::{
    Assistant, GeminiRequestor, LambdaConfig, RecommendationRequest, Resolver,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use std::sync::Arc;

async fn function_handler(
    assistant: &Assistant<GeminiRequestor<LambdaConfig>>,
    event: LambdaEvent<RecommendationRequest>,
) -> Result<serde_json::Value, Error> {
    tracing::info!("Handling recommendation request {}", event.context.request_id);

    let resolution = assistant
        .recommend(&event.payload)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    tracing::info!(
        "Recommendation resolved via {}",
        resolution.source.as_str()
    );
    Ok(resolution.into_body())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    // One client and assistant per container, reused across invocations
    let resolver = Resolver::new(config.strict_totals);
    let assistant = Arc::new(Assistant::new(GeminiRequestor::new(config), resolver));

    run(service_fn(move |event: LambdaEvent<RecommendationRequest>| {
        let assistant = Arc::clone(&assistant);
        async move { function_handler(&assistant, event).await }
    }))
    .await
}
