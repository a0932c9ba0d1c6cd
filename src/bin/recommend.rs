use clap::Parser;
use fest_assistant::domain::ports::AssistantSettings;
use fest_assistant::utils::{logger, validation::Validate};
use fest_assistant::{
    Assistant, CliConfig, GeminiRequestor, RecommendationRequest, Resolver, TomlConfig,
};

#[derive(Parser)]
#[command(name = "recommend")]
#[command(about = "Resolve one recommendation request from a JSON file")]
struct Args {
    /// Path to a JSON body: {budget, location, eventType?, providers}
    request: String,

    /// TOML configuration; defaults to the server's command-line defaults
    #[arg(short, long)]
    config: Option<String>,

    /// Pretty-print the result
    #[arg(long)]
    pretty: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let body = std::fs::read_to_string(&args.request)?;
    let request: RecommendationRequest = serde_json::from_str(&body)?;

    let output = match &args.config {
        Some(path) => resolve(TomlConfig::from_file(path)?, &request, args.pretty).await?,
        None => {
            let defaults = CliConfig::parse_from(["recommend"]);
            resolve(defaults, &request, args.pretty).await?
        }
    };

    println!("{}", output);
    Ok(())
}

async fn resolve<C>(
    config: C,
    request: &RecommendationRequest,
    pretty: bool,
) -> anyhow::Result<String>
where
    C: AssistantSettings + Validate,
{
    config.validate()?;
    let resolver = Resolver::new(config.strict_totals());
    let assistant = Assistant::new(GeminiRequestor::new(config), resolver);

    let resolution = assistant.recommend(request).await?;
    tracing::info!("Recommendation source: {}", resolution.source.as_str());

    let body = resolution.into_body();
    let output = if pretty {
        serde_json::to_string_pretty(&body)?
    } else {
        serde_json::to_string(&body)?
    };
    Ok(output)
}
