use clap::Parser;
use fest_assistant::config::ServerSettings;
use fest_assistant::core::catalog::ProviderCatalog;
use fest_assistant::domain::ports::AssistantSettings;
use fest_assistant::server::{self, AppState};
use fest_assistant::utils::{logger, validation::Validate};
use fest_assistant::{Assistant, CliConfig, GeminiRequestor, LocalStorage, Resolver, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting fest-assistant");

    let outcome = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = match TomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            let settings = config.server_settings();
            run(config, settings).await
        }
        None => {
            let settings = cli.server_settings();
            run(cli, settings).await
        }
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Server stopped: {} (Category: {:?})",
            e,
            e.category()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run<C>(config: C, settings: ServerSettings) -> fest_assistant::Result<()>
where
    C: AssistantSettings + Validate + 'static,
{
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        return Err(e);
    }
    tracing::info!(
        "✅ Using model {} (timeout {:?}, strict totals: {})",
        config.model_name(),
        config.request_timeout(),
        config.strict_totals()
    );

    let storage = LocalStorage::new(".".to_string());
    let catalog = ProviderCatalog::load(&storage, &settings.providers_file).await?;

    let resolver = Resolver::new(config.strict_totals());
    let assistant = Assistant::new(GeminiRequestor::new(config), resolver);

    server::serve(&settings, AppState::new(assistant, catalog)).await
}
