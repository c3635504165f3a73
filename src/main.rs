//! gtm-relay binary entry point.

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use gtm_relay::cli::{ChatArgs, Cli, Commands, RouteArgs, ServeArgs};
use gtm_relay::config::RelayConfig;
use gtm_relay::error::Result;
use gtm_relay::generation::{collect_stream_with, Orchestrator, SmartRequest};
use gtm_relay::models::{ModelSelector, ProviderRegistry, RoutingDecision, Scenario};
use gtm_relay::provider::UpstreamGateway;
use gtm_relay::types::ChatMessage;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // RUST_LOG wins; default to info.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match load_config(&cli) {
        Ok(config) => match cli.command {
            Commands::Serve(args) => handle_serve(config, args).await,
            Commands::Route(args) => {
                handle_route(&args);
                Ok(())
            }
            Commands::Chat(args) => handle_chat(config, args).await,
            Commands::Providers => {
                handle_providers(&config);
                Ok(())
            }
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        eprintln!("Hint: {}", e.recovery_suggestion().hint());
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> Result<Arc<RelayConfig>> {
    let base = match &cli.config {
        Some(path) => {
            let config = RelayConfig::load(path)?;
            tracing::info!("loaded configuration from {}", path.display());
            config
        }
        None => RelayConfig::new(),
    };
    let _ = dotenvy::dotenv(); // .env is optional
    Ok(Arc::new(base.with_env()))
}

async fn handle_serve(config: Arc<RelayConfig>, args: ServeArgs) -> Result<()> {
    let bind = args
        .bind
        .unwrap_or_else(|| config.bind_address().to_string());

    let handle = gtm_relay::server::serve(config, &bind).await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("received ctrl-c, shutting down");
    handle.shutdown().await?;
    tracing::info!("relay shut down");
    Ok(())
}

fn decide(args: &RouteArgs) -> RoutingDecision {
    match &args.scenario {
        Some(name) => ModelSelector::select_named(name, args.image, args.long_text),
        None => ModelSelector::select(None, args.image, args.long_text),
    }
}

fn handle_route(args: &RouteArgs) {
    let primary = decide(args);
    let fallback = ModelSelector::fallback(primary.provider, primary.model);
    println!("primary:  {primary}");
    println!("fallback: {fallback}");
}

async fn handle_chat(config: Arc<RelayConfig>, args: ChatArgs) -> Result<()> {
    let orchestrator = Orchestrator::new(Arc::new(UpstreamGateway::new(config)));

    let mut request = SmartRequest::builder()
        .maybe_scenario(args.route.scenario.as_deref().and_then(Scenario::parse))
        .system_prompt(args.system)
        .messages(vec![ChatMessage::user(args.prompt)])
        .has_image(args.route.image)
        .is_long_text(args.route.long_text)
        .build();
    if let Some(max) = args.max_tokens {
        request.max_tokens = max;
    }

    if args.stream {
        let stream = orchestrator.smart_stream_chat(&request).await?;
        let mut stdout = std::io::stdout();
        collect_stream_with(stream, |delta| {
            let _ = write!(stdout, "{}", delta.text);
            let _ = stdout.flush();
        })
        .await?;
        println!(); // newline after streaming
        return Ok(());
    }

    let result = orchestrator.smart_chat(&request).await;
    match (result.content, result.error) {
        (Some(content), _) => {
            println!("{content}");
            if let Some(model) = result.model {
                eprintln!("[{model}]");
            }
            Ok(())
        }
        (None, error) => Err(gtm_relay::error::RelayError::InternalFault(
            error.unwrap_or_else(|| "no content returned".to_string()),
        )),
    }
}

fn handle_providers(config: &RelayConfig) {
    for provider in ProviderRegistry::builtin().providers() {
        let status = if config.has_credentials(provider.key) {
            "configured"
        } else {
            "missing key"
        };
        println!(
            "{} ({}) [{status}] {}",
            provider.key,
            provider.display_name,
            config.endpoint(provider.key)
        );
        for model in provider.models {
            let vision = if model.supports_vision { " vision" } else { "" };
            println!(
                "  {:<18} {:<22} max_tokens={}{vision}",
                model.id, model.display_name, model.max_tokens
            );
        }
    }
}
