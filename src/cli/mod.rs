//! CLI for the relay.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// GTM assistant model relay
#[derive(Parser, Debug)]
#[command(name = "gtm-relay", version, about = "Model routing and streaming relay")]
pub struct Cli {
    /// TOML config file; environment variables override it
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP relay until ctrl-c
    Serve(ServeArgs),
    /// Show which model a task would route to, and its fallback
    Route(RouteArgs),
    /// Send a routed chat request
    Chat(ChatArgs),
    /// List the provider catalog and credential status
    Providers,
}

/// Arguments for `gtm-relay serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind (defaults to config, then 127.0.0.1:3001)
    #[arg(short, long)]
    pub bind: Option<String>,
}

/// Routing inputs shared by `route` and `chat`.
#[derive(Parser, Debug, Clone)]
pub struct RouteArgs {
    /// Scenario name (chat, document, analysis, long_text, competitor)
    #[arg(short, long)]
    pub scenario: Option<String>,

    /// The request carries an image
    #[arg(long)]
    pub image: bool,

    /// Treat the input as long text
    #[arg(long)]
    pub long_text: bool,
}

/// Arguments for `gtm-relay chat`.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    #[command(flatten)]
    pub route: RouteArgs,

    /// System prompt
    #[arg(short = 'S', long, default_value = "You are a helpful GTM assistant.")]
    pub system: String,

    /// Max tokens for non-streaming calls
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Stream deltas to stdout (no fallback)
    #[arg(long)]
    pub stream: bool,

    /// User prompt
    pub prompt: String,
}
