// Modelgate CLI
//
// Design Decision: clap derive with env-backed connection flags.
// Design Decision: subcommands own their arguments; this file only wires
// tracing, .env, and dispatch.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use modelgate_admin::HttpAdminClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "modelgate")]
#[command(about = "Reconcile declarative LLM-gateway config against the admin API")]
#[command(version)]
pub struct Cli {
    /// Gateway admin API base URL
    #[arg(long, env = "MODELGATE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Gateway admin bearer token
    #[arg(long, env = "MODELGATE_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sync credentials, models, aliases, and fallbacks to the gateway
    Sync(commands::sync::SyncArgs),

    /// Resolve the config and write the generated artifact
    Generate(commands::generate::GenerateArgs),

    /// Refresh model pricing from the public catalog
    Prices(commands::prices::PricesArgs),

    /// Provision a gateway user and print a fresh API key
    ProvisionKey(commands::provision::ProvisionKeyArgs),
}

impl Cli {
    /// Build the admin client; both connection values are required for any
    /// command that talks to the gateway.
    fn admin_client(&self) -> Result<(HttpAdminClient, String)> {
        let api_url = self
            .api_url
            .clone()
            .context("--api-url or MODELGATE_API_URL is required")?;
        let api_key = self
            .api_key
            .clone()
            .context("--api-key or MODELGATE_API_KEY is required")?;
        Ok((HttpAdminClient::new(&api_url, &api_key), api_key))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match &cli.command {
        Commands::Sync(args) => commands::sync::run(&cli, args).await,
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Prices(args) => commands::prices::run(&cli, args).await,
        Commands::ProvisionKey(args) => commands::provision::run(&cli, args).await,
    }
}
