// Sync command

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use modelgate_sync::{run_sync, Component, SyncOptions, SyncRequest};

use crate::Cli;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComponentArg {
    Credentials,
    Models,
    Aliases,
    Fallbacks,
}

impl From<ComponentArg> for Component {
    fn from(component: ComponentArg) -> Self {
        match component {
            ComponentArg::Credentials => Component::Credentials,
            ComponentArg::Models => Component::Models,
            ComponentArg::Aliases => Component::Aliases,
            ComponentArg::Fallbacks => Component::Fallbacks,
        }
    }
}

#[derive(Args)]
pub struct SyncArgs {
    /// Components to sync (comma-separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "credentials,models,aliases,fallbacks"
    )]
    pub only: Vec<ComponentArg>,

    /// Replace existing resources instead of skipping them
    #[arg(long)]
    pub force: bool,

    /// Delete remote credentials and models absent from the config
    #[arg(long)]
    pub prune: bool,

    /// Resolve the config and report the plan without any network call
    #[arg(long)]
    pub dry_run: bool,

    /// Path to the base config file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,
}

pub async fn run(cli: &Cli, args: &SyncArgs) -> Result<()> {
    let resolved = modelgate_core::generate(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;

    tracing::info!(
        credentials = resolved.credentials.len(),
        models = resolved.models.len(),
        aliases = resolved.aliases.len(),
        fallbacks = resolved.fallbacks.len(),
        force = args.force,
        prune = args.prune,
        "resolved config"
    );

    if args.dry_run {
        tracing::info!("dry run: no changes will be made");
        return Ok(());
    }

    let (client, api_key) = cli.admin_client()?;
    let components: Vec<Component> = args.only.iter().copied().map(Into::into).collect();

    let report = run_sync(
        Arc::new(client),
        SyncRequest {
            resolved: &resolved,
            components: &components,
            options: SyncOptions {
                force: args.force,
                prune: args.prune,
            },
            api_key: &api_key,
        },
    )
    .await;

    for (resource, phase) in report.phases() {
        tracing::info!(
            resource,
            created = phase.created,
            replaced = phase.replaced,
            skipped = phase.skipped,
            deleted = phase.deleted,
            failed = phase.failed,
            status = %phase.status(),
            "phase summary"
        );
    }
    tracing::info!(status = %report.status(), "sync complete");
    Ok(())
}
