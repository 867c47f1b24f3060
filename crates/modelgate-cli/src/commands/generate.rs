// Generate command: resolve and write the artifact without touching the
// gateway

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

#[derive(Args)]
pub struct GenerateArgs {
    /// Path to the base config file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Output path for the resolved artifact
    #[arg(long, default_value = "config.gen.json")]
    pub output: PathBuf,
}

pub fn run(args: &GenerateArgs) -> Result<()> {
    let resolved = modelgate_core::generate(&args.config)
        .with_context(|| format!("failed to load config {}", args.config.display()))?;

    let mut rendered = serde_json::to_string_pretty(&resolved)?;
    rendered.push('\n');
    fs::write(&args.output, rendered)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    tracing::info!(path = %args.output.display(), "resolved config written");
    Ok(())
}
