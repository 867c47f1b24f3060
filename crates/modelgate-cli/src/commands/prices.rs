// Prices command

use anyhow::Result;
use clap::Args;

use modelgate_admin::PricingCatalog;
use modelgate_sync::{refresh_prices, resolve_actor};

use crate::Cli;

#[derive(Args)]
pub struct PricesArgs {
    /// Log what would change without patching any model
    #[arg(long)]
    pub dry_run: bool,
}

pub async fn run(cli: &Cli, args: &PricesArgs) -> Result<()> {
    let (client, api_key) = cli.admin_client()?;

    let catalog = PricingCatalog::fetch(&reqwest::Client::new()).await;
    let actor = resolve_actor(&client, &api_key).await;

    refresh_prices(&client, &catalog, &actor, args.dry_run).await;
    Ok(())
}
