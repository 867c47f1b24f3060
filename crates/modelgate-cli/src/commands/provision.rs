// Provision-key command
//
// The generated key goes to stdout (everything else is on the log), so the
// output can be piped straight into a secret store.

use anyhow::{Context, Result};
use clap::Args;

use modelgate_sync::provision_key;

use crate::Cli;

#[derive(Args)]
pub struct ProvisionKeyArgs {
    /// User email address
    pub email: String,

    /// API key alias (default: the email local part)
    #[arg(long, short)]
    pub alias: Option<String>,
}

pub async fn run(cli: &Cli, args: &ProvisionKeyArgs) -> Result<()> {
    let (client, _) = cli.admin_client()?;

    let key = provision_key(&client, &args.email, args.alias.as_deref())
        .await
        .context("failed to provision api key")?;

    println!("{key}");
    Ok(())
}
