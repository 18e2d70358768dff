use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::common::{ledger_failure, open_wallet};

#[derive(Clone, Debug, Args)]
pub struct SetMintArgs {
    /// Mint base URL, e.g. https://mint.minibits.cash/Bitcoin
    pub url: String,
}

pub fn run(wallet_path: Option<PathBuf>, args: SetMintArgs) -> Result<()> {
    let parsed = url::Url::parse(&args.url).context("parse mint url")?;
    let ledger = open_wallet(wallet_path)?;
    if !ledger.set_mint_url(parsed.as_str()) {
        return Err(ledger_failure(&ledger, "set mint url"));
    }
    println!("mint set: {parsed}");
    Ok(())
}
