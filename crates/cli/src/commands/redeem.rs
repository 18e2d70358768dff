use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::common::{ledger_failure, open_wallet, require_token_prefix};

#[derive(Clone, Debug, Args)]
pub struct RedeemArgs {
    /// The cashuA token to redeem.
    #[arg(long)]
    pub token: String,
}

pub fn run(wallet_path: Option<PathBuf>, args: RedeemArgs) -> Result<()> {
    let token = require_token_prefix(&args.token)?;
    let ledger = open_wallet(wallet_path)?;
    let before = ledger.balance_sats();
    if !ledger.redeem_deposit(token) {
        return Err(ledger_failure(&ledger, "redeem token"));
    }
    let after = ledger.balance_sats();
    println!("redeemed {} sat", after - before);
    println!("balance: {after} sat");
    Ok(())
}
