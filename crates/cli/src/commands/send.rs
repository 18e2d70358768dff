use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::common::{ledger_failure, open_wallet, PrintTransport};

#[derive(Clone, Debug, Args)]
pub struct SendTipArgs {
    /// Tip amount in satoshi.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub amount: u64,

    /// Recipient identity the token is destined for.
    #[arg(long)]
    pub to: String,

    /// Spend from this mint instead of the configured one.
    #[arg(long)]
    pub mint: Option<String>,
}

pub fn run(wallet_path: Option<PathBuf>, args: SendTipArgs) -> Result<()> {
    let ledger = open_wallet(wallet_path)?;
    let mint_url = args
        .mint
        .unwrap_or_else(|| ledger.configured_mint_url());

    // There is no relay leg in the CLI; the transport captures the token
    // and we print it for out-of-band delivery.
    let transport = PrintTransport::default();
    if !ledger.settle_tip(args.amount, &mint_url, &args.to, &transport) {
        return Err(ledger_failure(&ledger, "settle tip"));
    }

    if let Some((token, recipient)) = transport.last_delivery() {
        println!("tip settled: {} sat at {mint_url}", args.amount);
        println!("deliver to {recipient}:");
        println!("{token}");
    }
    println!("balance: {} sat", ledger.balance_sats());
    Ok(())
}
