mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tipjar", about = "Local ecash tip ledger CLI")]
struct Cli {
    /// Wallet file path (defaults to the platform data dir).
    #[arg(long, global = true)]
    wallet: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show balance and the configured mint.
    Balance,
    /// Settle a tip: swap proofs into a token and print it for delivery.
    SendTip(commands::send::SendTipArgs),
    /// Redeem a received token into the wallet.
    Redeem(commands::redeem::RedeemArgs),
    /// Replay a fixture of sealed notes through the deposit watcher.
    Watch(commands::watch::WatchArgs),
    /// Persist a new active mint URL.
    SetMint(commands::set_mint::SetMintArgs),
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Balance => commands::balance::run(cli.wallet),
        Commands::SendTip(args) => commands::send::run(cli.wallet, args),
        Commands::Redeem(args) => commands::redeem::run(cli.wallet, args),
        Commands::Watch(args) => commands::watch::run(cli.wallet, args),
        Commands::SetMint(args) => commands::set_mint::run(cli.wallet, args),
    };
    if let Err(err) = result {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}
