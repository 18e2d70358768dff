use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use watcher::{DepositWatcher, DmStream, SealedNote};

use super::common::open_wallet;

#[derive(Clone, Debug, Args)]
pub struct WatchArgs {
    /// JSON file with an array of sealed notes to replay.
    #[arg(long)]
    pub fixture: PathBuf,
}

/// Fixture-backed note stream. Notes carry their token in `ciphertext`
/// verbatim; the passthrough decryptor below hands it straight through.
struct FixtureStream {
    notes: Vec<SealedNote>,
}

impl FixtureStream {
    fn load(path: &PathBuf) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("read fixture {}", path.display()))?;
        let notes: Vec<SealedNote> =
            serde_json::from_slice(&bytes).context("parse fixture notes")?;
        Ok(Self { notes })
    }
}

impl DmStream for FixtureStream {
    fn fetch_since(&self, since_unix: u64) -> Result<Vec<SealedNote>> {
        Ok(self
            .notes
            .iter()
            .filter(|note| note.created_at >= since_unix)
            .cloned()
            .collect())
    }
}

pub fn run(wallet_path: Option<PathBuf>, args: WatchArgs) -> Result<()> {
    let ledger = Arc::new(open_wallet(wallet_path)?);
    let stream = FixtureStream::load(&args.fixture)?;
    println!("replaying {} notes", stream.notes.len());

    let watcher = DepositWatcher::new(
        ledger.clone(),
        stream,
        Box::new(|note: &SealedNote| Some(note.ciphertext.clone())),
    );
    // No start(): a replay processes every fixture note regardless of any
    // persisted checkpoint. The cursor begins at zero.
    let redeemed = watcher.poll_once().context("replay fixture notes")?;
    watcher.stop();

    println!("redeemed {redeemed} deposits");
    println!("balance: {} sat", ledger.balance_sats());
    Ok(())
}
