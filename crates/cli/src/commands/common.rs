use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Context, Result};
use wallet_core::{HttpMint, JsonFileStore, Ledger, TipTransport, WalletError};

/// Wallet handle every subcommand works through.
pub type Wallet = Ledger<JsonFileStore, HttpMint>;

pub fn default_wallet_path() -> Result<PathBuf> {
    let base = dirs::data_dir().context("no platform data directory available")?;
    Ok(base.join("tipjar").join("wallet.json"))
}

/// Open the wallet file and hydrate the ledger. Load is fail-open; surface
/// whatever it recorded so the operator sees degraded starts.
pub fn open_wallet(path: Option<PathBuf>) -> Result<Wallet> {
    let path = match path {
        Some(path) => path,
        None => default_wallet_path()?,
    };
    let store = JsonFileStore::open(&path)
        .map_err(|err| anyhow!("open wallet {}: {err}", path.display()))?;
    let ledger = Ledger::new(store, HttpMint::new());
    if !ledger.load() {
        if let Some(err) = ledger.last_error() {
            eprintln!("warning: wallet loaded degraded: {err}");
        }
    }
    Ok(ledger)
}

/// Turn a `false` from a ledger operation into an error with the recorded
/// cause attached.
pub fn ledger_failure(ledger: &Wallet, what: &str) -> anyhow::Error {
    match ledger.last_error() {
        Some(err) => anyhow!("{what}: {err}"),
        None => anyhow!("{what}: unknown failure"),
    }
}

/// Transport that never publishes: it captures the token so the command can
/// print it for out-of-band delivery.
#[derive(Clone, Default)]
pub struct PrintTransport {
    last: Arc<Mutex<Option<(String, String)>>>,
}

impl PrintTransport {
    /// `(token, recipient)` of the last delivery, if any.
    pub fn last_delivery(&self) -> Option<(String, String)> {
        match self.last.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => None,
        }
    }
}

impl TipTransport for PrintTransport {
    fn encrypt(&self, plaintext: &str, _recipient: &str) -> Result<String, WalletError> {
        // No relay leg here, so no sealing either.
        Ok(plaintext.to_string())
    }

    fn publish(&self, ciphertext: &str, recipient: &str) -> Result<(), WalletError> {
        match self.last.lock() {
            Ok(mut guard) => {
                *guard = Some((ciphertext.to_string(), recipient.to_string()));
                Ok(())
            }
            Err(_) => Err(WalletError::Transport("capture slot poisoned".into())),
        }
    }
}

pub fn require_token_prefix(value: &str) -> Result<&str> {
    let trimmed = value.trim();
    if !trimmed.starts_with(wallet_core::TOKEN_PREFIX) {
        bail!("not an ecash token (expected {} prefix)", wallet_core::TOKEN_PREFIX);
    }
    Ok(trimmed)
}
