// SPDX-License-Identifier: Apache-2.0

//! Polling deposit watcher over a sealed-DM stream.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use wallet_core::{find_token, Ledger, Mint, ProofStore};

/// Resume this far before the persisted checkpoint so messages that raced
/// the previous shutdown are not lost. Duplicates are harmless: redemption
/// is idempotent at the mint.
pub const LOOKBACK_BUFFER_SECS: u64 = 300;

/// First-run window when no checkpoint exists yet: one week.
pub const DEFAULT_LOOKBACK_WINDOW_SECS: u64 = 7 * 24 * 3600;

/// An encrypted direct message as fetched from a relay, before decryption.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SealedNote {
    pub id: String,
    pub sender: String,
    pub created_at: u64,
    pub ciphertext: String,
}

/// Source of sealed notes addressed to the wallet's identity. Implemented
/// over relay subscriptions in production and over fixtures in tests.
pub trait DmStream: Send + Sync {
    /// All notes with `created_at >= since_unix`, any order.
    fn fetch_since(&self, since_unix: u64) -> Result<Vec<SealedNote>>;
}

/// Decrypts a sealed note into plaintext. `None` means the note is not for
/// us or is garbled; the watcher skips it silently.
pub type NoteDecryptor = Box<dyn Fn(&SealedNote) -> Option<String> + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatcherPhase {
    Stopped,
    Listening,
}

/// Watches for incoming deposits and feeds them to the ledger.
pub struct DepositWatcher<S: ProofStore, M: Mint, D: DmStream> {
    ledger: Arc<Ledger<S, M>>,
    stream: D,
    decrypt: NoteDecryptor,
    poll_interval: Duration,
    stopping: AtomicBool,
    phase: Mutex<WatcherPhase>,
    /// In-session cursor: newest `created_at` seen so far.
    cursor: AtomicU64,
    /// Note ids already processed this session. The relay may return the
    /// same note in overlapping fetches.
    seen: Mutex<HashSet<String>>,
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl<S: ProofStore, M: Mint, D: DmStream> DepositWatcher<S, M, D> {
    pub fn new(ledger: Arc<Ledger<S, M>>, stream: D, decrypt: NoteDecryptor) -> Self {
        Self {
            ledger,
            stream,
            decrypt,
            poll_interval: Duration::from_secs(10),
            stopping: AtomicBool::new(false),
            phase: Mutex::new(WatcherPhase::Stopped),
            cursor: AtomicU64::new(0),
            seen: Mutex::new(HashSet::new()),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn phase(&self) -> WatcherPhase {
        *self.phase.lock()
    }

    /// Position the cursor from the persisted checkpoint and begin
    /// listening. Without a checkpoint the watcher looks back one week.
    pub fn start(&self) {
        let since = match self.ledger.deposit_checkpoint() {
            Some(checkpoint) => checkpoint.saturating_sub(LOOKBACK_BUFFER_SECS),
            None => now_unix().saturating_sub(DEFAULT_LOOKBACK_WINDOW_SECS),
        };
        self.cursor.store(since, Ordering::SeqCst);
        self.stopping.store(false, Ordering::SeqCst);
        *self.phase.lock() = WatcherPhase::Listening;
        info!("deposit watcher listening from t={since}");
    }

    /// One fetch-decrypt-redeem cycle. Returns the number of deposits
    /// redeemed. Individual bad notes never fail the cycle; only the
    /// stream itself can.
    pub fn poll_once(&self) -> Result<usize> {
        let since = self.cursor.load(Ordering::SeqCst);
        let notes = self
            .stream
            .fetch_since(since)
            .with_context(|| format!("fetch sealed notes since {since}"))?;

        let mut redeemed = 0usize;
        for note in notes {
            self.cursor.fetch_max(note.created_at, Ordering::SeqCst);
            if !self.seen.lock().insert(note.id.clone()) {
                continue;
            }

            let Some(plaintext) = (self.decrypt)(&note) else {
                debug!("note {} not decryptable, skipping", note.id);
                continue;
            };
            let Some(token) = find_token(&plaintext) else {
                continue;
            };

            if self.ledger.redeem_deposit(token) {
                info!("redeemed deposit from {} (note {})", note.sender, note.id);
                redeemed += 1;
            } else {
                warn!(
                    "deposit in note {} not redeemed: {}",
                    note.id,
                    self.ledger
                        .last_error()
                        .unwrap_or_else(|| "unknown".to_string())
                );
            }
        }
        Ok(redeemed)
    }

    /// Blocking poll loop; returns after [`stop`](Self::stop) is called.
    /// Stream errors are logged and retried on the next tick.
    pub fn run(&self) {
        while !self.stopping.load(Ordering::SeqCst) {
            if let Err(err) = self.poll_once() {
                warn!("deposit poll failed, will retry: {err:#}");
            }
            thread::sleep(self.poll_interval);
        }
        *self.phase.lock() = WatcherPhase::Stopped;
    }

    /// Persist the checkpoint and stop listening. The checkpoint is wall
    /// clock now, not the cursor, so a quiet period still advances it.
    pub fn stop(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        let checkpoint = now_unix();
        if self.ledger.save_deposit_checkpoint(checkpoint) {
            info!("deposit watcher stopped, checkpoint {checkpoint}");
        }
        *self.phase.lock() = WatcherPhase::Stopped;
    }
}
