// SPDX-License-Identifier: Apache-2.0

//! Deposit listener for incoming ecash tips.
//!
//! Polls a stream of sealed direct messages, decrypts them with a
//! caller-supplied decryptor, scans the plaintext for ecash tokens, and
//! redeems anything found into the ledger. Resumes from a persisted
//! checkpoint so no deposit is missed across restarts.

pub mod deposit;

pub use deposit::{
    DepositWatcher, DmStream, NoteDecryptor, SealedNote, WatcherPhase, DEFAULT_LOOKBACK_WINDOW_SECS,
    LOOKBACK_BUFFER_SECS,
};
