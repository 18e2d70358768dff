//! cashu-wallet-core — ecash ledger primitives for tip settlement.
//!
//! Pieces:
//! - model: proof and spend-state types shared across the crate
//! - token: cashuA token encoding, decoding, and in-text detection
//! - blind: client-side BDHKE (blind, unblind, hash_to_curve)
//! - mint: the `Mint` trait boundary plus the HTTP implementation
//! - storage: `ProofStore` trait with in-memory and JSON-file backends
//! - funds: balance and token-construction helpers (pure where possible)
//! - ledger: the reconciliation service tying store, mint, and transport
//!
//! This crate purposely avoids any relay or UI concern; delivery of tokens
//! goes through the `TipTransport` seam supplied by the caller.

pub mod blind;
pub mod error;
pub mod funds;
pub mod ledger;
pub mod mint;
pub mod model;
pub mod storage;
pub mod token;

pub use error::{StorageError, WalletError};
pub use funds::{balance, create_token_for_amount, redeem_token, Redeemed, TokenOutcome};
pub use ledger::{Ledger, LedgerPhase, TipTransport, DEFAULT_MINT_URL};
pub use mint::{HttpMint, Mint, SwapSplit};
pub use model::{Proof, ProofState, StoredProof};
pub use storage::{InMemoryStore, JsonFileStore, ProofStore};
pub use token::{find_token, Token, TokenEntry, TOKEN_PREFIX};
