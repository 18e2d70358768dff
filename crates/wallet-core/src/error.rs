//! Error taxonomy shared across the wallet core.

use thiserror::Error;

/// Persistence engine failure. The store never silently drops data; every
/// backend maps its native error into this and propagates it.
#[derive(Debug, Clone, Error)]
#[error("storage error: {0}")]
pub struct StorageError(pub String);

/// Unified error taxonomy for ledger operations.
///
/// Public ledger entry points do not return this directly; they return a
/// success boolean and record the failure in a `last_error` slot so UI
/// callers can render state without try/catch scaffolding. Internal helpers
/// propagate it with `?`.
#[derive(Debug, Clone, Error)]
pub enum WalletError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Spend precondition failure. No network call was attempted.
    #[error("insufficient funds: need {needed} sat, have {available} sat")]
    InsufficientFunds { needed: u64, available: u64 },
    /// Mint unreachable or rejected the operation. Retryable later; ledger
    /// state is unchanged.
    #[error("mint unavailable: {0}")]
    MintUnavailable(String),
    /// Token already spent or pending. Non-retryable for that token.
    #[error("token unusable: {0}")]
    TokenUnusable(String),
    /// Malformed token or wire payload. Non-retryable.
    #[error("decode error: {0}")]
    Decode(String),
    /// Encrypted-message delivery failed after the token was generated.
    #[error("transport error: {0}")]
    Transport(String),
    /// Ledger not hydrated yet; `load()` must complete first.
    #[error("ledger not ready")]
    NotReady,
}

impl From<mint_rpc::RpcError> for WalletError {
    fn from(err: mint_rpc::RpcError) -> Self {
        match err {
            mint_rpc::RpcError::Decode(msg) => WalletError::Decode(msg),
            other => WalletError::MintUnavailable(other.to_string()),
        }
    }
}
