//! Cashu V3 token codec.
//!
//! A token is `"cashuA"` followed by URL-safe base64 of a JSON document
//! grouping proofs by mint. We emit unpadded base64 and accept padded input,
//! matching what wallets in the wild produce.

use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::WalletError;
use crate::model::Proof;

pub const TOKEN_PREFIX: &str = "cashuA";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntry {
    pub mint: String,
    pub proofs: Vec<Proof>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub token: Vec<TokenEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl Token {
    pub fn new(mint_url: &str, proofs: Vec<Proof>, memo: Option<String>) -> Self {
        Self {
            token: vec![TokenEntry {
                mint: mint_url.to_string(),
                proofs,
            }],
            unit: Some("sat".to_string()),
            memo,
        }
    }

    /// Total value encoded across all entries.
    pub fn amount(&self) -> u64 {
        self.token
            .iter()
            .flat_map(|entry| entry.proofs.iter())
            .map(|proof| proof.amount)
            .sum()
    }

    /// Mint of the first entry. Multi-mint tokens are not produced by this
    /// wallet; on receive we only honor the first entry's mint.
    pub fn mint_url(&self) -> Option<&str> {
        self.token.first().map(|entry| entry.mint.as_str())
    }

    pub fn encode(&self) -> String {
        let json = serde_json::to_vec(self).expect("token serialization is infallible");
        format!("{TOKEN_PREFIX}{}", URL_SAFE_NO_PAD.encode(json))
    }

    pub fn decode(raw: &str) -> Result<Self, WalletError> {
        let trimmed = raw.trim();
        let body = trimmed
            .strip_prefix(TOKEN_PREFIX)
            .ok_or_else(|| WalletError::Decode("missing cashuA prefix".into()))?;
        let bytes = URL_SAFE_NO_PAD
            .decode(body)
            .or_else(|_| URL_SAFE.decode(body))
            .map_err(|e| WalletError::Decode(format!("token base64: {e}")))?;
        let token: Token = serde_json::from_slice(&bytes)
            .map_err(|e| WalletError::Decode(format!("token json: {e}")))?;
        if token.token.is_empty() {
            return Err(WalletError::Decode("token has no mint entries".into()));
        }
        Ok(token)
    }
}

/// Extract the first token-shaped substring from free text, e.g. the body of
/// a decrypted direct message. Returns the longest run of base64 characters
/// following the prefix; validity is decided by `Token::decode`.
pub fn find_token(text: &str) -> Option<&str> {
    let start = text.find(TOKEN_PREFIX)?;
    let rest = &text[start + TOKEN_PREFIX.len()..];
    let end = rest
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_alphanumeric() && !matches!(ch, '-' | '_' | '='))
        .map(|(idx, _)| idx)
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    Some(&text[start..start + TOKEN_PREFIX.len() + end])
}
