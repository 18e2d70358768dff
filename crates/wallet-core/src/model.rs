use serde::{Deserialize, Serialize};

/// A single denomination-bearing ecash proof issued by a mint.
///
/// `secret` is unique within a mint; the cryptographic fields (`id`, `c`)
/// are opaque to the ledger and only round-trip to the mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Denomination in satoshi.
    pub amount: u64,
    /// Keyset id the proof was signed under.
    pub id: String,
    pub secret: String,
    /// Unblinded mint signature, hex-encoded compressed point.
    #[serde(rename = "C")]
    pub c: String,
}

/// A proof annotated with the mint that issued it. This is the unit of
/// persistence; the in-memory ledger holds a cached copy keyed by `secret`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProof {
    pub mint_url: String,
    pub proof: Proof,
}

impl StoredProof {
    pub fn new(proof: Proof, mint_url: &str) -> Self {
        Self {
            mint_url: mint_url.to_string(),
            proof,
        }
    }

    pub fn secret(&self) -> &str {
        &self.proof.secret
    }

    pub fn amount(&self) -> u64 {
        self.proof.amount
    }
}

/// Spend state of a proof as tracked by the issuing mint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProofState {
    Unspent,
    Pending,
    Spent,
}

impl ProofState {
    /// Only `Unspent` proofs may be redeemed or spent.
    pub fn is_spendable(self) -> bool {
        matches!(self, ProofState::Unspent)
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "UNSPENT" => Some(ProofState::Unspent),
            "PENDING" => Some(ProofState::Pending),
            "SPENT" => Some(ProofState::Spent),
            _ => None,
        }
    }
}
