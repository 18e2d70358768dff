//! The mint collaborator.
//!
//! `Mint` is the seam the ledger and funds helpers talk through; tests
//! substitute mocks, production uses [`HttpMint`] over `cashu-mint-rpc`.

use mint_rpc::{BlindedMessageWire, KeysetWire, MintRpc, ProofWire, SwapRequest};
use rand::rngs::OsRng;

use crate::blind;
use crate::error::WalletError;
use crate::model::{Proof, ProofState};

/// Result of splitting proofs for a spend: `send` sums to exactly the
/// requested amount, `keep` is the caller's change.
#[derive(Clone, Debug)]
pub struct SwapSplit {
    pub send: Vec<Proof>,
    pub keep: Vec<Proof>,
}

/// Operations this wallet needs from a Cashu mint. All cryptographic
/// verification of proofs is the mint's concern; callers only see value
/// conservation and spend-state answers.
pub trait Mint: Send + Sync {
    /// Spend state for each proof, in input order.
    fn check_states(
        &self,
        mint_url: &str,
        proofs: &[Proof],
    ) -> Result<Vec<ProofState>, WalletError>;

    /// Swap `inputs` into a `send` set worth exactly `amount_sats` plus
    /// change. Consumes the inputs at the mint.
    fn split_for_send(
        &self,
        mint_url: &str,
        amount_sats: u64,
        inputs: Vec<Proof>,
    ) -> Result<SwapSplit, WalletError>;

    /// Exchange received proofs for fresh ones so no prior holder can race
    /// us to spend them. Consumes the inputs at the mint.
    fn claim(&self, mint_url: &str, inputs: Vec<Proof>) -> Result<Vec<Proof>, WalletError>;
}

/// Production mint client: blinds outputs locally, swaps over HTTP, unblinds
/// the returned signatures against the mint's active keyset.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpMint;

impl HttpMint {
    pub fn new() -> Self {
        Self
    }

    fn rpc(&self, mint_url: &str) -> Result<MintRpc, WalletError> {
        Ok(MintRpc::new(mint_url)?)
    }

    fn active_keyset(&self, rpc: &MintRpc) -> Result<KeysetWire, WalletError> {
        let keys = rpc.get_keys()?;
        keys.keysets
            .into_iter()
            .find(|keyset| keyset.unit == "sat")
            .ok_or_else(|| WalletError::MintUnavailable("mint has no sat keyset".into()))
    }

    /// Swap `inputs` for fresh proofs where the first outputs cover
    /// `send_amount` and the rest cover the remainder.
    fn swap(
        &self,
        rpc: &MintRpc,
        keyset: &KeysetWire,
        inputs: Vec<Proof>,
        send_amount: u64,
    ) -> Result<SwapSplit, WalletError> {
        let total: u64 = inputs.iter().map(|p| p.amount).sum();
        if total < send_amount {
            return Err(WalletError::InsufficientFunds {
                needed: send_amount,
                available: total,
            });
        }

        let mut rng = OsRng;
        let send_outputs = blind::premint_secrets(send_amount, &mut rng)?;
        let keep_outputs = blind::premint_secrets(total - send_amount, &mut rng)?;
        let send_count = send_outputs.len();

        let mut outputs = send_outputs;
        outputs.extend(keep_outputs);

        let request = SwapRequest {
            inputs: inputs
                .into_iter()
                .map(|p| ProofWire {
                    amount: p.amount,
                    id: p.id,
                    secret: p.secret,
                    c: p.c,
                })
                .collect(),
            outputs: outputs
                .iter()
                .map(|o| BlindedMessageWire {
                    amount: o.amount,
                    id: keyset.id.clone(),
                    b: o.b_hex.clone(),
                })
                .collect(),
        };
        let response = rpc.swap(&request)?;
        if response.signatures.len() != outputs.len() {
            return Err(WalletError::MintUnavailable(format!(
                "mint returned {} signatures for {} outputs",
                response.signatures.len(),
                outputs.len()
            )));
        }

        let mut proofs = Vec::with_capacity(outputs.len());
        for (output, signature) in outputs.iter().zip(response.signatures.iter()) {
            if signature.amount != output.amount {
                return Err(WalletError::MintUnavailable(format!(
                    "signature amount {} does not match output {}",
                    signature.amount, output.amount
                )));
            }
            let mint_key = keyset.keys.get(&output.amount).ok_or_else(|| {
                WalletError::Decode(format!("keyset missing key for amount {}", output.amount))
            })?;
            let c = blind::unblind_signature(&signature.c, output.blinding_factor(), mint_key)?;
            proofs.push(Proof {
                amount: output.amount,
                id: keyset.id.clone(),
                secret: output.secret.clone(),
                c,
            });
        }

        let keep = proofs.split_off(send_count);
        Ok(SwapSplit { send: proofs, keep })
    }
}

impl Mint for HttpMint {
    fn check_states(
        &self,
        mint_url: &str,
        proofs: &[Proof],
    ) -> Result<Vec<ProofState>, WalletError> {
        let rpc = self.rpc(mint_url)?;
        let ys = proofs
            .iter()
            .map(|p| blind::proof_y_hex(&p.secret))
            .collect::<Result<Vec<_>, _>>()?;
        let response = rpc.check_state(ys)?;
        if response.states.len() != proofs.len() {
            return Err(WalletError::MintUnavailable(format!(
                "mint returned {} states for {} proofs",
                response.states.len(),
                proofs.len()
            )));
        }
        response
            .states
            .iter()
            .map(|entry| {
                ProofState::from_wire(&entry.state).ok_or_else(|| {
                    WalletError::Decode(format!("unknown proof state {:?}", entry.state))
                })
            })
            .collect()
    }

    fn split_for_send(
        &self,
        mint_url: &str,
        amount_sats: u64,
        inputs: Vec<Proof>,
    ) -> Result<SwapSplit, WalletError> {
        let rpc = self.rpc(mint_url)?;
        let keyset = self.active_keyset(&rpc)?;
        self.swap(&rpc, &keyset, inputs, amount_sats)
    }

    fn claim(&self, mint_url: &str, inputs: Vec<Proof>) -> Result<Vec<Proof>, WalletError> {
        let rpc = self.rpc(mint_url)?;
        let keyset = self.active_keyset(&rpc)?;
        let split = self.swap(&rpc, &keyset, inputs, 0)?;
        Ok(split.keep)
    }
}
