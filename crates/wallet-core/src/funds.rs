//! Balance and proof-selection helpers (pure, except for the mint call
//! needed to produce a valid split).

use crate::error::WalletError;
use crate::mint::Mint;
use crate::model::Proof;
use crate::token::Token;

/// Sum of proof values. Empty input is a zero balance, not an error.
pub fn balance(proofs: &[Proof]) -> u64 {
    proofs.iter().map(|proof| proof.amount).sum()
}

/// Token for a spend plus the change that stays with the caller.
#[derive(Clone, Debug)]
pub struct TokenOutcome {
    pub token: Token,
    pub remaining: Vec<Proof>,
}

/// Ask the mint to split `available` into a token worth exactly
/// `amount_sats` and change.
///
/// Fails with `InsufficientFunds` before any network call when the inputs
/// cannot cover the amount. On mint failure the inputs are untouched and the
/// caller must not persist anything.
pub fn create_token_for_amount<M: Mint + ?Sized>(
    mint: &M,
    amount_sats: u64,
    available: Vec<Proof>,
    mint_url: &str,
    memo: Option<String>,
) -> Result<TokenOutcome, WalletError> {
    let available_total = balance(&available);
    if available_total < amount_sats {
        return Err(WalletError::InsufficientFunds {
            needed: amount_sats,
            available: available_total,
        });
    }

    let split = mint.split_for_send(mint_url, amount_sats, available)?;

    // Conservation: nothing minted, nothing burned.
    let send_total = balance(&split.send);
    let keep_total = balance(&split.keep);
    if send_total != amount_sats || send_total + keep_total != available_total {
        return Err(WalletError::MintUnavailable(format!(
            "split violated conservation: send={send_total} keep={keep_total} input={available_total}"
        )));
    }

    Ok(TokenOutcome {
        token: Token::new(mint_url, split.send, memo),
        remaining: split.keep,
    })
}

/// Fresh proofs claimed from an incoming token.
#[derive(Clone, Debug)]
pub struct Redeemed {
    pub proofs: Vec<Proof>,
    pub amount: u64,
    pub mint_url: String,
}

/// Decode a token, verify its proofs are unspent at the issuing mint, and
/// exchange them for fresh proofs we exclusively own.
pub fn redeem_token<M: Mint + ?Sized>(
    mint: &M,
    token_str: &str,
) -> Result<Redeemed, WalletError> {
    let token = Token::decode(token_str)?;
    let mint_url = token
        .mint_url()
        .ok_or_else(|| WalletError::Decode("token has no mint entries".into()))?
        .to_string();
    let inputs: Vec<Proof> = token
        .token
        .into_iter()
        .next()
        .map(|entry| entry.proofs)
        .unwrap_or_default();
    if inputs.is_empty() {
        return Err(WalletError::Decode("token carries no proofs".into()));
    }

    let states = mint.check_states(&mint_url, &inputs)?;
    if let Some(state) = states.iter().find(|state| !state.is_spendable()) {
        return Err(WalletError::TokenUnusable(format!(
            "proof state is {state:?}, expected Unspent"
        )));
    }

    let proofs = mint.claim(&mint_url, inputs)?;
    let amount = balance(&proofs);
    Ok(Redeemed {
        proofs,
        amount,
        mint_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mint::SwapSplit;
    use crate::model::ProofState;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn proof(amount: u64, secret: &str) -> Proof {
        Proof {
            amount,
            id: "009a1f293253e41e".into(),
            secret: secret.into(),
            c: "02aa".into(),
        }
    }

    /// Mint that splits honestly and counts calls.
    #[derive(Default)]
    struct CountingMint {
        calls: AtomicUsize,
    }

    impl Mint for CountingMint {
        fn check_states(
            &self,
            _mint_url: &str,
            proofs: &[Proof],
        ) -> Result<Vec<ProofState>, WalletError> {
            Ok(vec![ProofState::Unspent; proofs.len()])
        }

        fn split_for_send(
            &self,
            _mint_url: &str,
            amount_sats: u64,
            inputs: Vec<Proof>,
        ) -> Result<SwapSplit, WalletError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let total = balance(&inputs);
            Ok(SwapSplit {
                send: vec![proof(amount_sats, "fresh-send")],
                keep: if total > amount_sats {
                    vec![proof(total - amount_sats, "fresh-keep")]
                } else {
                    vec![]
                },
            })
        }

        fn claim(&self, _mint_url: &str, inputs: Vec<Proof>) -> Result<Vec<Proof>, WalletError> {
            Ok(vec![proof(balance(&inputs), "fresh-claim")])
        }
    }

    #[test]
    fn balance_of_empty_is_zero() {
        assert_eq!(balance(&[]), 0);
        assert_eq!(balance(&[proof(1, "a"), proof(4, "b")]), 5);
    }

    #[test]
    fn conservation_across_split() {
        let mint = CountingMint::default();
        let available = vec![proof(64, "a"), proof(32, "b"), proof(4, "c")];
        let total = balance(&available);
        let outcome =
            create_token_for_amount(&mint, 60, available, "https://m", None).unwrap();
        assert_eq!(outcome.token.amount(), 60);
        assert_eq!(outcome.token.amount() + balance(&outcome.remaining), total);
    }

    #[test]
    fn insufficient_funds_skips_network_call() {
        let mint = CountingMint::default();
        let err = create_token_for_amount(&mint, 100, vec![proof(60, "a")], "https://m", None)
            .unwrap_err();
        assert!(matches!(
            err,
            WalletError::InsufficientFunds {
                needed: 100,
                available: 60
            }
        ));
        assert_eq!(mint.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dishonest_split_is_rejected() {
        struct ShortchangingMint;
        impl Mint for ShortchangingMint {
            fn check_states(
                &self,
                _m: &str,
                proofs: &[Proof],
            ) -> Result<Vec<ProofState>, WalletError> {
                Ok(vec![ProofState::Unspent; proofs.len()])
            }
            fn split_for_send(
                &self,
                _m: &str,
                amount: u64,
                _inputs: Vec<Proof>,
            ) -> Result<SwapSplit, WalletError> {
                // Keeps the change for itself.
                Ok(SwapSplit {
                    send: vec![proof(amount, "s")],
                    keep: vec![],
                })
            }
            fn claim(&self, _m: &str, inputs: Vec<Proof>) -> Result<Vec<Proof>, WalletError> {
                Ok(inputs)
            }
        }
        let err = create_token_for_amount(
            &ShortchangingMint,
            60,
            vec![proof(100, "a")],
            "https://m",
            None,
        )
        .unwrap_err();
        assert!(matches!(err, WalletError::MintUnavailable(_)));
    }

    #[test]
    fn redeem_rejects_spent_proofs() {
        struct SpentMint;
        impl Mint for SpentMint {
            fn check_states(
                &self,
                _m: &str,
                proofs: &[Proof],
            ) -> Result<Vec<ProofState>, WalletError> {
                Ok(vec![ProofState::Spent; proofs.len()])
            }
            fn split_for_send(
                &self,
                _m: &str,
                _a: u64,
                _i: Vec<Proof>,
            ) -> Result<SwapSplit, WalletError> {
                unreachable!()
            }
            fn claim(&self, _m: &str, _inputs: Vec<Proof>) -> Result<Vec<Proof>, WalletError> {
                unreachable!()
            }
        }
        let token = Token::new("https://m", vec![proof(50, "s")], None);
        let err = redeem_token(&SpentMint, &token.encode()).unwrap_err();
        assert!(matches!(err, WalletError::TokenUnusable(_)));
    }

    #[test]
    fn redeem_claims_fresh_proofs() {
        let mint = CountingMint::default();
        let token = Token::new("https://m", vec![proof(20, "x"), proof(30, "y")], None);
        let redeemed = redeem_token(&mint, &token.encode()).unwrap();
        assert_eq!(redeemed.amount, 50);
        assert_eq!(redeemed.mint_url, "https://m");
        assert_eq!(redeemed.proofs[0].secret, "fresh-claim");
    }

    #[test]
    fn redeem_rejects_malformed_token() {
        let mint = CountingMint::default();
        assert!(matches!(
            redeem_token(&mint, "not a token"),
            Err(WalletError::Decode(_))
        ));
    }
}
