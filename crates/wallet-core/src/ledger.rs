//! Ledger reconciliation service.
//!
//! Owns the in-memory view of the proof set and keeps it consistent with the
//! persistent store across the two mutating flows: tip settlement and
//! deposit redemption. All mutating operations serialize through one mutex;
//! correctness of the clear-then-rewrite sequence depends on no two of them
//! interleaving.
//!
//! Public operations return a success boolean and record failures in
//! `last_error` so callers can render state without error plumbing; internal
//! helpers use `Result`.

use std::collections::HashMap;

use log::{info, warn};
use parking_lot::Mutex;

use crate::error::WalletError;
use crate::funds;
use crate::mint::Mint;
use crate::model::{Proof, StoredProof};
use crate::storage::ProofStore;

/// Fallback mint for new wallets that never picked one.
pub const DEFAULT_MINT_URL: &str = "https://mint.minibits.cash/Bitcoin";

/// Encrypted direct-message delivery for tip tokens. Encryption and relay
/// publishing are external concerns; the ledger only needs these two
/// capabilities.
pub trait TipTransport: Send + Sync {
    fn encrypt(&self, plaintext: &str, recipient: &str) -> Result<String, WalletError>;
    fn publish(&self, ciphertext: &str, recipient: &str) -> Result<(), WalletError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerPhase {
    Uninitialized,
    Loading,
    Ready,
}

struct LedgerState {
    phase: LedgerPhase,
    /// Keyed by proof secret. Secrets are assumed globally unique across
    /// mints; see DESIGN.md for the collision caveat.
    proofs: HashMap<String, StoredProof>,
    /// Derived from `proofs` on every transition, never mutated directly.
    balance_sats: u64,
    mint_url: String,
    last_error: Option<WalletError>,
}

impl LedgerState {
    fn recompute_balance(&mut self) {
        self.balance_sats = self.proofs.values().map(|record| record.amount()).sum();
    }
}

pub struct Ledger<S: ProofStore, M: Mint> {
    store: S,
    mint: M,
    state: Mutex<LedgerState>,
}

impl<S: ProofStore, M: Mint> Ledger<S, M> {
    pub fn new(store: S, mint: M) -> Self {
        Self {
            store,
            mint,
            state: Mutex::new(LedgerState {
                phase: LedgerPhase::Uninitialized,
                proofs: HashMap::new(),
                balance_sats: 0,
                mint_url: DEFAULT_MINT_URL.to_string(),
                last_error: None,
            }),
        }
    }

    /// Hydrate from the store. Fail-open: storage errors are recorded but
    /// the ledger still reaches `Ready` with whatever was loaded, since an
    /// empty wallet is a safe default for display.
    pub fn load(&self) -> bool {
        let mut state = self.state.lock();
        state.phase = LedgerPhase::Loading;
        state.last_error = None;

        match self.store.get_mint_url() {
            Ok(Some(url)) => state.mint_url = url,
            Ok(None) => {}
            Err(err) => state.last_error = Some(err.into()),
        }

        match self.store.list_proofs() {
            Ok(records) => {
                state.proofs = records
                    .into_iter()
                    .map(|record| (record.secret().to_string(), record))
                    .collect();
            }
            Err(err) => {
                warn!("ledger load failed, starting with empty view: {err}");
                state.last_error = Some(err.into());
                state.proofs.clear();
            }
        }

        state.recompute_balance();
        state.phase = LedgerPhase::Ready;
        info!(
            "ledger ready: {} proofs, {} sat, mint {}",
            state.proofs.len(),
            state.balance_sats,
            state.mint_url
        );
        state.last_error.is_none()
    }

    pub fn phase(&self) -> LedgerPhase {
        self.state.lock().phase
    }

    pub fn balance_sats(&self) -> u64 {
        self.state.lock().balance_sats
    }

    pub fn configured_mint_url(&self) -> String {
        self.state.lock().mint_url.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state
            .lock()
            .last_error
            .as_ref()
            .map(|err| err.to_string())
    }

    /// Read-only snapshot of the cached proof set.
    pub fn proofs(&self) -> Vec<StoredProof> {
        self.state.lock().proofs.values().cloned().collect()
    }

    /// Persist a new active mint for future spends.
    pub fn set_mint_url(&self, url: &str) -> bool {
        let mut state = self.state.lock();
        if let Err(err) = self.store.put_mint_url(url) {
            state.last_error = Some(err.into());
            return false;
        }
        state.mint_url = url.to_string();
        state.last_error = None;
        true
    }

    /// Settle a tip: split proofs at `mint_url`, deliver the token to
    /// `recipient` over `transport`, persist the change. Returns `false`
    /// with `last_error` populated on any failure; in that case neither the
    /// store nor the in-memory view has changed.
    pub fn settle_tip<T: TipTransport + ?Sized>(
        &self,
        amount_sats: u64,
        mint_url: &str,
        recipient: &str,
        transport: &T,
    ) -> bool {
        let mut state = self.state.lock();
        match self.try_settle_tip(&mut state, amount_sats, mint_url, recipient, transport) {
            Ok(()) => {
                state.last_error = None;
                true
            }
            Err(err) => {
                warn!("settle_tip({amount_sats} sat at {mint_url}) failed: {err}");
                state.last_error = Some(err);
                false
            }
        }
    }

    fn try_settle_tip<T: TipTransport + ?Sized>(
        &self,
        state: &mut LedgerState,
        amount_sats: u64,
        mint_url: &str,
        recipient: &str,
        transport: &T,
    ) -> Result<(), WalletError> {
        if state.phase != LedgerPhase::Ready {
            return Err(WalletError::NotReady);
        }

        // Cross-mint spending is not supported: the spend must be assembled
        // from a single mint's proofs.
        let mint_proofs: Vec<Proof> = state
            .proofs
            .values()
            .filter(|record| record.mint_url == mint_url)
            .map(|record| record.proof.clone())
            .collect();

        let outcome =
            funds::create_token_for_amount(&self.mint, amount_sats, mint_proofs, mint_url, None)?;
        let encoded = outcome.token.encode();

        let ciphertext = transport
            .encrypt(&encoded, recipient)
            .map_err(|err| WalletError::Transport(err.to_string()))?;
        // Token generation already consumed the old proofs at the mint. If
        // delivery fails we still refuse to persist the spent set and hand
        // the token back in the error for manual delivery; see DESIGN.md.
        transport.publish(&ciphertext, recipient).map_err(|err| {
            WalletError::Transport(format!("{err}; undelivered token: {encoded}"))
        })?;

        // Final set: everything from other mints plus this mint's change.
        let mut final_set: Vec<StoredProof> = state
            .proofs
            .values()
            .filter(|record| record.mint_url != mint_url)
            .cloned()
            .collect();
        final_set.extend(
            outcome
                .remaining
                .into_iter()
                .map(|proof| StoredProof::new(proof, mint_url)),
        );

        // Clear-then-rewrite: no stale spent proof can survive a partial
        // write. The store is single-writer, so the brief empty window is
        // not observable by another mutator.
        if let Err(err) = self.rewrite_store(&final_set) {
            self.resync_from_store(state);
            return Err(err);
        }

        state.proofs = final_set
            .into_iter()
            .map(|record| (record.secret().to_string(), record))
            .collect();
        state.recompute_balance();
        info!(
            "settled {amount_sats} sat tip at {mint_url}; balance now {} sat",
            state.balance_sats
        );
        Ok(())
    }

    fn rewrite_store(&self, records: &[StoredProof]) -> Result<(), WalletError> {
        self.store.clear_proofs()?;
        let mut by_mint: HashMap<&str, Vec<Proof>> = HashMap::new();
        for record in records {
            by_mint
                .entry(record.mint_url.as_str())
                .or_default()
                .push(record.proof.clone());
        }
        for (mint_url, proofs) in by_mint {
            self.store.put_proofs(&proofs, mint_url)?;
        }
        Ok(())
    }

    /// Best effort after a failed rewrite: make the in-memory view match
    /// whatever actually landed on disk.
    fn resync_from_store(&self, state: &mut LedgerState) {
        match self.store.list_proofs() {
            Ok(records) => {
                state.proofs = records
                    .into_iter()
                    .map(|record| (record.secret().to_string(), record))
                    .collect();
                state.recompute_balance();
            }
            Err(err) => warn!("resync after failed rewrite also failed: {err}"),
        }
    }

    /// Redeem an incoming token. Additive: no clear, no rewrite. A
    /// duplicate or already-spent token is a safe `false`, never a crash or
    /// a double credit.
    pub fn redeem_deposit(&self, token_str: &str) -> bool {
        let mut state = self.state.lock();
        match self.try_redeem_deposit(&mut state, token_str) {
            Ok(amount) => {
                state.last_error = None;
                info!(
                    "redeemed {amount} sat deposit; balance now {} sat",
                    state.balance_sats
                );
                true
            }
            Err(err) => {
                warn!("redeem_deposit failed: {err}");
                state.last_error = Some(err);
                false
            }
        }
    }

    fn try_redeem_deposit(
        &self,
        state: &mut LedgerState,
        token_str: &str,
    ) -> Result<u64, WalletError> {
        if state.phase != LedgerPhase::Ready {
            return Err(WalletError::NotReady);
        }
        let redeemed = funds::redeem_token(&self.mint, token_str)?;
        self.store
            .put_proofs(&redeemed.proofs, &redeemed.mint_url)?;
        for proof in redeemed.proofs {
            state.proofs.insert(
                proof.secret.clone(),
                StoredProof::new(proof, &redeemed.mint_url),
            );
        }
        state.recompute_balance();
        Ok(redeemed.amount)
    }

    /// Deposit-listener checkpoint, persisted in the same store.
    pub fn deposit_checkpoint(&self) -> Option<u64> {
        match self.store.get_checkpoint() {
            Ok(value) => value,
            Err(err) => {
                warn!("reading deposit checkpoint failed: {err}");
                None
            }
        }
    }

    pub fn save_deposit_checkpoint(&self, unix_secs: u64) -> bool {
        match self.store.put_checkpoint(unix_secs) {
            Ok(()) => true,
            Err(err) => {
                warn!("persisting deposit checkpoint failed: {err}");
                self.state.lock().last_error = Some(err.into());
                false
            }
        }
    }

    /// Explicit full wipe (logout). Persisted settings survive; proofs do
    /// not.
    pub fn wipe(&self) -> bool {
        let mut state = self.state.lock();
        if let Err(err) = self.store.clear_proofs() {
            state.last_error = Some(err.into());
            return false;
        }
        state.proofs.clear();
        state.recompute_balance();
        state.last_error = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::mint::SwapSplit;
    use crate::model::ProofState;
    use crate::storage::InMemoryStore;
    use crate::token::Token;
    use parking_lot::Mutex as PlMutex;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn proof(amount: u64, secret: &str) -> Proof {
        Proof {
            amount,
            id: "009a1f293253e41e".into(),
            secret: secret.into(),
            c: "02aa".into(),
        }
    }

    /// Mint that tracks spent secrets so replays fail like the real thing.
    #[derive(Default)]
    struct FakeMint {
        spent: PlMutex<HashSet<String>>,
        fail_split: bool,
        counter: PlMutex<u64>,
    }

    impl FakeMint {
        fn fresh(&self, amount: u64) -> Proof {
            let mut counter = self.counter.lock();
            *counter += 1;
            proof(amount, &format!("fresh-{counter}"))
        }

        fn consume(&self, inputs: &[Proof]) {
            let mut spent = self.spent.lock();
            for input in inputs {
                spent.insert(input.secret.clone());
            }
        }
    }

    impl Mint for FakeMint {
        fn check_states(
            &self,
            _mint_url: &str,
            proofs: &[Proof],
        ) -> Result<Vec<ProofState>, WalletError> {
            let spent = self.spent.lock();
            Ok(proofs
                .iter()
                .map(|p| {
                    if spent.contains(&p.secret) {
                        ProofState::Spent
                    } else {
                        ProofState::Unspent
                    }
                })
                .collect())
        }

        fn split_for_send(
            &self,
            _mint_url: &str,
            amount_sats: u64,
            inputs: Vec<Proof>,
        ) -> Result<SwapSplit, WalletError> {
            if self.fail_split {
                return Err(WalletError::MintUnavailable("mint offline".into()));
            }
            let total: u64 = inputs.iter().map(|p| p.amount).sum();
            self.consume(&inputs);
            Ok(SwapSplit {
                send: vec![self.fresh(amount_sats)],
                keep: if total > amount_sats {
                    vec![self.fresh(total - amount_sats)]
                } else {
                    vec![]
                },
            })
        }

        fn claim(&self, _mint_url: &str, inputs: Vec<Proof>) -> Result<Vec<Proof>, WalletError> {
            let total: u64 = inputs.iter().map(|p| p.amount).sum();
            self.consume(&inputs);
            Ok(vec![self.fresh(total)])
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        published: PlMutex<Vec<(String, String)>>,
        fail_publish: bool,
    }

    impl RecordingTransport {
        fn last_plaintext(&self) -> Option<String> {
            self.published
                .lock()
                .last()
                .map(|(ciphertext, _)| ciphertext.trim_start_matches("sealed:").to_string())
        }
    }

    impl TipTransport for RecordingTransport {
        fn encrypt(&self, plaintext: &str, _recipient: &str) -> Result<String, WalletError> {
            Ok(format!("sealed:{plaintext}"))
        }

        fn publish(&self, ciphertext: &str, recipient: &str) -> Result<(), WalletError> {
            if self.fail_publish {
                return Err(WalletError::Transport("relay rejected event".into()));
            }
            self.published
                .lock()
                .push((ciphertext.to_string(), recipient.to_string()));
            Ok(())
        }
    }

    /// Store whose every operation fails, as if the disk vanished.
    struct OfflineStore;

    impl ProofStore for OfflineStore {
        fn put_proofs(&self, _proofs: &[Proof], _mint_url: &str) -> Result<(), StorageError> {
            Err(StorageError("disk offline".into()))
        }
        fn list_proofs(&self) -> Result<Vec<StoredProof>, StorageError> {
            Err(StorageError("disk offline".into()))
        }
        fn list_proofs_by_mint(&self, _mint_url: &str) -> Result<Vec<StoredProof>, StorageError> {
            Err(StorageError("disk offline".into()))
        }
        fn remove_proofs(&self, _proofs: &[Proof]) -> Result<(), StorageError> {
            Err(StorageError("disk offline".into()))
        }
        fn clear_proofs(&self) -> Result<(), StorageError> {
            Err(StorageError("disk offline".into()))
        }
        fn put_mint_url(&self, _url: &str) -> Result<(), StorageError> {
            Err(StorageError("disk offline".into()))
        }
        fn get_mint_url(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError("disk offline".into()))
        }
        fn put_checkpoint(&self, _unix_secs: u64) -> Result<(), StorageError> {
            Err(StorageError("disk offline".into()))
        }
        fn get_checkpoint(&self) -> Result<Option<u64>, StorageError> {
            Err(StorageError("disk offline".into()))
        }
    }

    /// Healthy store that can be told to start failing `clear_proofs`.
    #[derive(Default)]
    struct FlakyStore {
        inner: InMemoryStore,
        fail_clear: Arc<AtomicBool>,
    }

    impl ProofStore for FlakyStore {
        fn put_proofs(&self, proofs: &[Proof], mint_url: &str) -> Result<(), StorageError> {
            self.inner.put_proofs(proofs, mint_url)
        }
        fn list_proofs(&self) -> Result<Vec<StoredProof>, StorageError> {
            self.inner.list_proofs()
        }
        fn list_proofs_by_mint(&self, mint_url: &str) -> Result<Vec<StoredProof>, StorageError> {
            self.inner.list_proofs_by_mint(mint_url)
        }
        fn remove_proofs(&self, proofs: &[Proof]) -> Result<(), StorageError> {
            self.inner.remove_proofs(proofs)
        }
        fn clear_proofs(&self) -> Result<(), StorageError> {
            if self.fail_clear.load(Ordering::SeqCst) {
                return Err(StorageError("write rejected".into()));
            }
            self.inner.clear_proofs()
        }
        fn put_mint_url(&self, url: &str) -> Result<(), StorageError> {
            self.inner.put_mint_url(url)
        }
        fn get_mint_url(&self) -> Result<Option<String>, StorageError> {
            self.inner.get_mint_url()
        }
        fn put_checkpoint(&self, unix_secs: u64) -> Result<(), StorageError> {
            self.inner.put_checkpoint(unix_secs)
        }
        fn get_checkpoint(&self) -> Result<Option<u64>, StorageError> {
            self.inner.get_checkpoint()
        }
    }

    fn ready_ledger(
        seed: &[(u64, &str, &str)],
    ) -> Ledger<InMemoryStore, FakeMint> {
        let store = InMemoryStore::new();
        for (amount, secret, mint_url) in seed {
            store.put_proofs(&[proof(*amount, secret)], mint_url).unwrap();
        }
        let ledger = Ledger::new(store, FakeMint::default());
        assert!(ledger.load());
        ledger
    }

    fn assert_balance_invariant<S: ProofStore, M: Mint>(ledger: &Ledger<S, M>) {
        let from_proofs: u64 = ledger.proofs().iter().map(|r| r.amount()).sum();
        assert_eq!(ledger.balance_sats(), from_proofs);
    }

    #[test]
    fn operations_require_load_first() {
        let ledger = Ledger::new(InMemoryStore::new(), FakeMint::default());
        let transport = RecordingTransport::default();
        assert_eq!(ledger.phase(), LedgerPhase::Uninitialized);
        assert!(!ledger.settle_tip(10, "https://m", "npub1dest", &transport));
        assert_eq!(ledger.last_error(), Some("ledger not ready".to_string()));
        assert!(!ledger.redeem_deposit("cashuAirrelevant"));
    }

    #[test]
    fn load_hydrates_proofs_and_mint_url() {
        let store = InMemoryStore::new();
        store.put_proofs(&[proof(100, "a")], "https://m").unwrap();
        store.put_mint_url("https://m").unwrap();
        let ledger = Ledger::new(store, FakeMint::default());
        assert!(ledger.load());
        assert_eq!(ledger.phase(), LedgerPhase::Ready);
        assert_eq!(ledger.balance_sats(), 100);
        assert_eq!(ledger.configured_mint_url(), "https://m");
        assert_balance_invariant(&ledger);
    }

    #[test]
    fn load_is_fail_open_when_storage_errors() {
        let ledger = Ledger::new(OfflineStore, FakeMint::default());
        assert!(!ledger.load());
        // Degraded but usable: an empty wallet is a safe display default.
        assert_eq!(ledger.phase(), LedgerPhase::Ready);
        assert_eq!(ledger.balance_sats(), 0);
        assert!(ledger.proofs().is_empty());
        assert!(ledger
            .last_error()
            .unwrap()
            .contains("storage error: disk offline"));
    }

    #[test]
    fn failed_rewrite_resyncs_view_from_store() {
        let fail_clear = Arc::new(AtomicBool::new(false));
        let store = FlakyStore {
            inner: InMemoryStore::new(),
            fail_clear: fail_clear.clone(),
        };
        store.put_proofs(&[proof(100, "a")], "https://m").unwrap();
        let ledger = Ledger::new(store, FakeMint::default());
        assert!(ledger.load());

        fail_clear.store(true, Ordering::SeqCst);
        let transport = RecordingTransport::default();
        assert!(!ledger.settle_tip(60, "https://m", "npub1dest", &transport));

        // The rewrite never happened, so the resynced view must show the
        // original proof and its full value.
        assert!(ledger.last_error().unwrap().contains("storage error"));
        assert_eq!(ledger.balance_sats(), 100);
        assert_eq!(ledger.proofs()[0].secret(), "a");
        assert_balance_invariant(&ledger);
    }

    #[test]
    fn fresh_wallet_uses_fallback_mint() {
        let ledger = ready_ledger(&[]);
        assert_eq!(ledger.configured_mint_url(), DEFAULT_MINT_URL);
        assert_eq!(ledger.balance_sats(), 0);
    }

    #[test]
    fn settle_tip_persists_change_and_delivers_token() {
        let ledger = ready_ledger(&[(100, "a", "https://m")]);
        let transport = RecordingTransport::default();

        assert!(ledger.settle_tip(60, "https://m", "npub1dest", &transport));

        assert_eq!(ledger.balance_sats(), 40);
        let records = ledger.proofs();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount(), 40);
        assert_ne!(records[0].secret(), "a");
        assert_balance_invariant(&ledger);

        // The delivered token is decodable and worth exactly the tip.
        let delivered = transport.last_plaintext().unwrap();
        let token = Token::decode(&delivered).unwrap();
        assert_eq!(token.amount(), 60);
        assert_eq!(token.mint_url(), Some("https://m"));
    }

    #[test]
    fn settle_tip_insufficient_funds_is_untouched_store() {
        let ledger = ready_ledger(&[]);
        let transport = RecordingTransport::default();
        assert!(!ledger.settle_tip(10, "https://m", "npub1dest", &transport));
        assert!(ledger
            .last_error()
            .unwrap()
            .contains("insufficient funds"));
        assert_eq!(ledger.balance_sats(), 0);
        assert!(ledger.proofs().is_empty());
        assert!(transport.published.lock().is_empty());
    }

    #[test]
    fn settle_tip_mint_failure_leaves_store_unchanged() {
        let store = InMemoryStore::new();
        store.put_proofs(&[proof(100, "a")], "https://m").unwrap();
        let mint = FakeMint {
            fail_split: true,
            ..FakeMint::default()
        };
        let ledger = Ledger::new(store, mint);
        assert!(ledger.load());
        let transport = RecordingTransport::default();

        let before = ledger.proofs();
        assert!(!ledger.settle_tip(60, "https://m", "npub1dest", &transport));

        assert_eq!(ledger.proofs(), before);
        assert_eq!(ledger.balance_sats(), 100);
        assert!(ledger.last_error().unwrap().contains("mint unavailable"));
        assert_balance_invariant(&ledger);
    }

    #[test]
    fn settle_tip_transport_failure_keeps_old_proofs_and_surfaces_token() {
        let ledger = ready_ledger(&[(100, "a", "https://m")]);
        let transport = RecordingTransport {
            fail_publish: true,
            ..RecordingTransport::default()
        };

        assert!(!ledger.settle_tip(60, "https://m", "npub1dest", &transport));

        // Store untouched; the generated token rides along in the error for
        // manual delivery.
        assert_eq!(ledger.balance_sats(), 100);
        assert_eq!(ledger.proofs()[0].secret(), "a");
        let err = ledger.last_error().unwrap();
        assert!(err.contains("undelivered token: cashuA"), "got: {err}");
    }

    #[test]
    fn settle_tip_only_spends_from_the_named_mint() {
        let ledger = ready_ledger(&[(30, "a", "https://m1"), (100, "b", "https://m2")]);
        let transport = RecordingTransport::default();

        // m1 alone cannot cover it even though the wallet total can.
        assert!(!ledger.settle_tip(60, "https://m1", "npub1dest", &transport));
        assert!(ledger
            .last_error()
            .unwrap()
            .contains("insufficient funds"));

        // Spending from m2 leaves m1's proof alone.
        assert!(ledger.settle_tip(60, "https://m2", "npub1dest", &transport));
        assert_eq!(ledger.balance_sats(), 70);
        let mut mints: Vec<String> = ledger
            .proofs()
            .iter()
            .map(|r| r.mint_url.clone())
            .collect();
        mints.sort();
        assert_eq!(mints, ["https://m1", "https://m2"]);
        assert_balance_invariant(&ledger);
    }

    #[test]
    fn redeem_deposit_is_additive_and_replay_safe() {
        let ledger = ready_ledger(&[(10, "a", "https://m")]);
        let token = Token::new("https://m", vec![proof(50, "gift")], None).encode();

        assert!(ledger.redeem_deposit(&token));
        assert_eq!(ledger.balance_sats(), 60);
        assert_balance_invariant(&ledger);

        // Same raw message again: the mint reports the proofs spent.
        assert!(!ledger.redeem_deposit(&token));
        assert_eq!(ledger.balance_sats(), 60);
        assert!(ledger.last_error().unwrap().contains("token unusable"));
    }

    #[test]
    fn redeem_deposit_rejects_garbage_without_mutation() {
        let ledger = ready_ledger(&[(10, "a", "https://m")]);
        assert!(!ledger.redeem_deposit("hello world"));
        assert_eq!(ledger.balance_sats(), 10);
        assert!(ledger.last_error().unwrap().contains("decode error"));
    }

    #[test]
    fn set_mint_url_persists() {
        let ledger = ready_ledger(&[]);
        assert!(ledger.set_mint_url("https://other-mint"));
        assert_eq!(ledger.configured_mint_url(), "https://other-mint");
    }

    #[test]
    fn wipe_clears_proofs_but_not_settings() {
        let ledger = ready_ledger(&[(25, "a", "https://m")]);
        assert!(ledger.set_mint_url("https://m"));
        assert!(ledger.wipe());
        assert_eq!(ledger.balance_sats(), 0);
        assert!(ledger.proofs().is_empty());
        assert_eq!(ledger.configured_mint_url(), "https://m");
    }

    #[test]
    fn checkpoint_round_trips_through_ledger() {
        let ledger = ready_ledger(&[]);
        assert_eq!(ledger.deposit_checkpoint(), None);
        assert!(ledger.save_deposit_checkpoint(1_700_000_123));
        assert_eq!(ledger.deposit_checkpoint(), Some(1_700_000_123));
    }
}
