//! Persistent proof store.
//!
//! Proof records are keyed by their secret; re-adding a secret overwrites in
//! place. Settings (active mint URL, deposit checkpoint) live in the same
//! store so one backend carries the whole wallet.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::model::{Proof, StoredProof};

pub trait ProofStore: Send + Sync + 'static {
    /// Insert or overwrite each proof, stamped with `mint_url`. Idempotent:
    /// last write wins per secret, never duplicates.
    fn put_proofs(&self, proofs: &[Proof], mint_url: &str) -> Result<(), StorageError>;
    fn list_proofs(&self) -> Result<Vec<StoredProof>, StorageError>;
    fn list_proofs_by_mint(&self, mint_url: &str) -> Result<Vec<StoredProof>, StorageError>;
    /// Delete by secret; removing an absent secret is a no-op.
    fn remove_proofs(&self, proofs: &[Proof]) -> Result<(), StorageError>;
    /// Wipe all proofs. Used only during a full rebuild after reconciliation.
    fn clear_proofs(&self) -> Result<(), StorageError>;

    fn put_mint_url(&self, url: &str) -> Result<(), StorageError>;
    fn get_mint_url(&self) -> Result<Option<String>, StorageError>;
    fn put_checkpoint(&self, unix_secs: u64) -> Result<(), StorageError>;
    fn get_checkpoint(&self) -> Result<Option<u64>, StorageError>;
}

const PROOF_PREFIX: &str = "proof/";
const KEY_MINT_URL: &str = "settings/mint_url";
const KEY_CHECKPOINT: &str = "settings/deposit_checkpoint";

/// Volatile store for tests and ephemeral sessions.
#[derive(Default)]
pub struct InMemoryStore {
    kv: parking_lot::RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let bytes = bincode::serialize(value).map_err(|e| StorageError(e.to_string()))?;
        self.kv.write().insert(key.to_string(), bytes);
        Ok(())
    }

    fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.kv
            .read()
            .get(key)
            .map(|bytes| bincode::deserialize(bytes))
            .transpose()
            .map_err(|e| StorageError(e.to_string()))
    }
}

impl ProofStore for InMemoryStore {
    fn put_proofs(&self, proofs: &[Proof], mint_url: &str) -> Result<(), StorageError> {
        for proof in proofs {
            let record = StoredProof::new(proof.clone(), mint_url);
            self.put(&format!("{PROOF_PREFIX}{}", proof.secret), &record)?;
        }
        Ok(())
    }

    fn list_proofs(&self) -> Result<Vec<StoredProof>, StorageError> {
        let kv = self.kv.read();
        let mut out = Vec::new();
        for (key, value) in kv.iter() {
            if key.starts_with(PROOF_PREFIX) {
                out.push(bincode::deserialize(value).map_err(|e| StorageError(e.to_string()))?);
            }
        }
        Ok(out)
    }

    fn list_proofs_by_mint(&self, mint_url: &str) -> Result<Vec<StoredProof>, StorageError> {
        Ok(self
            .list_proofs()?
            .into_iter()
            .filter(|record| record.mint_url == mint_url)
            .collect())
    }

    fn remove_proofs(&self, proofs: &[Proof]) -> Result<(), StorageError> {
        let mut kv = self.kv.write();
        for proof in proofs {
            kv.remove(&format!("{PROOF_PREFIX}{}", proof.secret));
        }
        Ok(())
    }

    fn clear_proofs(&self) -> Result<(), StorageError> {
        let mut kv = self.kv.write();
        kv.retain(|key, _| !key.starts_with(PROOF_PREFIX));
        Ok(())
    }

    fn put_mint_url(&self, url: &str) -> Result<(), StorageError> {
        self.put(KEY_MINT_URL, &url.to_string())
    }

    fn get_mint_url(&self) -> Result<Option<String>, StorageError> {
        self.get(KEY_MINT_URL)
    }

    fn put_checkpoint(&self, unix_secs: u64) -> Result<(), StorageError> {
        self.put(KEY_CHECKPOINT, &unix_secs)
    }

    fn get_checkpoint(&self) -> Result<Option<u64>, StorageError> {
        self.get(KEY_CHECKPOINT)
    }
}

/// Snapshot layout of the JSON file store.
#[derive(Debug, Default, Serialize, Deserialize)]
struct WalletFile {
    #[serde(default)]
    mint_url: Option<String>,
    #[serde(default)]
    deposit_checkpoint: Option<u64>,
    #[serde(default)]
    proofs: Vec<StoredProof>,
}

/// Durable store: one JSON snapshot per wallet, committed with a temp-file
/// write and atomic rename so readers never observe a torn file.
pub struct JsonFileStore {
    path: PathBuf,
    lock: parking_lot::Mutex<()>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StorageError(format!("create {}: {e}", parent.display())))?;
        }
        let store = Self {
            path,
            lock: parking_lot::Mutex::new(()),
        };
        // Validate existing content up front rather than at first use.
        store.read_file()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<WalletFile, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorageError(format!("parse {}: {e}", self.path.display()))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(WalletFile::default()),
            Err(err) => Err(StorageError(format!(
                "read {}: {err}",
                self.path.display()
            ))),
        }
    }

    fn write_file(&self, file: &WalletFile) -> Result<(), StorageError> {
        let bytes =
            serde_json::to_vec_pretty(file).map_err(|e| StorageError(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes).map_err(|e| StorageError(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| StorageError(format!("rename {}: {e}", self.path.display())))
    }

    fn update<F>(&self, mutate: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut WalletFile),
    {
        let _guard = self.lock.lock();
        let mut file = self.read_file()?;
        mutate(&mut file);
        self.write_file(&file)
    }
}

impl ProofStore for JsonFileStore {
    fn put_proofs(&self, proofs: &[Proof], mint_url: &str) -> Result<(), StorageError> {
        self.update(|file| {
            let mut by_secret: BTreeMap<String, StoredProof> = file
                .proofs
                .drain(..)
                .map(|record| (record.proof.secret.clone(), record))
                .collect();
            for proof in proofs {
                by_secret.insert(
                    proof.secret.clone(),
                    StoredProof::new(proof.clone(), mint_url),
                );
            }
            file.proofs = by_secret.into_values().collect();
        })
    }

    fn list_proofs(&self) -> Result<Vec<StoredProof>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.read_file()?.proofs)
    }

    fn list_proofs_by_mint(&self, mint_url: &str) -> Result<Vec<StoredProof>, StorageError> {
        Ok(self
            .list_proofs()?
            .into_iter()
            .filter(|record| record.mint_url == mint_url)
            .collect())
    }

    fn remove_proofs(&self, proofs: &[Proof]) -> Result<(), StorageError> {
        self.update(|file| {
            file.proofs
                .retain(|record| !proofs.iter().any(|p| p.secret == record.proof.secret));
        })
    }

    fn clear_proofs(&self) -> Result<(), StorageError> {
        self.update(|file| file.proofs.clear())
    }

    fn put_mint_url(&self, url: &str) -> Result<(), StorageError> {
        self.update(|file| file.mint_url = Some(url.to_string()))
    }

    fn get_mint_url(&self) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.read_file()?.mint_url)
    }

    fn put_checkpoint(&self, unix_secs: u64) -> Result<(), StorageError> {
        self.update(|file| file.deposit_checkpoint = Some(unix_secs))
    }

    fn get_checkpoint(&self) -> Result<Option<u64>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.read_file()?.deposit_checkpoint)
    }
}
