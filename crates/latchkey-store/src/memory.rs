//! In-memory credential store
//!
//! Hashes live only as long as the process. Used for ephemeral sessions and
//! as a test double; it can be switched off to exercise failure handling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use latchkey_core::{CredentialCode, CredentialHash, CredentialHasher, CredentialStore, StoreError};
use tokio::sync::RwLock;

use crate::error::StorageError;

/// Credential store backed by a hash map
pub struct MemoryCredentialStore<H> {
    hashes: RwLock<HashMap<String, CredentialHash>>,
    hasher: H,
    unavailable: AtomicBool,
}

impl<H: CredentialHasher> MemoryCredentialStore<H> {
    /// Create an empty store
    pub fn new(hasher: H) -> Self {
        Self {
            hashes: RwLock::new(HashMap::new()),
            hasher,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every store call fail until switched back on
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Remove the hash stored under `key`; returns whether one existed
    pub async fn remove_hash(&self, key: &str) -> Result<bool, StoreError> {
        self.ensure_available()?;
        Ok(self.hashes.write().await.remove(key).is_some())
    }

    /// Number of stored hashes
    pub async fn len(&self) -> usize {
        self.hashes.read().await.len()
    }

    /// Whether no hashes are stored
    pub async fn is_empty(&self) -> bool {
        self.hashes.read().await.is_empty()
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable.into());
        }
        Ok(())
    }
}

#[async_trait]
impl<H: CredentialHasher> CredentialStore for MemoryCredentialStore<H> {
    async fn has_hash(&self, key: &str) -> Result<bool, StoreError> {
        self.ensure_available()?;
        Ok(self.hashes.read().await.contains_key(key))
    }

    async fn save_hash(&self, key: &str, hash: &CredentialHash) -> Result<(), StoreError> {
        self.ensure_available()?;
        self.hashes
            .write()
            .await
            .insert(key.to_string(), hash.clone());
        tracing::debug!(key, "Credential hash stored in memory");
        Ok(())
    }

    async fn check_hash(&self, key: &str, hash: &CredentialHash) -> Result<bool, StoreError> {
        self.ensure_available()?;
        Ok(self
            .hashes
            .read()
            .await
            .get(key)
            .is_some_and(|stored| stored.ct_eq(hash)))
    }

    fn compute_hash(&self, code: &CredentialCode) -> Result<CredentialHash, StoreError> {
        self.hasher.hash(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::{Sha256Hasher, SALT_LEN};

    fn store() -> MemoryCredentialStore<Sha256Hasher> {
        MemoryCredentialStore::new(Sha256Hasher::new([1u8; SALT_LEN]))
    }

    #[tokio::test]
    async fn test_save_and_check() {
        let store = store();
        let hash = store.compute_hash(&"1234".into()).unwrap();

        assert!(!store.has_hash("pin").await.unwrap());
        assert!(!store.check_hash("pin", &hash).await.unwrap());

        store.save_hash("pin", &hash).await.unwrap();
        assert!(store.has_hash("pin").await.unwrap());
        assert!(store.check_hash("pin", &hash).await.unwrap());

        let other = store.compute_hash(&"4321".into()).unwrap();
        assert!(!store.check_hash("pin", &other).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let store = store();
        let first = store.compute_hash(&"1111".into()).unwrap();
        let second = store.compute_hash(&"2222".into()).unwrap();

        store.save_hash("pin", &first).await.unwrap();
        store.save_hash("pin", &second).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert!(!store.check_hash("pin", &first).await.unwrap());
        assert!(store.check_hash("pin", &second).await.unwrap());
    }

    #[tokio::test]
    async fn test_remove() {
        let store = store();
        let hash = store.compute_hash(&"048".into()).unwrap();
        store.save_hash("pattern", &hash).await.unwrap();

        assert!(store.remove_hash("pattern").await.unwrap());
        assert!(!store.remove_hash("pattern").await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_unavailable() {
        let store = store();
        store.set_unavailable(true);

        assert!(store.has_hash("pin").await.is_err());
        let hash = store.compute_hash(&"1234".into()).unwrap();
        assert!(store.save_hash("pin", &hash).await.is_err());

        store.set_unavailable(false);
        assert!(!store.has_hash("pin").await.unwrap());
    }
}
