//! In-memory store double for unit tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::code::CredentialCode;
use crate::error::StoreError;
use crate::store::{CredentialHash, CredentialStore};

#[derive(Default)]
struct Inner {
    hashes: Mutex<HashMap<String, CredentialHash>>,
    hash_calls: AtomicUsize,
    unavailable: AtomicBool,
}

/// Shared-handle store that counts hash computations and can be made to fail
#[derive(Clone, Default)]
pub struct MockStore {
    inner: Arc<Inner>,
}

impl MockStore {
    pub fn hash_calls(&self) -> usize {
        self.inner.hash_calls.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<(), StoreError> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::new("mock store offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MockStore {
    async fn has_hash(&self, key: &str) -> Result<bool, StoreError> {
        self.ensure_available()?;
        Ok(self.inner.hashes.lock().unwrap().contains_key(key))
    }

    async fn save_hash(&self, key: &str, hash: &CredentialHash) -> Result<(), StoreError> {
        self.ensure_available()?;
        self.inner
            .hashes
            .lock()
            .unwrap()
            .insert(key.to_string(), hash.clone());
        Ok(())
    }

    async fn check_hash(&self, key: &str, hash: &CredentialHash) -> Result<bool, StoreError> {
        self.ensure_available()?;
        Ok(self
            .inner
            .hashes
            .lock()
            .unwrap()
            .get(key)
            .is_some_and(|stored| stored.ct_eq(hash)))
    }

    fn compute_hash(&self, code: &CredentialCode) -> Result<CredentialHash, StoreError> {
        self.inner.hash_calls.fetch_add(1, Ordering::SeqCst);
        let mut bytes = b"mock:".to_vec();
        bytes.extend(code.as_str().bytes().rev());
        Ok(CredentialHash::new(bytes))
    }
}
