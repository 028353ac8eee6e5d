//! Credential store and hasher abstractions
//!
//! The challenge never sees raw stored data. It asks a store whether a hash
//! exists, saves a new one, or checks a candidate against the stored one.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::ConstantTimeEq;

use crate::code::CredentialCode;
use crate::error::StoreError;

/// Opaque one-way digest of a credential code
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CredentialHash(Vec<u8>);

impl CredentialHash {
    /// Wrap digest bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse a hex-encoded digest
    pub fn from_hex(hex_str: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(hex_str).map(Self)
    }

    /// Digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Hex encoding of the digest
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Compare two digests in constant time
    ///
    /// Digests of different lengths never match.
    pub fn ct_eq(&self, other: &CredentialHash) -> bool {
        self.0.as_slice().ct_eq(other.0.as_slice()).unwrap_u8() == 1
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialHash({})", self.to_hex())
    }
}

impl Serialize for CredentialHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CredentialHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Deterministic, one-way digest function
///
/// Equal codes must always produce equal hashes. Errors are reserved for
/// misconfiguration (for example key-derivation parameters the backend
/// refuses), never for particular codes.
pub trait CredentialHasher: Send + Sync {
    /// Hash a credential code
    fn hash(&self, code: &CredentialCode) -> Result<CredentialHash, StoreError>;
}

/// Keyed storage for credential hashes
///
/// Every call may suspend. Callers await each call before issuing the next.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Whether a hash is stored under `key`
    async fn has_hash(&self, key: &str) -> Result<bool, StoreError>;

    /// Store `hash` under `key`, replacing any previous value
    async fn save_hash(&self, key: &str, hash: &CredentialHash) -> Result<(), StoreError>;

    /// Whether `hash` equals the hash stored under `key`
    ///
    /// Returns `Ok(false)` when nothing is stored.
    async fn check_hash(&self, key: &str, hash: &CredentialHash) -> Result<bool, StoreError>;

    /// Digest a code with this store's hasher
    fn compute_hash(&self, code: &CredentialCode) -> Result<CredentialHash, StoreError>;
}

#[async_trait]
impl<S: CredentialStore + ?Sized> CredentialStore for std::sync::Arc<S> {
    async fn has_hash(&self, key: &str) -> Result<bool, StoreError> {
        (**self).has_hash(key).await
    }

    async fn save_hash(&self, key: &str, hash: &CredentialHash) -> Result<(), StoreError> {
        (**self).save_hash(key, hash).await
    }

    async fn check_hash(&self, key: &str, hash: &CredentialHash) -> Result<bool, StoreError> {
        (**self).check_hash(key, hash).await
    }

    fn compute_hash(&self, code: &CredentialCode) -> Result<CredentialHash, StoreError> {
        (**self).compute_hash(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        let a = CredentialHash::new(vec![1, 2, 3]);
        assert!(a.ct_eq(&CredentialHash::new(vec![1, 2, 3])));
        assert!(!a.ct_eq(&CredentialHash::new(vec![1, 2, 4])));
        assert!(!a.ct_eq(&CredentialHash::new(vec![1, 2])));
        assert!(!a.ct_eq(&CredentialHash::new(vec![1, 2, 3, 0])));
        assert!(!a.ct_eq(&CredentialHash::new(Vec::new())));
        assert!(CredentialHash::new(Vec::new()).ct_eq(&CredentialHash::new(Vec::new())));
    }

    #[test]
    fn test_hex_serialization() {
        let hash = CredentialHash::new(vec![0xde, 0xad, 0xbe, 0xef]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, "\"deadbeef\"");

        let parsed: CredentialHash = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, hash);
    }

    #[test]
    fn test_invalid_hex_rejected() {
        assert!(serde_json::from_str::<CredentialHash>("\"zz\"").is_err());
    }
}
