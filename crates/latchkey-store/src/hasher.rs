//! Credential hashers
//!
//! Both hashers are deterministic for a fixed salt so that a stored digest
//! can be checked by recomputing it. The salt is generated once per
//! credential file and stored next to the digests.

use argon2::Argon2;
use latchkey_core::{CredentialCode, CredentialHash, CredentialHasher, StoreError};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::StorageError;

/// Length of an installation salt in bytes
pub const SALT_LEN: usize = 16;

/// Output length of the Argon2 hasher in bytes
const ARGON2_OUTPUT_LEN: usize = 32;

/// Domain separation tag mixed into SHA-256 digests
const SHA256_DOMAIN: &[u8] = b"latchkey.credential.v1";

/// Generate a fresh random salt
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

/// Which hashing backend to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HasherKind {
    /// Salted SHA-256
    Sha256,
    /// Argon2id raw key derivation
    #[default]
    Argon2,
}

impl HasherKind {
    /// Build a hasher of this kind over `salt`
    pub fn build(self, salt: [u8; SALT_LEN]) -> AnyHasher {
        match self {
            HasherKind::Sha256 => AnyHasher::Sha256(Sha256Hasher::new(salt)),
            HasherKind::Argon2 => AnyHasher::Argon2(Argon2Hasher::new(salt)),
        }
    }
}

/// SHA-256 over a domain tag, the salt and the code
#[derive(Debug, Clone)]
pub struct Sha256Hasher {
    salt: [u8; SALT_LEN],
}

impl Sha256Hasher {
    pub fn new(salt: [u8; SALT_LEN]) -> Self {
        Self { salt }
    }
}

impl CredentialHasher for Sha256Hasher {
    fn hash(&self, code: &CredentialCode) -> Result<CredentialHash, StoreError> {
        let mut hasher = Sha256::new();
        hasher.update(SHA256_DOMAIN);
        hasher.update(self.salt);
        hasher.update(code.as_str().as_bytes());
        Ok(CredentialHash::new(hasher.finalize().to_vec()))
    }
}

/// Argon2id with default parameters and a fixed salt
///
/// Short numeric codes have little entropy, so the memory-hard KDF is the
/// default choice for persisted credentials.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    salt: [u8; SALT_LEN],
}

impl Argon2Hasher {
    pub fn new(salt: [u8; SALT_LEN]) -> Self {
        Self { salt }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, code: &CredentialCode) -> Result<CredentialHash, StoreError> {
        let mut output = Zeroizing::new([0u8; ARGON2_OUTPUT_LEN]);

        Argon2::default()
            .hash_password_into(code.as_str().as_bytes(), &self.salt, &mut output[..])
            .map_err(|e| StorageError::Crypto(format!("Key derivation failed: {}", e)))?;

        Ok(CredentialHash::new(output.to_vec()))
    }
}

/// Hasher chosen at runtime from configuration
#[derive(Debug, Clone)]
pub enum AnyHasher {
    Sha256(Sha256Hasher),
    Argon2(Argon2Hasher),
}

impl AnyHasher {
    /// Backend kind
    pub fn kind(&self) -> HasherKind {
        match self {
            AnyHasher::Sha256(_) => HasherKind::Sha256,
            AnyHasher::Argon2(_) => HasherKind::Argon2,
        }
    }
}

impl CredentialHasher for AnyHasher {
    fn hash(&self, code: &CredentialCode) -> Result<CredentialHash, StoreError> {
        match self {
            AnyHasher::Sha256(hasher) => hasher.hash(code),
            AnyHasher::Argon2(hasher) => hasher.hash(code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SALT: [u8; SALT_LEN] = [7u8; SALT_LEN];

    #[test]
    fn test_sha256_deterministic() {
        let hasher = Sha256Hasher::new(SALT);
        let a = hasher.hash(&"048".into()).unwrap();
        let b = hasher.hash(&"048".into()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes().len(), 32);
        assert_ne!(a, hasher.hash(&"037".into()).unwrap());
    }

    #[test]
    fn test_sha256_salt_changes_digest() {
        let a = Sha256Hasher::new(SALT).hash(&"1234".into()).unwrap();
        let b = Sha256Hasher::new([8u8; SALT_LEN]).hash(&"1234".into()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_argon2_deterministic() {
        let hasher = Argon2Hasher::new(SALT);
        let a = hasher.hash(&"1234".into()).unwrap();
        let b = hasher.hash(&"1234".into()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_bytes().len(), ARGON2_OUTPUT_LEN);
        assert_ne!(a, hasher.hash(&"4321".into()).unwrap());
    }

    #[test]
    fn test_digest_does_not_contain_code() {
        let hash = Sha256Hasher::new(SALT).hash(&"1234".into()).unwrap();
        assert!(!hash.to_hex().contains(&hex::encode("1234")));
    }

    #[test]
    fn test_any_hasher_dispatch() {
        let sha = HasherKind::Sha256.build(SALT);
        let argon = HasherKind::Argon2.build(SALT);
        assert_eq!(sha.kind(), HasherKind::Sha256);
        assert_eq!(argon.kind(), HasherKind::Argon2);

        assert_eq!(
            sha.hash(&"048".into()).unwrap(),
            Sha256Hasher::new(SALT).hash(&"048".into()).unwrap()
        );
        assert_ne!(
            sha.hash(&"048".into()).unwrap(),
            argon.hash(&"048".into()).unwrap()
        );
    }

    #[test]
    fn test_generated_salts_differ() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
