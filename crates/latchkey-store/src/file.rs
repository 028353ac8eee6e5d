//! JSON-file credential store
//!
//! The whole document is rewritten on every change: serialized to a temp
//! file next to the target, renamed over it, then restricted to the owner.
//! The in-memory copy is only updated once the write succeeded.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use latchkey_core::{CredentialCode, CredentialHash, CredentialHasher, CredentialStore, StoreError};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{Result, StorageError};
use crate::hasher::{generate_salt, AnyHasher, HasherKind, SALT_LEN};
use crate::CREDENTIAL_FORMAT_VERSION;

/// On-disk layout
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialDocument {
    version: u32,
    /// Hex salt used by the hasher that produced `hashes`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    salt: Option<String>,
    /// Hasher that produced `hashes`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hasher: Option<HasherKind>,
    #[serde(default)]
    hashes: BTreeMap<String, CredentialHash>,
}

impl Default for CredentialDocument {
    fn default() -> Self {
        Self {
            version: CREDENTIAL_FORMAT_VERSION,
            salt: None,
            hasher: None,
            hashes: BTreeMap::new(),
        }
    }
}

impl CredentialDocument {
    fn salt_bytes(&self) -> Result<Option<[u8; SALT_LEN]>> {
        let Some(salt) = &self.salt else {
            return Ok(None);
        };
        let bytes = hex::decode(salt)
            .map_err(|e| StorageError::Serialization(format!("Invalid salt: {}", e)))?;
        let salt: [u8; SALT_LEN] = bytes
            .try_into()
            .map_err(|_| StorageError::Serialization("Invalid salt length".to_string()))?;
        Ok(Some(salt))
    }
}

/// Credential store persisted to a single JSON file
pub struct FileCredentialStore<H> {
    path: PathBuf,
    hasher: H,
    document: Mutex<CredentialDocument>,
}

impl<H: CredentialHasher> FileCredentialStore<H> {
    /// Open the store at `path` with an explicit hasher
    ///
    /// A missing file is treated as an empty store; nothing is written until
    /// the first hash is saved.
    pub async fn open(path: impl Into<PathBuf>, hasher: H) -> Result<Self> {
        let path = path.into();
        let document = load_document(&path).await?;
        Ok(Self::from_parts(path, hasher, document))
    }

    fn from_parts(path: PathBuf, hasher: H, document: CredentialDocument) -> Self {
        tracing::debug!(
            path = %path.display(),
            stored = document.hashes.len(),
            "Credential store opened"
        );
        Self {
            path,
            hasher,
            document: Mutex::new(document),
        }
    }

    /// Location of the credential file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the hash stored under `key`; returns whether one existed
    pub async fn remove_hash(&self, key: &str) -> Result<bool> {
        let mut document = self.document.lock().await;
        if !document.hashes.contains_key(key) {
            return Ok(false);
        }

        let mut updated = document.clone();
        updated.hashes.remove(key);
        write_document(&self.path, &updated).await?;
        *document = updated;

        tracing::info!(key, "Credential hash removed");
        Ok(true)
    }

    /// Delete the credential file and forget every stored hash
    ///
    /// The salt is kept in memory so this instance keeps hashing the same
    /// way; it is written again with the next saved hash.
    pub async fn factory_reset(&self) -> Result<()> {
        let mut document = self.document.lock().await;
        remove_credentials(&self.path).await?;
        document.hashes.clear();

        tracing::warn!(path = %self.path.display(), "Credential store reset");
        Ok(())
    }

    /// Keys with a stored hash
    pub async fn keys(&self) -> Vec<String> {
        self.document.lock().await.hashes.keys().cloned().collect()
    }
}

impl FileCredentialStore<AnyHasher> {
    /// Open the store at `path`, building the hasher from the file's salt
    ///
    /// A new store gets a fresh salt and uses `kind`. An existing store keeps
    /// the hasher recorded in the file, since digests from a different
    /// backend could never verify.
    pub async fn open_with_kind(path: impl Into<PathBuf>, kind: HasherKind) -> Result<Self> {
        let path = path.into();
        let mut document = load_document(&path).await?;

        let salt = match document.salt_bytes()? {
            Some(salt) => salt,
            None => {
                let salt = generate_salt();
                document.salt = Some(hex::encode(salt));
                salt
            }
        };

        let kind = match document.hasher {
            Some(stored) if stored != kind => {
                tracing::warn!(
                    requested = ?kind,
                    stored = ?stored,
                    "Keeping hasher recorded in credential file"
                );
                stored
            }
            Some(stored) => stored,
            None => {
                document.hasher = Some(kind);
                kind
            }
        };

        Ok(Self::from_parts(path, kind.build(salt), document))
    }

    /// Hashing backend in use
    pub fn hasher_kind(&self) -> HasherKind {
        self.hasher.kind()
    }
}

#[async_trait]
impl<H: CredentialHasher> CredentialStore for FileCredentialStore<H> {
    async fn has_hash(&self, key: &str) -> std::result::Result<bool, StoreError> {
        Ok(self.document.lock().await.hashes.contains_key(key))
    }

    async fn save_hash(
        &self,
        key: &str,
        hash: &CredentialHash,
    ) -> std::result::Result<(), StoreError> {
        let mut document = self.document.lock().await;

        let mut updated = document.clone();
        updated.hashes.insert(key.to_string(), hash.clone());
        write_document(&self.path, &updated).await?;
        *document = updated;

        tracing::info!(key, path = %self.path.display(), "Credential hash saved");
        Ok(())
    }

    async fn check_hash(
        &self,
        key: &str,
        hash: &CredentialHash,
    ) -> std::result::Result<bool, StoreError> {
        Ok(self
            .document
            .lock()
            .await
            .hashes
            .get(key)
            .is_some_and(|stored| stored.ct_eq(hash)))
    }

    fn compute_hash(&self, code: &CredentialCode) -> std::result::Result<CredentialHash, StoreError> {
        self.hasher.hash(code)
    }
}

/// Delete a credential file without reading it
///
/// Works on files that no longer parse, which [`FileCredentialStore::open`]
/// would reject. Returns whether a file was removed.
pub async fn remove_credentials(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => {
            tracing::warn!(path = %path.display(), "Credential file removed");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

async fn load_document(path: &Path) -> Result<CredentialDocument> {
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(CredentialDocument::default());
        }
        Err(e) => return Err(e.into()),
    };

    let document: CredentialDocument = serde_json::from_str(&contents)?;
    if document.version != CREDENTIAL_FORMAT_VERSION {
        return Err(StorageError::UnsupportedVersion(document.version));
    }
    Ok(document)
}

async fn write_document(path: &Path, document: &CredentialDocument) -> Result<()> {
    let contents = serde_json::to_string_pretty(document)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("json.tmp");
    if let Err(e) = write_private(&temp_path, contents.as_bytes()).await {
        discard_temp(&temp_path).await;
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&temp_path, path).await {
        discard_temp(&temp_path).await;
        return Err(e.into());
    }

    Ok(())
}

/// Create `path` readable by the owner only and write `bytes` to it
///
/// A stale file at `path` is removed first so the mode always applies.
async fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

async fn discard_temp(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), "Failed to remove temporary credential file: {e}");
        }
    }
}
