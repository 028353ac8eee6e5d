//! Latchkey Store - Persistence for local authentication
//!
//! Implements the core's credential store and hasher traits:
//! - [`MemoryCredentialStore`] keeps hashes for the lifetime of the process
//! - [`FileCredentialStore`] persists hashes as JSON with restrictive permissions
//! - [`Sha256Hasher`] and [`Argon2Hasher`] digest codes with an installation salt
//!
//! Also persists the enabled authentication methods and the user configuration.

pub mod config;
pub mod error;
pub mod file;
pub mod hasher;
pub mod memory;
pub mod preferences;

pub use config::{ConfigError, LatchkeyConfig};
pub use error::{Result, StorageError};
pub use file::{remove_credentials, FileCredentialStore};
pub use hasher::{generate_salt, AnyHasher, Argon2Hasher, HasherKind, Sha256Hasher, SALT_LEN};
pub use memory::MemoryCredentialStore;
pub use preferences::PreferencesStore;

/// Version of the on-disk credential document
pub const CREDENTIAL_FORMAT_VERSION: u32 = 1;
