//! Persisted authentication method preferences

use std::path::{Path, PathBuf};

use latchkey_core::AuthMethods;
use tokio::fs;

use crate::error::Result;

/// Stores the enabled [`AuthMethods`] as a small JSON file
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved methods, or PIN-only when nothing was saved yet
    pub async fn get(&self) -> Result<AuthMethods> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AuthMethods::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist `methods`
    pub async fn set(&self, methods: &AuthMethods) -> Result<()> {
        let contents = serde_json::to_string_pretty(methods)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, contents).await?;
        fs::rename(&temp_path, &self.path).await?;

        tracing::debug!(?methods, "Saved authentication preferences");
        Ok(())
    }

    /// Forget saved methods; the next `get` returns the default
    pub async fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
