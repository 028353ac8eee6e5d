//! Completed credential codes
//!
//! A code is the string handed from a capture surface to the challenge:
//! concatenated grid indices for a pattern, the digits for a PIN.

use std::fmt;

use zeroize::Zeroizing;

/// A completed credential code, zeroized when dropped
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialCode(Zeroizing<String>);

impl CredentialCode {
    /// Wrap a code string
    pub fn new(code: impl Into<String>) -> Self {
        Self(Zeroizing::new(code.into()))
    }

    /// Encode a selection path as concatenated decimal indices
    pub fn from_indices(indices: &[usize]) -> Self {
        let mut code = String::with_capacity(indices.len());
        for index in indices {
            code.push_str(&index.to_string());
        }
        Self::new(code)
    }

    /// Borrow the raw code
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the code is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CredentialCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialCode(<{} chars>)", self.0.len())
    }
}

impl From<&str> for CredentialCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

impl From<String> for CredentialCode {
    fn from(code: String) -> Self {
        Self::new(code)
    }
}
