//! Authentication method preferences and credential kinds

use serde::{Deserialize, Serialize};

/// Store key for pattern credential hashes
pub const PATTERN_HASH_KEY: &str = "pattern_hash";

/// Store key for PIN credential hashes
pub const PIN_CODE_HASH_KEY: &str = "pin_code_hash";

/// Which capture surface produces the credential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    /// Pattern drawn over the point grid
    Pattern,
    /// Four-digit PIN
    Pin,
}

impl CredentialKind {
    /// Fixed store key holding this kind's hash
    pub fn hash_key(&self) -> &'static str {
        match self {
            CredentialKind::Pattern => PATTERN_HASH_KEY,
            CredentialKind::Pin => PIN_CODE_HASH_KEY,
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            CredentialKind::Pattern => "pattern",
            CredentialKind::Pin => "PIN",
        }
    }
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Enabled local authentication methods
///
/// Fingerprint and face id are carried for the platform layer only; the
/// core never acts on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthMethods {
    #[serde(default)]
    pub pattern: bool,
    #[serde(default)]
    pub pin_code: bool,
    #[serde(default)]
    pub fingerprint: bool,
    #[serde(default)]
    pub face_id: bool,
}

impl Default for AuthMethods {
    fn default() -> Self {
        Self::pin_only()
    }
}

impl AuthMethods {
    /// No method enabled
    pub const fn none() -> Self {
        Self {
            pattern: false,
            pin_code: false,
            fingerprint: false,
            face_id: false,
        }
    }

    /// Only the PIN method enabled
    pub const fn pin_only() -> Self {
        Self {
            pin_code: true,
            ..Self::none()
        }
    }

    /// Only the pattern method enabled
    pub const fn pattern_only() -> Self {
        Self {
            pattern: true,
            ..Self::none()
        }
    }

    /// Credential kind used for this session
    ///
    /// Pattern wins when both are enabled.
    pub fn active_kind(&self) -> Option<CredentialKind> {
        if self.pattern {
            Some(CredentialKind::Pattern)
        } else if self.pin_code {
            Some(CredentialKind::Pin)
        } else {
            None
        }
    }

    /// Whether any biometric pass-through flag is set
    pub fn has_biometrics(&self) -> bool {
        self.fingerprint || self.face_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_keys_are_distinct() {
        assert_ne!(
            CredentialKind::Pattern.hash_key(),
            CredentialKind::Pin.hash_key()
        );
    }

    #[test]
    fn test_active_kind_prefers_pattern() {
        let both = AuthMethods {
            pattern: true,
            pin_code: true,
            ..AuthMethods::none()
        };
        assert_eq!(both.active_kind(), Some(CredentialKind::Pattern));
        assert_eq!(
            AuthMethods::pin_only().active_kind(),
            Some(CredentialKind::Pin)
        );
        assert_eq!(AuthMethods::none().active_kind(), None);
    }

    #[test]
    fn test_biometrics_do_not_select_a_kind() {
        let methods = AuthMethods {
            fingerprint: true,
            face_id: true,
            ..AuthMethods::none()
        };
        assert!(methods.has_biometrics());
        assert_eq!(methods.active_kind(), None);
    }

    #[test]
    fn test_serde_defaults_missing_flags() {
        let methods: AuthMethods = serde_json::from_str(r#"{"pattern":true}"#).unwrap();
        assert_eq!(methods, AuthMethods::pattern_only());
    }
}
