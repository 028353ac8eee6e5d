//! Latchkey Core - Pattern and PIN credential capture
//!
//! This crate holds the parts of local authentication that do not depend on
//! a screen or a disk:
//! - Turning touches over a grid of points into a pattern code
//! - Collecting PIN digits until a code is complete
//! - Deciding whether a code enrolls, confirms, or verifies a credential
//!
//! Persistence and hashing are injected through the traits in [`store`].

pub mod challenge;
pub mod code;
pub mod encoder;
pub mod error;
pub mod grid;
pub mod method;
pub mod pin;
pub mod session;
pub mod store;

#[cfg(test)]
mod test_support;

pub use challenge::{ChallengeState, CredentialChallenge, Outcome};
pub use code::CredentialCode;
pub use encoder::PatternEncoder;
pub use error::{ChallengeError, CoreError, Result, StoreError};
pub use grid::{Grid, GridLayout, GridPoint};
pub use method::{AuthMethods, CredentialKind, PATTERN_HASH_KEY, PIN_CODE_HASH_KEY};
pub use pin::{PinBuffer, PinPush};
pub use session::{AuthEvent, Capture, LocalAuthSession};
pub use store::{CredentialHash, CredentialHasher, CredentialStore};

/// Radius of a rendered grid point in layout units
pub const POINT_RADIUS: f32 = 8.0;

/// Touch target radius as a multiple of [`POINT_RADIUS`]
pub const HIT_RADIUS_FACTOR: f32 = 3.0;

/// Number of digits in a complete PIN
pub const PIN_LENGTH: usize = 4;

/// Default grid rows and columns
pub const DEFAULT_GRID_DIMENSION: u32 = 3;

/// Default canvas width and height in layout units
pub const DEFAULT_CANVAS_SIZE: u32 = 300;
