//! Screen renderers

pub mod authenticate;
pub mod pattern;
pub mod pin;
pub mod select_method;
pub mod unlocked;
