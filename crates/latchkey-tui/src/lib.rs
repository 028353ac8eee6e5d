//! Latchkey TUI Library
//!
//! Terminal front end for the Latchkey local authentication core: method
//! selection, a mouse-driven pattern canvas and a keyboard PIN pad.

pub mod app;
pub mod ui;

pub use app::App;
