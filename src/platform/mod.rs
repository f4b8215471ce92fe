//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Keyboard listener lifecycle during playback
//! - Storage (LocalStorage on web, see `Settings::load`)

pub mod keyboard;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use keyboard::{KeyHandler, KeyboardHost, PlatformError, PlaySession, UpdateCallback};
#[cfg(target_arch = "wasm32")]
pub use web::WindowKeyboard;
