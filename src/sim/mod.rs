//! Deterministic playback module
//!
//! Replays a scene snapshot as a mini-game. This module must stay pure:
//! - One key press per tick, no background loop
//! - Stable iteration order (scene order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod playback;
pub mod state;
pub mod tick;

pub use collision::{Contact, overlapping, resolve_contacts};
pub use playback::{PlayFrame, Playback, Sprite};
pub use state::{Direction, MovementBounds, PlayError, PlayEvent, PlayField, PlayPhase, PlayState};
pub use tick::{TickInput, tick};
