//! Playfield - scene editor and playback engine for a kid-friendly game builder
//!
//! Core modules:
//! - `geometry`: Viewport transforms, rectangles, grid snapping
//! - `scene`: Entities, rules and the scene aggregate
//! - `persistence`: `GameData` document versions and migration
//! - `editor`: Interaction state machine and properties editor
//! - `sim`: Discrete-step playback (collision, score, win/lose)
//! - `platform`: Keyboard listener lifecycle, browser bindings
//! - `settings`: Editor and playback preferences

pub mod editor;
pub mod geometry;
pub mod persistence;
pub mod platform;
pub mod scene;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use editor::{Changes, Editor, EditorEvent};
pub use geometry::{Rect, Viewport};
pub use persistence::{DocumentError, GameDocument, LegacyKinds};
pub use scene::{Entity, EntityId, EntityKind, Rule, RuleId, RuleKind, Scene};
pub use settings::{CanvasVariant, Settings};
pub use sim::{Direction, MovementBounds, PlayError, PlayEvent, PlayPhase, Playback};

/// Editor and playback constants
pub mod consts {
    /// Grid pitch of the zoomable workspace (workspace units)
    pub const GRID_SIZE: f32 = 40.0;
    /// Side length of the square workspace
    pub const WORKSPACE_SIZE: f32 = 2000.0;
    /// Minimum entity width and height
    pub const MIN_ENTITY_SIZE: f32 = 20.0;

    /// Zoom bounds and the step applied by wheel/toolbar zoom
    pub const MIN_ZOOM: f32 = 0.25;
    pub const MAX_ZOOM: f32 = 2.0;
    pub const ZOOM_STEP: f32 = 0.1;
    /// Zoom is kept in hundredths, so smaller steps would never move it
    pub const MIN_ZOOM_STEP: f32 = 0.01;

    /// Half-extent of a resize handle hit box, in screen pixels
    pub const HANDLE_HIT_RADIUS: f32 = 6.0;

    /// Fixed canvas defaults (16:10)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 500.0;

    /// Player displacement per key press
    pub const STEP_DISTANCE: f32 = 10.0;
    /// Score awarded per collected coin
    pub const COIN_SCORE: u32 = 10;
    /// Clamped play-field extent used by the preview dialog
    pub const PLAY_FIELD_WIDTH: f32 = 500.0;
    pub const PLAY_FIELD_HEIGHT: f32 = 300.0;

    /// Default `add_score` value and its accepted range
    pub const DEFAULT_RULE_SCORE: u32 = 10;
    pub const MIN_RULE_SCORE: u32 = 1;
    pub const MAX_RULE_SCORE: u32 = 1000;

    pub const DEFAULT_BACKGROUND: &str = "#1e293b";
}
