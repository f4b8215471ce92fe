//! Editor and playback settings
//!
//! Persisted separately from game documents in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::LegacyKinds;
use crate::sim::MovementBounds;

/// Which editing surface is in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CanvasVariant {
    /// Container-sized canvas: positions clamped inside, no pan/zoom/grid
    Fixed,
    /// Zoomable, pannable 2000x2000 workspace with a grid
    #[default]
    Workspace,
}

impl CanvasVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanvasVariant::Fixed => "Fixed",
            CanvasVariant::Workspace => "Workspace",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fixed" | "canvas" => Some(CanvasVariant::Fixed),
            "workspace" => Some(CanvasVariant::Workspace),
            _ => None,
        }
    }

    /// Whether pan and zoom apply
    pub fn is_zoomable(&self) -> bool {
        matches!(self, CanvasVariant::Workspace)
    }
}

/// Editor settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Editing surface
    pub canvas: CanvasVariant,

    // === Fixed canvas ===
    /// Initial container size when the host hasn't reported one
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Workspace ===
    /// Snap moves, drops and resizes to the grid
    pub snap_to_grid: bool,
    /// Grid pitch (workspace units)
    pub grid_size: f32,
    /// Zoom change per wheel notch or toolbar click
    pub zoom_step: f32,

    // === Playback ===
    pub movement: MovementBounds,

    // === Documents ===
    /// How legacy `elements` types are migrated
    pub legacy_kinds: LegacyKinds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas: CanvasVariant::Workspace,

            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            snap_to_grid: true,
            grid_size: GRID_SIZE,
            zoom_step: ZOOM_STEP,

            movement: MovementBounds::Unbounded,

            legacy_kinds: LegacyKinds::Generic,
        }
    }
}

impl Settings {
    /// Settings for a canvas variant (applies variant defaults)
    pub fn for_canvas(canvas: CanvasVariant) -> Self {
        Self {
            canvas,
            ..Self::default()
        }
    }

    /// Effective grid pitch: only the workspace snaps, and only when enabled
    pub fn grid(&self) -> Option<f32> {
        (self.canvas.is_zoomable() && self.snap_to_grid && self.grid_size > 0.0)
            .then_some(self.grid_size)
    }

    /// Zoom step limited to `[MIN_ZOOM_STEP, MAX_ZOOM - MIN_ZOOM]`
    pub fn zoom_step(&self) -> f32 {
        if !self.zoom_step.is_finite() {
            return ZOOM_STEP;
        }
        self.zoom_step.clamp(MIN_ZOOM_STEP, MAX_ZOOM - MIN_ZOOM)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "playfield_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY)
            && let Ok(settings) = Self::from_json(&json)
        {
            log::info!("Loaded settings from LocalStorage");
            return settings;
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage
            && let Ok(json) = self.to_json()
        {
            let _ = storage.set_item(Self::STORAGE_KEY, &json);
            log::info!("Settings saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
