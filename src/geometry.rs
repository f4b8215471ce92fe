//! Viewport transforms and rectangle math
//!
//! Pointer coordinates arrive relative to the canvas container ("viewport
//! space"). Entities live in workspace units. The two are related by a pan
//! offset and a zoom factor:
//!
//! ```text
//! workspace = (pointer - pan) / zoom
//! pointer   = workspace * zoom + pan
//! ```

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Pan/zoom state. Transient, never persisted with the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Offset of the workspace origin inside the container (pixels)
    pub pan: Vec2,
    /// Scale factor, always within `[MIN_ZOOM, MAX_ZOOM]`
    pub zoom: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(pan: Vec2, zoom: f32) -> Self {
        Self {
            pan,
            zoom: clamp_zoom(zoom),
        }
    }

    /// Viewport that centers a square workspace inside the container
    pub fn centered(container: Vec2, workspace_size: f32) -> Self {
        let zoom = 1.0;
        Self {
            pan: (container - Vec2::splat(workspace_size * zoom)) / 2.0,
            zoom,
        }
    }

    #[inline]
    pub fn to_workspace(&self, pointer: Vec2) -> Vec2 {
        to_workspace(pointer, self)
    }

    #[inline]
    pub fn to_viewport(&self, point: Vec2) -> Vec2 {
        to_viewport(point, self)
    }

    /// Adjust zoom by `delta`, clamped. Returns true if the zoom changed.
    pub fn zoom_by(&mut self, delta: f32) -> bool {
        self.set_zoom(self.zoom + delta)
    }

    /// Set zoom, clamped. Returns true if the zoom changed.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        let zoom = clamp_zoom(zoom);
        let changed = zoom != self.zoom;
        self.zoom = zoom;
        changed
    }

    /// Zoom as a rounded percentage for display
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }
}

/// Map container-relative pointer coordinates to workspace coordinates
#[inline]
pub fn to_workspace(pointer: Vec2, viewport: &Viewport) -> Vec2 {
    (pointer - viewport.pan) / viewport.zoom
}

/// Map workspace coordinates back to container-relative coordinates
#[inline]
pub fn to_viewport(point: Vec2, viewport: &Viewport) -> Vec2 {
    point * viewport.zoom + viewport.pan
}

/// Clamp a zoom factor to `[MIN_ZOOM, MAX_ZOOM]`.
///
/// The value is rounded to hundredths first so repeated `±ZOOM_STEP`
/// applications don't accumulate float drift. NaN resets to 1.0.
pub fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() {
        return 1.0;
    }
    ((zoom * 100.0).round() / 100.0).clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Snap a value to the nearest multiple of `pitch` (halves round up)
#[inline]
pub fn snap_to_grid(value: f32, pitch: f32) -> f32 {
    if pitch <= 0.0 {
        return value;
    }
    (value / pitch + 0.5).floor() * pitch
}

/// Snap both components of a point
#[inline]
pub fn snap_point(point: Vec2, pitch: f32) -> Vec2 {
    Vec2::new(snap_to_grid(point.x, pitch), snap_to_grid(point.y, pitch))
}

/// Axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Bottom-right corner
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Strict AABB overlap; rectangles that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.min.x + other.size.x
            && self.min.x + self.size.x > other.min.x
            && self.min.y < other.min.y + other.size.y
            && self.min.y + self.size.y > other.min.y
    }

    /// Point containment, inclusive on all edges
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            size: self.size,
        }
    }
}

/// Clamp a top-left position so a box of `size` stays inside `bounds`.
///
/// Ordered like `max(0, min(v, limit))` so an oversized box pins to the
/// origin instead of panicking on an inverted range.
pub fn clamp_into(position: Vec2, size: Vec2, bounds: Vec2) -> Vec2 {
    let limit = bounds - size;
    Vec2::new(
        position.x.min(limit.x).max(0.0),
        position.y.min(limit.y).max(0.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_to_workspace_applies_pan_then_zoom() {
        let viewport = Viewport::new(Vec2::new(100.0, 50.0), 2.0);
        let p = viewport.to_workspace(Vec2::new(300.0, 250.0));
        assert_eq!(p, Vec2::new(100.0, 100.0));
        assert_eq!(viewport.to_viewport(p), Vec2::new(300.0, 250.0));
    }

    #[test]
    fn test_centered_viewport() {
        let viewport = Viewport::centered(Vec2::new(1000.0, 800.0), WORKSPACE_SIZE);
        assert_eq!(viewport.pan, Vec2::new(-500.0, -600.0));
        assert_eq!(viewport.zoom, 1.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = Viewport::default();
        for _ in 0..50 {
            viewport.zoom_by(ZOOM_STEP);
        }
        assert_eq!(viewport.zoom, MAX_ZOOM);
        assert!(!viewport.zoom_by(ZOOM_STEP));

        for _ in 0..50 {
            viewport.zoom_by(-ZOOM_STEP);
        }
        assert_eq!(viewport.zoom, MIN_ZOOM);
        assert_eq!(viewport.zoom_percent(), 25);
    }

    #[test]
    fn test_zoom_steps_do_not_drift() {
        let mut viewport = Viewport::default();
        viewport.zoom_by(ZOOM_STEP);
        viewport.zoom_by(ZOOM_STEP);
        viewport.zoom_by(-ZOOM_STEP);
        viewport.zoom_by(-ZOOM_STEP);
        assert_eq!(viewport.zoom, 1.0);
        assert_eq!(clamp_zoom(f32::NAN), 1.0);
    }

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(19.0, 40.0), 0.0);
        assert_eq!(snap_to_grid(20.0, 40.0), 40.0);
        assert_eq!(snap_to_grid(-20.0, 40.0), 0.0);
        assert_eq!(snap_to_grid(-21.0, 40.0), -40.0);
        assert_eq!(snap_to_grid(13.0, 0.0), 13.0);
    }

    #[test]
    fn test_rect_overlap_excludes_touching_edges() {
        let a = Rect::from_xywh(0.0, 0.0, 40.0, 40.0);
        assert!(a.overlaps(&Rect::from_xywh(39.0, 39.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::from_xywh(40.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::from_xywh(0.0, 40.0, 10.0, 10.0)));
    }

    #[test]
    fn test_clamp_into_pins_oversized_box() {
        let bounds = Vec2::new(100.0, 100.0);
        assert_eq!(
            clamp_into(Vec2::new(90.0, -5.0), Vec2::new(20.0, 20.0), bounds),
            Vec2::new(80.0, 0.0)
        );
        assert_eq!(
            clamp_into(Vec2::new(50.0, 50.0), Vec2::new(200.0, 20.0), bounds),
            Vec2::new(0.0, 50.0)
        );
    }

    proptest! {
        #[test]
        fn prop_transform_round_trip(
            px in -2000.0f32..2000.0,
            py in -2000.0f32..2000.0,
            pan_x in -2000.0f32..2000.0,
            pan_y in -2000.0f32..2000.0,
            zoom in MIN_ZOOM..=MAX_ZOOM,
        ) {
            let viewport = Viewport { pan: Vec2::new(pan_x, pan_y), zoom };
            let pointer = Vec2::new(px, py);
            let back = viewport.to_viewport(viewport.to_workspace(pointer));
            prop_assert!((back - pointer).abs().max_element() < 1e-2);
        }

        #[test]
        fn prop_zoom_stays_in_bounds(steps in proptest::collection::vec(-3i32..=3, 0..200)) {
            let mut viewport = Viewport::default();
            for step in steps {
                viewport.zoom_by(step as f32 * ZOOM_STEP);
                prop_assert!(viewport.zoom >= MIN_ZOOM && viewport.zoom <= MAX_ZOOM);
            }
        }
    }
}
