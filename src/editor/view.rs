//! Editor render model
//!
//! A flat description of what the canvas should show. Hosts draw it however
//! they like; positions are in workspace units and the viewport transform is
//! included for the host to apply.

use glam::Vec2;
use serde::Serialize;

use super::interaction::{InteractionController, InteractionMode, ResizeHandle};
use super::selection::Selection;
use crate::consts::WORKSPACE_SIZE;
use crate::geometry::{Rect, Viewport};
use crate::scene::{EntityId, EntityKind, Scene};
use crate::settings::CanvasVariant;

/// Hint shown on an empty canvas
pub const EMPTY_HINT: &str = "Drag objects here to build your game";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub icon: &'static str,
    pub rect: Rect,
    pub color: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandleView {
    pub handle: ResizeHandle,
    pub center: Vec2,
    pub cursor: &'static str,
}

/// Ghost of the entity a palette drop would place
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DropPreview {
    pub kind: EntityKind,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorView {
    pub variant: CanvasVariant,
    pub background_color: String,
    pub viewport: Viewport,
    pub zoom_percent: u32,
    /// Grid pitch to draw, if any
    pub grid: Option<f32>,
    /// Side of the square workspace, workspace variant only
    pub workspace_size: Option<f32>,
    /// Entities in z-order
    pub items: Vec<ItemView>,
    /// Handles of the selected entity
    pub handles: Vec<HandleView>,
    pub drop_preview: Option<DropPreview>,
    pub mode: &'static str,
    pub cursor: &'static str,
    pub empty_hint: Option<&'static str>,
}

pub fn build(
    scene: &Scene,
    viewport: &Viewport,
    selection: &Selection,
    controller: &InteractionController,
) -> EditorView {
    let items = scene
        .entities()
        .iter()
        .map(|e| ItemView {
            id: e.id.clone(),
            kind: e.kind,
            name: e.name.clone(),
            icon: e.kind.icon(),
            rect: e.rect(),
            color: e.color.clone(),
            selected: selection.is_selected(&e.id),
        })
        .collect();

    let handles = selection
        .get()
        .and_then(|id| scene.entity(id))
        .map(|e| {
            let rect = e.rect();
            ResizeHandle::ALL
                .into_iter()
                .map(|handle| HandleView {
                    handle,
                    center: handle.anchor(&rect),
                    cursor: handle.cursor(),
                })
                .collect()
        })
        .unwrap_or_default();

    let drop_preview = match controller.mode() {
        InteractionMode::DraggingFromPalette {
            kind,
            hover: Some(pos),
            ..
        } => {
            let top_left = controller.drop_position(*kind, *pos, viewport);
            Some(DropPreview {
                kind: *kind,
                rect: Rect::new(top_left, kind.template().size()),
            })
        }
        _ => None,
    };

    let config = controller.config();
    EditorView {
        variant: config.variant,
        background_color: scene.background_color().to_string(),
        viewport: *viewport,
        zoom_percent: viewport.zoom_percent(),
        grid: config.grid,
        workspace_size: config.variant.is_zoomable().then_some(WORKSPACE_SIZE),
        items,
        handles,
        drop_preview,
        mode: controller.mode().name(),
        cursor: controller.mode().cursor(),
        empty_hint: scene.is_empty().then_some(EMPTY_HINT),
    }
}
