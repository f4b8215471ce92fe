//! Interaction state machine
//!
//! Turns [`EditorEvent`]s into scene, selection and viewport mutations.
//! Exactly one [`InteractionMode`] is active at a time. Pointer events from
//! a different device than the one that started the active mode are
//! ignored.

use std::ops::{BitOr, BitOrAssign};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::input::{EditorEvent, EditorKey, Modifiers, MouseButton, PointerSource};
use super::selection::Selection;
use crate::consts::*;
use crate::geometry::{Rect, Viewport, clamp_into, snap_point, snap_to_grid};
use crate::scene::{EntityId, EntityKind, Scene};
use crate::settings::{CanvasVariant, Settings};

/// One of the eight compass handles around the selected entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResizeHandle {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::NW,
        ResizeHandle::N,
        ResizeHandle::NE,
        ResizeHandle::E,
        ResizeHandle::SE,
        ResizeHandle::S,
        ResizeHandle::SW,
        ResizeHandle::W,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeHandle::N => "n",
            ResizeHandle::NE => "ne",
            ResizeHandle::E => "e",
            ResizeHandle::SE => "se",
            ResizeHandle::S => "s",
            ResizeHandle::SW => "sw",
            ResizeHandle::W => "w",
            ResizeHandle::NW => "nw",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        ResizeHandle::ALL
            .into_iter()
            .find(|h| h.as_str() == s.trim().to_lowercase())
    }

    /// CSS cursor shown over the handle
    pub fn cursor(&self) -> &'static str {
        match self {
            ResizeHandle::N | ResizeHandle::S => "ns-resize",
            ResizeHandle::E | ResizeHandle::W => "ew-resize",
            ResizeHandle::NW | ResizeHandle::SE => "nwse-resize",
            ResizeHandle::NE | ResizeHandle::SW => "nesw-resize",
        }
    }

    fn north(&self) -> bool {
        matches!(self, ResizeHandle::N | ResizeHandle::NE | ResizeHandle::NW)
    }

    fn south(&self) -> bool {
        matches!(self, ResizeHandle::S | ResizeHandle::SE | ResizeHandle::SW)
    }

    fn east(&self) -> bool {
        matches!(self, ResizeHandle::E | ResizeHandle::NE | ResizeHandle::SE)
    }

    fn west(&self) -> bool {
        matches!(self, ResizeHandle::W | ResizeHandle::NW | ResizeHandle::SW)
    }

    /// Handle position on `rect` (workspace units)
    pub fn anchor(&self, rect: &Rect) -> Vec2 {
        let x = if self.west() {
            rect.min.x
        } else if self.east() {
            rect.max().x
        } else {
            rect.center().x
        };
        let y = if self.north() {
            rect.min.y
        } else if self.south() {
            rect.max().y
        } else {
            rect.center().y
        };
        Vec2::new(x, y)
    }
}

/// New rectangle while dragging `handle` of a rect that started as
/// `initial`. The edge opposite the handle stays fixed; each side is
/// snapped when a grid is given and never drops below `MIN_ENTITY_SIZE`.
pub fn resize_rect(initial: Rect, handle: ResizeHandle, pointer: Vec2, grid: Option<f32>) -> Rect {
    let snap = |v: f32| grid.map_or(v, |pitch| snap_to_grid(v, pitch));
    let mut rect = initial;

    if handle.east() {
        rect.size.x = snap(pointer.x - initial.min.x).max(MIN_ENTITY_SIZE);
    }
    if handle.west() {
        let width = snap(initial.size.x + initial.min.x - pointer.x).max(MIN_ENTITY_SIZE);
        rect.min.x = initial.min.x + initial.size.x - width;
        rect.size.x = width;
    }
    if handle.south() {
        rect.size.y = snap(pointer.y - initial.min.y).max(MIN_ENTITY_SIZE);
    }
    if handle.north() {
        let height = snap(initial.size.y + initial.min.y - pointer.y).max(MIN_ENTITY_SIZE);
        rect.min.y = initial.min.y + initial.size.y - height;
        rect.size.y = height;
    }
    rect
}

/// Active interaction
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// Carrying a new entity from the palette
    DraggingFromPalette {
        kind: EntityKind,
        source: PointerSource,
        /// Last pointer position over the canvas, for the drop preview
        hover: Option<Vec2>,
    },
    MovingEntity {
        id: EntityId,
        /// Pointer minus entity top-left at grab time (workspace units)
        grab_offset: Vec2,
        source: PointerSource,
    },
    ResizingEntity {
        id: EntityId,
        handle: ResizeHandle,
        initial: Rect,
        source: PointerSource,
    },
    Panning {
        /// Pointer minus pan at grab time
        anchor: Vec2,
        source: PointerSource,
    },
}

impl InteractionMode {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionMode::Idle => "idle",
            InteractionMode::DraggingFromPalette { .. } => "dragging_from_palette",
            InteractionMode::MovingEntity { .. } => "moving_entity",
            InteractionMode::ResizingEntity { .. } => "resizing_entity",
            InteractionMode::Panning { .. } => "panning",
        }
    }

    pub fn source(&self) -> Option<PointerSource> {
        match self {
            InteractionMode::Idle => None,
            InteractionMode::DraggingFromPalette { source, .. }
            | InteractionMode::MovingEntity { source, .. }
            | InteractionMode::ResizingEntity { source, .. }
            | InteractionMode::Panning { source, .. } => Some(*source),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionMode::Idle)
    }

    /// CSS cursor for the canvas container
    pub fn cursor(&self) -> &'static str {
        match self {
            InteractionMode::Idle => "default",
            InteractionMode::DraggingFromPalette { .. } => "copy",
            InteractionMode::MovingEntity { .. } => "move",
            InteractionMode::ResizingEntity { handle, .. } => handle.cursor(),
            InteractionMode::Panning { .. } => "grabbing",
        }
    }
}

/// What a pointer-down landed on
#[derive(Debug, Clone, PartialEq)]
pub enum HitTarget {
    Handle(EntityId, ResizeHandle),
    Entity(EntityId),
    Empty,
}

/// What an event changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Changes {
    pub scene: bool,
    pub selection: bool,
    pub viewport: bool,
    pub mode: bool,
}

impl Changes {
    pub const NONE: Changes = Changes {
        scene: false,
        selection: false,
        viewport: false,
        mode: false,
    };

    pub fn scene() -> Self {
        Changes { scene: true, ..Self::NONE }
    }

    pub fn selection() -> Self {
        Changes { selection: true, ..Self::NONE }
    }

    pub fn viewport() -> Self {
        Changes { viewport: true, ..Self::NONE }
    }

    pub fn mode() -> Self {
        Changes { mode: true, ..Self::NONE }
    }

    pub fn any(&self) -> bool {
        self.scene || self.selection || self.viewport || self.mode
    }
}

impl BitOr for Changes {
    type Output = Changes;

    fn bitor(self, rhs: Changes) -> Changes {
        Changes {
            scene: self.scene || rhs.scene,
            selection: self.selection || rhs.selection,
            viewport: self.viewport || rhs.viewport,
            mode: self.mode || rhs.mode,
        }
    }
}

impl BitOrAssign for Changes {
    fn bitor_assign(&mut self, rhs: Changes) {
        *self = *self | rhs;
    }
}

/// Mutable editor state the controller operates on
pub struct Workbench<'a> {
    pub scene: &'a mut Scene,
    pub viewport: &'a mut Viewport,
    pub selection: &'a mut Selection,
}

/// Surface configuration derived from settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConfig {
    pub variant: CanvasVariant,
    /// Snap pitch, workspace variant only
    pub grid: Option<f32>,
    pub zoom_step: f32,
}

impl SurfaceConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            variant: settings.canvas,
            grid: settings.grid(),
            zoom_step: settings.zoom_step(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    mode: InteractionMode,
    config: SurfaceConfig,
    /// Container size in CSS pixels
    container: Vec2,
}

impl InteractionController {
    pub fn new(config: SurfaceConfig, container: Vec2) -> Self {
        Self {
            mode: InteractionMode::Idle,
            config,
            container,
        }
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn container(&self) -> Vec2 {
        self.container
    }

    pub fn set_container(&mut self, size: Vec2) {
        self.container = size.max(Vec2::ZERO);
    }

    /// Whether a container-relative point lies inside the container
    pub fn in_container(&self, pos: Vec2) -> bool {
        Rect::new(Vec2::ZERO, self.container).contains(pos)
    }

    /// Feed one event
    pub fn handle(&mut self, event: &EditorEvent, bench: &mut Workbench<'_>) -> Changes {
        if let Some(source) = event.source()
            && !matches!(event, EditorEvent::PalettePress { .. } | EditorEvent::PointerDown { .. })
            && let Some(active) = self.mode.source()
            && active != source
        {
            log::debug!("Ignoring {:?} event during {:?} interaction", source, active);
            return Changes::NONE;
        }

        match event {
            EditorEvent::PalettePress { kind, source } => self.palette_press(*kind, *source),
            EditorEvent::PointerDown {
                pos,
                source,
                button,
                modifiers,
            } => self.pointer_down(*pos, *source, *button, *modifiers, bench),
            EditorEvent::PointerMove { pos, .. } => self.pointer_move(*pos, bench),
            EditorEvent::PointerUp { pos, .. } => self.pointer_up(*pos, bench),
            EditorEvent::PointerLeave { .. } => self.pointer_leave(),
            EditorEvent::Wheel { delta_y, modifiers } => self.wheel(*delta_y, *modifiers, bench),
            EditorEvent::ZoomIn => self.zoom(self.config.zoom_step, bench),
            EditorEvent::ZoomOut => self.zoom(-self.config.zoom_step, bench),
            EditorEvent::DeleteSelected | EditorEvent::Key(EditorKey::Delete) => {
                self.delete_selected(bench)
            }
            EditorEvent::Key(EditorKey::Cancel) => self.set_mode(InteractionMode::Idle),
        }
    }

    /// Remove the selected entity, ending any interaction on it
    pub fn delete_selected(&mut self, bench: &mut Workbench<'_>) -> Changes {
        let Some(id) = bench.selection.get().cloned() else {
            return Changes::NONE;
        };
        let mut changes = Changes::NONE;
        if bench.scene.delete_entity(&id).is_some() {
            log::debug!("Deleted entity {}", id);
            changes |= Changes::scene();
        }
        if bench.selection.clear() {
            changes |= Changes::selection();
        }
        if matches!(
            &self.mode,
            InteractionMode::MovingEntity { id: active, .. }
            | InteractionMode::ResizingEntity { id: active, .. } if *active == id
        ) {
            changes |= self.set_mode(InteractionMode::Idle);
        }
        changes
    }

    /// Hit test a container-relative point: handles of the selected entity
    /// first, then entity bodies top-down
    pub fn hit_test(&self, pos: Vec2, bench: &Workbench<'_>) -> HitTarget {
        if let Some(selected) = bench.selection.get().and_then(|id| bench.scene.entity(id)) {
            let rect = selected.rect();
            for handle in ResizeHandle::ALL {
                let screen = bench.viewport.to_viewport(handle.anchor(&rect));
                if (screen - pos).abs().max_element() <= HANDLE_HIT_RADIUS {
                    return HitTarget::Handle(selected.id.clone(), handle);
                }
            }
        }
        let point = bench.viewport.to_workspace(pos);
        match bench.scene.entity_at(point) {
            Some(entity) => HitTarget::Entity(entity.id.clone()),
            None => HitTarget::Empty,
        }
    }

    /// Top-left for a new entity of `kind` dropped at `pos`, centered on
    /// the pointer
    pub fn drop_position(&self, kind: EntityKind, pos: Vec2, viewport: &Viewport) -> Vec2 {
        let size = kind.template().size();
        match self.config.variant {
            CanvasVariant::Fixed => clamp_into(pos - size / 2.0, size, self.container),
            CanvasVariant::Workspace => {
                let top_left = viewport.to_workspace(pos) - size / 2.0;
                match self.config.grid {
                    Some(pitch) => snap_point(top_left, pitch),
                    None => top_left,
                }
            }
        }
    }

    fn set_mode(&mut self, mode: InteractionMode) -> Changes {
        if self.mode == mode {
            return Changes::NONE;
        }
        log::debug!("Interaction {} -> {}", self.mode.name(), mode.name());
        self.mode = mode;
        Changes::mode()
    }

    fn palette_press(&mut self, kind: EntityKind, source: PointerSource) -> Changes {
        if !matches!(
            self.mode,
            InteractionMode::Idle | InteractionMode::DraggingFromPalette { .. }
        ) {
            log::debug!("Ignoring palette press during {}", self.mode.name());
            return Changes::NONE;
        }
        if let Some(active) = self.mode.source()
            && active != source
        {
            log::debug!("Ignoring {:?} palette press during a {:?} carry", source, active);
            return Changes::NONE;
        }
        self.set_mode(InteractionMode::DraggingFromPalette {
            kind,
            source,
            hover: None,
        })
    }

    fn pointer_down(
        &mut self,
        pos: Vec2,
        source: PointerSource,
        button: MouseButton,
        modifiers: Modifiers,
        bench: &mut Workbench<'_>,
    ) -> Changes {
        if !self.mode.is_idle() {
            log::debug!("Ignoring pointer down during {}", self.mode.name());
            return Changes::NONE;
        }

        let wants_pan = button == MouseButton::Middle
            || (button == MouseButton::Primary && modifiers.alt);

        match self.hit_test(pos, bench) {
            HitTarget::Handle(id, handle) if button == MouseButton::Primary => {
                let Some(initial) = bench.scene.entity(&id).map(|e| e.rect()) else {
                    return Changes::NONE;
                };
                self.set_mode(InteractionMode::ResizingEntity {
                    id,
                    handle,
                    initial,
                    source,
                })
            }
            HitTarget::Entity(id) if button == MouseButton::Primary => {
                let Some(entity) = bench.scene.entity(&id) else {
                    return Changes::NONE;
                };
                let grab_offset = bench.viewport.to_workspace(pos) - entity.position();
                let mut changes = Changes::NONE;
                if bench.selection.select(id.clone()) {
                    changes |= Changes::selection();
                }
                changes
                    | self.set_mode(InteractionMode::MovingEntity {
                        id,
                        grab_offset,
                        source,
                    })
            }
            HitTarget::Empty if wants_pan && self.config.variant.is_zoomable() => {
                self.set_mode(InteractionMode::Panning {
                    anchor: pos - bench.viewport.pan,
                    source,
                })
            }
            HitTarget::Empty if button == MouseButton::Primary => {
                if bench.selection.clear() {
                    Changes::selection()
                } else {
                    Changes::NONE
                }
            }
            _ => Changes::NONE,
        }
    }

    fn pointer_move(&mut self, pos: Vec2, bench: &mut Workbench<'_>) -> Changes {
        match &mut self.mode {
            InteractionMode::Idle => Changes::NONE,
            InteractionMode::DraggingFromPalette { hover, .. } => {
                let next = Some(pos).filter(|p| Rect::new(Vec2::ZERO, self.container).contains(*p));
                if *hover == next {
                    return Changes::NONE;
                }
                *hover = next;
                Changes::mode()
            }
            InteractionMode::MovingEntity { id, grab_offset, .. } => {
                let Some(size) = bench.scene.entity(id).map(|e| e.size()) else {
                    return Changes::NONE;
                };
                let target = bench.viewport.to_workspace(pos) - *grab_offset;
                let target = match self.config.variant {
                    CanvasVariant::Fixed => clamp_into(target, size, self.container),
                    CanvasVariant::Workspace => match self.config.grid {
                        Some(pitch) => snap_point(target, pitch),
                        None => target,
                    },
                };
                let before = bench.scene.entity(id).map(|e| e.position());
                if before == Some(target) {
                    return Changes::NONE;
                }
                bench.scene.move_entity(id, target.x, target.y);
                Changes::scene()
            }
            InteractionMode::ResizingEntity {
                id,
                handle,
                initial,
                ..
            } => {
                let point = bench.viewport.to_workspace(pos);
                let rect = resize_rect(*initial, *handle, point, self.config.grid);
                if bench.scene.entity(id).map(|e| e.rect()) == Some(rect) {
                    return Changes::NONE;
                }
                bench.scene.set_rect(id, rect);
                Changes::scene()
            }
            InteractionMode::Panning { anchor, .. } => {
                let pan = pos - *anchor;
                if bench.viewport.pan == pan {
                    return Changes::NONE;
                }
                bench.viewport.pan = pan;
                Changes::viewport()
            }
        }
    }

    fn pointer_up(&mut self, pos: Vec2, bench: &mut Workbench<'_>) -> Changes {
        let mut changes = Changes::NONE;
        if let InteractionMode::DraggingFromPalette { kind, .. } = self.mode {
            if self.in_container(pos) {
                let at = self.drop_position(kind, pos, bench.viewport);
                if let Some(id) = bench.scene.add_entity(kind, at.x, at.y) {
                    log::debug!("Placed {} {} at ({}, {})", kind.as_str(), id, at.x, at.y);
                    changes |= Changes::scene();
                }
            } else {
                log::debug!("Palette drop outside canvas cancelled");
            }
        }
        changes | self.set_mode(InteractionMode::Idle)
    }

    fn pointer_leave(&mut self) -> Changes {
        // A palette drag survives leaving; it only loses its preview
        if let InteractionMode::DraggingFromPalette { hover, .. } = &mut self.mode {
            return if hover.take().is_some() {
                Changes::mode()
            } else {
                Changes::NONE
            };
        }
        self.set_mode(InteractionMode::Idle)
    }

    fn wheel(&mut self, delta_y: f32, modifiers: Modifiers, bench: &mut Workbench<'_>) -> Changes {
        if !modifiers.zoom_modifier() || delta_y == 0.0 || delta_y.is_nan() {
            return Changes::NONE;
        }
        // Wheel down zooms out
        let step = if delta_y > 0.0 {
            -self.config.zoom_step
        } else {
            self.config.zoom_step
        };
        self.zoom(step, bench)
    }

    fn zoom(&mut self, delta: f32, bench: &mut Workbench<'_>) -> Changes {
        if !self.config.variant.is_zoomable() {
            return Changes::NONE;
        }
        if bench.viewport.zoom_by(delta) {
            Changes::viewport()
        } else {
            Changes::NONE
        }
    }
}
