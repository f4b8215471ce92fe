//! Scene editor
//!
//! [`Editor`] owns the scene, viewport, selection and interaction
//! controller. Hosts feed it [`EditorEvent`]s and redraw from
//! [`Editor::view`] when the returned [`Changes`] say so.

pub mod input;
pub mod interaction;
pub mod properties;
pub mod selection;
pub mod view;

pub use input::{EditorEvent, EditorKey, Modifiers, MouseButton, PointerSource};
pub use interaction::{
    Changes, HitTarget, InteractionController, InteractionMode, ResizeHandle, SurfaceConfig,
    Workbench, resize_rect,
};
pub use properties::{PropertiesView, PropertyEdit, PropertyField};
pub use selection::Selection;
pub use view::{DropPreview, EditorView, HandleView, ItemView};

use glam::Vec2;

use crate::consts::WORKSPACE_SIZE;
use crate::geometry::Viewport;
use crate::persistence::DocumentError;
use crate::scene::{EntityId, RuleId, RuleKind, RulePatch, Scene};
use crate::settings::Settings;
use crate::sim::{PlayError, Playback};

#[derive(Debug, Clone)]
pub struct Editor {
    scene: Scene,
    viewport: Viewport,
    selection: Selection,
    controller: InteractionController,
    settings: Settings,
}

impl Editor {
    /// Editor over `scene`, sized from the settings' canvas dimensions until
    /// the host reports the real container size
    pub fn new(scene: Scene, settings: &Settings) -> Self {
        let container = Vec2::new(settings.canvas_width, settings.canvas_height);
        let viewport = if settings.canvas.is_zoomable() {
            Viewport::centered(container, WORKSPACE_SIZE)
        } else {
            Viewport::default()
        };
        Self {
            scene,
            viewport,
            selection: Selection::default(),
            controller: InteractionController::new(SurfaceConfig::from_settings(settings), container),
            settings: settings.clone(),
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> Option<&EntityId> {
        self.selection.get()
    }

    pub fn mode(&self) -> &InteractionMode {
        self.controller.mode()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap in new settings. The active interaction is dropped and the
    /// viewport reset when the canvas variant changes.
    pub fn apply_settings(&mut self, settings: Settings) -> Changes {
        if settings == self.settings {
            return Changes::NONE;
        }
        let container = self.controller.container();
        let mut changes = self.end_interaction();
        if settings.canvas != self.settings.canvas {
            self.viewport = if settings.canvas.is_zoomable() {
                Viewport::centered(container, WORKSPACE_SIZE)
            } else {
                Viewport::default()
            };
            changes |= Changes::viewport();
        }
        self.controller = InteractionController::new(SurfaceConfig::from_settings(&settings), container);
        log::info!("Settings applied ({} canvas)", settings.canvas.as_str());
        self.settings = settings;
        changes
    }

    /// Replace the whole scene (opening another document). A selection
    /// that no longer exists is dropped and any interaction ends.
    pub fn replace_scene(&mut self, scene: Scene) -> Changes {
        self.scene = scene;
        let mut changes = Changes::scene() | self.end_interaction();
        if self.selection.prune(&self.scene) {
            changes |= Changes::selection();
        }
        self.controller = InteractionController::new(
            SurfaceConfig::from_settings(&self.settings),
            self.controller.container(),
        );
        changes
    }

    fn end_interaction(&self) -> Changes {
        if self.controller.mode().is_idle() {
            Changes::NONE
        } else {
            Changes::mode()
        }
    }

    /// Feed one input event
    pub fn handle(&mut self, event: EditorEvent) -> Changes {
        let mut bench = Workbench {
            scene: &mut self.scene,
            viewport: &mut self.viewport,
            selection: &mut self.selection,
        };
        self.controller.handle(&event, &mut bench)
    }

    /// Container resized. Positions are not re-clamped.
    pub fn set_container_size(&mut self, width: f32, height: f32) {
        self.controller.set_container(Vec2::new(width, height));
    }

    /// Re-center the workspace inside the container at the current zoom
    pub fn center_viewport(&mut self) -> Changes {
        if !self.settings.canvas.is_zoomable() {
            return Changes::NONE;
        }
        let container = self.controller.container();
        let pan = (container - Vec2::splat(WORKSPACE_SIZE * self.viewport.zoom)) / 2.0;
        if pan == self.viewport.pan {
            return Changes::NONE;
        }
        self.viewport.pan = pan;
        Changes::viewport()
    }

    /// Select an entity, or clear the selection with `None`
    pub fn select(&mut self, id: Option<EntityId>) -> Changes {
        let changed = match id {
            Some(id) if self.scene.contains(&id) => self.selection.select(id),
            Some(id) => {
                log::debug!("Cannot select unknown entity {}", id);
                false
            }
            None => self.selection.clear(),
        };
        if changed {
            Changes::selection()
        } else {
            Changes::NONE
        }
    }

    pub fn delete_selected(&mut self) -> Changes {
        let mut bench = Workbench {
            scene: &mut self.scene,
            viewport: &mut self.viewport,
            selection: &mut self.selection,
        };
        self.controller.delete_selected(&mut bench)
    }

    // === Properties ===

    pub fn properties(&self) -> Option<PropertiesView> {
        properties::view(&self.scene, &self.selection)
    }

    pub fn edit_property(&mut self, edit: PropertyEdit) -> Changes {
        if properties::apply(&mut self.scene, &self.selection, edit) {
            Changes::scene()
        } else {
            Changes::NONE
        }
    }

    /// Apply raw form text; unparsable input is ignored
    pub fn edit_property_text(&mut self, field: PropertyField, text: &str) -> Changes {
        match PropertyEdit::parse(field, text) {
            Some(edit) => self.edit_property(edit),
            None => {
                log::debug!("Ignoring invalid {} input {:?}", field.as_str(), text);
                Changes::NONE
            }
        }
    }

    // === Rules and scene settings ===

    pub fn add_rule(&mut self, kind: RuleKind) -> RuleId {
        self.scene.add_rule(kind)
    }

    pub fn update_rule(&mut self, id: &RuleId, patch: &RulePatch) -> Changes {
        if self.scene.update_rule(id, patch) {
            Changes::scene()
        } else {
            Changes::NONE
        }
    }

    pub fn remove_rule(&mut self, id: &RuleId) -> Changes {
        if self.scene.remove_rule(id) {
            Changes::scene()
        } else {
            Changes::NONE
        }
    }

    /// Options for a rule's target picker: `(id, "{type} #{short id}")`
    pub fn rule_targets(&self) -> Vec<(EntityId, String)> {
        self.scene
            .selectable_targets()
            .map(|e| (e.id.clone(), format!("{} #{}", e.kind.as_str(), e.id.short())))
            .collect()
    }

    pub fn set_background_color(&mut self, color: &str) -> Changes {
        if self.scene.set_background_color(color) {
            Changes::scene()
        } else {
            Changes::NONE
        }
    }

    // === Output ===

    pub fn view(&self) -> EditorView {
        view::build(&self.scene, &self.viewport, &self.selection, &self.controller)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        self.scene.to_json()
    }

    /// Start playback on a snapshot of the current scene
    pub fn play(&self) -> Result<Playback, PlayError> {
        let playback = Playback::start(&self.scene, self.settings.movement);
        if let Err(e) = &playback {
            log::warn!("Cannot start playback: {}", e);
        }
        playback
    }
}
