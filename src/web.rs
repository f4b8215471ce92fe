//! JavaScript bindings
//!
//! JSON in, JSON out: the page owns the DOM and forwards events, then
//! redraws from the returned view/frame. During playback the page is
//! called back after each key press instead.

use wasm_bindgen::prelude::*;

use crate::editor::{Editor, EditorEvent, PropertyField};
use crate::persistence::GameDocument;
use crate::platform::{PlaySession, UpdateCallback, WindowKeyboard};
use crate::scene::{EntityId, RuleId, RuleKind, RulePatch};
use crate::settings::Settings;
use crate::sim::{PlayEvent, PlayFrame};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already initialized: {}", e).into());
    }
    log::info!("Playfield starting...");
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    Ok(serde_json::to_string(value)?)
}

#[wasm_bindgen]
pub struct WebEditor {
    editor: Editor,
    session: Option<PlaySession<WindowKeyboard>>,
}

#[wasm_bindgen]
impl WebEditor {
    /// Open a `GameData` document; unreadable input starts an empty scene
    #[wasm_bindgen(constructor)]
    pub fn new(document_json: &str) -> WebEditor {
        let settings = Settings::load();
        let scene = GameDocument::from_json_lossy(document_json)
            .into_scene(settings.legacy_kinds, random_seed());
        WebEditor {
            editor: Editor::new(scene, &settings),
            session: None,
        }
    }

    /// Feed an `EditorEvent` as JSON; returns the change report
    pub fn handle(&mut self, event_json: &str) -> Result<String, JsError> {
        let event: EditorEvent = serde_json::from_str(event_json)?;
        to_js(&self.editor.handle(event))
    }

    /// Keyboard shortcut while editing; unknown keys change nothing
    pub fn key(&mut self, name: &str) -> Result<String, JsError> {
        let changes = match EditorEvent::key(name) {
            Some(event) => self.editor.handle(event),
            None => Default::default(),
        };
        to_js(&changes)
    }

    pub fn set_container_size(&mut self, width: f32, height: f32) {
        self.editor.set_container_size(width, height);
    }

    pub fn center_viewport(&mut self) -> Result<String, JsError> {
        to_js(&self.editor.center_viewport())
    }

    pub fn select(&mut self, id: Option<String>) -> Result<String, JsError> {
        to_js(&self.editor.select(id.map(EntityId::new)))
    }

    pub fn view(&self) -> Result<String, JsError> {
        to_js(&self.editor.view())
    }

    pub fn properties(&self) -> Result<String, JsError> {
        to_js(&self.editor.properties())
    }

    pub fn edit_property(&mut self, field: &str, text: &str) -> Result<String, JsError> {
        let field = PropertyField::from_str(field)
            .ok_or_else(|| JsError::new(&format!("unknown property {}", field)))?;
        to_js(&self.editor.edit_property_text(field, text))
    }

    pub fn delete_selected(&mut self) -> Result<String, JsError> {
        to_js(&self.editor.delete_selected())
    }

    pub fn add_rule(&mut self, kind: &str) -> Result<String, JsError> {
        let kind = RuleKind::from_str(kind)
            .ok_or_else(|| JsError::new(&format!("unknown rule type {}", kind)))?;
        Ok(self.editor.add_rule(kind).to_string())
    }

    /// `target`: entity id or empty to clear; `value`: score for `add_score`
    pub fn update_rule(
        &mut self,
        id: &str,
        target: Option<String>,
        value: Option<f64>,
    ) -> Result<String, JsError> {
        let patch = RulePatch {
            target: target.map(|t| Some(t).filter(|t| !t.is_empty()).map(EntityId::new)),
            value: value.filter(|v| v.is_finite()).map(|v| v.round() as i64),
        };
        to_js(&self.editor.update_rule(&RuleId::new(id), &patch))
    }

    pub fn remove_rule(&mut self, id: &str) -> Result<String, JsError> {
        to_js(&self.editor.remove_rule(&RuleId::new(id)))
    }

    pub fn rule_targets(&self) -> Result<String, JsError> {
        to_js(&self.editor.rule_targets())
    }

    pub fn rules(&self) -> Result<String, JsError> {
        to_js(&self.editor.scene().rules())
    }

    pub fn set_background_color(&mut self, color: &str) -> Result<String, JsError> {
        to_js(&self.editor.set_background_color(color))
    }

    /// Current scene as a `GameData` document
    pub fn document(&self) -> Result<String, JsError> {
        Ok(self.editor.to_json()?)
    }

    /// Open another `GameData` document in place of the current scene
    pub fn load(&mut self, document_json: &str) -> Result<String, JsError> {
        let scene = GameDocument::from_json_lossy(document_json)
            .into_scene(self.editor.settings().legacy_kinds, random_seed());
        to_js(&self.editor.replace_scene(scene))
    }

    pub fn settings(&self) -> Result<String, JsError> {
        to_js(self.editor.settings())
    }

    /// Apply and persist settings; returns the change report
    pub fn set_settings(&mut self, settings_json: &str) -> Result<String, JsError> {
        let settings = Settings::from_json(settings_json)?;
        settings.save();
        to_js(&self.editor.apply_settings(settings))
    }

    // === Playback ===

    /// Snapshot the scene and start listening for keys. `on_update` is
    /// called as `on_update(eventsJson, frameJson)` after every key press
    /// that changed something.
    pub fn play(&mut self, on_update: js_sys::Function) -> Result<(), JsError> {
        self.session = None;
        let playback = self.editor.play()?;
        let notify: UpdateCallback = Box::new(move |events: &[PlayEvent], frame: &PlayFrame| {
            let (Ok(events), Ok(frame)) = (serde_json::to_string(events), serde_json::to_string(frame)) else {
                log::warn!("Cannot serialize playback update");
                return;
            };
            if let Err(e) = on_update.call2(&JsValue::NULL, &events.into(), &frame.into()) {
                log::warn!("Playback update callback failed: {:?}", e);
            }
        });
        self.session = Some(PlaySession::open(WindowKeyboard::new()?, playback, notify)?);
        Ok(())
    }

    pub fn play_frame(&self) -> Result<String, JsError> {
        match &self.session {
            Some(session) => to_js(&session.frame()),
            None => Ok("null".to_string()),
        }
    }

    pub fn play_reset(&mut self) -> Result<String, JsError> {
        match &mut self.session {
            Some(session) => to_js(&session.reset()),
            None => Ok("[]".to_string()),
        }
    }

    /// Close playback; the keyboard listener is removed
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
        }
    }
}
