//! Editor input events
//!
//! Hosts translate DOM mouse/touch/wheel/keyboard events into
//! [`EditorEvent`]s. Pointer positions are relative to the canvas
//! container's top-left corner, in CSS pixels.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::scene::EntityKind;

/// Device that produced a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PointerSource {
    #[default]
    Mouse,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MouseButton {
    /// Left button, or any touch
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl MouseButton {
    /// Map `MouseEvent.button`
    pub fn from_index(button: i16) -> Option<Self> {
        match button {
            0 => Some(MouseButton::Primary),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Secondary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        alt: false,
        ctrl: false,
        meta: false,
        shift: false,
    };

    /// Ctrl on most platforms, Cmd on macOS
    #[inline]
    pub fn zoom_modifier(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorKey {
    /// Delete or Backspace
    Delete,
    /// Escape
    Cancel,
}

impl EditorKey {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_name(key: &str) -> Option<Self> {
        match key {
            "Delete" | "Backspace" => Some(EditorKey::Delete),
            "Escape" | "Esc" => Some(EditorKey::Cancel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditorEvent {
    /// Palette item grabbed (dragstart / touchstart on the palette)
    PalettePress { kind: EntityKind, source: PointerSource },
    PointerDown {
        pos: Vec2,
        source: PointerSource,
        button: MouseButton,
        modifiers: Modifiers,
    },
    PointerMove { pos: Vec2, source: PointerSource },
    /// Release; a palette drop happens here
    PointerUp { pos: Vec2, source: PointerSource },
    /// Pointer left the canvas container
    PointerLeave { source: PointerSource },
    Wheel { delta_y: f32, modifiers: Modifiers },
    ZoomIn,
    ZoomOut,
    /// Toolbar/trash affordance on the selected entity
    DeleteSelected,
    Key(EditorKey),
}

impl EditorEvent {
    pub fn mouse_down(pos: Vec2) -> Self {
        EditorEvent::PointerDown {
            pos,
            source: PointerSource::Mouse,
            button: MouseButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn touch_start(pos: Vec2) -> Self {
        EditorEvent::PointerDown {
            pos,
            source: PointerSource::Touch,
            button: MouseButton::Primary,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn mouse_move(pos: Vec2) -> Self {
        EditorEvent::PointerMove {
            pos,
            source: PointerSource::Mouse,
        }
    }

    pub fn touch_move(pos: Vec2) -> Self {
        EditorEvent::PointerMove {
            pos,
            source: PointerSource::Touch,
        }
    }

    pub fn mouse_up(pos: Vec2) -> Self {
        EditorEvent::PointerUp {
            pos,
            source: PointerSource::Mouse,
        }
    }

    pub fn touch_end(pos: Vec2) -> Self {
        EditorEvent::PointerUp {
            pos,
            source: PointerSource::Touch,
        }
    }

    /// Keyboard event, if the key means anything to the editor
    pub fn key(name: &str) -> Option<Self> {
        EditorKey::from_name(name).map(EditorEvent::Key)
    }

    /// Source of a pointer event
    pub fn source(&self) -> Option<PointerSource> {
        match self {
            EditorEvent::PalettePress { source, .. }
            | EditorEvent::PointerDown { source, .. }
            | EditorEvent::PointerMove { source, .. }
            | EditorEvent::PointerUp { source, .. }
            | EditorEvent::PointerLeave { source } => Some(*source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(EditorEvent::key("Backspace"), Some(EditorEvent::Key(EditorKey::Delete)));
        assert_eq!(EditorEvent::key("Delete"), Some(EditorEvent::Key(EditorKey::Delete)));
        assert_eq!(EditorEvent::key("Escape"), Some(EditorEvent::Key(EditorKey::Cancel)));
        assert_eq!(EditorEvent::key("x"), None);
    }

    #[test]
    fn test_zoom_modifier() {
        assert!(!Modifiers::NONE.zoom_modifier());
        assert!(Modifiers { meta: true, ..Modifiers::NONE }.zoom_modifier());
        assert!(Modifiers { ctrl: true, ..Modifiers::NONE }.zoom_modifier());
    }

    #[test]
    fn test_event_json_shape() {
        let event: EditorEvent =
            serde_json::from_str(r#"{"PointerMove":{"pos":[12.0,30.5],"source":"Touch"}}"#).unwrap();
        assert_eq!(event, EditorEvent::touch_move(Vec2::new(12.0, 30.5)));
        assert_eq!(event.source(), Some(PointerSource::Touch));
        assert_eq!(EditorEvent::ZoomIn.source(), None);
    }
}
