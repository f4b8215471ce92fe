//! Properties panel model
//!
//! Binds the selected entity's editable fields to form inputs. Every write
//! goes through the scene's clamped mutators. The color picker and the hex
//! text field both derive from the single stored color.

use serde::Serialize;

use super::selection::Selection;
use crate::scene::{EntityId, EntityKind, EntityPatch, Scene, normalize_hex};

/// What the panel displays for the selected entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertiesView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub kind_label: &'static str,
    pub name: String,
    /// Rounded for display
    pub x: i64,
    pub y: i64,
    pub width: f32,
    pub height: f32,
    pub color_picker: String,
    pub color_text: String,
}

/// Editable form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PropertyField {
    Name,
    X,
    Y,
    Width,
    Height,
    Color,
}

impl PropertyField {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyField::Name => "name",
            PropertyField::X => "x",
            PropertyField::Y => "y",
            PropertyField::Width => "width",
            PropertyField::Height => "height",
            PropertyField::Color => "color",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(PropertyField::Name),
            "x" => Some(PropertyField::X),
            "y" => Some(PropertyField::Y),
            "width" | "w" => Some(PropertyField::Width),
            "height" | "h" => Some(PropertyField::Height),
            "color" | "colour" => Some(PropertyField::Color),
            _ => None,
        }
    }
}

/// A single validated edit
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyEdit {
    Name(String),
    X(f32),
    Y(f32),
    Width(f32),
    Height(f32),
    /// Normalized `#rrggbb`
    Color(String),
}

impl PropertyEdit {
    /// Parse raw input text for `field`. Unparsable numbers and invalid hex
    /// give `None`.
    pub fn parse(field: PropertyField, text: &str) -> Option<Self> {
        let number = || text.trim().parse::<f32>().ok().filter(|v| v.is_finite());
        match field {
            PropertyField::Name => Some(PropertyEdit::Name(text.to_string())),
            PropertyField::X => number().map(PropertyEdit::X),
            PropertyField::Y => number().map(PropertyEdit::Y),
            PropertyField::Width => number().map(PropertyEdit::Width),
            PropertyField::Height => number().map(PropertyEdit::Height),
            PropertyField::Color => normalize_hex(text).map(PropertyEdit::Color),
        }
    }

    pub fn into_patch(self) -> EntityPatch {
        let mut patch = EntityPatch::default();
        match self {
            PropertyEdit::Name(name) => patch.name = Some(name),
            PropertyEdit::X(x) => patch.x = Some(x),
            PropertyEdit::Y(y) => patch.y = Some(y),
            PropertyEdit::Width(w) => patch.width = Some(w),
            PropertyEdit::Height(h) => patch.height = Some(h),
            PropertyEdit::Color(color) => patch.color = Some(color),
        }
        patch
    }
}

/// Panel contents; `None` when nothing is selected
pub fn view(scene: &Scene, selection: &Selection) -> Option<PropertiesView> {
    let entity = selection.get().and_then(|id| scene.entity(id))?;
    Some(PropertiesView {
        id: entity.id.clone(),
        kind: entity.kind,
        kind_label: entity.kind.label(),
        name: entity.name.clone(),
        x: entity.x.round() as i64,
        y: entity.y.round() as i64,
        width: entity.width,
        height: entity.height,
        color_picker: entity.color.clone(),
        color_text: entity.color.clone(),
    })
}

/// Apply an edit to the selected entity. Returns true if the entity changed.
pub fn apply(scene: &mut Scene, selection: &Selection, edit: PropertyEdit) -> bool {
    let Some(id) = selection.get() else {
        return false;
    };
    let Some(before) = scene.entity(id).cloned() else {
        return false;
    };
    scene.update_entity(id, &edit.into_patch());
    scene.entity(id) != Some(&before)
}
