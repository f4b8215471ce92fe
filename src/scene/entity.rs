//! Entities and the per-type template table

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ids::EntityId;
use crate::geometry::Rect;

/// Semantic entity type (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    #[default]
    Block,
    Coin,
    Enemy,
    Goal,
    Platform,
    Spike,
}

/// Type assigned to legacy elements during migration
pub const GENERIC_KIND: EntityKind = EntityKind::Block;

/// Default size and color applied when an entity is placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Template {
    pub width: f32,
    pub height: f32,
    pub color: &'static str,
}

impl Template {
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl EntityKind {
    /// Palette order
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Player,
        EntityKind::Block,
        EntityKind::Coin,
        EntityKind::Enemy,
        EntityKind::Goal,
        EntityKind::Platform,
        EntityKind::Spike,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Block => "block",
            EntityKind::Coin => "coin",
            EntityKind::Enemy => "enemy",
            EntityKind::Goal => "goal",
            EntityKind::Platform => "platform",
            EntityKind::Spike => "spike",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "player" => Some(EntityKind::Player),
            "block" => Some(EntityKind::Block),
            "coin" => Some(EntityKind::Coin),
            "enemy" => Some(EntityKind::Enemy),
            "goal" => Some(EntityKind::Goal),
            "platform" => Some(EntityKind::Platform),
            "spike" => Some(EntityKind::Spike),
            _ => None,
        }
    }

    /// Human label, also the stem of generated names
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Player => "Player",
            EntityKind::Block => "Block",
            EntityKind::Coin => "Coin",
            EntityKind::Enemy => "Enemy",
            EntityKind::Goal => "Goal",
            EntityKind::Platform => "Platform",
            EntityKind::Spike => "Spike",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            EntityKind::Player => "🎮",
            EntityKind::Block => "🧱",
            EntityKind::Coin => "⭐",
            EntityKind::Enemy => "👾",
            EntityKind::Goal => "🏆",
            EntityKind::Platform => "➖",
            EntityKind::Spike => "🔺",
        }
    }

    pub fn template(&self) -> Template {
        match self {
            EntityKind::Player => Template { width: 40.0, height: 40.0, color: "#00d4ff" },
            EntityKind::Block => Template { width: 60.0, height: 60.0, color: "#4ade80" },
            EntityKind::Coin => Template { width: 30.0, height: 30.0, color: "#fbbf24" },
            EntityKind::Enemy => Template { width: 40.0, height: 40.0, color: "#ef4444" },
            EntityKind::Goal => Template { width: 50.0, height: 50.0, color: "#a855f7" },
            EntityKind::Platform => Template { width: 120.0, height: 20.0, color: "#6b7280" },
            EntityKind::Spike => Template { width: 30.0, height: 30.0, color: "#dc2626" },
        }
    }

    #[inline]
    pub fn is_player(&self) -> bool {
        *self == EntityKind::Player
    }
}

/// A placed object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub name: String,
    /// Top-left corner (workspace units)
    pub x: f32,
    pub y: f32,
    /// Always >= `MIN_ENTITY_SIZE`
    pub width: f32,
    pub height: f32,
    /// Fill color, hex
    pub color: String,
}

impl Entity {
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_xywh(self.x, self.y, self.width, self.height)
    }
}

/// Partial update of an entity's editable fields.
///
/// Type and id are not editable. An empty patch changes nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityPatch {
    pub name: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub color: Option<String>,
}

impl EntityPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Loosely specified entity used to hydrate a scene; missing fields are
/// filled from the type template.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDraft {
    pub id: Option<String>,
    pub kind: EntityKind,
    pub name: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MIN_ENTITY_SIZE;

    #[test]
    fn test_kind_string_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(EntityKind::from_str(" Coin "), Some(EntityKind::Coin));
        assert_eq!(EntityKind::from_str("sphere"), None);
    }

    #[test]
    fn test_templates_respect_minimum_size() {
        for kind in EntityKind::ALL {
            let template = kind.template();
            assert!(template.width >= MIN_ENTITY_SIZE);
            assert!(template.height >= MIN_ENTITY_SIZE);
        }
    }

    #[test]
    fn test_entity_serializes_type_field() {
        let entity = Entity {
            id: EntityId::new("e1"),
            kind: EntityKind::Goal,
            name: "Goal 1".into(),
            x: 10.0,
            y: 20.0,
            width: 50.0,
            height: 50.0,
            color: "#a855f7".into(),
        };
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "goal");
        assert_eq!(json["id"], "e1");
        assert_eq!(json["width"], 50.0);
    }
}
