//! Schema migration: any document version -> current -> scene

use serde::{Deserialize, Serialize};

use super::document::{CurrentDocument, GameDocument, RawEntity, RawRule};
use crate::scene::{EntityDraft, EntityKind, GENERIC_KIND, RuleDraft, RuleKind, Scene};

/// How legacy element types are carried over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LegacyKinds {
    /// Every legacy element becomes the generic type
    #[default]
    Generic,
    /// Keep the legacy type when it is a known type, otherwise generic
    Preserve,
}

impl LegacyKinds {
    pub fn as_str(&self) -> &'static str {
        match self {
            LegacyKinds::Generic => "Generic",
            LegacyKinds::Preserve => "Preserve",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "generic" => Some(LegacyKinds::Generic),
            "preserve" | "keep" => Some(LegacyKinds::Preserve),
            _ => None,
        }
    }

    fn kind_for(&self, legacy: Option<&str>) -> EntityKind {
        match self {
            LegacyKinds::Generic => GENERIC_KIND,
            LegacyKinds::Preserve => legacy.and_then(EntityKind::from_str).unwrap_or(GENERIC_KIND),
        }
    }
}

impl GameDocument {
    /// Bring the document to the current shape. Legacy elements map 1:1,
    /// keeping id, position, size and color; names are left unset so the
    /// scene synthesizes them.
    pub fn migrate(self, kinds: LegacyKinds) -> CurrentDocument {
        match self {
            GameDocument::Current(doc) => doc,
            GameDocument::Legacy(doc) => {
                log::info!("Migrating legacy document ({} elements)", doc.elements.len());
                let objects = doc
                    .elements
                    .into_iter()
                    .map(|el| RawEntity {
                        kind: Some(kinds.kind_for(el.kind.as_deref()).as_str().to_string()),
                        id: el.id,
                        name: None,
                        x: el.x,
                        y: el.y,
                        width: el.width,
                        height: el.height,
                        color: el.color,
                    })
                    .collect();
                CurrentDocument {
                    objects,
                    logic: doc.logic,
                    background_color: doc.background_color,
                }
            }
        }
    }

    /// Migrate and hydrate a scene whose ids come from `seed`
    pub fn into_scene(self, kinds: LegacyKinds, seed: u64) -> Scene {
        let doc = self.migrate(kinds);
        let drafts = doc.objects.into_iter().filter_map(entity_draft).collect();
        let rules = doc.logic.into_iter().filter_map(rule_draft).collect();
        Scene::hydrate(drafts, rules, doc.background_color, seed)
    }
}

fn entity_draft(raw: RawEntity) -> Option<EntityDraft> {
    let kind = match raw.kind.as_deref() {
        Some(s) => match EntityKind::from_str(s) {
            Some(kind) => kind,
            None => {
                log::warn!("Skipping entity {:?}: unknown type {:?}", raw.id, s);
                return None;
            }
        },
        None => {
            log::warn!("Skipping entity {:?}: missing type", raw.id);
            return None;
        }
    };
    Some(EntityDraft {
        id: raw.id,
        kind,
        name: raw.name,
        x: raw.x.unwrap_or(0.0),
        y: raw.y.unwrap_or(0.0),
        width: raw.width,
        height: raw.height,
        color: raw.color,
    })
}

fn rule_draft(raw: RawRule) -> Option<RuleDraft> {
    let Some(kind) = raw.kind.as_deref().and_then(RuleKind::from_str) else {
        log::warn!("Skipping rule {:?}: unknown type {:?}", raw.id, raw.kind);
        return None;
    };
    Some(RuleDraft {
        id: raw.id,
        kind,
        target_id: raw.target_id.filter(|t| !t.is_empty()),
        value: raw.value.filter(|v| v.is_finite()).map(|v| v.round() as i64),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::DEFAULT_BACKGROUND;
    use glam::Vec2;

    const LEGACY: &str = r##"{
        "elements": [
            {"id": "p", "type": "player", "x": 10, "y": 20, "width": 40, "height": 40, "color": "#00d4ff"},
            {"id": "c", "type": "coin", "x": 100.5, "y": 80, "width": 30, "height": 30, "color": "#fbbf24"},
            {"id": "g", "type": "goal", "x": 300, "y": 40, "width": 55, "height": 50, "color": "#a855f7"}
        ],
        "logic": [{"id": "l1", "type": "collect", "targetId": "c"}],
        "backgroundColor": "#1e1b4b"
    }"##;

    #[test]
    fn test_legacy_migration_preserves_geometry() {
        let scene = GameDocument::from_json(LEGACY)
            .unwrap()
            .into_scene(LegacyKinds::Generic, 1);

        assert_eq!(scene.len(), 3);
        let names: Vec<_> = scene.entities().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Block 1", "Block 2", "Block 3"]);
        assert!(scene.entities().iter().all(|e| e.kind == GENERIC_KIND));

        let coin = &scene.entities()[1];
        assert_eq!(coin.id.as_str(), "c");
        assert_eq!(coin.position(), Vec2::new(100.5, 80.0));
        assert_eq!(coin.size(), Vec2::new(30.0, 30.0));
        assert_eq!(coin.color, "#fbbf24");
        assert_eq!(scene.entities()[2].width, 55.0);

        assert_eq!(scene.rules().len(), 1);
        assert_eq!(scene.background_color(), "#1e1b4b");
        assert!(scene.player().is_none());
    }

    #[test]
    fn test_legacy_migration_can_preserve_kinds() {
        let scene = GameDocument::from_json(LEGACY)
            .unwrap()
            .into_scene(LegacyKinds::Preserve, 1);
        let kinds: Vec<_> = scene.entities().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [EntityKind::Player, EntityKind::Coin, EntityKind::Goal]);
        assert_eq!(scene.entities()[1].name, "Coin 1");
        assert!(scene.player().is_some());
    }

    #[test]
    fn test_current_document_round_trip() {
        let scene = GameDocument::from_json(LEGACY)
            .unwrap()
            .into_scene(LegacyKinds::Preserve, 1);
        let json = scene.to_json().unwrap();
        let reloaded = GameDocument::from_json(&json)
            .unwrap()
            .into_scene(LegacyKinds::Generic, 2);
        assert_eq!(reloaded.entities(), scene.entities());
        assert_eq!(reloaded.rules(), scene.rules());
    }

    #[test]
    fn test_unknown_types_are_skipped() {
        let doc = GameDocument::from_json(
            r#"{"objects":[{"id":"a","type":"dragon"},{"id":"b","type":"coin"}],"logic":[{"type":"explode"},{"type":"add_score","value":25.4}]}"#,
        )
        .unwrap();
        let scene = doc.into_scene(LegacyKinds::Generic, 0);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.entities()[0].size(), Vec2::new(30.0, 30.0));
        assert_eq!(scene.rules().len(), 1);
        assert_eq!(scene.rules()[0].value, Some(25));
    }

    #[test]
    fn test_malformed_legacy_fields_keep_element_count() {
        let doc = GameDocument::from_json(
            r##"{"elements":[{"id":"a","x":"10","y":5,"color":"#00d4ff"},{"id":"b","x":20,"y":5}],"logic":[]}"##,
        )
        .unwrap();
        let legacy_count = doc.entity_count();
        let scene = doc.into_scene(LegacyKinds::Generic, 0);
        assert_eq!(scene.len(), legacy_count);
        assert_eq!(scene.entities()[0].position(), Vec2::new(10.0, 5.0));
    }

    #[test]
    fn test_invalid_colors_fall_back_on_load() {
        let scene = GameDocument::from_json(
            r##"{"objects":[{"id":"a","type":"coin","color":"banana"},{"id":"b","type":"goal","color":"ABC"}],"logic":[],"backgroundColor":"banana"}"##,
        )
        .unwrap()
        .into_scene(LegacyKinds::Generic, 0);
        assert_eq!(scene.background_color(), DEFAULT_BACKGROUND);
        assert_eq!(scene.entities()[0].color, EntityKind::Coin.template().color);
        assert_eq!(scene.entities()[1].color, "#aabbcc");
    }

    #[test]
    fn test_overflowing_size_survives_round_trip() {
        let scene = GameDocument::from_json(
            r#"{"objects":[{"id":"a","type":"goal","width":1e39,"height":-1e39}],"logic":[]}"#,
        )
        .unwrap()
        .into_scene(LegacyKinds::Generic, 0);
        let goal = &scene.entities()[0];
        assert_eq!(goal.width, EntityKind::Goal.template().width);
        assert_eq!(goal.height, EntityKind::Goal.template().height);

        let reloaded = GameDocument::from_json(&scene.to_json().unwrap())
            .unwrap()
            .into_scene(LegacyKinds::Generic, 1);
        assert_eq!(reloaded.entities(), scene.entities());
    }

    #[test]
    fn test_legacy_kinds_strings() {
        assert_eq!(LegacyKinds::from_str("preserve"), Some(LegacyKinds::Preserve));
        assert_eq!(LegacyKinds::from_str(LegacyKinds::Generic.as_str()), Some(LegacyKinds::Generic));
        assert_eq!(LegacyKinds::from_str("other"), None);
    }
}
