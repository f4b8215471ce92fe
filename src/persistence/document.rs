//! Document shapes and parsing

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::scene::{Entity, Rule, Scene};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("document must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}

/// Entity as found in a current-shape document; every field optional and a
/// malformed field reads as missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEntity {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub x: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub y: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub width: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub height: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub color: Option<String>,
}

/// Legacy element: same as an entity but without a name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyElement {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub x: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub y: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub width: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub height: Option<f32>,
    #[serde(deserialize_with = "lenient")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRule {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub kind: Option<String>,
    #[serde(rename = "targetId", deserialize_with = "lenient")]
    pub target_id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentDocument {
    pub objects: Vec<RawEntity>,
    pub logic: Vec<RawRule>,
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyDocument {
    pub elements: Vec<LegacyElement>,
    pub logic: Vec<RawRule>,
    pub background_color: Option<String>,
}

/// A `GameData` document in one of its schema versions
#[derive(Debug, Clone, PartialEq)]
pub enum GameDocument {
    /// Only `elements` present
    Legacy(LegacyDocument),
    /// `objects` present (wins over `elements`)
    Current(CurrentDocument),
}

impl Default for GameDocument {
    fn default() -> Self {
        GameDocument::Current(CurrentDocument::default())
    }
}

/// Written form of a scene: always the current shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    pub objects: Vec<Entity>,
    pub logic: Vec<Rule>,
    pub background_color: String,
}

impl GameDocument {
    /// Strict parse: the text must be a JSON object. Individual bad entries
    /// are still skipped.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(DocumentError::NotAnObject(json_type_name(&value)));
        }
        Ok(Self::from_value(&value))
    }

    /// Parse anything; text that is not a JSON object yields an empty
    /// current document
    pub fn from_json_lossy(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("Unreadable game document, starting empty: {}", e);
                Self::default()
            }
        }
    }

    /// Classify by field presence and parse each entry independently
    pub fn from_value(value: &Value) -> Self {
        let logic = parse_entries::<RawRule>(value.get("logic"), "logic");
        let background_color = value
            .get("backgroundColor")
            .and_then(Value::as_str)
            .map(str::to_string);

        match (value.get("objects"), value.get("elements")) {
            (Some(objects), _) if !objects.is_null() => GameDocument::Current(CurrentDocument {
                objects: parse_entries(Some(objects), "objects"),
                logic,
                background_color,
            }),
            (_, Some(elements)) if !elements.is_null() => GameDocument::Legacy(LegacyDocument {
                elements: parse_entries(Some(elements), "elements"),
                logic,
                background_color,
            }),
            _ => GameDocument::Current(CurrentDocument {
                objects: Vec::new(),
                logic,
                background_color,
            }),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, GameDocument::Legacy(_))
    }

    /// Number of entities the document carries
    pub fn entity_count(&self) -> usize {
        match self {
            GameDocument::Legacy(doc) => doc.elements.len(),
            GameDocument::Current(doc) => doc.objects.len(),
        }
    }
}

impl Scene {
    /// Snapshot in the current document shape
    pub fn to_document(&self) -> SceneDocument {
        SceneDocument {
            objects: self.entities().to_vec(),
            logic: self.rules().to_vec(),
            background_color: self.background_color().to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string(&self.to_document())?)
    }
}

/// Deserialize every array entry on its own, skipping the ones that fail
fn parse_entries<T: for<'de> Deserialize<'de>>(value: Option<&Value>, field: &str) -> Vec<T> {
    let Some(value) = value else {
        return Vec::new();
    };
    let Some(entries) = value.as_array() else {
        if !value.is_null() {
            log::warn!("Ignoring `{}`: expected an array", field);
        }
        return Vec::new();
    };
    entries
        .iter()
        .enumerate()
        .filter_map(|(i, entry)| match T::deserialize(entry) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                log::warn!("Skipping {}[{}]: {}", field, i, e);
                None
            }
        })
        .collect()
}

/// Field reader that never fails: wrong-typed values become `None`.
/// Numbers written as strings (`"10"`) are accepted.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    if let Ok(parsed) = T::deserialize(&value) {
        return Ok(Some(parsed));
    }
    if let Some(n) = value.as_str().and_then(|s| s.trim().parse::<f64>().ok())
        && let Ok(parsed) = T::deserialize(Value::from(n))
    {
        return Ok(Some(parsed));
    }
    log::warn!("Ignoring malformed field value {}", value);
    Ok(None)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EntityKind;

    #[test]
    fn test_objects_win_over_elements() {
        let doc = GameDocument::from_json(
            r#"{"objects":[{"id":"a","type":"coin"}],"elements":[{"id":"b"},{"id":"c"}],"logic":[]}"#,
        )
        .unwrap();
        assert!(!doc.is_legacy());
        assert_eq!(doc.entity_count(), 1);
    }

    #[test]
    fn test_elements_only_is_legacy() {
        let doc = GameDocument::from_json(
            r##"{"elements":[{"id":"b","type":"enemy","x":1,"y":2,"width":40,"height":40,"color":"#ef4444"}],"logic":[],"backgroundColor":"#0f172a"}"##,
        )
        .unwrap();
        let GameDocument::Legacy(legacy) = doc else {
            panic!("expected legacy document");
        };
        assert_eq!(legacy.elements[0].x, Some(1.0));
        assert_eq!(legacy.background_color.as_deref(), Some("#0f172a"));
    }

    #[test]
    fn test_bad_entries_are_skipped() {
        let doc = GameDocument::from_json(
            r#"{"objects":[{"id":"a","type":"coin"},7,"junk"],"logic":[{"type":"collect"},"junk"]}"#,
        )
        .unwrap();
        let GameDocument::Current(current) = doc else {
            panic!("expected current document");
        };
        assert_eq!(current.objects.len(), 1);
        assert_eq!(current.objects[0].id.as_deref(), Some("a"));
        assert_eq!(current.logic.len(), 1);
    }

    #[test]
    fn test_malformed_fields_keep_the_entry() {
        let doc = GameDocument::from_json(
            r#"{"elements":[{"id":"a","x":"left","width":[1]},{"id":"b","x":"10","y":" 4.5 ","color":7}],"logic":[{"type":"add_score","value":"25","targetId":false}]}"#,
        )
        .unwrap();
        let GameDocument::Legacy(legacy) = doc else {
            panic!("expected legacy document");
        };
        assert_eq!(legacy.elements.len(), 2);
        assert_eq!(legacy.elements[0].x, None);
        assert_eq!(legacy.elements[0].width, None);
        assert_eq!(legacy.elements[1].x, Some(10.0));
        assert_eq!(legacy.elements[1].y, Some(4.5));
        assert_eq!(legacy.elements[1].color, None);
        assert_eq!(legacy.logic[0].value, Some(25.0));
        assert_eq!(legacy.logic[0].target_id, None);
    }

    #[test]
    fn test_strict_and_lossy_parsing() {
        assert!(matches!(
            GameDocument::from_json("not json"),
            Err(DocumentError::InvalidJson(_))
        ));
        assert!(matches!(
            GameDocument::from_json("[1,2]"),
            Err(DocumentError::NotAnObject("an array"))
        ));
        assert_eq!(GameDocument::from_json_lossy("not json"), GameDocument::default());
        assert_eq!(GameDocument::from_json_lossy("{}").entity_count(), 0);
    }

    #[test]
    fn test_write_emits_current_shape_only() {
        let mut scene = Scene::new(9);
        scene.add_entity(EntityKind::Player, 0.0, 0.0);
        let json: Value = serde_json::from_str(&scene.to_json().unwrap()).unwrap();
        assert!(json.get("elements").is_none());
        assert_eq!(json["objects"][0]["type"], "player");
        assert_eq!(json["objects"][0]["name"], "Player 1");
        assert_eq!(json["backgroundColor"], "#1e293b");
        assert!(json["logic"].as_array().unwrap().is_empty());
    }
}
