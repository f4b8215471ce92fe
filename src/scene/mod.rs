//! Scene model
//!
//! The authoritative, serializable representation of a game: placed
//! entities (in z-order), the rules attached to them, and the background.
//! Every mutator is total: sizes are clamped, unknown ids are no-ops.

pub mod color;
pub mod entity;
pub mod ids;
pub mod model;
pub mod rule;

pub use color::{BACKGROUND_PRESETS, normalize_hex};
pub use entity::{Entity, EntityDraft, EntityKind, EntityPatch, GENERIC_KIND, Template};
pub use ids::{EntityId, IdGenerator, RuleId};
pub use model::Scene;
pub use rule::{Rule, RuleDraft, RuleKind, RulePatch, clamp_rule_value};
