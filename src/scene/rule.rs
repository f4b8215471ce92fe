//! Declarative game rules ("logic blocks")
//!
//! Rules are stored and edited with the scene but playback does not
//! interpret them; collision outcomes are decided by entity type.

use serde::{Deserialize, Serialize};

use super::ids::{EntityId, RuleId};
use crate::consts::{DEFAULT_RULE_SCORE, MAX_RULE_SCORE, MIN_RULE_SCORE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    WhenStart,
    WhenTouch,
    Collect,
    AddScore,
    GameOver,
    NextLevel,
}

impl RuleKind {
    /// Order of the "add rule" buttons
    pub const ALL: [RuleKind; 6] = [
        RuleKind::WhenStart,
        RuleKind::WhenTouch,
        RuleKind::Collect,
        RuleKind::AddScore,
        RuleKind::GameOver,
        RuleKind::NextLevel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::WhenStart => "when_start",
            RuleKind::WhenTouch => "when_touch",
            RuleKind::Collect => "collect",
            RuleKind::AddScore => "add_score",
            RuleKind::GameOver => "game_over",
            RuleKind::NextLevel => "next_level",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "when_start" => Some(RuleKind::WhenStart),
            "when_touch" => Some(RuleKind::WhenTouch),
            "collect" => Some(RuleKind::Collect),
            "add_score" => Some(RuleKind::AddScore),
            "game_over" => Some(RuleKind::GameOver),
            "next_level" => Some(RuleKind::NextLevel),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::WhenStart => "When Game Starts",
            RuleKind::WhenTouch => "When Player Touches",
            RuleKind::Collect => "Collect Item",
            RuleKind::AddScore => "Add Score",
            RuleKind::GameOver => "Game Over",
            RuleKind::NextLevel => "Win Level",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            RuleKind::WhenStart => "🎮",
            RuleKind::WhenTouch => "👆",
            RuleKind::Collect => "⭐",
            RuleKind::AddScore => "🔢",
            RuleKind::GameOver => "💥",
            RuleKind::NextLevel => "🏆",
        }
    }

    /// Whether the rule names a target entity
    pub fn takes_target(&self) -> bool {
        matches!(self, RuleKind::WhenTouch | RuleKind::Collect)
    }

    /// Whether the rule carries a score value
    pub fn takes_value(&self) -> bool {
        *self == RuleKind::AddScore
    }
}

/// A declarative statement about game behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    #[serde(rename = "type")]
    pub kind: RuleKind,
    /// Live entity id, or unset
    #[serde(rename = "targetId", default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<EntityId>,
    /// Only meaningful for `add_score`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
}

impl Rule {
    pub fn new(id: RuleId, kind: RuleKind) -> Self {
        Self {
            id,
            kind,
            target_id: None,
            value: kind.takes_value().then_some(DEFAULT_RULE_SCORE),
        }
    }
}

/// Partial update of a rule.
///
/// `target: Some(None)` clears the target; `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulePatch {
    pub target: Option<Option<EntityId>>,
    pub value: Option<i64>,
}

/// Loosely specified rule used to hydrate a scene
#[derive(Debug, Clone, PartialEq)]
pub struct RuleDraft {
    pub id: Option<String>,
    pub kind: RuleKind,
    pub target_id: Option<String>,
    pub value: Option<i64>,
}

/// Clamp a score value to `[MIN_RULE_SCORE, MAX_RULE_SCORE]`
pub fn clamp_rule_value(value: i64) -> u32 {
    value.clamp(MIN_RULE_SCORE as i64, MAX_RULE_SCORE as i64) as u32
}
