//! Playback state and core simulation types
//!
//! A [`PlayField`] is a frozen snapshot of the scene taken when playback
//! starts; edits made afterwards do not reach it.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::geometry::Rect;
use crate::scene::{Entity, EntityId, Scene};

/// Current phase of playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayPhase {
    /// Accepting input
    Playing,
    /// Player reached a goal
    Won,
    /// Player touched an enemy or spike
    Lost,
}

impl PlayPhase {
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PlayPhase::Playing)
    }

    /// Overlay text shown once the run has ended
    pub fn banner(&self) -> Option<&'static str> {
        match self {
            PlayPhase::Playing => None,
            PlayPhase::Won => Some("🏆 You Win!"),
            PlayPhase::Lost => Some("💥 Game Over!"),
        }
    }
}

/// One discrete step of player movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a DOM `KeyboardEvent.key` value (arrows and WASD)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Direction::Up),
            "ArrowDown" | "s" | "S" => Some(Direction::Down),
            "ArrowLeft" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "d" | "D" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit vector in screen space (y grows downward)
    pub fn delta(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }
}

/// How far the player may wander
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum MovementBounds {
    /// Steps are always applied
    #[default]
    Unbounded,
    /// The moved axis of the top-left corner stops at `0` going up/left and
    /// at the extent going down/right
    Clamped { width: f32, height: f32 },
}

impl MovementBounds {
    /// Bounds of the preview dialog's play field
    pub fn preview() -> Self {
        MovementBounds::Clamped {
            width: PLAY_FIELD_WIDTH,
            height: PLAY_FIELD_HEIGHT,
        }
    }

    /// Position after one step from `pos` in `direction`
    pub fn step(&self, pos: Vec2, direction: Direction) -> Vec2 {
        let next = pos + direction.delta() * STEP_DISTANCE;
        match *self {
            MovementBounds::Unbounded => next,
            MovementBounds::Clamped { width, height } => match direction {
                Direction::Up => Vec2::new(pos.x, next.y.max(0.0)),
                Direction::Down => Vec2::new(pos.x, next.y.min(height)),
                Direction::Left => Vec2::new(next.x.max(0.0), pos.y),
                Direction::Right => Vec2::new(next.x.min(width), pos.y),
            },
        }
    }
}

/// A run cannot start
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayError {
    #[error("Add a Player first!")]
    MissingPlayer,
}

/// Something that happened during one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayEvent {
    Moved { from: Vec2, to: Vec2 },
    CoinCollected { id: EntityId, score: u32 },
    Lost { by: EntityId },
    Won { by: EntityId },
    Reset,
}

/// Frozen snapshot of the scene used for one playback session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayField {
    pub player: Entity,
    /// Every non-player entity, in scene order
    pub others: Vec<Entity>,
    pub background_color: String,
    pub bounds: MovementBounds,
}

impl PlayField {
    pub fn from_scene(scene: &Scene, bounds: MovementBounds) -> Result<Self, PlayError> {
        let player = scene.player().ok_or(PlayError::MissingPlayer)?.clone();
        let others = scene
            .entities()
            .iter()
            .filter(|e| !e.kind.is_player())
            .cloned()
            .collect();
        Ok(Self {
            player,
            others,
            background_color: scene.background_color().to_string(),
            bounds,
        })
    }
}

/// Mutable state of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayState {
    pub phase: PlayPhase,
    /// Player's top-left corner
    pub player_pos: Vec2,
    pub score: u32,
    pub collected: HashSet<EntityId>,
    /// Ticks processed since start or last reset
    pub ticks: u32,
}

impl PlayState {
    pub fn new(field: &PlayField) -> Self {
        Self {
            phase: PlayPhase::Playing,
            player_pos: field.player.position(),
            score: 0,
            collected: HashSet::new(),
            ticks: 0,
        }
    }

    pub fn reset(&mut self, field: &PlayField) {
        *self = Self::new(field);
    }

    /// Player rectangle at its current position
    pub fn player_rect(&self, field: &PlayField) -> Rect {
        Rect::new(self.player_pos, field.player.size())
    }
}
