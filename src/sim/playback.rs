//! A playback session over a scene snapshot

use serde::Serialize;

use super::state::{Direction, MovementBounds, PlayError, PlayEvent, PlayField, PlayPhase, PlayState};
use super::tick::{TickInput, tick};
use crate::geometry::Rect;
use crate::scene::{EntityId, EntityKind, Scene};

/// Drawable entity in a playback frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprite {
    pub id: EntityId,
    pub kind: EntityKind,
    pub rect: Rect,
    pub color: String,
    pub icon: &'static str,
}

/// Everything a host needs to draw the current state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayFrame {
    pub background_color: String,
    /// Visible non-player entities, in scene order
    pub sprites: Vec<Sprite>,
    pub player: Sprite,
    pub score: u32,
    pub phase: PlayPhase,
    pub banner: Option<&'static str>,
}

/// Runs the mini-game independently of further edits
#[derive(Debug, Clone)]
pub struct Playback {
    field: PlayField,
    state: PlayState,
}

impl Playback {
    /// Snapshot `scene` and start a run. Fails if there is no player.
    pub fn start(scene: &Scene, bounds: MovementBounds) -> Result<Self, PlayError> {
        let field = PlayField::from_scene(scene, bounds)?;
        let state = PlayState::new(&field);
        log::info!(
            "Playback started: {} entities, player at ({}, {})",
            field.others.len(),
            state.player_pos.x,
            state.player_pos.y
        );
        Ok(Self { field, state })
    }

    /// Feed a DOM key name; unmapped keys do nothing
    pub fn handle_key(&mut self, key: &str) -> Vec<PlayEvent> {
        match Direction::from_key(key) {
            Some(direction) => self.step(direction),
            None => Vec::new(),
        }
    }

    pub fn step(&mut self, direction: Direction) -> Vec<PlayEvent> {
        let before = self.state.phase;
        let events = tick(&mut self.state, &self.field, &TickInput::step(direction));
        if !before.is_terminal() && self.state.phase.is_terminal() {
            log::info!(
                "Playback finished: {:?} with score {}",
                self.state.phase,
                self.state.score
            );
        }
        events
    }

    /// "Play Again": back to the start position with no score
    pub fn reset(&mut self) -> Vec<PlayEvent> {
        tick(&mut self.state, &self.field, &TickInput::reset())
    }

    pub fn phase(&self) -> PlayPhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn state(&self) -> &PlayState {
        &self.state
    }

    pub fn field(&self) -> &PlayField {
        &self.field
    }

    pub fn frame(&self) -> PlayFrame {
        let sprites = self
            .field
            .others
            .iter()
            .filter(|e| !self.state.collected.contains(&e.id))
            .map(|e| Sprite {
                id: e.id.clone(),
                kind: e.kind,
                rect: e.rect(),
                color: e.color.clone(),
                icon: e.kind.icon(),
            })
            .collect();
        let player = &self.field.player;
        PlayFrame {
            background_color: self.field.background_color.clone(),
            sprites,
            player: Sprite {
                id: player.id.clone(),
                kind: player.kind,
                rect: self.state.player_rect(&self.field),
                color: player.color.clone(),
                icon: player.kind.icon(),
            },
            score: self.state.score,
            phase: self.state.phase,
            banner: self.state.phase.banner(),
        }
    }
}
