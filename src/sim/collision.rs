//! Collision detection and response
//!
//! Player-vs-entity AABB tests. What a contact does is decided by the
//! entity's type alone.

use super::state::{PlayField, PlayEvent, PlayPhase, PlayState};
use crate::consts::COIN_SCORE;
use crate::scene::{Entity, EntityKind};

/// Outcome of touching an entity of a given type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Removed from play, adds to the score
    Collect,
    /// Ends the run as lost
    Hazard,
    /// Ends the run as won
    Goal,
    /// Nothing happens
    Inert,
}

impl Contact {
    pub fn of(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Coin => Contact::Collect,
            EntityKind::Enemy | EntityKind::Spike => Contact::Hazard,
            EntityKind::Goal => Contact::Goal,
            EntityKind::Player | EntityKind::Block | EntityKind::Platform => Contact::Inert,
        }
    }
}

/// Entities the player currently overlaps, in scene order, skipping
/// collected ones
pub fn overlapping<'f>(
    state: &PlayState,
    field: &'f PlayField,
) -> impl Iterator<Item = &'f Entity> {
    let player = state.player_rect(field);
    field
        .others
        .iter()
        .filter(move |e| !state.collected.contains(&e.id) && player.overlaps(&e.rect()))
}

/// Apply every contact at the player's current position.
///
/// All overlaps are processed; a later terminal contact overrides an
/// earlier one, and coins after a terminal contact are still collected.
pub fn resolve_contacts(state: &mut PlayState, field: &PlayField) -> Vec<PlayEvent> {
    let hits: Vec<(Contact, &Entity)> = overlapping(state, field)
        .map(|e| (Contact::of(e.kind), e))
        .filter(|(contact, _)| *contact != Contact::Inert)
        .collect();

    let mut events = Vec::with_capacity(hits.len());
    for (contact, entity) in hits {
        match contact {
            Contact::Collect => {
                state.collected.insert(entity.id.clone());
                state.score += COIN_SCORE;
                events.push(PlayEvent::CoinCollected {
                    id: entity.id.clone(),
                    score: state.score,
                });
            }
            Contact::Hazard => {
                state.phase = PlayPhase::Lost;
                events.push(PlayEvent::Lost { by: entity.id.clone() });
            }
            Contact::Goal => {
                state.phase = PlayPhase::Won;
                events.push(PlayEvent::Won { by: entity.id.clone() });
            }
            Contact::Inert => {}
        }
    }
    events
}
