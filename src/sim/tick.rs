//! Discrete simulation tick
//!
//! One keystroke is one tick: move the player one step, then resolve
//! contacts at the new position.

use super::collision::resolve_contacts;
use super::state::{Direction, PlayEvent, PlayField, PlayState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Step direction, if a movement key was pressed
    pub direction: Option<Direction>,
    /// Restart the run ("Play Again")
    pub reset: bool,
}

impl TickInput {
    pub fn step(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            reset: false,
        }
    }

    pub fn reset() -> Self {
        Self {
            direction: None,
            reset: true,
        }
    }
}

/// Advance the run by one tick and report what happened
pub fn tick(state: &mut PlayState, field: &PlayField, input: &TickInput) -> Vec<PlayEvent> {
    if input.reset {
        state.reset(field);
        return vec![PlayEvent::Reset];
    }

    // Terminal phases ignore input until reset
    if state.phase.is_terminal() {
        log::debug!("Ignoring input in {:?}", state.phase);
        return Vec::new();
    }

    let Some(direction) = input.direction else {
        return Vec::new();
    };

    let from = state.player_pos;
    state.player_pos = field.bounds.step(from, direction);
    state.ticks += 1;

    let mut events = vec![PlayEvent::Moved {
        from,
        to: state.player_pos,
    }];
    events.extend(resolve_contacts(state, field));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{EntityKind, Scene};
    use crate::sim::{MovementBounds, PlayPhase};
    use glam::Vec2;
    use proptest::prelude::*;

    fn play(kinds: &[(EntityKind, f32, f32)], bounds: MovementBounds) -> (PlayState, PlayField) {
        let mut scene = Scene::new(11);
        scene.add_entity(EntityKind::Player, 0.0, 0.0);
        for &(kind, x, y) in kinds {
            scene.add_entity(kind, x, y);
        }
        let field = PlayField::from_scene(&scene, bounds).unwrap();
        (PlayState::new(&field), field)
    }

    #[test]
    fn test_reaching_goal_wins() {
        let mut scene = Scene::new(1);
        scene.add_entity(EntityKind::Player, 0.0, 0.0);
        let goal = scene.add_entity(EntityKind::Goal, 10.0, 10.0).unwrap();
        scene.resize_entity(&goal, 40.0, 40.0);
        let field = PlayField::from_scene(&scene, MovementBounds::Unbounded).unwrap();
        let mut state = PlayState::new(&field);

        // The goal already overlaps after the first step; the second is ignored
        let events = tick(&mut state, &field, &TickInput::step(Direction::Right));
        assert!(matches!(events.last(), Some(PlayEvent::Won { .. })));
        assert!(tick(&mut state, &field, &TickInput::step(Direction::Down)).is_empty());
        assert_eq!(state.phase, PlayPhase::Won);
        assert_eq!(state.player_pos, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_coin_scores_once() {
        let (mut state, field) = play(&[(EntityKind::Coin, 5.0, 5.0)], MovementBounds::Unbounded);
        tick(&mut state, &field, &TickInput::step(Direction::Right));
        assert_eq!(state.score, 10);
        assert_eq!(state.collected.len(), 1);

        tick(&mut state, &field, &TickInput::step(Direction::Left));
        assert_eq!(state.score, 10);
        assert_eq!(state.phase, PlayPhase::Playing);
    }

    #[test]
    fn test_terminal_phase_ignores_input() {
        let (mut state, field) = play(&[(EntityKind::Spike, 30.0, 0.0)], MovementBounds::Unbounded);
        tick(&mut state, &field, &TickInput::step(Direction::Right));
        assert_eq!(state.phase, PlayPhase::Lost);

        let pos = state.player_pos;
        assert!(tick(&mut state, &field, &TickInput::step(Direction::Left)).is_empty());
        assert_eq!(state.player_pos, pos);
    }

    #[test]
    fn test_reset_restores_start() {
        let (mut state, field) = play(&[(EntityKind::Coin, 5.0, 5.0)], MovementBounds::Unbounded);
        tick(&mut state, &field, &TickInput::step(Direction::Down));
        assert_eq!(tick(&mut state, &field, &TickInput::reset()), vec![PlayEvent::Reset]);
        assert_eq!(state.player_pos, Vec2::ZERO);
        assert_eq!(state.score, 0);
        assert!(state.collected.is_empty());
        assert_eq!(state.phase, PlayPhase::Playing);
    }

    #[test]
    fn test_no_direction_is_no_tick() {
        let (mut state, field) = play(&[], MovementBounds::Unbounded);
        assert!(tick(&mut state, &field, &TickInput::default()).is_empty());
        assert_eq!(state.ticks, 0);
    }

    proptest! {
        #[test]
        fn prop_clamped_player_stays_in_field(steps in proptest::collection::vec(0u8..4, 0..300)) {
            let (mut state, field) = play(&[], MovementBounds::preview());
            for s in steps {
                let direction = [Direction::Up, Direction::Down, Direction::Left, Direction::Right][s as usize];
                tick(&mut state, &field, &TickInput::step(direction));
                prop_assert!(state.player_pos.x >= 0.0 && state.player_pos.x <= 500.0);
                prop_assert!(state.player_pos.y >= 0.0 && state.player_pos.y <= 300.0);
            }
        }
    }
}
