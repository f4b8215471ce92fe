//! The scene aggregate
//!
//! Mutators on an unknown id do nothing and return `false` (or `None`).
//! This keeps event handlers simple when an interaction outlives its
//! entity, but callers that need to know should check the return value.

use std::collections::HashMap;

use glam::Vec2;

use super::color::normalize_hex;
use super::entity::{Entity, EntityDraft, EntityKind, EntityPatch, GENERIC_KIND};
use super::ids::{EntityId, IdGenerator, RuleId};
use super::rule::{Rule, RuleDraft, RuleKind, RulePatch, clamp_rule_value};
use crate::consts::*;
use crate::geometry::Rect;

/// Entities in z-order, rules, background color
#[derive(Debug, Clone)]
pub struct Scene {
    entities: Vec<Entity>,
    /// id -> position in `entities`
    index: HashMap<EntityId, usize>,
    rules: Vec<Rule>,
    background_color: String,
    /// Per-type running count used for generated names
    name_counters: HashMap<EntityKind, u32>,
    ids: IdGenerator,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Scene {
    /// Empty scene whose ids come from a generator seeded with `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            entities: Vec::new(),
            index: HashMap::new(),
            rules: Vec::new(),
            background_color: DEFAULT_BACKGROUND.to_string(),
            name_counters: HashMap::new(),
            ids: IdGenerator::new(seed),
        }
    }

    /// Build a scene from loosely specified parts, repairing anything that
    /// would break an invariant:
    /// - missing ids are generated, duplicate ids regenerated
    /// - missing, non-finite or invalid size/color come from the type
    ///   template, sizes are clamped, colors normalized
    /// - missing names are synthesized from the running per-type count
    /// - players after the first are demoted to the generic type
    /// - rules targeting an unknown entity are dropped
    pub fn hydrate(
        drafts: Vec<EntityDraft>,
        rules: Vec<RuleDraft>,
        background_color: Option<String>,
        seed: u64,
    ) -> Self {
        let mut scene = Self::new(seed);
        if let Some(color) = background_color.filter(|c| !c.trim().is_empty()) {
            match normalize_hex(&color) {
                Some(color) => scene.background_color = color,
                None => log::warn!("Invalid background color {:?}, using default", color),
            }
        }

        for draft in drafts {
            let mut kind = draft.kind;
            if kind.is_player() && scene.player().is_some() {
                log::warn!("Demoting extra player {:?} to {}", draft.id, GENERIC_KIND.as_str());
                kind = GENERIC_KIND;
            }

            let id = match draft.id.map(EntityId::new) {
                Some(id) if !scene.index.contains_key(&id) && !id.as_str().is_empty() => id,
                Some(id) => {
                    let fresh = scene.next_entity_id();
                    log::warn!("Duplicate entity id {} replaced with {}", id, fresh);
                    fresh
                }
                None => scene.next_entity_id(),
            };

            let template = kind.template();
            let n = scene.bump_counter(kind);
            let color = match draft.color.filter(|c| !c.trim().is_empty()) {
                Some(color) => normalize_hex(&color).unwrap_or_else(|| {
                    log::warn!("Invalid color {:?} on {}, using template", color, id);
                    template.color.to_string()
                }),
                None => template.color.to_string(),
            };
            let entity = Entity {
                id,
                kind,
                name: draft
                    .name
                    .unwrap_or_else(|| format!("{} {}", kind.label(), n)),
                x: finite_or_zero(draft.x),
                y: finite_or_zero(draft.y),
                width: clamp_size(draft.width.unwrap_or(template.width), template.width),
                height: clamp_size(draft.height.unwrap_or(template.height), template.height),
                color,
            };
            scene.push_entity(entity);
        }

        for draft in rules {
            let target_id = draft.target_id.map(EntityId::new);
            if let Some(target) = &target_id
                && !scene.index.contains_key(target)
            {
                log::warn!("Dropping {} rule targeting unknown entity {}", draft.kind.as_str(), target);
                continue;
            }
            let id = match draft.id.map(RuleId::new) {
                Some(id) if scene.rule(&id).is_none() && !id.as_str().is_empty() => id,
                _ => scene.next_rule_id(),
            };
            let mut rule = Rule::new(id, draft.kind);
            rule.target_id = target_id.filter(|_| draft.kind.takes_target());
            if draft.kind.takes_value() {
                rule.value = Some(draft.value.map_or(DEFAULT_RULE_SCORE, clamp_rule_value));
            }
            scene.rules.push(rule);
        }

        scene
    }

    // === Queries ===

    /// Entities in z-order (first is bottom-most)
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: &EntityId) -> Option<&Entity> {
        self.index.get(id).map(|&i| &self.entities[i])
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, id: &RuleId) -> Option<&Rule> {
        self.rules.iter().find(|r| &r.id == id)
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    /// The single player entity, if placed
    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.kind.is_player())
    }

    /// Topmost entity containing `point` (workspace units)
    pub fn entity_at(&self, point: Vec2) -> Option<&Entity> {
        self.entities.iter().rev().find(|e| e.rect().contains(point))
    }

    /// Entities a rule may target (everything but the player)
    pub fn selectable_targets(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| !e.kind.is_player())
    }

    // === Entity mutators ===

    /// Place a new entity from the type template with its top-left at
    /// `(x, y)`. A second player is refused and `None` returned.
    pub fn add_entity(&mut self, kind: EntityKind, x: f32, y: f32) -> Option<EntityId> {
        if kind.is_player() && self.player().is_some() {
            log::warn!("Scene already has a player; ignoring new player");
            return None;
        }
        let template = kind.template();
        let id = self.next_entity_id();
        let n = self.bump_counter(kind);
        self.push_entity(Entity {
            id: id.clone(),
            kind,
            name: format!("{} {}", kind.label(), n),
            x: finite_or_zero(x),
            y: finite_or_zero(y),
            width: template.width,
            height: template.height,
            color: template.color.to_string(),
        });
        Some(id)
    }

    /// Move an entity's top-left corner. Non-finite coordinates are ignored.
    pub fn move_entity(&mut self, id: &EntityId, x: f32, y: f32) -> bool {
        let Some(entity) = self.entity_mut(id) else {
            return false;
        };
        if x.is_finite() {
            entity.x = x;
        }
        if y.is_finite() {
            entity.y = y;
        }
        true
    }

    /// Resize an entity, clamping each side to `MIN_ENTITY_SIZE`
    pub fn resize_entity(&mut self, id: &EntityId, width: f32, height: f32) -> bool {
        let Some(entity) = self.entity_mut(id) else {
            return false;
        };
        entity.width = clamp_size(width, MIN_ENTITY_SIZE);
        entity.height = clamp_size(height, MIN_ENTITY_SIZE);
        true
    }

    /// Move and resize in one step
    pub fn set_rect(&mut self, id: &EntityId, rect: Rect) -> bool {
        self.move_entity(id, rect.min.x, rect.min.y)
            && self.resize_entity(id, rect.size.x, rect.size.y)
    }

    /// Apply a partial update. Sizes are clamped, invalid colors ignored.
    pub fn update_entity(&mut self, id: &EntityId, patch: &EntityPatch) -> bool {
        let Some(entity) = self.entity_mut(id) else {
            return false;
        };
        if let Some(name) = &patch.name {
            entity.name = name.clone();
        }
        if let Some(x) = patch.x.filter(|v| v.is_finite()) {
            entity.x = x;
        }
        if let Some(y) = patch.y.filter(|v| v.is_finite()) {
            entity.y = y;
        }
        if let Some(width) = patch.width {
            entity.width = clamp_size(width, MIN_ENTITY_SIZE);
        }
        if let Some(height) = patch.height {
            entity.height = clamp_size(height, MIN_ENTITY_SIZE);
        }
        if let Some(color) = &patch.color {
            match normalize_hex(color) {
                Some(color) => entity.color = color,
                None => log::debug!("Ignoring invalid color {:?}", color),
            }
        }
        true
    }

    /// Remove an entity and every rule targeting it
    pub fn delete_entity(&mut self, id: &EntityId) -> Option<Entity> {
        let i = self.index.remove(id)?;
        let entity = self.entities.remove(i);
        for (pos, e) in self.entities.iter().enumerate().skip(i) {
            self.index.insert(e.id.clone(), pos);
        }
        let before = self.rules.len();
        self.rules.retain(|r| r.target_id.as_ref() != Some(id));
        if self.rules.len() != before {
            log::debug!("Removed {} rule(s) targeting {}", before - self.rules.len(), id);
        }
        Some(entity)
    }

    // === Rule mutators ===

    pub fn add_rule(&mut self, kind: RuleKind) -> RuleId {
        let id = self.next_rule_id();
        self.rules.push(Rule::new(id.clone(), kind));
        id
    }

    /// Update a rule's target/value. Targets must name a live entity and
    /// only apply to kinds that take one; values are clamped and only apply
    /// to `add_score`. Returns false if the rule is unknown or the target
    /// is not a live entity.
    pub fn update_rule(&mut self, id: &RuleId, patch: &RulePatch) -> bool {
        if let Some(Some(target)) = &patch.target
            && !self.index.contains_key(target)
        {
            log::debug!("Refusing rule target {}: no such entity", target);
            return false;
        }
        let Some(rule) = self.rules.iter_mut().find(|r| &r.id == id) else {
            return false;
        };
        if let Some(target) = &patch.target
            && rule.kind.takes_target()
        {
            rule.target_id = target.clone();
        }
        if let Some(value) = patch.value
            && rule.kind.takes_value()
        {
            rule.value = Some(clamp_rule_value(value));
        }
        true
    }

    pub fn remove_rule(&mut self, id: &RuleId) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| &r.id != id);
        self.rules.len() != before
    }

    /// Set the background; invalid hex is ignored
    pub fn set_background_color(&mut self, color: &str) -> bool {
        match normalize_hex(color) {
            Some(color) => {
                self.background_color = color;
                true
            }
            None => false,
        }
    }

    // === Internals ===

    fn entity_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        let i = *self.index.get(id)?;
        self.entities.get_mut(i)
    }

    fn push_entity(&mut self, entity: Entity) {
        self.index.insert(entity.id.clone(), self.entities.len());
        self.entities.push(entity);
    }

    fn bump_counter(&mut self, kind: EntityKind) -> u32 {
        let n = self.name_counters.entry(kind).or_insert(0);
        *n += 1;
        *n
    }

    fn next_entity_id(&mut self) -> EntityId {
        loop {
            let id = EntityId::new(self.ids.next_raw());
            if !self.index.contains_key(&id) {
                return id;
            }
        }
    }

    fn next_rule_id(&mut self) -> RuleId {
        loop {
            let id = RuleId::new(self.ids.next_raw());
            if self.rule(&id).is_none() {
                return id;
            }
        }
    }
}

/// Clamp a side to `MIN_ENTITY_SIZE`; non-finite values take `fallback`
#[inline]
fn clamp_size(v: f32, fallback: f32) -> f32 {
    let v = if v.is_finite() { v } else { fallback };
    v.max(MIN_ENTITY_SIZE)
}

#[inline]
fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scene_with(kinds: &[EntityKind]) -> (Scene, Vec<EntityId>) {
        let mut scene = Scene::new(42);
        let ids = kinds
            .iter()
            .enumerate()
            .filter_map(|(i, &k)| scene.add_entity(k, i as f32 * 100.0, 0.0))
            .collect();
        (scene, ids)
    }

    #[test]
    fn test_add_entity_uses_template_and_running_names() {
        let (scene, ids) = scene_with(&[EntityKind::Coin, EntityKind::Block, EntityKind::Coin]);
        let first = scene.entity(&ids[0]).unwrap();
        assert_eq!(first.name, "Coin 1");
        assert_eq!(first.size(), Vec2::new(30.0, 30.0));
        assert_eq!(first.color, "#fbbf24");
        assert_eq!(scene.entity(&ids[1]).unwrap().name, "Block 1");
        assert_eq!(scene.entity(&ids[2]).unwrap().name, "Coin 2");
    }

    #[test]
    fn test_running_count_survives_deletes() {
        let (mut scene, ids) = scene_with(&[EntityKind::Enemy, EntityKind::Enemy]);
        scene.delete_entity(&ids[1]);
        let id = scene.add_entity(EntityKind::Enemy, 0.0, 0.0).unwrap();
        assert_eq!(scene.entity(&id).unwrap().name, "Enemy 3");
    }

    #[test]
    fn test_second_player_refused() {
        let (mut scene, _) = scene_with(&[EntityKind::Player]);
        assert!(scene.add_entity(EntityKind::Player, 5.0, 5.0).is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_ids_are_unique() {
        let (scene, ids) = scene_with(&[EntityKind::Block; 50]);
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 50);
        assert_eq!(scene.len(), 50);
    }

    #[test]
    fn test_unknown_id_is_a_no_op() {
        let (mut scene, _) = scene_with(&[EntityKind::Block]);
        let before = scene.entities().to_vec();
        let ghost = EntityId::new("ghost");
        assert!(!scene.move_entity(&ghost, 1.0, 1.0));
        assert!(!scene.resize_entity(&ghost, 100.0, 100.0));
        assert!(!scene.update_entity(&ghost, &EntityPatch { x: Some(3.0), ..Default::default() }));
        assert!(scene.delete_entity(&ghost).is_none());
        assert!(!scene.remove_rule(&RuleId::new("ghost")));
        assert_eq!(scene.entities(), &before[..]);
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let (mut scene, ids) = scene_with(&[EntityKind::Block]);
        scene.resize_entity(&ids[0], 5.0, f32::NAN);
        let e = scene.entity(&ids[0]).unwrap();
        assert_eq!((e.width, e.height), (20.0, 20.0));
    }

    #[test]
    fn test_empty_patch_is_idempotent() {
        let (mut scene, ids) = scene_with(&[EntityKind::Goal]);
        let before = serde_json::to_string(scene.entity(&ids[0]).unwrap()).unwrap();
        assert!(scene.update_entity(&ids[0], &EntityPatch::default()));
        let after = serde_json::to_string(scene.entity(&ids[0]).unwrap()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_update_entity_partial_fields() {
        let (mut scene, ids) = scene_with(&[EntityKind::Block]);
        let patch = EntityPatch {
            name: Some("Wall".into()),
            width: Some(3.0),
            color: Some("#ABC".into()),
            ..Default::default()
        };
        scene.update_entity(&ids[0], &patch);
        let e = scene.entity(&ids[0]).unwrap();
        assert_eq!(e.name, "Wall");
        assert_eq!(e.width, 20.0);
        assert_eq!(e.height, 60.0);
        assert_eq!(e.color, "#aabbcc");

        scene.update_entity(&ids[0], &EntityPatch { color: Some("nope".into()), ..Default::default() });
        assert_eq!(scene.entity(&ids[0]).unwrap().color, "#aabbcc");
    }

    #[test]
    fn test_delete_keeps_index_consistent() {
        let (mut scene, ids) = scene_with(&[EntityKind::Block, EntityKind::Coin, EntityKind::Goal]);
        scene.delete_entity(&ids[0]);
        assert!(scene.move_entity(&ids[2], 7.0, 8.0));
        let goal = scene.entity(&ids[2]).unwrap();
        assert_eq!(goal.kind, EntityKind::Goal);
        assert_eq!(goal.position(), Vec2::new(7.0, 8.0));
        assert_eq!(scene.entities()[0].id, ids[1]);
    }

    #[test]
    fn test_delete_purges_rule_targets() {
        let (mut scene, ids) = scene_with(&[EntityKind::Coin, EntityKind::Enemy]);
        let touch = scene.add_rule(RuleKind::WhenTouch);
        let collect = scene.add_rule(RuleKind::Collect);
        let score = scene.add_rule(RuleKind::AddScore);
        let target = |id: &EntityId| RulePatch { target: Some(Some(id.clone())), value: None };
        assert!(scene.update_rule(&touch, &target(&ids[0])));
        assert!(scene.update_rule(&collect, &target(&ids[1])));

        scene.delete_entity(&ids[0]);
        assert!(scene.rule(&touch).is_none());
        assert!(scene.rule(&collect).is_some());
        assert!(scene.rule(&score).is_some());
        assert!(scene.rules().iter().all(|r| r.target_id.as_ref() != Some(&ids[0])));
    }

    #[test]
    fn test_update_rule_validation() {
        let (mut scene, ids) = scene_with(&[EntityKind::Coin]);
        let score = scene.add_rule(RuleKind::AddScore);
        let touch = scene.add_rule(RuleKind::WhenTouch);

        assert!(!scene.update_rule(&touch, &RulePatch { target: Some(Some(EntityId::new("nope"))), value: None }));
        assert!(scene.update_rule(&score, &RulePatch { target: Some(Some(ids[0].clone())), value: Some(0) }));
        let rule = scene.rule(&score).unwrap();
        assert_eq!(rule.target_id, None);
        assert_eq!(rule.value, Some(1));

        assert!(scene.update_rule(&touch, &RulePatch { target: Some(Some(ids[0].clone())), value: Some(99) }));
        let rule = scene.rule(&touch).unwrap();
        assert_eq!(rule.target_id.as_ref(), Some(&ids[0]));
        assert_eq!(rule.value, None);

        assert!(scene.update_rule(&touch, &RulePatch { target: Some(None), value: None }));
        assert_eq!(scene.rule(&touch).unwrap().target_id, None);
        assert!(scene.remove_rule(&touch));
        assert_eq!(scene.rules().len(), 1);
    }

    #[test]
    fn test_entity_at_prefers_topmost() {
        let mut scene = Scene::new(1);
        let below = scene.add_entity(EntityKind::Block, 0.0, 0.0).unwrap();
        let above = scene.add_entity(EntityKind::Coin, 10.0, 10.0).unwrap();
        assert_eq!(scene.entity_at(Vec2::new(15.0, 15.0)).unwrap().id, above);
        assert_eq!(scene.entity_at(Vec2::new(5.0, 5.0)).unwrap().id, below);
        assert!(scene.entity_at(Vec2::new(500.0, 5.0)).is_none());
    }

    #[test]
    fn test_hydrate_repairs_invariants() {
        let drafts = vec![
            EntityDraft { id: Some("a".into()), kind: EntityKind::Player, ..Default::default() },
            EntityDraft { id: Some("a".into()), kind: EntityKind::Player, width: Some(4.0), ..Default::default() },
            EntityDraft { id: None, kind: EntityKind::Coin, name: Some("Shiny".into()), ..Default::default() },
        ];
        let rules = vec![
            RuleDraft { id: None, kind: RuleKind::Collect, target_id: Some("a".into()), value: None },
            RuleDraft { id: Some("r".into()), kind: RuleKind::WhenTouch, target_id: Some("missing".into()), value: None },
            RuleDraft { id: None, kind: RuleKind::AddScore, target_id: None, value: Some(5000) },
        ];
        let scene = Scene::hydrate(drafts, rules, Some("#0f172a".into()), 3);

        assert_eq!(scene.len(), 3);
        assert_eq!(scene.entities()[0].name, "Player 1");
        let demoted = &scene.entities()[1];
        assert_eq!(demoted.kind, GENERIC_KIND);
        assert_ne!(demoted.id.as_str(), "a");
        assert_eq!(demoted.width, 20.0);
        assert_eq!(demoted.height, 60.0);
        assert_eq!(scene.entities()[2].name, "Shiny");
        assert_eq!(scene.background_color(), "#0f172a");

        assert_eq!(scene.rules().len(), 2);
        assert_eq!(scene.rules()[1].value, Some(1000));
    }

    #[test]
    fn test_hydrate_rejects_bad_colors_and_sizes() {
        let drafts = vec![EntityDraft {
            kind: EntityKind::Enemy,
            width: Some(f32::INFINITY),
            height: Some(f32::NAN),
            color: Some("banana".into()),
            ..Default::default()
        }];
        let scene = Scene::hydrate(drafts, Vec::new(), Some("banana".into()), 1);
        let enemy = &scene.entities()[0];
        assert_eq!(enemy.size(), EntityKind::Enemy.template().size());
        assert_eq!(enemy.color, EntityKind::Enemy.template().color);
        assert_eq!(scene.background_color(), DEFAULT_BACKGROUND);

        let scene = Scene::hydrate(Vec::new(), Vec::new(), Some("0F0".into()), 1);
        assert_eq!(scene.background_color(), "#00ff00");
    }

    #[test]
    fn test_infinite_sizes_are_not_stored() {
        let (mut scene, ids) = scene_with(&[EntityKind::Block]);
        scene.resize_entity(&ids[0], f32::INFINITY, f32::NEG_INFINITY);
        scene.update_entity(&ids[0], &EntityPatch { width: Some(f32::INFINITY), ..Default::default() });
        let e = scene.entity(&ids[0]).unwrap();
        assert!(e.width.is_finite() && e.height.is_finite());
        assert_eq!((e.width, e.height), (MIN_ENTITY_SIZE, MIN_ENTITY_SIZE));
    }

    proptest! {
        #[test]
        fn prop_resize_never_below_minimum(w in -1000.0f32..1000.0, h in -1000.0f32..1000.0) {
            let (mut scene, ids) = scene_with(&[EntityKind::Platform]);
            scene.resize_entity(&ids[0], w, h);
            let e = scene.entity(&ids[0]).unwrap();
            prop_assert!(e.width >= MIN_ENTITY_SIZE && e.height >= MIN_ENTITY_SIZE);
        }
    }
}
