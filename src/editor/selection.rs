//! Single-entity selection

use crate::scene::{EntityId, Scene};

/// At most one selected entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(Option<EntityId>);

impl Selection {
    pub fn get(&self) -> Option<&EntityId> {
        self.0.as_ref()
    }

    pub fn is_selected(&self, id: &EntityId) -> bool {
        self.0.as_ref() == Some(id)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Returns true if the selection changed
    pub fn select(&mut self, id: EntityId) -> bool {
        if self.is_selected(&id) {
            return false;
        }
        self.0 = Some(id);
        true
    }

    /// Returns true if something was selected
    pub fn clear(&mut self) -> bool {
        self.0.take().is_some()
    }

    /// Drop the selection if its entity no longer exists
    pub fn prune(&mut self, scene: &Scene) -> bool {
        match &self.0 {
            Some(id) if !scene.contains(id) => self.clear(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EntityKind;

    #[test]
    fn test_select_reports_changes() {
        let mut selection = Selection::default();
        assert!(selection.select(EntityId::new("a")));
        assert!(!selection.select(EntityId::new("a")));
        assert!(selection.select(EntityId::new("b")));
        assert!(selection.clear());
        assert!(!selection.clear());
    }

    #[test]
    fn test_prune_drops_deleted_entity() {
        let mut scene = Scene::new(0);
        let id = scene.add_entity(EntityKind::Coin, 0.0, 0.0).unwrap();
        let mut selection = Selection::default();
        selection.select(id.clone());
        assert!(!selection.prune(&scene));
        scene.delete_entity(&id);
        assert!(selection.prune(&scene));
        assert!(selection.is_empty());
    }
}
