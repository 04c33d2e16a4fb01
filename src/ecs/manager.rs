use super::entity::{Entity, EntityId, Layer, Lifecycle};
use crate::render::Renderer;

/// Owns every entity of a session and drives the per-frame passes
#[derive(Default)]
pub struct EntityManager {
    // Creation order
    entities: Vec<Entity>,
    next_entity_id: EntityId,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new active entity and return it
    pub fn add_entity(&mut self, name: impl Into<String>, layer: Layer) -> &mut Entity {
        let entity_id = self.next_entity_id;
        self.next_entity_id += 1;

        let index = self.entities.len();
        self.entities.push(Entity::new(entity_id, name, layer));
        &mut self.entities[index]
    }

    /// All entities tagged with `layer`, active or not, in creation order
    pub fn get_entities(&self, layer: Layer) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter(move |entity| entity.layer() == layer)
    }

    pub fn get_entities_mut(&mut self, layer: Layer) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities
            .iter_mut()
            .filter(move |entity| entity.layer() == layer)
    }

    pub fn get_entity(&self, entity_id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id() == entity_id)
    }

    pub fn get_entity_mut(&mut self, entity_id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id() == entity_id)
    }

    pub fn get_entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.name() == name)
    }

    /// True when no entity is active or pending removal. Soft-destroyed
    /// entities stay stored but do not count.
    pub fn has_no_entities(&self) -> bool {
        !self
            .entities
            .iter()
            .any(|entity| entity.lifecycle() != Lifecycle::Inactive)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Update active entities, then drop the ones flagged for removal
    pub fn update(&mut self, delta_time: f32) {
        for entity in &mut self.entities {
            entity.update(delta_time);
        }
        self.destroy_inactive_entities();
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        for entity in &self.entities {
            entity.render(renderer);
        }
    }

    /// Soft-destroy every entity; nothing is released until flagged for removal
    pub fn clear_data(&mut self) {
        for entity in &mut self.entities {
            entity.destroy();
        }
    }

    pub fn list_all_entities(&self) {
        for entity in &self.entities {
            entity.list_all_components();
        }
    }

    fn destroy_inactive_entities(&mut self) {
        let before = self.entities.len();
        self.entities
            .retain(|entity| entity.lifecycle() != Lifecycle::PendingRemoval);
        let removed = before - self.entities.len();
        if removed > 0 {
            log::debug!("removed {} entities", removed);
        }
    }
}
