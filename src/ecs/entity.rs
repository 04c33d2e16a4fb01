use std::collections::HashMap;

use super::component::{Component, ComponentKind, ComponentType};
use crate::error::{EcsError, EcsResult};
use crate::render::Renderer;

/// Unique identifier for entities
pub type EntityId = u64;

/// Layer an entity belongs to; fixed at creation
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Layer {
    BoardSquare,
    ChessPiece,
}

/// Where an entity is in its life.
///
/// `Inactive` entities stay in storage and stay queryable; only
/// `PendingRemoval` entities are swept by the manager.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Lifecycle {
    Active,
    Inactive,
    PendingRemoval,
}

/// Entity struct representing a game object
pub struct Entity {
    id: EntityId,
    name: String,
    layer: Layer,
    lifecycle: Lifecycle,
    // Insertion order is update/render order
    components: Vec<Box<dyn Component>>,
    component_types: HashMap<ComponentType, usize>,
}

impl Entity {
    pub(crate) fn new(id: EntityId, name: impl Into<String>, layer: Layer) -> Self {
        Self {
            id,
            name: name.into(),
            layer,
            lifecycle: Lifecycle::Active,
            components: Vec::new(),
            component_types: HashMap::new(),
        }
    }

    /// Get the entity's unique ID
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    /// Soft delete: the entity stops updating and rendering but stays stored
    pub fn destroy(&mut self) {
        if self.lifecycle == Lifecycle::Active {
            self.lifecycle = Lifecycle::Inactive;
        }
    }

    pub fn activate(&mut self) {
        if self.lifecycle == Lifecycle::Inactive {
            self.lifecycle = Lifecycle::Active;
        }
    }

    /// Flag the entity for the manager's next removal sweep
    pub fn mark_for_removal(&mut self) {
        self.lifecycle = Lifecycle::PendingRemoval;
    }

    /// Attach a component, initialize it and return it.
    ///
    /// At most one component per kind: a second one is rejected with
    /// [`EcsError::DuplicateComponent`] and the first one is kept.
    pub fn add_component<T: ComponentKind>(&mut self, component: T) -> EcsResult<&mut T> {
        if self.component_types.contains_key(&T::KIND) {
            return Err(EcsError::DuplicateComponent {
                entity: self.name.clone(),
                kind: T::KIND,
            });
        }

        let index = self.components.len();
        self.components.push(Box::new(component));
        self.component_types.insert(T::KIND, index);

        let component = &mut self.components[index];
        component.initialize();
        Ok(component
            .as_any_mut()
            .downcast_mut::<T>()
            .expect("component stored under its own kind"))
    }

    /// Check if entity has a specific component
    pub fn has_component(&self, component_type: ComponentType) -> bool {
        self.component_types.contains_key(&component_type)
    }

    pub fn get_component<T: ComponentKind>(&self) -> EcsResult<&T> {
        self.component_types
            .get(&T::KIND)
            .and_then(|&index| self.components[index].as_any().downcast_ref::<T>())
            .ok_or_else(|| not_found(&self.name, T::KIND))
    }

    pub fn get_component_mut<T: ComponentKind>(&mut self) -> EcsResult<&mut T> {
        let components = &mut self.components;
        self.component_types
            .get(&T::KIND)
            .and_then(|&index| components[index].as_any_mut().downcast_mut::<T>())
            .ok_or_else(|| not_found(&self.name, T::KIND))
    }

    /// Kinds registered on this entity, in insertion order
    pub fn component_kinds(&self) -> Vec<ComponentType> {
        self.components.iter().map(|c| c.component_type()).collect()
    }

    pub fn list_all_components(&self) {
        log::debug!("entity '{}' ({:?})", self.name, self.layer);
        for kind in self.component_kinds() {
            log::debug!("      Component<{:?}>", kind);
        }
    }

    pub fn update(&mut self, delta_time: f32) {
        if !self.is_active() {
            return;
        }

        for component in &mut self.components {
            component.update(delta_time);
        }
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        if !self.is_active() {
            return;
        }

        for component in &self.components {
            component.render(self, renderer);
        }
    }
}

fn not_found(entity: &str, kind: ComponentType) -> EcsError {
    EcsError::ComponentNotFound {
        entity: entity.to_string(),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::{
        ChesspieceComponent, PieceColor, PieceType, SpriteComponent, TransformComponent,
    };
    use crate::geometry::{Rect, Vec2};
    use crate::render::RecordingRenderer;

    fn piece() -> Entity {
        let mut entity = Entity::new(0, "white_pawn_a", Layer::ChessPiece);
        entity
            .add_component(TransformComponent::new(Vec2::new(0.0, 0.0), 10.0, 10.0, 1.0))
            .unwrap();
        entity.add_component(SpriteComponent::new("white_pawn")).unwrap();
        entity
    }

    #[test]
    fn duplicate_kind_is_rejected_and_original_kept() {
        let mut entity = piece();
        let err = entity
            .add_component(SpriteComponent::new("black_queen"))
            .unwrap_err();
        assert_eq!(
            err,
            EcsError::DuplicateComponent {
                entity: "white_pawn_a".to_string(),
                kind: ComponentType::Sprite,
            }
        );
        assert_eq!(
            entity.get_component::<SpriteComponent>().unwrap().texture_id,
            "white_pawn"
        );
        assert_eq!(
            entity.component_kinds(),
            vec![ComponentType::Transform, ComponentType::Sprite]
        );
    }

    #[test]
    fn missing_component_is_reported() {
        let mut entity = piece();
        assert_eq!(
            entity.get_component_mut::<ChesspieceComponent>().unwrap_err(),
            EcsError::ComponentNotFound {
                entity: "white_pawn_a".to_string(),
                kind: ComponentType::Chesspiece,
            }
        );
        assert!(matches!(
            entity.get_component::<ChesspieceComponent>(),
            Err(EcsError::ComponentNotFound {
                kind: ComponentType::Chesspiece,
                ..
            })
        ));
        assert!(!entity.has_component(ComponentType::Chesspiece));
    }

    #[test]
    fn components_are_mutable_in_place() {
        let mut entity = piece();
        entity
            .add_component(ChesspieceComponent::new(PieceType::Pawn, PieceColor::White, false))
            .unwrap();
        entity.get_component_mut::<ChesspieceComponent>().unwrap().killed = true;
        assert!(entity.get_component::<ChesspieceComponent>().unwrap().killed);
    }

    #[test]
    fn destroyed_entity_neither_updates_nor_renders() {
        let mut entity = piece();
        entity.get_component_mut::<TransformComponent>().unwrap().velocity = Vec2::new(10.0, 0.0);
        entity.destroy();
        assert_eq!(entity.lifecycle(), Lifecycle::Inactive);

        entity.update(1.0);
        let mut renderer = RecordingRenderer::new();
        entity.render(&mut renderer);

        assert_eq!(
            entity.get_component::<TransformComponent>().unwrap().position,
            Vec2::ZERO
        );
        assert!(renderer.calls.is_empty());

        entity.activate();
        entity.update(1.0);
        entity.render(&mut renderer);
        assert_eq!(
            entity.get_component::<TransformComponent>().unwrap().position,
            Vec2::new(10.0, 0.0)
        );
        assert_eq!(renderer.textures_drawn(), vec!["white_pawn"]);
    }

    #[test]
    fn sprite_draws_into_transform_bounds() {
        let entity = piece();
        let mut renderer = RecordingRenderer::new();
        entity.render(&mut renderer);
        assert_eq!(
            renderer.calls,
            vec![crate::render::DrawCall::Texture {
                texture_id: "white_pawn".to_string(),
                source: None,
                destination: Rect::new(0.0, 0.0, 10.0, 10.0),
            }]
        );
    }

    #[test]
    fn activate_does_not_resurrect_pending_removal() {
        let mut entity = piece();
        entity.mark_for_removal();
        entity.activate();
        entity.destroy();
        assert_eq!(entity.lifecycle(), Lifecycle::PendingRemoval);
    }
}
