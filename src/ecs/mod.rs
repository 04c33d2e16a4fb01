pub mod component;
pub mod entity;
pub mod manager;

// Re-export common components
pub use self::component::{
    ChesspieceComponent, Component, ComponentKind, ComponentType, PieceColor, PieceType,
    SpriteComponent, SquareComponent, SquareShade, TransformComponent,
};
pub use self::entity::{Entity, EntityId, Layer, Lifecycle};
pub use self::manager::EntityManager;
