use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;

use super::entity::Entity;
use crate::board::BoardCell;
use crate::geometry::{Rect, Vec2};
use crate::render::Renderer;

/// Enum defining all possible component kinds
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ComponentType {
    Transform,
    Sprite,
    Chesspiece,
    Square,
}

/// Trait that all components must implement
pub trait Component: Any {
    /// Get the kind of this component
    fn component_type(&self) -> ComponentType;

    /// Called once, right after the component is attached to its entity
    fn initialize(&mut self) {}

    fn update(&mut self, _delta_time: f32) {}

    /// Draw this component. `owner` gives read access to sibling components.
    fn render(&self, _owner: &Entity, _renderer: &mut dyn Renderer) {}

    /// Convert to Any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Convert to mutable Any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Kind lookup without an instance, used by typed queries on [`Entity`]
pub trait ComponentKind: Component {
    const KIND: ComponentType;
}

/// Transform component: where an entity sits on screen and how big it is
#[derive(Clone, Debug, PartialEq)]
pub struct TransformComponent {
    pub position: Vec2,
    pub velocity: Vec2,
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl TransformComponent {
    pub fn new(position: Vec2, width: f32, height: f32, scale: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            width,
            height,
            scale,
        }
    }

    /// Screen rectangle covered by the entity
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.width * self.scale,
            self.height * self.scale,
        )
    }
}

impl Component for TransformComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Transform
    }

    fn update(&mut self, delta_time: f32) {
        self.position = self.position + self.velocity * delta_time;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ComponentKind for TransformComponent {
    const KIND: ComponentType = ComponentType::Transform;
}

/// Sprite component: draws a texture into the owner's transform bounds
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteComponent {
    pub texture_id: String,
    pub source: Option<Rect>,
}

impl SpriteComponent {
    pub fn new(texture_id: impl Into<String>) -> Self {
        Self {
            texture_id: texture_id.into(),
            source: None,
        }
    }

    pub fn with_source(texture_id: impl Into<String>, source: Rect) -> Self {
        Self {
            texture_id: texture_id.into(),
            source: Some(source),
        }
    }
}

impl Component for SpriteComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Sprite
    }

    fn render(&self, owner: &Entity, renderer: &mut dyn Renderer) {
        // Nothing to place the sprite against
        let Ok(transform) = owner.get_component::<TransformComponent>() else {
            return;
        };
        renderer.draw_texture(&self.texture_id, self.source, transform.bounds());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ComponentKind for SpriteComponent {
    const KIND: ComponentType = ComponentType::Sprite;
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceType::Pawn => "pawn",
            PieceType::Rook => "rook",
            PieceType::Knight => "knight",
            PieceType::Bishop => "bishop",
            PieceType::Queen => "queen",
            PieceType::King => "king",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    pub fn opponent(self) -> PieceColor {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceColor::White => f.write_str("white"),
            PieceColor::Black => f.write_str("black"),
        }
    }
}

/// Chess piece state: what the piece is and whether it has been taken
#[derive(Clone, Debug, PartialEq)]
pub struct ChesspieceComponent {
    pub piece_type: PieceType,
    pub color: PieceColor,
    pub killed: bool,
}

impl ChesspieceComponent {
    pub fn new(piece_type: PieceType, color: PieceColor, killed: bool) -> Self {
        Self {
            piece_type,
            color,
            killed,
        }
    }

    /// Texture id of the piece's sprite, e.g. `white_pawn`
    pub fn asset_id(&self) -> String {
        format!("{}_{}", self.color, self.piece_type)
    }
}

impl Component for ChesspieceComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Chesspiece
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ComponentKind for ChesspieceComponent {
    const KIND: ComponentType = ComponentType::Chesspiece;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SquareShade {
    Light,
    Dark,
}

/// Board square marker: which cell a square entity stands for
#[derive(Clone, Debug, PartialEq)]
pub struct SquareComponent {
    pub cell: BoardCell,
    pub shade: SquareShade,
}

impl SquareComponent {
    pub fn new(cell: BoardCell) -> Self {
        // a1 is dark
        let shade = if (cell.file() + cell.rank()) % 2 == 0 {
            SquareShade::Dark
        } else {
            SquareShade::Light
        };
        Self { cell, shade }
    }
}

impl Component for SquareComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Square
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ComponentKind for SquareComponent {
    const KIND: ComponentType = ComponentType::Square;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_id_joins_color_and_type() {
        let piece = ChesspieceComponent::new(PieceType::Pawn, PieceColor::White, false);
        assert_eq!(piece.asset_id(), "white_pawn");
        let piece = ChesspieceComponent::new(PieceType::Knight, PieceColor::Black, false);
        assert_eq!(piece.asset_id(), "black_knight");
    }

    #[test]
    fn transform_update_integrates_velocity() {
        let mut transform = TransformComponent::new(Vec2::new(10.0, 10.0), 8.0, 8.0, 1.0);
        transform.velocity = Vec2::new(100.0, -20.0);
        transform.update(0.05);
        assert_eq!(transform.position, Vec2::new(15.0, 9.0));
    }

    #[test]
    fn bounds_apply_scale() {
        let transform = TransformComponent::new(Vec2::new(4.0, 6.0), 10.0, 20.0, 2.0);
        assert_eq!(transform.bounds(), Rect::new(4.0, 6.0, 20.0, 40.0));
    }

    #[test]
    fn square_shades_alternate() {
        let a1 = BoardCell::new(1, 1).unwrap();
        let b1 = BoardCell::new(2, 1).unwrap();
        assert_eq!(SquareComponent::new(a1).shade, SquareShade::Dark);
        assert_eq!(SquareComponent::new(b1).shade, SquareShade::Light);
    }

    #[test]
    fn colors_parse_from_lowercase_names() {
        let color: PieceColor = serde_json::from_str("\"black\"").unwrap();
        assert_eq!(color, PieceColor::Black);
        assert_eq!(color.opponent(), PieceColor::White);
        let kind: PieceType = serde_json::from_str("\"queen\"").unwrap();
        assert_eq!(kind, PieceType::Queen);
    }
}
