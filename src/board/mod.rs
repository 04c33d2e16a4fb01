use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ecs::{
    EntityManager, Layer, SpriteComponent, SquareComponent, SquareShade, TransformComponent,
};
use crate::error::{BoardError, EcsResult};
use crate::geometry::{Rect, Vec2};

pub const BOARD_SIZE: u8 = 8;

/// A square of the 8x8 grid. Files and ranks are 1-based; file 1 is `a`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct BoardCell {
    file: u8,
    rank: u8,
}

impl BoardCell {
    pub fn new(file: u8, rank: u8) -> Result<Self, BoardError> {
        if !(1..=BOARD_SIZE).contains(&file) || !(1..=BOARD_SIZE).contains(&rank) {
            return Err(BoardError::InvalidBoardCell(format!("({file}, {rank})")));
        }
        Ok(Self { file, rank })
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// Every cell, rank 8 first, files a to h within a rank
    pub fn all() -> impl Iterator<Item = BoardCell> {
        (1..=BOARD_SIZE)
            .rev()
            .flat_map(|rank| (1..=BOARD_SIZE).map(move |file| BoardCell { file, rank }))
    }
}

impl fmt::Display for BoardCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file - 1) as char, self.rank)
    }
}

impl FromStr for BoardCell {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BoardError::InvalidBoardCell(s.to_string());
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        BoardCell::new(file - b'a' + 1, rank - b'0')
    }
}

impl TryFrom<String> for BoardCell {
    type Error = BoardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BoardCell> for String {
    fn from(cell: BoardCell) -> String {
        cell.to_string()
    }
}

/// Where the board sits on screen and which texture its squares use
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BoardGeometry {
    pub texture_id: String,
    pub square_side: f32,
    pub offset: Vec2,
    /// Side of one tile inside the squares texture: light tile first, dark second
    pub tile_size: f32,
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self {
            texture_id: "board_squares".to_string(),
            square_side: 64.0,
            offset: Vec2::new(44.0, 44.0),
            tile_size: 64.0,
        }
    }
}

/// The 8x8 grid: builds the square entities and translates between
/// screen positions and board cells. White is at the bottom of the screen.
#[derive(Clone, Debug)]
pub struct ChessBoard {
    geometry: BoardGeometry,
}

impl ChessBoard {
    pub fn new(geometry: BoardGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    /// Create the 64 square entities
    pub fn load_board(&self, manager: &mut EntityManager) -> EcsResult<()> {
        let side = self.geometry.square_side;
        let tile = self.geometry.tile_size;

        for cell in BoardCell::all() {
            let square = SquareComponent::new(cell);
            let tile_x = match square.shade {
                SquareShade::Light => 0.0,
                SquareShade::Dark => tile,
            };

            let entity = manager.add_entity(cell.to_string(), Layer::BoardSquare);
            entity.add_component(TransformComponent::new(
                self.square_position(cell),
                side,
                side,
                1.0,
            ))?;
            entity.add_component(SpriteComponent::with_source(
                self.geometry.texture_id.clone(),
                Rect::new(tile_x, 0.0, tile, tile),
            ))?;
            entity.add_component(square)?;
        }

        log::info!(
            "board loaded: {} squares of {}px at ({}, {})",
            BOARD_SIZE as usize * BOARD_SIZE as usize,
            side,
            self.geometry.offset.x,
            self.geometry.offset.y
        );
        Ok(())
    }

    /// Screen-space bounds of the whole board
    pub fn bounds(&self) -> Rect {
        let extent = self.geometry.square_side * BOARD_SIZE as f32;
        Rect::new(
            self.geometry.offset.x,
            self.geometry.offset.y,
            extent,
            extent,
        )
    }

    /// Top-left corner of a square
    pub fn square_position(&self, cell: BoardCell) -> Vec2 {
        let column = (cell.file - 1) as f32;
        let row = (BOARD_SIZE - cell.rank) as f32;
        self.geometry.offset + Vec2::new(column, row) * self.geometry.square_side
    }

    pub fn square_bounds(&self, cell: BoardCell) -> Rect {
        let position = self.square_position(cell);
        let side = self.geometry.square_side;
        Rect::new(position.x, position.y, side, side)
    }

    /// Top-left corner for a piece of side `piece_side`, centered on its square
    pub fn piece_position(&self, cell: BoardCell, piece_side: f32) -> Vec2 {
        let inset = (self.geometry.square_side - piece_side) / 2.0;
        self.square_position(cell) + Vec2::new(inset, inset)
    }

    /// Cell under a screen position, `None` outside the board
    pub fn cell_at(&self, point: Vec2) -> Option<BoardCell> {
        if !self.bounds().contains(point) {
            return None;
        }
        let local = point - self.geometry.offset;
        let side = self.geometry.square_side;
        let column = ((local.x / side) as u8).min(BOARD_SIZE - 1);
        let row = ((local.y / side) as u8).min(BOARD_SIZE - 1);
        BoardCell::new(column + 1, BOARD_SIZE - row).ok()
    }

    /// Cell under the center of a transform
    pub fn cell_of(&self, transform: &TransformComponent) -> Option<BoardCell> {
        self.cell_at(transform.bounds().center())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::ComponentType;

    fn board() -> ChessBoard {
        ChessBoard::new(BoardGeometry {
            texture_id: "board_squares".to_string(),
            square_side: 50.0,
            offset: Vec2::new(20.0, 10.0),
            tile_size: 32.0,
        })
    }

    fn cell(name: &str) -> BoardCell {
        name.parse().unwrap()
    }

    #[test]
    fn algebraic_notation_round_trips_through_display() {
        let e2 = cell("e2");
        assert_eq!((e2.file(), e2.rank()), (5, 2));
        assert_eq!(e2.to_string(), "e2");
        assert_eq!(cell("H8"), BoardCell::new(8, 8).unwrap());
    }

    #[test]
    fn malformed_cells_are_rejected() {
        for bad in ["", "i1", "a9", "a0", "e22", "22"] {
            assert!(
                matches!(bad.parse::<BoardCell>(), Err(BoardError::InvalidBoardCell(_))),
                "{bad} should not parse"
            );
        }
        assert!(BoardCell::new(0, 4).is_err());
        assert!(BoardCell::new(4, 9).is_err());
    }

    #[test]
    fn squares_are_laid_out_with_white_at_the_bottom() {
        let board = board();
        assert_eq!(board.square_position(cell("a8")), Vec2::new(20.0, 10.0));
        assert_eq!(board.square_position(cell("h8")), Vec2::new(370.0, 10.0));
        assert_eq!(board.square_position(cell("a1")), Vec2::new(20.0, 360.0));
        assert_eq!(board.square_position(cell("a2")), Vec2::new(20.0, 310.0));
    }

    #[test]
    fn screen_positions_map_back_to_cells() {
        let board = board();
        for c in BoardCell::all() {
            let center = board.square_bounds(c).center();
            assert_eq!(board.cell_at(center), Some(c));
        }
        // Top-left corner belongs to the square, bottom-right edge does not
        assert_eq!(board.cell_at(Vec2::new(20.0, 10.0)), Some(cell("a8")));
        assert_eq!(board.cell_at(Vec2::new(419.9, 409.9)), Some(cell("h1")));
    }

    #[test]
    fn off_board_positions_have_no_cell() {
        let board = board();
        assert_eq!(board.cell_at(Vec2::new(19.0, 100.0)), None);
        assert_eq!(board.cell_at(Vec2::new(100.0, 5.0)), None);
        assert_eq!(board.cell_at(Vec2::new(420.0, 100.0)), None);
        assert_eq!(board.cell_at(Vec2::new(100.0, 410.0)), None);
        assert_eq!(board.cell_at(Vec2::new(-1000.0, -1000.0)), None);
    }

    #[test]
    fn pieces_are_centered_on_their_square() {
        let board = board();
        let position = board.piece_position(cell("a8"), 40.0);
        assert_eq!(position, Vec2::new(25.0, 15.0));
        let transform = TransformComponent::new(position, 40.0, 40.0, 1.0);
        assert_eq!(board.cell_of(&transform), Some(cell("a8")));
    }

    #[test]
    fn load_board_creates_sixty_four_squares() {
        let board = board();
        let mut manager = EntityManager::new();
        board.load_board(&mut manager).unwrap();

        let squares: Vec<_> = manager.get_entities(Layer::BoardSquare).collect();
        assert_eq!(squares.len(), 64);
        assert_eq!(manager.get_entities(Layer::ChessPiece).count(), 0);

        let e4 = manager.get_entity_by_name("e4").unwrap();
        assert!(e4.has_component(ComponentType::Square));
        let transform = e4.get_component::<TransformComponent>().unwrap();
        assert_eq!(transform.position, board.square_position(cell("e4")));
        assert_eq!(e4.get_component::<SquareComponent>().unwrap().cell, cell("e4"));

        let a1 = manager.get_entity_by_name("a1").unwrap();
        let sprite = a1.get_component::<SpriteComponent>().unwrap();
        assert_eq!(sprite.source, Some(Rect::new(32.0, 0.0, 32.0, 32.0)));
    }
}
