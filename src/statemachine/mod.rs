//! Turn engine.
//!
//! Two turn states, `WhiteTurn` and `BlackTurn`, each carrying the
//! selection bookkeeping as a field rather than as separate states. Mouse
//! input is turned into a [`Click`] on a board cell, fed through the pure
//! [`transition`] function, and the resulting [`Effect`]s are applied to the
//! entities.

use crate::board::{BoardCell, ChessBoard};
use crate::ecs::{
    ChesspieceComponent, Entity, EntityId, EntityManager, Layer, PieceColor, TransformComponent,
};
use crate::geometry::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Idle,
    Selected { piece: EntityId, from: BoardCell },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnState {
    WhiteTurn(Selection),
    BlackTurn(Selection),
}

impl TurnState {
    pub fn turn(color: PieceColor, selection: Selection) -> Self {
        match color {
            PieceColor::White => TurnState::WhiteTurn(selection),
            PieceColor::Black => TurnState::BlackTurn(selection),
        }
    }

    pub fn color(&self) -> PieceColor {
        match self {
            TurnState::WhiteTurn(_) => PieceColor::White,
            TurnState::BlackTurn(_) => PieceColor::Black,
        }
    }

    pub fn selection(&self) -> Selection {
        match self {
            TurnState::WhiteTurn(selection) | TurnState::BlackTurn(selection) => *selection,
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        TurnState::WhiteTurn(Selection::Idle)
    }
}

/// A live piece standing on a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Occupant {
    pub piece: EntityId,
    pub color: PieceColor,
}

/// A button release over a board cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Click {
    pub cell: BoardCell,
    pub occupant: Option<Occupant>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Reposition { piece: EntityId, to: BoardCell },
    Capture { piece: EntityId },
    PassTurn,
}

/// Next state and the side effects for one click. Illegal input leaves the
/// state as it is and produces no effects.
pub fn transition(state: TurnState, click: Click) -> (TurnState, Vec<Effect>) {
    let color = state.color();

    match state.selection() {
        Selection::Idle => match click.occupant {
            Some(occupant) if occupant.color == color => {
                let selection = Selection::Selected {
                    piece: occupant.piece,
                    from: click.cell,
                };
                (TurnState::turn(color, selection), Vec::new())
            }
            _ => (state, Vec::new()),
        },
        Selection::Selected { piece, from } => {
            if click.cell == from {
                return (TurnState::turn(color, Selection::Idle), Vec::new());
            }

            let mut effects = Vec::with_capacity(3);
            match click.occupant {
                Some(occupant) if occupant.color == color => return (state, Vec::new()),
                Some(occupant) => effects.push(Effect::Capture {
                    piece: occupant.piece,
                }),
                None => {}
            }
            effects.push(Effect::Reposition {
                piece,
                to: click.cell,
            });
            effects.push(Effect::PassTurn);

            (TurnState::turn(color.opponent(), Selection::Idle), effects)
        }
    }
}

/// One completed move, kept so it can be taken back
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub piece: EntityId,
    pub color: PieceColor,
    pub from: BoardCell,
    pub to: BoardCell,
    pub captured: Option<EntityId>,
}

/// Turn engine for one session: cached pointer state plus the turn state
#[derive(Debug)]
pub struct Statemachine {
    state: TurnState,
    mouse_down: bool,
    mouse_position: Vec2,
    piece_side: f32,
    history: Vec<MoveRecord>,
}

impl Statemachine {
    /// `piece_side` is the on-screen side length of piece sprites, used to
    /// center moved pieces on their new square.
    pub fn new(piece_side: f32) -> Self {
        Self {
            state: TurnState::default(),
            mouse_down: false,
            mouse_position: Vec2::ZERO,
            piece_side,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn current_turn(&self) -> PieceColor {
        self.state.color()
    }

    pub fn selected_piece(&self) -> Option<EntityId> {
        match self.state.selection() {
            Selection::Selected { piece, .. } => Some(piece),
            Selection::Idle => None,
        }
    }

    pub fn is_mouse_down(&self) -> bool {
        self.mouse_down
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn set_mousebutton(&mut self, down: bool) {
        self.mouse_down = down;
    }

    pub fn set_mouse_position(&mut self, x: i32, y: i32) {
        self.mouse_position = Vec2::new(x as f32, y as f32);
    }

    /// Interpret a button release at the last known mouse position
    pub fn update_statemachine(&mut self, board: &ChessBoard, manager: &mut EntityManager) {
        let Some(cell) = board.cell_at(self.mouse_position) else {
            log::debug!(
                "click at ({}, {}) is off the board",
                self.mouse_position.x,
                self.mouse_position.y
            );
            return;
        };

        let click = Click {
            cell,
            occupant: occupant_at(board, manager, cell),
        };
        let previous = self.state;
        let (next, effects) = transition(previous, click);
        self.state = next;

        match (previous.selection(), next.selection()) {
            (Selection::Idle, Selection::Selected { piece, .. }) => {
                log::info!("{} selects {} on {}", previous.color(), piece_name(manager, piece), cell);
            }
            (Selection::Selected { piece, .. }, Selection::Idle) if effects.is_empty() => {
                log::info!("{} deselects {}", previous.color(), piece_name(manager, piece));
            }
            _ => {}
        }

        if let Selection::Selected { piece, from } = previous.selection() {
            if !effects.is_empty() {
                let captured = effects.iter().find_map(|effect| match effect {
                    Effect::Capture { piece } => Some(*piece),
                    _ => None,
                });
                self.history.push(MoveRecord {
                    piece,
                    color: previous.color(),
                    from,
                    to: cell,
                    captured,
                });
            }
        }

        for effect in effects {
            self.apply(effect, board, manager);
        }
    }

    /// Take back the last completed move. Returns false when there is none.
    pub fn undo_last_move(&mut self, board: &ChessBoard, manager: &mut EntityManager) -> bool {
        let Some(record) = self.history.pop() else {
            return false;
        };

        self.place(record.piece, record.from, board, manager);
        if let Some(captured) = record.captured {
            let entity = expect_entity(manager, captured);
            piece_state_mut(entity).killed = false;
            entity.activate();
        }
        self.state = TurnState::turn(record.color, Selection::Idle);

        log::info!("undo: {} back to {}", piece_name(manager, record.piece), record.from);
        true
    }

    fn apply(&mut self, effect: Effect, board: &ChessBoard, manager: &mut EntityManager) {
        match effect {
            Effect::Reposition { piece, to } => {
                self.place(piece, to, board, manager);
                log::info!("{} moves to {}", piece_name(manager, piece), to);
            }
            Effect::Capture { piece } => {
                let entity = expect_entity(manager, piece);
                piece_state_mut(entity).killed = true;
                entity.destroy();
                log::info!("{} is captured", entity.name());
            }
            Effect::PassTurn => {
                log::debug!("turn passes to {}", self.state.color());
            }
        }
    }

    fn place(&self, piece: EntityId, cell: BoardCell, board: &ChessBoard, manager: &mut EntityManager) {
        let position = board.piece_position(cell, self.piece_side);
        let entity = expect_entity(manager, piece);
        match entity.get_component_mut::<TransformComponent>() {
            Ok(transform) => transform.position = position,
            Err(err) => panic!("malformed chess piece: {err}"),
        }
    }
}

/// The live piece whose transform sits on `cell`, if any
pub fn occupant_at(board: &ChessBoard, manager: &EntityManager, cell: BoardCell) -> Option<Occupant> {
    manager
        .get_entities(Layer::ChessPiece)
        .filter(|entity| entity.is_active())
        .find_map(|entity| {
            let state = piece_state(entity);
            if state.killed {
                return None;
            }
            let transform = match entity.get_component::<TransformComponent>() {
                Ok(transform) => transform,
                Err(err) => panic!("malformed chess piece: {err}"),
            };
            (board.cell_of(transform) == Some(cell)).then_some(Occupant {
                piece: entity.id(),
                color: state.color,
            })
        })
}

// A piece without its state component is a setup defect, not bad input.
fn piece_state(entity: &Entity) -> &ChesspieceComponent {
    match entity.get_component::<ChesspieceComponent>() {
        Ok(state) => state,
        Err(err) => panic!("malformed chess piece: {err}"),
    }
}

fn piece_state_mut(entity: &mut Entity) -> &mut ChesspieceComponent {
    match entity.get_component_mut::<ChesspieceComponent>() {
        Ok(state) => state,
        Err(err) => panic!("malformed chess piece: {err}"),
    }
}

fn expect_entity(manager: &mut EntityManager, piece: EntityId) -> &mut Entity {
    match manager.get_entity_mut(piece) {
        Some(entity) => entity,
        None => panic!("chess piece {piece} is no longer stored"),
    }
}

fn piece_name(manager: &EntityManager, piece: EntityId) -> &str {
    manager.get_entity(piece).map(Entity::name).unwrap_or("<removed>")
}
