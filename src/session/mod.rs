use crate::board::ChessBoard;
use crate::config::{BoardSetup, GameConfig, PieceGeometry, PieceRecord};
use crate::ecs::{
    ChesspieceComponent, EntityId, EntityManager, Layer, SpriteComponent, TransformComponent,
};
use crate::error::EcsResult;
use crate::render::Renderer;
use crate::statemachine::Statemachine;

/// Upper bound on a frame's delta time, in seconds
pub const MAX_FRAME_DELTA: f32 = 0.05;

/// Pointer and session events delivered by the window backend
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    ButtonDown,
    ButtonUp,
    Motion { x: i32, y: i32 },
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything one game needs: entities, board and turn engine
pub struct Session {
    manager: EntityManager,
    board: ChessBoard,
    statemachine: Statemachine,
    piece: PieceGeometry,
}

impl Session {
    /// Build the board, seed the pieces from `setup` and start on white's turn
    pub fn new(config: &GameConfig, setup: &BoardSetup) -> EcsResult<Self> {
        let mut manager = EntityManager::new();
        let board = ChessBoard::new(config.board.clone());
        board.load_board(&mut manager)?;

        let mut session = Self {
            manager,
            board,
            statemachine: Statemachine::new(config.piece.side),
            piece: config.piece.clone(),
        };
        for record in &setup.pieces {
            session.spawn_piece(record)?;
        }
        log::info!(
            "session ready: {} pieces, {} to move",
            session.manager.get_entities(Layer::ChessPiece).count(),
            session.statemachine.current_turn()
        );
        Ok(session)
    }

    /// Create a piece entity with its transform, sprite and piece state
    pub fn spawn_piece(&mut self, record: &PieceRecord) -> EcsResult<EntityId> {
        let side = self.piece.side;
        let position = self.board.piece_position(record.position, side);
        let state = ChesspieceComponent::new(record.piece_type, record.color, record.killed);
        let asset_id = state.asset_id();

        let entity = self.manager.add_entity(record.name.clone(), Layer::ChessPiece);
        let transform = entity.add_component(TransformComponent::new(position, side, side, 1.0))?;
        transform.velocity = self.piece.velocity;
        entity.add_component(SpriteComponent::new(asset_id))?;
        entity.add_component(state)?;
        if record.killed {
            entity.destroy();
        }
        entity.list_all_components();
        Ok(entity.id())
    }

    pub fn handle_event(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::ButtonDown => self.statemachine.set_mousebutton(true),
            InputEvent::ButtonUp => {
                self.statemachine
                    .update_statemachine(&self.board, &mut self.manager);
                self.statemachine.set_mousebutton(false);
            }
            InputEvent::Motion { x, y } => self.statemachine.set_mouse_position(x, y),
            InputEvent::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Advance all entities by `delta_time`, capped at [`MAX_FRAME_DELTA`]
    pub fn update(&mut self, delta_time: f32) {
        self.manager.update(delta_time.min(MAX_FRAME_DELTA));
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.clear();

        if self.manager.has_no_entities() {
            return;
        }

        self.manager.render(renderer);
        renderer.present();
    }

    pub fn undo_last_move(&mut self) -> bool {
        self.statemachine
            .undo_last_move(&self.board, &mut self.manager)
    }

    pub fn manager(&self) -> &EntityManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut EntityManager {
        &mut self.manager
    }

    pub fn board(&self) -> &ChessBoard {
        &self.board
    }

    pub fn statemachine(&self) -> &Statemachine {
        &self.statemachine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardCell;
    use crate::ecs::{PieceColor, PieceType};
    use crate::geometry::Vec2;
    use crate::render::{DrawCall, RecordingRenderer};

    fn record(name: &str, piece_type: PieceType, color: PieceColor, cell: &str) -> PieceRecord {
        PieceRecord {
            name: name.to_string(),
            piece_type,
            color,
            position: cell.parse().unwrap(),
            killed: false,
        }
    }

    #[test]
    fn pieces_get_sprite_from_their_state() {
        let setup = BoardSetup {
            pieces: vec![record("bq", PieceType::Queen, PieceColor::Black, "d8")],
        };
        let session = Session::new(&GameConfig::default(), &setup).unwrap();
        let queen = session.manager().get_entity_by_name("bq").unwrap();

        assert_eq!(queen.layer(), Layer::ChessPiece);
        assert_eq!(
            queen.get_component::<SpriteComponent>().unwrap().texture_id,
            "black_queen"
        );
        let d8 = BoardCell::new(4, 8).unwrap();
        let transform = queen.get_component::<TransformComponent>().unwrap();
        assert_eq!(session.board().cell_of(transform), Some(d8));
    }

    #[test]
    fn pieces_set_up_as_killed_start_inactive() {
        let mut dead = record("wr", PieceType::Rook, PieceColor::White, "a1");
        dead.killed = true;
        let setup = BoardSetup { pieces: vec![dead] };
        let session = Session::new(&GameConfig::default(), &setup).unwrap();
        let rook = session.manager().get_entity_by_name("wr").unwrap();
        assert!(!rook.is_active());
        assert!(rook.get_component::<ChesspieceComponent>().unwrap().killed);
    }

    #[test]
    fn delta_time_is_clamped() {
        let setup = BoardSetup {
            pieces: vec![record("wp", PieceType::Pawn, PieceColor::White, "a2")],
        };
        let mut session = Session::new(&GameConfig::default(), &setup).unwrap();
        let id = session.manager().get_entity_by_name("wp").unwrap().id();
        let start = {
            let entity = session.manager_mut().get_entity_mut(id).unwrap();
            let transform = entity.get_component_mut::<TransformComponent>().unwrap();
            transform.velocity = Vec2::new(100.0, 0.0);
            transform.position
        };

        session.update(2.0);

        let entity = session.manager().get_entity(id).unwrap();
        let position = entity.get_component::<TransformComponent>().unwrap().position;
        assert_eq!(position, start + Vec2::new(5.0, 0.0));
    }

    #[test]
    fn render_clears_draws_then_presents() {
        let setup = BoardSetup {
            pieces: vec![record("wk", PieceType::King, PieceColor::White, "e1")],
        };
        let session = Session::new(&GameConfig::default(), &setup).unwrap();
        let mut renderer = RecordingRenderer::new();
        session.render(&mut renderer);

        assert_eq!(renderer.calls.first(), Some(&DrawCall::Clear));
        assert_eq!(renderer.calls.last(), Some(&DrawCall::Present));
        let textures = renderer.textures_drawn();
        assert_eq!(textures.len(), 65);
        // Squares first, pieces on top
        assert_eq!(textures[64], "white_king");
    }

    #[test]
    fn configured_velocity_moves_pieces_each_frame() {
        let mut config = GameConfig::default();
        config.piece.velocity = Vec2::new(0.0, -20.0);
        let setup = BoardSetup {
            pieces: vec![record("wp", PieceType::Pawn, PieceColor::White, "a2")],
        };
        let mut session = Session::new(&config, &setup).unwrap();
        let start = session.board().piece_position(BoardCell::new(1, 2).unwrap(), 56.0);

        session.update(0.05);

        let pawn = session.manager().get_entity_by_name("wp").unwrap();
        let transform = pawn.get_component::<TransformComponent>().unwrap();
        assert_eq!(transform.velocity, Vec2::new(0.0, -20.0));
        assert_eq!(transform.position, start + Vec2::new(0.0, -1.0));
    }

    #[test]
    fn render_only_clears_when_every_entity_is_soft_destroyed() {
        let setup = BoardSetup {
            pieces: vec![record("wk", PieceType::King, PieceColor::White, "e1")],
        };
        let mut session = Session::new(&GameConfig::default(), &setup).unwrap();
        session.manager_mut().clear_data();
        assert!(session.manager().has_no_entities());

        let mut renderer = RecordingRenderer::new();
        session.render(&mut renderer);
        assert_eq!(renderer.calls, vec![DrawCall::Clear]);
    }

    #[test]
    fn render_on_an_empty_manager_only_clears() {
        let mut session = Session::new(&GameConfig::default(), &BoardSetup::default()).unwrap();
        for square in session.manager_mut().get_entities_mut(Layer::BoardSquare) {
            square.mark_for_removal();
        }
        session.update(0.0);
        assert_eq!(session.manager().entity_count(), 0);

        let mut renderer = RecordingRenderer::new();
        session.render(&mut renderer);
        assert_eq!(renderer.calls, vec![DrawCall::Clear]);
    }

    #[test]
    fn quit_ends_the_flow() {
        let mut session = Session::new(&GameConfig::default(), &BoardSetup::default()).unwrap();
        assert_eq!(session.handle_event(InputEvent::ButtonDown), Flow::Continue);
        assert!(session.statemachine().is_mouse_down());
        assert_eq!(session.handle_event(InputEvent::ButtonUp), Flow::Continue);
        assert!(!session.statemachine().is_mouse_down());
        assert_eq!(session.handle_event(InputEvent::Quit), Flow::Quit);
    }
}
