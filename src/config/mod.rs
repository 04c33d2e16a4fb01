use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::board::{BoardCell, BoardGeometry};
use crate::ecs::{PieceColor, PieceType};
use crate::error::ConfigError;
use crate::geometry::Vec2;

pub const CONFIG_FILE: &str = "assets/config.json";
pub const ASSETS_FILE: &str = "assets/assets.json";
pub const SETUP_FILE: &str = "assets/chessboard_setup.json";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
            title: "Simple Chess".to_string(),
            fps: 60,
        }
    }
}

impl WindowConfig {
    /// Milliseconds one frame should take
    pub fn frame_target_time(&self) -> u64 {
        1000 / u64::from(self.fps.max(1))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PieceGeometry {
    pub side: f32,
    /// Initial velocity of every piece's transform, in pixels per second
    pub velocity: Vec2,
}

impl Default for PieceGeometry {
    fn default() -> Self {
        Self {
            side: 56.0,
            velocity: Vec2::ZERO,
        }
    }
}

/// Window, board and piece geometry. Every key is optional.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub board: BoardGeometry,
    pub piece: PieceGeometry,
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: GameConfig = load_json(path)?;
        log::debug!(
            "loaded config: square side {}, board offset ({}, {}), piece side {}",
            config.board.square_side,
            config.board.offset.x,
            config.board.offset.y,
            config.piece.side
        );
        log::debug!(
            "loaded piece velocity: ({}, {})",
            config.piece.velocity.x,
            config.piece.velocity.y
        );
        Ok(config)
    }

    /// Load `path`, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("{} not found, using default configuration", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Texture,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AssetEntry {
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub id: String,
    pub file: String,
}

/// Texture id to file mapping, keyed by `color_type` for pieces
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct AssetManifest {
    pub assets: Vec<AssetEntry>,
}

impl AssetManifest {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }
}

/// One piece of the initial position
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PieceRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub piece_type: PieceType,
    pub color: PieceColor,
    pub position: BoardCell,
    #[serde(default)]
    pub killed: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct BoardSetup {
    pub pieces: Vec<PieceRecord>,
}

impl BoardSetup {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_json(path)
    }

    /// Load `path`, falling back to the standard opening when it does not exist
    pub fn load_or_standard(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("{} not found, using the standard opening", path.display());
            return Ok(Self::standard());
        }
        Self::load(path)
    }

    /// The standard opening position
    pub fn standard() -> Self {
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];

        let mut pieces = Vec::with_capacity(32);
        for (color, back, front) in [(PieceColor::White, 1, 2), (PieceColor::Black, 8, 7)] {
            for (file, piece_type) in (1..=8u8).zip(BACK_RANK) {
                pieces.push(standard_record(color, piece_type, file, back));
            }
            for file in 1..=8u8 {
                pieces.push(standard_record(color, PieceType::Pawn, file, front));
            }
        }
        Self { pieces }
    }
}

fn standard_record(color: PieceColor, piece_type: PieceType, file: u8, rank: u8) -> PieceRecord {
    let position = match BoardCell::new(file, rank) {
        Ok(cell) => cell,
        Err(err) => unreachable!("standard opening uses board cells only: {err}"),
    };
    PieceRecord {
        name: format!("{color}_{piece_type}_{position}"),
        piece_type,
        color,
        position,
        killed: false,
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };

    let mut file = File::open(path).map_err(io_error)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(io_error)?;

    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}
