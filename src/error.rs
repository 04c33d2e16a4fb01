//! Error types shared across the chess core.

use crate::ecs::ComponentType;

/// Errors raised by entity/component bookkeeping
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EcsError {
    /// A component kind was queried on an entity that never registered it
    #[error("entity '{entity}' has no {kind:?} component")]
    ComponentNotFound { entity: String, kind: ComponentType },

    /// A second component of an already-registered kind was added
    #[error("entity '{entity}' already has a {kind:?} component")]
    DuplicateComponent { entity: String, kind: ComponentType },
}

/// Errors raised while addressing board cells
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("'{0}' is not a board cell")]
    InvalidBoardCell(String),
}

/// Errors raised while loading configuration and asset manifests
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type EcsResult<T> = Result<T, EcsError>;

/// Errors that stop the game before the first frame
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("board setup failed: {0}")]
    Setup(#[from] EcsError),

    #[error("cannot create window: {0}")]
    Window(String),
}
