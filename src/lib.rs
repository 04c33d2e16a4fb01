pub mod assets;
pub mod board;
pub mod config;
pub mod ecs;
pub mod error;
pub mod geometry;
pub mod render;
pub mod session;
pub mod statemachine;

#[cfg(feature = "window")]
pub mod game;
