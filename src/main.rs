use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::Path;
use std::process;

use simple_chess::assets::AssetManager;
use simple_chess::config::{
    AssetManifest, BoardSetup, GameConfig, ASSETS_FILE, CONFIG_FILE, SETUP_FILE,
};
use simple_chess::error::StartupError;
use simple_chess::game::Game;

fn start() -> Result<Game, StartupError> {
    let config = GameConfig::load_or_default(Path::new(CONFIG_FILE))?;
    let manifest = AssetManifest::load(Path::new(ASSETS_FILE))?;
    let setup = BoardSetup::load_or_standard(Path::new(SETUP_FILE))?;
    let assets = AssetManager::from_manifest(&manifest);

    Game::new(&config, &assets, &setup)
}

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
        .unwrap_or_else(|e| eprintln!("logger already set: {e}"));

    match start() {
        Ok(mut game) => game.run(),
        Err(e) => {
            log::error!("{e}");
            process::exit(1);
        }
    }
}
