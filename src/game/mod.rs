use sfml::graphics::RenderWindow;
use sfml::window::{mouse, Event, Key, Style};
use std::thread;
use std::time::{Duration, Instant};

use crate::assets::AssetManager;
use crate::config::{BoardSetup, GameConfig};
use crate::error::StartupError;
use crate::render::sfml::SfmlRenderer;
use crate::session::{Flow, InputEvent, Session};

/// Window, event pump and frame pacing around a [`Session`]
pub struct Game {
    renderer: SfmlRenderer,
    session: Session,
    frame_target_time: Duration,
    ticks_last_frame: Instant,
    running: bool,
}

impl Game {
    pub fn new(
        config: &GameConfig,
        assets: &AssetManager,
        setup: &BoardSetup,
    ) -> Result<Self, StartupError> {
        let window = RenderWindow::new(
            (config.window.width, config.window.height),
            config.window.title.as_str(),
            Style::CLOSE,
            &Default::default(),
        )
        .map_err(|e| StartupError::Window(format!("{:?}", e)))?;

        let session = Session::new(config, setup)?;

        Ok(Self {
            renderer: SfmlRenderer::new(window, assets),
            session,
            frame_target_time: Duration::from_millis(config.window.frame_target_time()),
            ticks_last_frame: Instant::now(),
            running: false,
        })
    }

    pub fn run(&mut self) {
        self.running = true;

        while self.running && self.renderer.window().is_open() {
            self.handle_events();
            self.update();
            self.render();
        }

        self.renderer.window_mut().close();
        log::info!("game closed");
    }

    fn handle_events(&mut self) {
        while let Some(event) = self.renderer.window_mut().poll_event() {
            let input = match event {
                Event::Closed => Some(InputEvent::Quit),
                Event::KeyPressed { code, .. } => self.handle_key_press(code),
                Event::MouseButtonPressed { button, .. } if button == mouse::Button::Left => {
                    Some(InputEvent::ButtonDown)
                }
                Event::MouseButtonReleased { button, x, y } if button == mouse::Button::Left => {
                    self.session.handle_event(InputEvent::Motion { x, y });
                    Some(InputEvent::ButtonUp)
                }
                Event::MouseMoved { x, y } => Some(InputEvent::Motion { x, y }),
                _ => None,
            };

            if let Some(input) = input {
                if self.session.handle_event(input) == Flow::Quit {
                    self.running = false;
                }
            }
        }
    }

    fn handle_key_press(&mut self, key: Key) -> Option<InputEvent> {
        match key {
            Key::Escape => Some(InputEvent::Quit),
            Key::U => {
                if !self.session.undo_last_move() {
                    log::debug!("nothing to undo");
                }
                None
            }
            _ => None,
        }
    }

    fn update(&mut self) {
        let elapsed = self.ticks_last_frame.elapsed();
        if elapsed < self.frame_target_time {
            thread::sleep(self.frame_target_time - elapsed);
        }

        let delta_time = self.ticks_last_frame.elapsed().as_secs_f32();
        self.ticks_last_frame = Instant::now();

        self.session.update(delta_time);
    }

    fn render(&mut self) {
        self.session.render(&mut self.renderer);
    }
}
