use sfml::cpp::FBox;
use sfml::graphics::{
    Color, IntRect, RectangleShape, RenderTarget, RenderWindow, Shape, Sprite, Texture,
    Transformable,
};
use sfml::system::Vector2f;
use std::collections::HashMap;

use super::Renderer;
use crate::assets::AssetManager;
use crate::geometry::Rect;

/// SFML window that draws registered textures
pub struct SfmlRenderer {
    window: FBox<RenderWindow>,
    textures: HashMap<String, FBox<Texture>>,
}

impl SfmlRenderer {
    /// Load every texture in `assets`. Textures that fail to load are drawn
    /// as a flat placeholder instead.
    pub fn new(window: FBox<RenderWindow>, assets: &AssetManager) -> Self {
        let mut textures = HashMap::new();
        for id in assets.texture_ids() {
            let Some(path) = assets.get_texture(id) else {
                continue;
            };
            match Texture::from_file(&path.to_string_lossy()) {
                Ok(texture) => {
                    textures.insert(id.to_string(), texture);
                }
                Err(e) => log::warn!("cannot load texture '{}' from {}: {:?}", id, path.display(), e),
            }
        }
        log::info!("{} textures loaded", textures.len());

        Self { window, textures }
    }

    pub fn window(&self) -> &RenderWindow {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut RenderWindow {
        &mut self.window
    }
}

impl Renderer for SfmlRenderer {
    fn clear(&mut self) {
        self.window.clear(Color::rgb(21, 21, 21));
    }

    fn draw_texture(&mut self, texture_id: &str, source: Option<Rect>, destination: Rect) {
        let Some(texture) = self.textures.get(texture_id) else {
            let mut placeholder = RectangleShape::new();
            placeholder.set_size(Vector2f::new(destination.width, destination.height));
            placeholder.set_position(Vector2f::new(destination.x, destination.y));
            placeholder.set_fill_color(Color::rgb(200, 0, 200));
            self.window.draw(&placeholder);
            return;
        };

        let mut sprite = Sprite::with_texture(texture);
        let (source_width, source_height) = match source {
            Some(rect) => {
                sprite.set_texture_rect(IntRect::new(
                    rect.x as i32,
                    rect.y as i32,
                    rect.width as i32,
                    rect.height as i32,
                ));
                (rect.width, rect.height)
            }
            None => {
                let size = texture.size();
                (size.x as f32, size.y as f32)
            }
        };

        if source_width > 0.0 && source_height > 0.0 {
            sprite.set_scale(Vector2f::new(
                destination.width / source_width,
                destination.height / source_height,
            ));
        }
        sprite.set_position(Vector2f::new(destination.x, destination.y));
        self.window.draw(&sprite);
    }

    fn present(&mut self) {
        self.window.display();
    }
}
