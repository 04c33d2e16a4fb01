use crate::geometry::Rect;

#[cfg(feature = "window")]
pub mod sfml;

/// Drawing surface the core renders into once per frame.
///
/// The core calls `clear`, then `draw_texture` for every visible sprite,
/// then `present`. Nothing is returned; drawing failures are the backend's
/// concern.
pub trait Renderer {
    fn clear(&mut self);

    /// Draw `source` of the texture registered under `texture_id` into
    /// `destination`. `None` draws the whole texture.
    fn draw_texture(&mut self, texture_id: &str, source: Option<Rect>, destination: Rect);

    fn present(&mut self);
}

/// One recorded call against a [`RecordingRenderer`]
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear,
    Texture {
        texture_id: String,
        source: Option<Rect>,
        destination: Rect,
    },
    Present,
}

/// Renderer that records calls instead of drawing. Used headless.
#[derive(Default, Debug)]
pub struct RecordingRenderer {
    pub calls: Vec<DrawCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn textures_drawn(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Texture { texture_id, .. } => Some(texture_id.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn draw_texture(&mut self, texture_id: &str, source: Option<Rect>, destination: Rect) {
        self.calls.push(DrawCall::Texture {
            texture_id: texture_id.to_string(),
            source,
            destination,
        });
    }

    fn present(&mut self) {
        self.calls.push(DrawCall::Present);
    }
}
