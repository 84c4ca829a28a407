//! Render target abstraction.
//!
//! The render traversal never talks to a graphics backend directly: it emits
//! draw calls into a [`DrawSurface`]. A backend implements the trait on top of
//! its own canvas; [`RecordingSurface`] simply records every call as a
//! serializable [`DrawCommand`], which is what the headless demo and the tests
//! use.

use serde::Serialize;

use crate::geom::{Matrix, Rectangle};

/// Text appearance for [`DrawSurface::fill_text`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TextStyle {
    pub font: String,
    pub size: f32,
    /// RGBA.
    pub color: [u8; 4],
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: "sans-serif".into(),
            size: 12.0,
            color: [255, 255, 255, 255],
        }
    }
}

/// Drawing backend fed by the render traversal.
///
/// `matrix` is the full world matrix of the draw (camera included); the image
/// or text is placed at the local origin of that matrix.
pub trait DrawSurface {
    /// Called once at the start of every frame.
    fn begin_frame(&mut self, _width: u32, _height: u32) {}

    /// Called once per camera pass, with its viewport in screen pixels.
    fn set_viewport(&mut self, _viewport: Rectangle) {}

    fn draw_image(&mut self, texture: &str, source: Rectangle, matrix: &Matrix, alpha: f32);

    fn fill_text(&mut self, text: &str, matrix: &Matrix, style: &TextStyle, alpha: f32);

    fn end_frame(&mut self) {}
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Viewport {
        viewport: Rectangle,
    },
    Image {
        texture: String,
        source: Rectangle,
        matrix: Matrix,
        alpha: f32,
    },
    Text {
        text: String,
        matrix: Matrix,
        style: TextStyle,
        alpha: f32,
    },
}

/// Surface that keeps the draw calls of the current frame.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub width: u32,
    pub height: u32,
    pub frames: u64,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded images, in draw order.
    pub fn images(&self) -> impl Iterator<Item = (&str, &Matrix)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Image {
                texture, matrix, ..
            } => Some((texture.as_str(), matrix)),
            _ => None,
        })
    }

    /// Recorded texts, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.commands)
    }
}

impl DrawSurface for RecordingSurface {
    fn begin_frame(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.frames += 1;
        self.commands.clear();
    }

    fn set_viewport(&mut self, viewport: Rectangle) {
        self.commands.push(DrawCommand::Viewport { viewport });
    }

    fn draw_image(&mut self, texture: &str, source: Rectangle, matrix: &Matrix, alpha: f32) {
        self.commands.push(DrawCommand::Image {
            texture: texture.to_string(),
            source,
            matrix: *matrix,
            alpha,
        });
    }

    fn fill_text(&mut self, text: &str, matrix: &Matrix, style: &TextStyle, alpha: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            matrix: *matrix,
            style: style.clone(),
            alpha,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_frame_clears() {
        let mut surface = RecordingSurface::new();
        surface.begin_frame(320, 240);
        surface.draw_image("a", Rectangle::new(0.0, 0.0, 8.0, 8.0), &Matrix::IDENTITY, 1.0);
        surface.fill_text("hi", &Matrix::IDENTITY, &TextStyle::default(), 0.5);
        assert_eq!(surface.commands.len(), 2);
        assert_eq!(surface.texts().collect::<Vec<_>>(), vec!["hi"]);

        surface.begin_frame(320, 240);
        assert!(surface.commands.is_empty());
        assert_eq!(surface.frames, 2);
    }

    #[test]
    fn test_json_is_tagged() {
        let mut surface = RecordingSurface::new();
        surface.draw_image("tiles", Rectangle::new(0.0, 0.0, 4.0, 4.0), &Matrix::IDENTITY, 1.0);
        let json = surface.to_json().unwrap();
        assert!(json.contains("\"op\": \"image\""));
        assert!(json.contains("\"texture\": \"tiles\""));
    }
}
