use bevy_ecs::prelude::Component;

use crate::resources::rendertarget::TextStyle;

#[derive(Component, Clone, Debug, PartialEq)]
/// Text drawn at the node's origin (offset by its registration point).
pub struct TextField {
    pub content: String,
    pub style: TextStyle,
}

impl TextField {
    pub fn new(content: impl Into<String>, font: impl Into<String>, size: f32) -> Self {
        Self {
            content: content.into(),
            style: TextStyle {
                font: font.into(),
                size,
                ..TextStyle::default()
            },
        }
    }

    pub fn with_color(mut self, color: [u8; 4]) -> Self {
        self.style.color = color;
        self
    }

    pub fn set_content(&mut self, new_content: impl Into<String>) {
        self.content = new_content.into();
    }
}
