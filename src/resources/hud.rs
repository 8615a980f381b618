//! Overlay text drawn in real screen pixels after the virtual scene.

use bevy_ecs::prelude::Resource;
use raylib::prelude::Color;

use crate::math::IPoint;

/// Lines of text shown at the top-left of the window.
///
/// Demos and the UI designer overwrite it every frame.
#[derive(Resource, Debug, Clone)]
pub struct HudText {
    pub lines: Vec<String>,
    pub origin: IPoint,
    pub font_size: i32,
    pub line_spacing: i32,
    pub color: Color,
}

impl Default for HudText {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            origin: IPoint::new(4, 4),
            font_size: 10,
            line_spacing: 12,
            color: Color::WHITE,
        }
    }
}

impl HudText {
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Screen position of line `index`.
    pub fn line_position(&self, index: usize) -> IPoint {
        IPoint::new(
            self.origin.x,
            self.origin.y + index as i32 * self.line_spacing,
        )
    }
}
