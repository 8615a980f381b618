//! Color tint for composite sprites.
//!
//! A [`Tint`] on an entity with a
//! [`CompositeSprite`](crate::components::sprite::CompositeSprite) modulates
//! every layer draw. The sprite's own transparency still applies on top.

use bevy_ecs::prelude::Component;
use raylib::prelude::Color;

#[derive(Component, Clone, Debug, Copy, PartialEq)]
pub struct Tint {
    pub color: Color,
}

impl Tint {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            color: Color::new(r, g, b, a),
        }
    }

    /// Component-wise product with `other`.
    pub fn modulate(&self, other: Color) -> Color {
        let mul = |a: u8, b: u8| ((a as u16 * b as u16) / 255) as u8;
        Color::new(
            mul(self.color.r, other.r),
            mul(self.color.g, other.g),
            mul(self.color.b, other.b),
            mul(self.color.a, other.a),
        )
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
        }
    }
}
