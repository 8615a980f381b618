//! Position of an entity in virtual (or camera world) space.
//!
//! For entities drawn with a [`CompositeSprite`](super::sprite::CompositeSprite)
//! this is the top-left of the destination rectangle.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

use crate::math::{IRect, vec2};

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct MapPosition {
    pub pos: Vector2,
}

impl MapPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { pos: vec2(x, y) }
    }

    /// Destination rectangle at this position, truncated to whole pixels.
    ///
    /// A zero size asks the sprite to use its texture sizes.
    pub fn dest_rect(&self, w: i32, h: i32) -> IRect {
        IRect::new(self.pos.x as i32, self.pos.y as i32, w, h)
    }
}
