//! Multi-layer sprite component.
//!
//! A [`CompositeSprite`] owns a key-ordered set of texture layers. Each layer
//! is either:
//! - [`LayerKind::Solid`] – stretched over the destination rectangle passed
//!   to [`CompositeSprite::compose`], shifted by the layer offset
//! - [`LayerKind::Decal`] – placed at a point relative to the destination's
//!   top-left, using its own origin, and rotated/scaled with the sprite
//!
//! `compose` turns the layers into plain [`LayerDraw`] records so the
//! geometry can be tested without a window; the render system only feeds
//! them to `draw_texture_pro`.

use std::collections::BTreeMap;

use bevy_ecs::prelude::Component;
use raylib::prelude::{Color, Rectangle, Vector2};

use crate::math::{IRect, VEC2_ONE, VEC2_ZERO, add_v2, mul_v2, rotate_v2, scale_v2, vec2};

/// Depth step between consecutive layer keys.
const LAYER_DEPTH_STEP: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Solid,
    Decal,
}

/// One texture layer of a [`CompositeSprite`].
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteLayer {
    pub kind: LayerKind,
    /// Key into the texture store.
    pub tex_key: String,
    pub visible: bool,
    /// Ignored by [`CompositeSprite::show_exclusive_texture`].
    pub fixed_visibility: bool,
    /// Explicit draw depth; `None` derives it from the sprite depth and key.
    pub depth: Option<f32>,
    pub offset: Vector2,
    pub scale: Vector2,
    /// Pivot in texture pixels. Only decals use it.
    pub origin: Vector2,
}

impl SpriteLayer {
    fn new(kind: LayerKind, tex_key: impl Into<String>) -> Self {
        Self {
            kind,
            tex_key: tex_key.into(),
            visible: true,
            fixed_visibility: false,
            depth: None,
            offset: VEC2_ZERO,
            scale: VEC2_ONE,
            origin: VEC2_ZERO,
        }
    }

    pub fn solid(tex_key: impl Into<String>) -> Self {
        Self::new(LayerKind::Solid, tex_key)
    }

    pub fn decal(tex_key: impl Into<String>) -> Self {
        Self::new(LayerKind::Decal, tex_key)
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_fixed_visibility(mut self, fixed: bool) -> Self {
        self.fixed_visibility = fixed;
        self
    }

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_offset(mut self, offset: Vector2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_scale(mut self, scale: Vector2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_origin(mut self, origin: Vector2) -> Self {
        self.origin = origin;
        self
    }
}

/// A resolved draw call for one layer.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerDraw {
    pub key: i32,
    pub tex_key: String,
    pub source: Rectangle,
    pub dest: Rectangle,
    /// Pivot in destination pixels, as `draw_texture_pro` expects.
    pub origin: Vector2,
    /// Degrees.
    pub rotation: f32,
    pub tint: Color,
    pub depth: f32,
}

/// A sprite built from several texture layers drawn relative to one
/// destination rectangle.
#[derive(Component, Clone, Debug)]
pub struct CompositeSprite {
    pub layers: BTreeMap<i32, SpriteLayer>,
    /// Hint that the layers could be baked into one texture.
    pub can_be_composed: bool,
    pub scale: Vector2,
    /// Radians.
    pub rotation: f32,
    pub transparency: u8,
    /// Default depth, larger is further back.
    pub depth: f32,
    pub origin: Vector2,
}

impl Default for CompositeSprite {
    fn default() -> Self {
        Self {
            layers: BTreeMap::new(),
            can_be_composed: true,
            scale: VEC2_ONE,
            rotation: 0.0,
            transparency: 255,
            depth: 0.0,
            origin: VEC2_ZERO,
        }
    }
}

impl CompositeSprite {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sprite with a single visible solid layer under key 0.
    pub fn single(tex_key: impl Into<String>) -> Self {
        Self::new().with_layer(0, SpriteLayer::solid(tex_key))
    }

    pub fn with_layer(mut self, key: i32, layer: SpriteLayer) -> Self {
        self.layers.insert(key, layer);
        self
    }

    /// Make layer `id` visible and hide every other non-fixed layer.
    /// Does nothing if `id` is not a layer key.
    pub fn show_exclusive_texture(&mut self, id: i32) {
        if !self.layers.contains_key(&id) {
            return;
        }
        for (key, layer) in self.layers.iter_mut() {
            if layer.fixed_visibility {
                continue;
            }
            layer.visible = *key == id;
        }
    }

    /// Copy the layers of `other` into this sprite. Colliding keys are
    /// moved past the current highest key.
    ///
    /// Copies start at unit scale and pick up this sprite's scale instead.
    pub fn merge_sprite(&mut self, other: &CompositeSprite) {
        let mut next_key = self.layers.keys().next_back().map_or(0, |k| k + 1);
        for (key, layer) in other.layers.iter() {
            let copy = layer.clone().with_scale(VEC2_ONE);
            if !self.layers.contains_key(key) {
                self.layers.insert(*key, copy);
                continue;
            }
            while self.layers.contains_key(&next_key) {
                next_key += 1;
            }
            self.layers.insert(next_key, copy);
            next_key += 1;
        }
    }

    /// Pixel size of layer `id`'s texture.
    pub fn texture_size<F>(&self, id: i32, size_of: F) -> Option<Vector2>
    where
        F: Fn(&str) -> Option<(i32, i32)>,
    {
        let layer = self.layers.get(&id)?;
        size_of(&layer.tex_key).map(|(w, h)| vec2(w as f32, h as f32))
    }

    fn tint(&self) -> Color {
        Color::new(255, 255, 255, self.transparency)
    }

    fn layer_depth(&self, key: i32, layer: &SpriteLayer) -> f32 {
        layer
            .depth
            .unwrap_or(self.depth - key as f32 * LAYER_DEPTH_STEP)
    }

    /// Resolve every visible layer into a draw, in key order.
    ///
    /// A zero-width `dest` means "use each texture's own size". Layers
    /// whose texture `size_of` cannot resolve are skipped.
    pub fn compose<F>(&self, dest: IRect, size_of: F) -> Vec<LayerDraw>
    where
        F: Fn(&str) -> Option<(i32, i32)>,
    {
        let own_sizes = dest.w == 0;
        let mut draws = Vec::with_capacity(self.layers.len());

        for (&key, layer) in self.layers.iter() {
            if !layer.visible {
                continue;
            }
            let Some((tw, th)) = size_of(&layer.tex_key) else {
                continue;
            };
            let mut dest = dest;
            if own_sizes {
                dest.w = tw;
                dest.h = th;
            }
            let source = Rectangle {
                x: 0.0,
                y: 0.0,
                width: tw as f32,
                height: th as f32,
            };
            let draw = match layer.kind {
                LayerKind::Solid => self.compose_solid(key, layer, dest, source),
                LayerKind::Decal => self.compose_decal(key, layer, dest, source),
            };
            if let Some(draw) = draw {
                draws.push(draw);
            }
        }
        draws
    }

    fn compose_solid(
        &self,
        key: i32,
        layer: &SpriteLayer,
        dest: IRect,
        source: Rectangle,
    ) -> Option<LayerDraw> {
        let tex_scale = if layer.scale != VEC2_ONE {
            layer.scale
        } else {
            self.scale
        };
        if tex_scale == VEC2_ZERO {
            return None;
        }

        let mut rect = IRect::new(
            dest.x + layer.offset.x as i32,
            dest.y + layer.offset.y as i32,
            dest.w,
            dest.h,
        );
        if tex_scale != VEC2_ONE {
            let inflate_x = if tex_scale.x == 1.0 {
                0
            } else {
                (rect.w as f32 * tex_scale.x - rect.w as f32) as i32
            };
            let inflate_y = if tex_scale.y == 1.0 {
                0
            } else {
                (rect.h as f32 * tex_scale.y - rect.h as f32) as i32
            };
            if self.origin == VEC2_ZERO {
                // Grow around the center
                rect.x -= inflate_x / 2;
                rect.y -= inflate_y / 2;
            }
            rect.w += inflate_x;
            rect.h += inflate_y;
        }

        let origin = if self.rotation != 0.0 && self.origin == VEC2_ZERO {
            vec2(source.width * 0.5, source.height * 0.5)
        } else {
            self.origin
        };
        // Texture pixels to destination pixels
        let origin = vec2(
            origin.x * rect.w as f32 / source.width.max(1.0),
            origin.y * rect.h as f32 / source.height.max(1.0),
        );

        Some(LayerDraw {
            key,
            tex_key: layer.tex_key.clone(),
            source,
            dest: rect.to_rectangle(),
            origin,
            rotation: self.rotation.to_degrees(),
            tint: self.tint(),
            depth: self.layer_depth(key, layer),
        })
    }

    fn compose_decal(
        &self,
        key: i32,
        layer: &SpriteLayer,
        dest: IRect,
        source: Rectangle,
    ) -> Option<LayerDraw> {
        let mut tex_scale = mul_v2(self.scale, layer.scale);
        tex_scale.x = tex_scale.x.max(0.0);
        tex_scale.y = tex_scale.y.max(0.0);
        if tex_scale == VEC2_ZERO {
            return None;
        }

        let anchor = vec2(dest.x as f32, dest.y as f32);
        let offset = rotate_v2(mul_v2(layer.offset, self.scale), self.rotation);
        let position = add_v2(anchor, offset);

        Some(LayerDraw {
            key,
            tex_key: layer.tex_key.clone(),
            source,
            dest: Rectangle {
                x: position.x,
                y: position.y,
                width: source.width * tex_scale.x,
                height: source.height * tex_scale.y,
            },
            origin: mul_v2(layer.origin, tex_scale),
            rotation: self.rotation.to_degrees(),
            tint: self.tint(),
            depth: self.layer_depth(key, layer),
        })
    }

    /// Scale both axes by the same factor.
    pub fn set_uniform_scale(&mut self, s: f32) {
        self.scale = scale_v2(VEC2_ONE, s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn sizes(key: &str) -> Option<(i32, i32)> {
        match key {
            "body" => Some((64, 32)),
            "gun" => Some((16, 8)),
            "flag" => Some((10, 10)),
            _ => None,
        }
    }

    fn ship() -> CompositeSprite {
        CompositeSprite::new()
            .with_layer(0, SpriteLayer::solid("body"))
            .with_layer(1, SpriteLayer::solid("flag").with_visible(false))
            .with_layer(
                2,
                SpriteLayer::decal("gun")
                    .with_offset(vec2(10.0, 0.0))
                    .with_origin(vec2(8.0, 4.0)),
            )
    }

    #[test]
    fn compose_draws_visible_layers_in_key_order() {
        let draws = ship().compose(IRect::new(100, 50, 64, 32), sizes);
        let keys: Vec<i32> = draws.iter().map(|d| d.key).collect();
        assert_eq!(keys, vec![0, 2]);
        assert_eq!(draws[0].dest, IRect::new(100, 50, 64, 32).to_rectangle());
    }

    #[test]
    fn zero_width_destination_uses_texture_size() {
        let s = CompositeSprite::single("body");
        let draws = s.compose(IRect::new(5, 6, 0, 0), sizes);
        assert_eq!(draws[0].dest, IRect::new(5, 6, 64, 32).to_rectangle());
    }

    #[test]
    fn unknown_textures_are_skipped() {
        let s = CompositeSprite::single("missing");
        assert!(s.compose(IRect::new(0, 0, 0, 0), sizes).is_empty());
    }

    #[test]
    fn depth_defaults_to_sprite_depth_minus_key_step() {
        let mut s = ship();
        s.depth = 0.5;
        s.layers.get_mut(&1).unwrap().visible = true;
        s.layers.get_mut(&1).unwrap().depth = Some(0.9);
        let draws = s.compose(IRect::new(0, 0, 0, 0), sizes);
        assert!(approx_eq(draws[0].depth, 0.5));
        assert!(approx_eq(draws[1].depth, 0.9));
        assert!(approx_eq(draws[2].depth, 0.48));
    }

    #[test]
    fn solid_scale_grows_around_center_without_origin() {
        let mut s = CompositeSprite::single("body");
        s.scale = vec2(2.0, 2.0);
        let d = &s.compose(IRect::new(100, 100, 64, 32), sizes)[0];
        assert_eq!(d.dest, IRect::new(68, 84, 128, 64).to_rectangle());
    }

    #[test]
    fn solid_scale_grows_right_and_down_with_origin() {
        let mut s = CompositeSprite::single("body");
        s.scale = vec2(2.0, 2.0);
        s.origin = vec2(32.0, 16.0);
        let d = &s.compose(IRect::new(100, 100, 64, 32), sizes)[0];
        assert_eq!(d.dest, IRect::new(100, 100, 128, 64).to_rectangle());
        // Origin follows the stretched destination
        assert!(approx_eq(d.origin.x, 64.0) && approx_eq(d.origin.y, 32.0));
    }

    #[test]
    fn layer_scale_overrides_sprite_scale_for_solids() {
        let mut s = CompositeSprite::new().with_layer(
            0,
            SpriteLayer::solid("body").with_scale(vec2(0.5, 0.5)),
        );
        s.scale = vec2(3.0, 3.0);
        s.origin = vec2(1.0, 1.0);
        let d = &s.compose(IRect::new(0, 0, 64, 32), sizes)[0];
        assert!(approx_eq(d.dest.width, 32.0) && approx_eq(d.dest.height, 16.0));
    }

    #[test]
    fn rotated_solid_without_origin_pivots_on_center() {
        let mut s = CompositeSprite::single("body");
        s.rotation = std::f32::consts::FRAC_PI_2;
        let d = &s.compose(IRect::new(0, 0, 64, 32), sizes)[0];
        assert!(approx_eq(d.origin.x, 32.0) && approx_eq(d.origin.y, 16.0));
        assert!(approx_eq(d.rotation, 90.0));
    }

    #[test]
    fn decal_offset_follows_sprite_rotation_and_scale() {
        let mut s = ship();
        s.scale = vec2(2.0, 2.0);
        s.rotation = std::f32::consts::FRAC_PI_2;
        let draws = s.compose(IRect::new(100, 100, 64, 32), sizes);
        let gun = draws.iter().find(|d| d.key == 2).unwrap();
        // Offset (10, 0) * 2 turned a quarter clockwise
        assert!(approx_eq(gun.dest.x, 100.0) && approx_eq(gun.dest.y, 120.0));
        assert!(approx_eq(gun.dest.width, 32.0) && approx_eq(gun.dest.height, 16.0));
        assert!(approx_eq(gun.origin.x, 16.0) && approx_eq(gun.origin.y, 8.0));
    }

    #[test]
    fn zero_scale_draws_nothing() {
        let mut s = ship();
        s.scale = VEC2_ZERO;
        assert!(s.compose(IRect::new(0, 0, 64, 32), sizes).is_empty());
    }

    #[test]
    fn transparency_goes_into_tint_alpha() {
        let mut s = CompositeSprite::single("body");
        s.transparency = 128;
        let d = &s.compose(IRect::new(0, 0, 0, 0), sizes)[0];
        assert_eq!(d.tint, Color::new(255, 255, 255, 128));
    }

    #[test]
    fn show_exclusive_texture_respects_fixed_layers() {
        let mut s = ship();
        s.layers.get_mut(&2).unwrap().fixed_visibility = true;
        s.show_exclusive_texture(1);
        assert!(!s.layers[&0].visible);
        assert!(s.layers[&1].visible);
        assert!(s.layers[&2].visible);
        // Unknown id is a no-op
        s.show_exclusive_texture(99);
        assert!(s.layers[&1].visible);
    }

    #[test]
    fn merge_sprite_moves_colliding_keys_past_the_end() {
        let mut a = CompositeSprite::new()
            .with_layer(0, SpriteLayer::solid("body"))
            .with_layer(1, SpriteLayer::solid("flag"));
        let b = CompositeSprite::new()
            .with_layer(1, SpriteLayer::decal("gun"))
            .with_layer(5, SpriteLayer::solid("flag"))
            .with_layer(0, SpriteLayer::decal("gun"));
        a.merge_sprite(&b);
        let keys: Vec<i32> = a.layers.keys().copied().collect();
        assert_eq!(keys, vec![0, 1, 2, 3, 5]);
        assert_eq!(a.layers[&2].kind, LayerKind::Decal);
        assert_eq!(a.layers[&5].tex_key, "flag");
    }

    #[test]
    fn merged_layers_drop_their_own_scale() {
        let mut a = CompositeSprite::new().with_layer(0, SpriteLayer::solid("body"));
        let b = CompositeSprite::new().with_layer(
            0,
            SpriteLayer::decal("gun")
                .with_scale(vec2(2.0, 3.0))
                .with_offset(vec2(4.0, 0.0)),
        );
        a.merge_sprite(&b);
        let merged = &a.layers[&1];
        assert_eq!(merged.scale, VEC2_ONE);
        assert_eq!(merged.offset, vec2(4.0, 0.0));
        // The source sprite keeps its layer untouched
        assert_eq!(b.layers[&0].scale, vec2(2.0, 3.0));
    }

    #[test]
    fn texture_size_resolves_through_store() {
        let s = ship();
        assert_eq!(s.texture_size(2, sizes), Some(vec2(16.0, 8.0)));
        assert_eq!(s.texture_size(7, sizes), None);
    }
}
