//! 2D math primitives shared by the resolution renderer, camera and sprites.
//!
//! - [`Affine2`] – 2D affine matrix composed in row-vector order
//!   (`a * b` applies `a` first, then `b`)
//! - [`IRect`] / [`IPoint`] – integer rectangles and points in pixel space
//! - free functions for the handful of [`Vector2`] operations the crate needs
//!
//! Raylib's [`Vector2`], [`Rectangle`] and [`Color`] are used as the value
//! types everywhere so data flows straight into draw calls.

use std::ops::Mul;

use raylib::prelude::{Color, Rectangle, Vector2};
use serde::{Deserialize, Serialize};

/// Shorthand constructor for a [`Vector2`].
#[inline]
pub const fn vec2(x: f32, y: f32) -> Vector2 {
    Vector2 { x, y }
}

/// The zero vector.
pub const VEC2_ZERO: Vector2 = vec2(0.0, 0.0);
/// The one vector.
pub const VEC2_ONE: Vector2 = vec2(1.0, 1.0);
/// Screen-space "up" (negative Y).
pub const VEC2_UP: Vector2 = vec2(0.0, -1.0);

/// 2D affine transform.
///
/// Points are treated as row vectors: `p' = p * M`, matching the way sprite
/// batch matrices compose. The linear part is
///
/// ```text
/// | m11 m12 |
/// | m21 m22 |
/// ```
///
/// followed by the translation `(tx, ty)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2 {
    pub m11: f32,
    pub m12: f32,
    pub m21: f32,
    pub m22: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Affine2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2 {
    pub const IDENTITY: Affine2 = Affine2 {
        m11: 1.0,
        m12: 0.0,
        m21: 0.0,
        m22: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub fn translation(x: f32, y: f32) -> Self {
        Affine2 {
            tx: x,
            ty: y,
            ..Self::IDENTITY
        }
    }

    /// Rotation around the Z axis, angle in radians.
    ///
    /// With Y pointing down this turns clockwise on screen.
    pub fn rotation_z(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Affine2 {
            m11: cos,
            m12: sin,
            m21: -sin,
            m22: cos,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Affine2 {
            m11: sx,
            m22: sy,
            ..Self::IDENTITY
        }
    }

    pub fn uniform_scale(s: f32) -> Self {
        Self::scale(s, s)
    }

    pub fn determinant(&self) -> f32 {
        self.m11 * self.m22 - self.m12 * self.m21
    }

    /// Inverse transform, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        if !inv_det.is_finite() {
            return None;
        }
        let m11 = self.m22 * inv_det;
        let m12 = -self.m12 * inv_det;
        let m21 = -self.m21 * inv_det;
        let m22 = self.m11 * inv_det;
        Some(Affine2 {
            m11,
            m12,
            m21,
            m22,
            tx: -(self.tx * m11 + self.ty * m21),
            ty: -(self.tx * m12 + self.ty * m22),
        })
    }

    pub fn transform_point(&self, p: Vector2) -> Vector2 {
        vec2(
            p.x * self.m11 + p.y * self.m21 + self.tx,
            p.x * self.m12 + p.y * self.m22 + self.ty,
        )
    }

    /// Transform a direction (translation is ignored).
    pub fn transform_vector(&self, v: Vector2) -> Vector2 {
        vec2(
            v.x * self.m11 + v.y * self.m21,
            v.x * self.m12 + v.y * self.m22,
        )
    }
}

impl Mul for Affine2 {
    type Output = Affine2;

    /// `self * rhs` applies `self` first, then `rhs`.
    fn mul(self, rhs: Affine2) -> Affine2 {
        Affine2 {
            m11: self.m11 * rhs.m11 + self.m12 * rhs.m21,
            m12: self.m11 * rhs.m12 + self.m12 * rhs.m22,
            m21: self.m21 * rhs.m11 + self.m22 * rhs.m21,
            m22: self.m21 * rhs.m12 + self.m22 * rhs.m22,
            tx: self.tx * rhs.m11 + self.ty * rhs.m21 + rhs.tx,
            ty: self.tx * rhs.m12 + self.ty * rhs.m22 + rhs.ty,
        }
    }
}

/// Integer point in pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IPoint {
    pub x: i32,
    pub y: i32,
}

impl IPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_vector(self) -> Vector2 {
        vec2(self.x as f32, self.y as f32)
    }

    /// Truncates toward zero.
    pub fn from_vector(v: Vector2) -> Self {
        Self::new(v.x as i32, v.y as i32)
    }
}

/// Integer rectangle in pixel space.
///
/// `contains` is half-open: the right and bottom edges are outside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl IRect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn location(&self) -> IPoint {
        IPoint::new(self.x, self.y)
    }

    /// Integer center (`x + w / 2`, `y + h / 2`).
    pub fn center(&self) -> IPoint {
        IPoint::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    pub fn contains_point(&self, p: IPoint) -> bool {
        self.contains(p.x, p.y)
    }

    /// Grow the rectangle by `dw` on the left and right and by `dh` on the
    /// top and bottom.
    pub fn inflated(&self, dw: i32, dh: i32) -> Self {
        Self::new(self.x - dw, self.y - dh, self.w + dw * 2, self.h + dh * 2)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 && self.h == 0 && self.x == 0 && self.y == 0
    }

    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle {
            x: self.x as f32,
            y: self.y as f32,
            width: self.w as f32,
            height: self.h as f32,
        }
    }
}

#[inline]
pub fn lerp_v2(a: Vector2, b: Vector2, t: f32) -> Vector2 {
    vec2(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

#[inline]
pub fn add_v2(a: Vector2, b: Vector2) -> Vector2 {
    vec2(a.x + b.x, a.y + b.y)
}

#[inline]
pub fn sub_v2(a: Vector2, b: Vector2) -> Vector2 {
    vec2(a.x - b.x, a.y - b.y)
}

#[inline]
pub fn scale_v2(v: Vector2, s: f32) -> Vector2 {
    vec2(v.x * s, v.y * s)
}

/// Component-wise product.
#[inline]
pub fn mul_v2(a: Vector2, b: Vector2) -> Vector2 {
    vec2(a.x * b.x, a.y * b.y)
}

#[inline]
pub fn length_sq(v: Vector2) -> f32 {
    v.x * v.x + v.y * v.y
}

pub fn normalize_or_zero(v: Vector2) -> Vector2 {
    let len = length_sq(v).sqrt();
    if len <= f32::EPSILON {
        VEC2_ZERO
    } else {
        scale_v2(v, 1.0 / len)
    }
}

/// Rotate `v` by `radians` using the same convention as [`Affine2::rotation_z`].
pub fn rotate_v2(v: Vector2, radians: f32) -> Vector2 {
    Affine2::rotation_z(radians).transform_vector(v)
}

/// Multiply every channel by `factor` (clamped to `[0, 1]`).
///
/// Fading a color this way keeps it usable with premultiplied and additive
/// blending alike.
pub fn fade_color(color: Color, factor: f32) -> Color {
    let f = factor.clamp(0.0, 1.0);
    Color::new(
        (color.r as f32 * f) as u8,
        (color.g as f32 * f) as u8,
        (color.b as f32 * f) as u8,
        (color.a as f32 * f) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn approx_v2(a: Vector2, b: Vector2) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
    }

    #[test]
    fn translation_then_scale_applies_in_order() {
        let m = Affine2::translation(10.0, 0.0) * Affine2::uniform_scale(2.0);
        let p = m.transform_point(vec2(1.0, 1.0));
        assert!(approx_v2(p, vec2(22.0, 2.0)));
    }

    #[test]
    fn rotation_quarter_turn_maps_x_to_y() {
        let r = Affine2::rotation_z(std::f32::consts::FRAC_PI_2);
        let p = r.transform_point(vec2(1.0, 0.0));
        assert!(approx_v2(p, vec2(0.0, 1.0)));
    }

    #[test]
    fn inverse_round_trips_composed_transform() {
        let m = Affine2::translation(-40.0, 12.0)
            * Affine2::rotation_z(0.7)
            * Affine2::uniform_scale(1.5)
            * Affine2::translation(640.0, 360.0);
        let inv = m.inverse().unwrap();
        let p = vec2(123.0, -45.0);
        assert!(approx_v2(inv.transform_point(m.transform_point(p)), p));
        let id = m * inv;
        assert!(approx_eq(id.m11, 1.0) && approx_eq(id.m22, 1.0));
        assert!(approx_eq(id.tx, 0.0) && approx_eq(id.ty, 0.0));
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(Affine2::uniform_scale(0.0).inverse().is_none());
        assert!(Affine2::scale(3.0, 0.0).inverse().is_none());
        assert!(Affine2::uniform_scale(f32::NAN).inverse().is_none());
    }

    #[test]
    fn tiny_scale_is_still_invertible() {
        // det = 1e-8, below f32::EPSILON but far from singular
        let m = Affine2::uniform_scale(1e-4) * Affine2::translation(3.0, -2.0);
        let inv = m.inverse().unwrap();
        let p = vec2(5000.0, -1200.0);
        let back = m.transform_point(inv.transform_point(p));
        assert!((back.x - p.x).abs() < 1e-2 && (back.y - p.y).abs() < 1e-2);
    }

    #[test]
    fn irect_contains_is_half_open() {
        let r = IRect::new(0, 0, 10, 10);
        assert!(r.contains(0, 0));
        assert!(r.contains(9, 9));
        assert!(!r.contains(10, 5));
        assert!(!r.contains(-1, 5));
    }

    #[test]
    fn irect_inflated_grows_on_every_side() {
        let r = IRect::new(10, 20, 30, 40).inflated(5, 2);
        assert_eq!(r, IRect::new(5, 18, 40, 44));
        assert_eq!(r.center(), IPoint::new(25, 40));
    }

    #[test]
    fn normalize_zero_vector_stays_zero() {
        assert!(approx_v2(normalize_or_zero(VEC2_ZERO), VEC2_ZERO));
        assert!(approx_v2(normalize_or_zero(vec2(3.0, 4.0)), vec2(0.6, 0.8)));
    }

    #[test]
    fn fade_color_scales_all_channels() {
        let c = fade_color(Color::new(255, 255, 255, 255), 0.5);
        assert_eq!((c.r, c.a), (127, 127));
        let c = fade_color(Color::new(255, 255, 255, 255), 2.0);
        assert_eq!(c.a, 255);
    }
}
