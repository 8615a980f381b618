//! A single particle and the fade curve shared by all effects.

use raylib::prelude::{Color, Vector2};

use crate::math::{VEC2_ONE, VEC2_ZERO};

/// Fade-in/fade-out alpha for a normalized lifetime `t` in `[0, 1]`.
///
/// `4·t·(1−t)`: zero at birth and death, 1.0 at half-life.
#[inline]
pub fn fade_alpha(t: f32) -> f32 {
    4.0 * t * (1.0 - t)
}

/// One particle owned by a [`ParticleEffect`](super::effect::ParticleEffect).
#[derive(Debug, Clone)]
pub struct Particle {
    /// Optional particle type id, free for the effect to use.
    pub id: i32,
    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
    /// Unit direction the particle was emitted in.
    pub direction: Vector2,
    /// Rotation in radians.
    pub rotation: f32,
    /// Radians per second.
    pub rotation_speed: f32,
    pub scale: Vector2,
    pub initial_scale: Vector2,
    pub color: Color,
    /// Draw depth, larger is further back.
    pub depth: f32,
    /// Index into the owning effect's texture list.
    pub texture: usize,
    /// Seconds since emission.
    pub time_since_start: f32,
    /// Seconds to live.
    pub lifetime: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            id: 0,
            position: VEC2_ZERO,
            velocity: VEC2_ZERO,
            acceleration: VEC2_ZERO,
            direction: VEC2_ZERO,
            rotation: 0.0,
            rotation_speed: 0.0,
            scale: VEC2_ONE,
            initial_scale: VEC2_ONE,
            color: Color::WHITE,
            depth: 0.0,
            texture: 0,
            time_since_start: 0.0,
            lifetime: 0.0,
        }
    }
}

impl Particle {
    pub fn new(position: Vector2, lifetime: f32) -> Self {
        Self {
            position,
            lifetime,
            ..Default::default()
        }
    }

    /// True once the particle has outlived its lifetime.
    pub fn is_expired(&self) -> bool {
        self.time_since_start > self.lifetime
    }

    /// How far through its life the particle is, clamped to `[0, 1]`.
    pub fn normalized_lifetime(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        (self.time_since_start / self.lifetime).clamp(0.0, 1.0)
    }

    /// Skip drawing fully transparent or zero-scaled particles.
    pub fn is_visible(&self) -> bool {
        !self.is_expired() && self.color.a > 0 && (self.scale.x != 0.0 || self.scale.y != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn fade_alpha_is_zero_at_ends_and_peaks_at_half() {
        assert!(approx_eq(fade_alpha(0.0), 0.0));
        assert!(approx_eq(fade_alpha(1.0), 0.0));
        assert!(approx_eq(fade_alpha(0.5), 1.0));
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            assert!(fade_alpha(t) <= fade_alpha(0.5) + EPSILON);
            assert!(fade_alpha(t) >= 0.0);
        }
    }

    #[test]
    fn expires_strictly_after_lifetime() {
        let mut p = Particle::new(vec2(0.0, 0.0), 1.0);
        p.time_since_start = 1.0;
        assert!(!p.is_expired());
        p.time_since_start = 1.0001;
        assert!(p.is_expired());
    }

    #[test]
    fn default_particle_is_white_and_unit_scale() {
        let p = Particle::default();
        assert_eq!(p.color, Color::WHITE);
        assert!(approx_eq(p.scale.x, 1.0) && approx_eq(p.scale.y, 1.0));
    }

    #[test]
    fn invisible_when_transparent() {
        let mut p = Particle::new(vec2(0.0, 0.0), 1.0);
        assert!(p.is_visible());
        p.color = Color::new(255, 255, 255, 0);
        assert!(!p.is_visible());
    }
}
