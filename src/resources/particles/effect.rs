//! Particle effects: a pool of particles plus the rules that move them.
//!
//! Each [`ParticleEffect`] owns its particles and belongs to one
//! [`EffectKind`]. The kind decides how particles are emitted and how they
//! are integrated every frame:
//!
//! | kind              | emission                     | per-frame behavior                     | blend            |
//! |-------------------|------------------------------|----------------------------------------|------------------|
//! | `Afterburner`     | one cloud behind a heading   | drift, grow, damp, fade in/out         | non-premultiplied|
//! | `SpreadBeam`      | one beam along a heading     | straight flight                        | additive         |
//! | `ExplosionFire`   | burst from a center          | decelerate, spin, grow, fade in/out    | additive         |
//! | `ExplosionSmoke`  | fewer, slower, longer burst  | as fire                                | alpha            |
//! | `ExplosionSparks` | short-lived fast sparks      | fly, fade in/out in orange             | additive         |
//!
//! Speeds are in virtual pixels per second, times in seconds.

use std::f32::consts::{FRAC_PI_4, TAU};

use fastrand::Rng;
use raylib::prelude::{Color, Vector2};
use thiserror::Error;

use super::particle::{Particle, fade_alpha};
use crate::math::{VEC2_UP, add_v2, mul_v2, rotate_v2, scale_v2, vec2};

/// Frame rate the per-frame growth/damping factors were tuned at.
const REFERENCE_FPS: f32 = 60.0;
/// Afterburner cloud growth per reference frame.
const AFTERBURNER_GROWTH: f32 = 1.02;
/// Afterburner velocity damping per reference frame.
const AFTERBURNER_DAMPING: f32 = 0.8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParticleError {
    #[error("{kind:?} effect needs at least one texture")]
    NoTextures { kind: EffectKind },
    #[error("particle effect id {0} is already registered")]
    DuplicateId(i32),
    #[error("{kind:?} effect does not support {emission} emission")]
    UnsupportedEmission {
        kind: EffectKind,
        emission: &'static str,
    },
}

/// The closed set of effect behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Afterburner,
    SpreadBeam,
    ExplosionFire,
    ExplosionSmoke,
    ExplosionSparks,
}

/// Blend mode an effect is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticleBlend {
    /// Premultiplied alpha.
    Alpha,
    Additive,
    /// Straight (non-premultiplied) alpha.
    #[default]
    NonPremultiplied,
}

/// Ranges the emitters sample from. Each pair is `(min, max)`.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectParams {
    pub initial_speed: (f32, f32),
    pub acceleration: (f32, f32),
    pub lifetime: (f32, f32),
    pub scale: (f32, f32),
    /// Particles per explosion, upper bound exclusive.
    pub count: (usize, usize),
    pub rotation_speed: (f32, f32),
    /// Maximum heading deviation for directional emitters, in radians.
    pub spread: f32,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            initial_speed: (40.0, 80.0),
            acceleration: (0.0, 0.0),
            lifetime: (0.5, 1.0),
            scale: (0.3, 1.0),
            count: (15, 20),
            rotation_speed: (-FRAC_PI_4, FRAC_PI_4),
            spread: 0.0,
        }
    }
}

impl EffectKind {
    pub fn default_params(self) -> EffectParams {
        match self {
            EffectKind::Afterburner => EffectParams {
                initial_speed: (360.0, 360.0),
                lifetime: (1.0, 1.0),
                scale: (0.9, 0.9),
                count: (1, 1),
                rotation_speed: (0.0, 0.0),
                ..Default::default()
            },
            EffectKind::SpreadBeam => EffectParams {
                initial_speed: (900.0, 900.0),
                lifetime: (8.0, 8.0),
                scale: (1.0, 1.0),
                count: (1, 1),
                rotation_speed: (0.0, 0.0),
                spread: 0.2,
                ..Default::default()
            },
            EffectKind::ExplosionFire => EffectParams::default(),
            EffectKind::ExplosionSmoke => EffectParams {
                initial_speed: (20.0, 50.0),
                acceleration: (-5.0, -10.0),
                lifetime: (1.0, 2.0),
                scale: (0.5, 1.0),
                count: (4, 6),
                ..Default::default()
            },
            EffectKind::ExplosionSparks => EffectParams {
                initial_speed: (360.0, 360.0),
                lifetime: (0.5, 0.5),
                scale: (0.6, 0.6),
                count: (4, 8),
                rotation_speed: (0.0, 0.0),
                ..Default::default()
            },
        }
    }

    pub fn default_blend(self) -> ParticleBlend {
        match self {
            EffectKind::Afterburner => ParticleBlend::NonPremultiplied,
            EffectKind::ExplosionSmoke => ParticleBlend::Alpha,
            EffectKind::SpreadBeam | EffectKind::ExplosionFire | EffectKind::ExplosionSparks => {
                ParticleBlend::Additive
            }
        }
    }

    fn is_directional(self) -> bool {
        matches!(self, EffectKind::Afterburner | EffectKind::SpreadBeam)
    }
}

/// Sample a random f32 in the range [min, max].
/// If the range is empty, returns min directly.
#[inline]
fn random_between(rng: &mut Rng, min: f32, max: f32) -> f32 {
    let range = max - min;
    if range.abs() < f32::EPSILON {
        return min;
    }
    min + rng.f32() * range
}

fn random_direction(rng: &mut Rng) -> Vector2 {
    let angle = random_between(rng, 0.0, TAU);
    vec2(angle.cos(), angle.sin())
}

/// A particle pool with one [`EffectKind`]'s emission and update rules.
#[derive(Debug, Clone)]
pub struct ParticleEffect {
    id: i32,
    kind: EffectKind,
    /// Disabled effects keep their particles but are not updated.
    pub enabled: bool,
    ready_to_dispose: bool,
    particles: Vec<Particle>,
    textures: Vec<String>,
    pub params: EffectParams,
    blend: ParticleBlend,
    rng: Rng,
}

impl ParticleEffect {
    /// Create an effect drawing from `textures` (texture store keys).
    pub fn new(
        id: i32,
        kind: EffectKind,
        textures: Vec<String>,
    ) -> Result<Self, ParticleError> {
        if textures.is_empty() {
            return Err(ParticleError::NoTextures { kind });
        }
        Ok(Self {
            id,
            kind,
            enabled: true,
            ready_to_dispose: false,
            particles: Vec::new(),
            textures,
            params: kind.default_params(),
            blend: kind.default_blend(),
            rng: Rng::new(),
        })
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Make emission deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Rng::with_seed(seed);
        self
    }

    pub fn with_params(mut self, params: EffectParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_blend(mut self, blend: ParticleBlend) -> Self {
        self.blend = blend;
        self
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: i32) {
        self.id = id;
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn blend(&self) -> ParticleBlend {
        self.blend
    }

    pub fn textures(&self) -> &[String] {
        &self.textures
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    pub fn is_ready_to_dispose(&self) -> bool {
        self.ready_to_dispose
    }

    /// Flag the effect so the manager drops it after its next update.
    pub fn mark_for_dispose(&mut self) {
        self.ready_to_dispose = true;
    }

    /// Drop every live particle.
    pub fn reset(&mut self) {
        self.particles.clear();
    }

    fn pick_texture(&mut self) -> usize {
        self.rng.usize(0..self.textures.len())
    }

    /// Emit one directional particle from `start`, heading along `rotation`
    /// (radians, 0 = up).
    ///
    /// Afterburner clouds travel backwards from the heading; beams travel
    /// along it with a small random spread.
    pub fn generate_particle(
        &mut self,
        start: Vector2,
        rotation: f32,
    ) -> Result<(), ParticleError> {
        if !self.kind.is_directional() {
            return Err(ParticleError::UnsupportedEmission {
                kind: self.kind,
                emission: "directional",
            });
        }
        let speed = random_between(
            &mut self.rng,
            self.params.initial_speed.0,
            self.params.initial_speed.1,
        );
        let lifetime = random_between(
            &mut self.rng,
            self.params.lifetime.0,
            self.params.lifetime.1,
        );
        let s = random_between(&mut self.rng, self.params.scale.0, self.params.scale.1);
        let texture = self.pick_texture();

        let mut p = Particle::new(start, lifetime);
        p.texture = texture;
        p.scale = vec2(s, s);
        p.initial_scale = p.scale;

        match self.kind {
            EffectKind::Afterburner => {
                p.direction = rotate_v2(VEC2_UP, rotation);
                p.velocity = scale_v2(p.direction, -speed);
                p.rotation = rotation;
            }
            _ => {
                let sign = if self.rng.bool() { 1.0 } else { -1.0 };
                p.rotation = rotation + self.rng.f32() * self.params.spread * sign;
                p.direction = rotate_v2(VEC2_UP, p.rotation);
                p.velocity = scale_v2(p.direction, speed);
            }
        }
        self.particles.push(p);
        Ok(())
    }

    /// Emit a burst around `center`. Particles start at random points within
    /// `radius` (0 = all from the center).
    pub fn generate_explosion(
        &mut self,
        center: Vector2,
        radius: f32,
    ) -> Result<usize, ParticleError> {
        if self.kind.is_directional() {
            return Err(ParticleError::UnsupportedEmission {
                kind: self.kind,
                emission: "explosion",
            });
        }
        let (min_count, max_count) = self.params.count;
        let count = if max_count > min_count {
            self.rng.usize(min_count..max_count)
        } else {
            min_count
        };

        for _ in 0..count {
            let start = if radius > 0.0 {
                let r = radius * self.rng.f32().sqrt();
                add_v2(center, scale_v2(random_direction(&mut self.rng), r))
            } else {
                center
            };
            let lifetime =
                random_between(&mut self.rng, self.params.lifetime.0, self.params.lifetime.1);
            let texture = self.pick_texture();
            let mut p = Particle::new(start, lifetime);
            p.texture = texture;

            match self.kind {
                EffectKind::ExplosionSparks => {
                    let s = random_between(&mut self.rng, self.params.scale.0, self.params.scale.1);
                    let speed = random_between(
                        &mut self.rng,
                        self.params.initial_speed.0,
                        self.params.initial_speed.1,
                    );
                    p.scale = vec2(s, s);
                    p.initial_scale = p.scale;
                    p.rotation = random_between(&mut self.rng, 0.0, TAU);
                    p.direction = rotate_v2(VEC2_UP, p.rotation);
                    p.velocity = scale_v2(p.direction, speed);
                    p.color = Color::ORANGE;
                }
                _ => {
                    let direction = random_direction(&mut self.rng);
                    let s = random_between(&mut self.rng, self.params.scale.0, self.params.scale.1);
                    let speed = random_between(
                        &mut self.rng,
                        self.params.initial_speed.0,
                        self.params.initial_speed.1,
                    );
                    p.direction = direction;
                    p.velocity = scale_v2(direction, speed);
                    p.initial_scale = vec2(s, s);
                    p.scale = scale_v2(p.initial_scale, 0.75);
                    p.rotation_speed = random_between(
                        &mut self.rng,
                        self.params.rotation_speed.0,
                        self.params.rotation_speed.1,
                    );
                    // Decelerate to rest at end of life, plus any extra drag
                    let drag = random_between(
                        &mut self.rng,
                        self.params.acceleration.0,
                        self.params.acceleration.1,
                    );
                    let rest = if lifetime > 0.0 {
                        scale_v2(p.velocity, -1.0 / lifetime)
                    } else {
                        vec2(0.0, 0.0)
                    };
                    p.acceleration = add_v2(rest, scale_v2(direction, drag));
                    p.color = Color::new(0, 0, 0, 0);
                }
            }
            self.particles.push(p);
        }
        Ok(count)
    }

    /// Age particles, drop the expired ones, then integrate the survivors.
    pub fn update(&mut self, dt: f32) {
        for p in self.particles.iter_mut() {
            p.time_since_start += dt;
        }
        self.particles.retain(|p| !p.is_expired());

        let kind = self.kind;
        for p in self.particles.iter_mut() {
            integrate(kind, p, dt);
        }
    }
}

fn integrate(kind: EffectKind, p: &mut Particle, dt: f32) {
    let t = p.normalized_lifetime();
    match kind {
        EffectKind::Afterburner => {
            p.position = add_v2(p.position, scale_v2(p.velocity, dt));
            p.color = crate::math::fade_color(Color::WHITE, fade_alpha(t));
            let frames = dt * REFERENCE_FPS;
            p.scale = scale_v2(p.scale, AFTERBURNER_GROWTH.powf(frames));
            p.velocity = scale_v2(p.velocity, AFTERBURNER_DAMPING.powf(frames));
        }
        EffectKind::SpreadBeam => {
            p.position = add_v2(p.position, scale_v2(p.velocity, dt));
        }
        EffectKind::ExplosionFire | EffectKind::ExplosionSmoke => {
            p.velocity = add_v2(p.velocity, scale_v2(p.acceleration, dt));
            p.position = add_v2(p.position, scale_v2(p.velocity, dt));
            p.rotation += p.rotation_speed * dt;
            p.color = crate::math::fade_color(Color::WHITE, fade_alpha(t));
            p.scale = mul_v2(p.initial_scale, vec2(0.75 + 0.25 * t, 0.75 + 0.25 * t));
        }
        EffectKind::ExplosionSparks => {
            p.position = add_v2(p.position, scale_v2(p.velocity, dt));
            p.rotation += p.rotation_speed * dt;
            p.color = crate::math::fade_color(Color::ORANGE, fade_alpha(t));
        }
    }
}
