//! Particle effects.
//!
//! - [`particle`] – a single particle and the shared fade curve
//! - [`effect`] – effect kinds, their parameters and emission/update rules
//! - [`manager`] – the [`ParticlesManager`] resource holding every live effect
pub mod effect;
pub mod manager;
pub mod particle;

pub use effect::{EffectKind, EffectParams, ParticleBlend, ParticleEffect, ParticleError};
pub use manager::ParticlesManager;
pub use particle::{Particle, fade_alpha};
