//! Particle update system.
use bevy_ecs::prelude::*;

use crate::resources::particles::ParticlesManager;
use crate::resources::worldtime::WorldTime;

/// Age, integrate and cull every enabled particle effect.
pub fn particles_update_system(mut particles: ResMut<ParticlesManager>, time: Res<WorldTime>) {
    particles.update(time.delta);
}
