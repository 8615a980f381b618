//! Particle effects demo.
//!
//! WASD or the arrows fly the ship, which leaves an afterburner trail while
//! thrusting. Space fires the spread beam. A left click sets off a smoke,
//! fire and sparks explosion at the clicked world point. The wheel zooms.
use bevy_ecs::prelude::*;
use raylib::ffi::KeyboardKey;
use raylib::prelude::Vector2;

use super::ship::{self, Ship, ShipControls};
use super::{DemoContext, DemoError, textures};
use crate::components::mapposition::MapPosition;
use crate::components::sprite::CompositeSprite;
use crate::resources::camera2d::Camera2D;
use crate::resources::hud::HudText;
use crate::resources::input::{InputHelper, MouseButton, MouseButtonState};
use crate::resources::particles::{EffectKind, ParticleEffect, ParticleError, ParticlesManager};
use crate::resources::resolution::ResolutionRenderer;
use crate::resources::texturestore::TextureStore;
use crate::resources::worldtime::WorldTime;

pub const AFTERBURNER_ID: i32 = 1;
pub const BEAM_ID: i32 = 2;
pub const SMOKE_ID: i32 = 3;
pub const FIRE_ID: i32 = 4;
pub const SPARKS_ID: i32 = 5;

/// Seconds between afterburner puffs.
pub const AFTERBURNER_INTERVAL: f32 = 0.03;
pub const EXPLOSION_RADIUS: f32 = 100.0;
pub const MIN_ZOOM: f32 = 0.4;
pub const MAX_ZOOM: f32 = 10.0;
const ZOOM_STEP: f32 = 0.1;
const FOLLOW_SECS: f32 = 0.4;

#[derive(Resource, Debug, Default)]
pub struct ParticlesDemo {
    /// Time banked toward the next afterburner puff.
    pub emit_timer: f32,
    pub explosions: u32,
}

impl ParticlesDemo {
    /// Puffs due after `dt` more seconds of thrust.
    pub fn due_puffs(&mut self, dt: f32) -> u32 {
        self.emit_timer += dt;
        let mut n = 0;
        while self.emit_timer >= AFTERBURNER_INTERVAL {
            self.emit_timer -= AFTERBURNER_INTERVAL;
            n += 1;
        }
        n
    }
}

/// The five demo effects, registered under their fixed ids.
pub fn build_effects(particles: &mut ParticlesManager) -> Result<(), ParticleError> {
    let soft = vec!["particle".to_string()];
    particles.add(ParticleEffect::new(AFTERBURNER_ID, EffectKind::Afterburner, soft.clone())?)?;
    particles.add(ParticleEffect::new(BEAM_ID, EffectKind::SpreadBeam, vec!["beam".to_string()])?)?;
    particles.add(ParticleEffect::new(SMOKE_ID, EffectKind::ExplosionSmoke, soft.clone())?)?;
    particles.add(ParticleEffect::new(FIRE_ID, EffectKind::ExplosionFire, soft)?)?;
    particles.add(ParticleEffect::new(
        SPARKS_ID,
        EffectKind::ExplosionSparks,
        vec!["spark".to_string()],
    )?)?;
    Ok(())
}

/// Set off smoke, fire and sparks at `at`. Returns the particles emitted.
pub fn explode(particles: &mut ParticlesManager, at: Vector2) -> Result<usize, ParticleError> {
    let mut total = 0;
    for id in [SMOKE_ID, FIRE_ID, SPARKS_ID] {
        if let Some(effect) = particles.get_mut(id) {
            total += effect.generate_explosion(at, EXPLOSION_RADIUS)?;
        }
    }
    Ok(total)
}

pub fn setup(world: &mut World, ctx: &mut DemoContext) -> Result<(), DemoError> {
    textures::upload(ctx, "ship_hull", &textures::ship_hull(false))?;
    textures::upload(ctx, "ship_damaged", &textures::ship_hull(true))?;
    textures::upload(ctx, "ship_tail", &textures::ship_tail())?;
    textures::upload(ctx, "ship_shield", &textures::ship_shield())?;
    textures::upload(ctx, "particle", &textures::soft_particle(32))?;
    textures::upload(ctx, "spark", &textures::spark())?;
    textures::upload(ctx, "beam", &textures::beam())?;
    textures::upload(ctx, "world_grid", &textures::grid(2048, 2048, 128))?;

    let size = |key: &str| ctx.textures.size_of(key).unwrap_or((0, 0));
    let mut sprite = ship::ship_sprite(size("ship_hull"), size("ship_tail"), size("ship_shield"));
    sprite.set_uniform_scale(0.5);

    world.spawn((
        CompositeSprite {
            depth: 10.0,
            ..CompositeSprite::single("world_grid")
        },
        MapPosition::new(-1024.0, -1024.0),
    ));
    world.spawn((Ship::default(), sprite, MapPosition::new(0.0, 0.0)));

    build_effects(&mut world.resource_mut::<ParticlesManager>())?;
    {
        let mut camera = world.resource_mut::<Camera2D>();
        camera.set_min_zoom(MIN_ZOOM);
        camera.set_max_zoom(MAX_ZOOM);
    }
    world.insert_resource(ParticlesDemo::default());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn particles_demo_system(
    time: Res<WorldTime>,
    input: Res<InputHelper>,
    irr: Res<ResolutionRenderer>,
    textures: NonSend<TextureStore>,
    mut camera: ResMut<Camera2D>,
    mut particles: ResMut<ParticlesManager>,
    mut demo: ResMut<ParticlesDemo>,
    mut hud: ResMut<HudText>,
    mut ships: Query<(&mut Ship, &mut CompositeSprite, &mut MapPosition)>,
) {
    let dt = time.delta;
    let controls = ShipControls::from_arrows_and_wasd(&input);

    for (mut ship, mut sprite, mut pos) in ships.iter_mut() {
        ship::steer(&mut ship, &mut sprite, &mut pos, controls, dt);
        ship::follow(&mut camera, pos.pos, FOLLOW_SECS);

        let half_height = sprite
            .texture_size(ship::HULL_LAYER, |k| textures.size_of(k))
            .map_or(0.0, |s| s.y * 0.5);
        if ship.thrusting {
            let tail = ship::point_ahead(&pos, &sprite, -half_height);
            for _ in 0..demo.due_puffs(dt) {
                if let Some(effect) = particles.get_mut(AFTERBURNER_ID) {
                    if let Err(e) = effect.generate_particle(tail, sprite.rotation) {
                        log::warn!("Afterburner: {}", e);
                    }
                }
            }
        } else {
            demo.emit_timer = 0.0;
        }
        if input.is_key_down(KeyboardKey::KEY_SPACE) {
            let nose = ship::point_ahead(&pos, &sprite, half_height);
            if let Some(effect) = particles.get_mut(BEAM_ID) {
                if let Err(e) = effect.generate_particle(nose, sprite.rotation) {
                    log::warn!("Beam: {}", e);
                }
            }
        }
    }

    if input.is_mouse_pressed(MouseButton::Left, MouseButtonState::Click) {
        let at = camera.to_virtual(input.mouse_pos(), &irr);
        match explode(&mut particles, at) {
            Ok(n) => {
                demo.explosions += 1;
                log::debug!("Explosion at {:?} with {} particles", at, n);
            }
            Err(e) => log::warn!("Explosion failed: {}", e),
        }
    }

    let wheel = input.scroll_diff();
    if wheel != 0.0 {
        camera.zoom_by(wheel * ZOOM_STEP);
    }

    hud.push(format!(
        "Effects {}  particles {}  explosions {}  zoom {:.2}",
        particles.len(),
        particles.particle_count(),
        demo.explosions,
        camera.zoom()
    ));
    hud.push("WASD/arrows fly, SPACE beam, LMB explode, wheel zoom");
}
