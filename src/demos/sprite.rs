//! Composite sprite demo.
//!
//! A ship built from solid and decal layers flies past a spinning asteroid
//! while the camera glides after it. Arrows steer. 1 and 2 switch between
//! the intact and damaged hull with `show_exclusive_texture`, 3 toggles the
//! shield decal, Q/E scale the ship and F/T fade it out and in.
use bevy_ecs::prelude::*;
use raylib::ffi::KeyboardKey;

use super::ship::{self, DAMAGED_LAYER, HULL_LAYER, SHIELD_LAYER, Ship, ShipControls};
use super::{DemoContext, DemoError, textures};
use crate::components::mapposition::MapPosition;
use crate::components::sprite::CompositeSprite;
use crate::math::vec2;
use crate::resources::camera2d::Camera2D;
use crate::resources::hud::HudText;
use crate::resources::input::InputHelper;
use crate::resources::worldtime::WorldTime;

/// Scale change per second while Q or E is held.
pub const SCALE_SPEED: f32 = 0.5;
pub const MIN_SCALE: f32 = 0.1;
pub const MAX_SCALE: f32 = 3.0;
/// Alpha change per second while F or T is held.
pub const FADE_SPEED: f32 = 255.0;
/// Seconds the camera takes to catch up with the ship.
pub const FOLLOW_SECS: f32 = 0.5;

#[derive(Component, Debug, Clone, Copy)]
pub struct Asteroid {
    /// Radians per second.
    pub spin: f32,
}

pub fn setup(world: &mut World, ctx: &mut DemoContext) -> Result<(), DemoError> {
    textures::upload(ctx, "ship_hull", &textures::ship_hull(false))?;
    textures::upload(ctx, "ship_damaged", &textures::ship_hull(true))?;
    textures::upload(ctx, "ship_tail", &textures::ship_tail())?;
    textures::upload(ctx, "ship_shield", &textures::ship_shield())?;
    textures::upload(ctx, "asteroid", &textures::asteroid())?;
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

    let (aw, ah) = size("asteroid");
    let mut rock = CompositeSprite::single("asteroid");
    rock.origin = vec2(aw as f32 * 0.5, ah as f32 * 0.5);
    rock.depth = 0.5;
    world.spawn((Asteroid { spin: 0.4 }, rock, MapPosition::new(250.0, -150.0)));
    Ok(())
}

/// Layer visibility, scale and fade keys.
pub fn apply_sprite_keys(input: &InputHelper, sprite: &mut CompositeSprite, dt: f32) {
    if input.key_just_pressed(KeyboardKey::KEY_ONE) {
        sprite.show_exclusive_texture(HULL_LAYER);
    }
    if input.key_just_pressed(KeyboardKey::KEY_TWO) {
        sprite.show_exclusive_texture(DAMAGED_LAYER);
    }
    if input.key_just_pressed(KeyboardKey::KEY_THREE) {
        if let Some(shield) = sprite.layers.get_mut(&SHIELD_LAYER) {
            shield.visible = !shield.visible;
        }
    }

    let mut scale = sprite.scale.x;
    if input.is_key_down(KeyboardKey::KEY_Q) {
        scale -= SCALE_SPEED * dt;
    }
    if input.is_key_down(KeyboardKey::KEY_E) {
        scale += SCALE_SPEED * dt;
    }
    sprite.set_uniform_scale(scale.clamp(MIN_SCALE, MAX_SCALE));

    let mut alpha = sprite.transparency as f32;
    if input.is_key_down(KeyboardKey::KEY_F) {
        alpha -= FADE_SPEED * dt;
    }
    if input.is_key_down(KeyboardKey::KEY_T) {
        alpha += FADE_SPEED * dt;
    }
    sprite.transparency = alpha.clamp(0.0, 255.0) as u8;
}

pub fn sprite_demo_system(
    time: Res<WorldTime>,
    input: Res<InputHelper>,
    mut camera: ResMut<Camera2D>,
    mut hud: ResMut<HudText>,
    mut ships: Query<(&mut Ship, &mut CompositeSprite, &mut MapPosition), Without<Asteroid>>,
    mut asteroids: Query<(&Asteroid, &mut CompositeSprite), Without<Ship>>,
) {
    let dt = time.delta;
    let controls = ShipControls::from_arrows(&input);

    for (mut ship, mut sprite, mut pos) in ships.iter_mut() {
        ship::steer(&mut ship, &mut sprite, &mut pos, controls, dt);
        apply_sprite_keys(&input, &mut sprite, dt);
        ship::follow(&mut camera, pos.pos, FOLLOW_SECS);

        hud.push(format!(
            "Ship {:.0},{:.0}  rotation {:.2}  scale {:.2}  alpha {}",
            pos.pos.x,
            pos.pos.y,
            sprite.rotation,
            sprite.scale.x,
            sprite.transparency
        ));
    }
    for (asteroid, mut sprite) in asteroids.iter_mut() {
        sprite.rotation += asteroid.spin * dt;
    }

    hud.push("Arrows steer, 1/2 hull, 3 shield, Q/E scale, F/T fade");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::input::InputSnapshot;

    fn press(keys: &[KeyboardKey]) -> InputHelper {
        let mut input = InputHelper::new();
        input.advance(InputSnapshot::default().with_keys(keys));
        input
    }

    fn sprite() -> CompositeSprite {
        ship::ship_sprite((48, 64), (16, 32), (80, 80))
    }

    #[test]
    fn number_keys_swap_hulls_and_keep_decals() {
        let mut s = sprite();
        s.layers.get_mut(&ship::TAIL_LAYER).unwrap().visible = true;
        apply_sprite_keys(&press(&[KeyboardKey::KEY_TWO]), &mut s, 0.0);
        assert!(!s.layers[&HULL_LAYER].visible);
        assert!(s.layers[&DAMAGED_LAYER].visible);
        assert!(s.layers[&ship::TAIL_LAYER].visible);

        apply_sprite_keys(&press(&[KeyboardKey::KEY_THREE]), &mut s, 0.0);
        assert!(s.layers[&SHIELD_LAYER].visible);
    }

    #[test]
    fn scale_and_fade_are_clamped() {
        let mut s = sprite();
        apply_sprite_keys(&press(&[KeyboardKey::KEY_Q, KeyboardKey::KEY_F]), &mut s, 10.0);
        assert_eq!(s.scale, vec2(MIN_SCALE, MIN_SCALE));
        assert_eq!(s.transparency, 0);

        apply_sprite_keys(&press(&[KeyboardKey::KEY_E, KeyboardKey::KEY_T]), &mut s, 10.0);
        assert_eq!(s.scale, vec2(MAX_SCALE, MAX_SCALE));
        assert_eq!(s.transparency, 255);
    }
}
