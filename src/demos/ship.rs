//! The player ship shared by the sprite and particles demos.
//!
//! The ship is a [`CompositeSprite`] whose origin is the hull center, so its
//! [`MapPosition`] is the ship center and the decal layers hang off it.
use bevy_ecs::prelude::*;
use raylib::ffi::KeyboardKey;
use raylib::prelude::Vector2;

use crate::components::mapposition::MapPosition;
use crate::components::sprite::{CompositeSprite, SpriteLayer};
use crate::math::{VEC2_UP, add_v2, length_sq, rotate_v2, scale_v2, sub_v2, vec2};
use crate::resources::camera2d::Camera2D;
use crate::resources::input::InputHelper;

pub const HULL_LAYER: i32 = 0;
pub const DAMAGED_LAYER: i32 = 1;
pub const TAIL_LAYER: i32 = 2;
pub const SHIELD_LAYER: i32 = 3;

/// Radians per 60 Hz frame.
pub const TURN_STEP: f32 = 0.02;
/// Pixels per second squared.
pub const THRUST: f32 = 420.0;
pub const MAX_SPEED: f32 = 520.0;
/// Velocity kept per 60 Hz frame while coasting.
pub const DAMPING: f32 = 0.985;

#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Ship {
    pub velocity: Vector2,
    pub thrusting: bool,
}

/// Steering for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipControls {
    /// -1 turns left, +1 turns right.
    pub turn: f32,
    pub thrust: bool,
}

impl ShipControls {
    pub fn from_arrows(input: &InputHelper) -> Self {
        Self::from_keys(
            input,
            &[KeyboardKey::KEY_LEFT],
            &[KeyboardKey::KEY_RIGHT],
            &[KeyboardKey::KEY_UP],
        )
    }

    pub fn from_arrows_and_wasd(input: &InputHelper) -> Self {
        Self::from_keys(
            input,
            &[KeyboardKey::KEY_LEFT, KeyboardKey::KEY_A],
            &[KeyboardKey::KEY_RIGHT, KeyboardKey::KEY_D],
            &[KeyboardKey::KEY_UP, KeyboardKey::KEY_W],
        )
    }

    fn from_keys(
        input: &InputHelper,
        left: &[KeyboardKey],
        right: &[KeyboardKey],
        thrust: &[KeyboardKey],
    ) -> Self {
        let any = |keys: &[KeyboardKey]| keys.iter().any(|k| input.is_key_down(*k));
        let mut turn = 0.0;
        if any(left) {
            turn -= 1.0;
        }
        if any(right) {
            turn += 1.0;
        }
        Self {
            turn,
            thrust: any(thrust),
        }
    }
}

/// Hull, damaged hull, exhaust and shield layers for a hull of
/// `hull_size` pixels.
pub fn ship_sprite(
    hull_size: (i32, i32),
    tail_size: (i32, i32),
    shield_size: (i32, i32),
) -> CompositeSprite {
    let (hw, hh) = (hull_size.0 as f32, hull_size.1 as f32);
    let mut sprite = CompositeSprite::new()
        .with_layer(HULL_LAYER, SpriteLayer::solid("ship_hull"))
        .with_layer(
            DAMAGED_LAYER,
            SpriteLayer::solid("ship_damaged").with_visible(false),
        )
        .with_layer(
            TAIL_LAYER,
            SpriteLayer::decal("ship_tail")
                .with_fixed_visibility(true)
                .with_visible(false)
                .with_depth(1.0)
                .with_offset(vec2(0.0, hh * 0.5 - 6.0))
                .with_origin(vec2(tail_size.0 as f32 * 0.5, 0.0)),
        )
        .with_layer(
            SHIELD_LAYER,
            SpriteLayer::decal("ship_shield")
                .with_fixed_visibility(true)
                .with_visible(false)
                .with_origin(vec2(shield_size.0 as f32 * 0.5, shield_size.1 as f32 * 0.5)),
        );
    sprite.origin = vec2(hw * 0.5, hh * 0.5);
    sprite
}

/// Unit heading of a sprite rotated by `rotation` radians, 0 = up.
pub fn heading(rotation: f32) -> Vector2 {
    rotate_v2(VEC2_UP, rotation)
}

/// A point `distance` pixels ahead of the ship center (negative = behind).
pub fn point_ahead(pos: &MapPosition, sprite: &CompositeSprite, distance: f32) -> Vector2 {
    add_v2(pos.pos, scale_v2(heading(sprite.rotation), distance * sprite.scale.y))
}

/// Turn, accelerate, damp and move the ship by one frame of `dt` seconds.
///
/// Also shows the exhaust while thrusting, stretched with speed.
pub fn steer(
    ship: &mut Ship,
    sprite: &mut CompositeSprite,
    pos: &mut MapPosition,
    controls: ShipControls,
    dt: f32,
) {
    let frames = dt * 60.0;
    sprite.rotation += controls.turn * TURN_STEP * frames;

    ship.thrusting = controls.thrust;
    if controls.thrust {
        ship.velocity = add_v2(ship.velocity, scale_v2(heading(sprite.rotation), THRUST * dt));
    } else {
        ship.velocity = scale_v2(ship.velocity, DAMPING.powf(frames));
    }
    let speed_sq = length_sq(ship.velocity);
    if speed_sq > MAX_SPEED * MAX_SPEED {
        ship.velocity = scale_v2(ship.velocity, MAX_SPEED / speed_sq.sqrt());
    }
    pos.pos = add_v2(pos.pos, scale_v2(ship.velocity, dt));

    if let Some(tail) = sprite.layers.get_mut(&TAIL_LAYER) {
        tail.visible = controls.thrust;
        let speed = length_sq(ship.velocity).sqrt();
        tail.scale = vec2(1.0, 0.6 + 0.8 * (speed / MAX_SPEED));
    }
}

/// Keep the camera gliding after `target`.
pub fn follow(camera: &mut Camera2D, target: Vector2, secs: f32) {
    if camera.is_transition_active() {
        camera.update_transition_target(target);
    } else if length_sq(sub_v2(camera.position(), target)) > 0.25 {
        camera.start_transition(target, secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::input::InputSnapshot;

    const EPSILON: f32 = 1e-3;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn ship() -> (Ship, CompositeSprite, MapPosition) {
        (
            Ship::default(),
            ship_sprite((48, 64), (16, 32), (80, 80)),
            MapPosition::new(0.0, 0.0),
        )
    }

    #[test]
    fn thrust_moves_along_heading() {
        let (mut s, mut sprite, mut pos) = ship();
        let controls = ShipControls {
            turn: 0.0,
            thrust: true,
        };
        for _ in 0..30 {
            steer(&mut s, &mut sprite, &mut pos, controls, 1.0 / 60.0);
        }
        assert!(pos.pos.y < 0.0);
        assert!(approx_eq(pos.pos.x, 0.0));
        assert!(sprite.layers[&TAIL_LAYER].visible);
    }

    #[test]
    fn turning_is_frame_rate_independent() {
        let (mut a, mut sa, mut pa) = ship();
        let (mut b, mut sb, mut pb) = ship();
        let right = ShipControls {
            turn: 1.0,
            thrust: false,
        };
        steer(&mut a, &mut sa, &mut pa, right, 0.5);
        for _ in 0..30 {
            steer(&mut b, &mut sb, &mut pb, right, 0.5 / 30.0);
        }
        assert!(approx_eq(sa.rotation, 30.0 * TURN_STEP));
        assert!(approx_eq(sa.rotation, sb.rotation));
    }

    #[test]
    fn speed_is_capped() {
        let (mut s, mut sprite, mut pos) = ship();
        let controls = ShipControls {
            turn: 0.0,
            thrust: true,
        };
        steer(&mut s, &mut sprite, &mut pos, controls, 10.0);
        assert!(length_sq(s.velocity).sqrt() <= MAX_SPEED + EPSILON);
    }

    #[test]
    fn tail_hides_when_coasting() {
        let (mut s, mut sprite, mut pos) = ship();
        steer(&mut s, &mut sprite, &mut pos, ShipControls::default(), 0.016);
        assert!(!sprite.layers[&TAIL_LAYER].visible);
        assert!(!s.thrusting);
    }

    #[test]
    fn wasd_and_arrows_map_to_controls() {
        let mut input = InputHelper::new();
        input.advance(
            InputSnapshot::default().with_keys(&[KeyboardKey::KEY_A, KeyboardKey::KEY_UP]),
        );
        assert_eq!(
            ShipControls::from_arrows_and_wasd(&input),
            ShipControls {
                turn: -1.0,
                thrust: true
            }
        );
        assert_eq!(
            ShipControls::from_arrows(&input),
            ShipControls {
                turn: 0.0,
                thrust: true
            }
        );
    }

    #[test]
    fn point_ahead_follows_rotation() {
        let (_, mut sprite, pos) = ship();
        sprite.rotation = std::f32::consts::FRAC_PI_2;
        let p = point_ahead(&pos, &sprite, 10.0);
        assert!(approx_eq(p.x, 10.0));
        assert!(approx_eq(p.y, 0.0));
    }
}
