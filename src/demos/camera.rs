//! Camera demo.
//!
//! Three UFOs sit in world space, the first one circling the origin.
//!
//! - Right mouse drag pans, the wheel zooms and Q/E rotate.
//! - Left click selects a UFO through [`Camera2D::to_virtual`].
//! - C centers and zooms on the selection, T glides to it.
//! - F toggles following it, R resets the camera.
use bevy_ecs::prelude::*;
use raylib::ffi::KeyboardKey;
use raylib::prelude::{Color, Vector2};

use super::{DemoContext, DemoError, ship, textures};
use crate::components::mapposition::MapPosition;
use crate::components::sprite::CompositeSprite;
use crate::components::tint::Tint;
use crate::math::{IRect, length_sq, sub_v2, vec2};
use crate::resources::camera2d::{Camera2D, DEFAULT_TRANSITION_SECS};
use crate::resources::hud::HudText;
use crate::resources::input::{InputHelper, MouseButton, MouseButtonState};
use crate::resources::resolution::ResolutionRenderer;
use crate::resources::texturestore::TextureStore;
use crate::resources::worldtime::WorldTime;

pub const UFO_POSITIONS: [(f32, f32); 3] = [(0.0, 0.0), (300.0, 0.0), (0.0, 300.0)];
pub const ORBIT_RADIUS: f32 = 200.0;
/// Radians per second.
pub const ORBIT_SPEED: f32 = 1.0;
/// Squared window pixels the mouse must move in a frame to pan.
pub const PAN_THRESHOLD_SQ: f32 = 10.0;
/// Radians per frame while Q or E is held.
pub const ROTATE_STEP: f32 = 0.01;
pub const ZOOM_STEP: f32 = 0.1;
/// Margin around the selection for the C key.
const CENTER_MARGIN: i32 = 100;

#[derive(Component, Debug, Clone, Copy)]
pub struct Ufo {
    pub index: usize,
}

#[derive(Resource, Debug, Default)]
pub struct CameraDemo {
    pub selected: Option<Entity>,
    pub follow: bool,
    pub orbit_angle: f32,
}

pub fn setup(world: &mut World, ctx: &mut DemoContext) -> Result<(), DemoError> {
    textures::upload(ctx, "ufo", &textures::ufo())?;
    textures::upload(ctx, "world_grid", &textures::grid(1024, 1024, 64))?;

    world.spawn((
        CompositeSprite {
            depth: 10.0,
            ..CompositeSprite::single("world_grid")
        },
        MapPosition::new(-512.0, -512.0),
    ));
    for (index, (x, y)) in UFO_POSITIONS.into_iter().enumerate() {
        world.spawn((
            Ufo { index },
            CompositeSprite::single("ufo"),
            MapPosition::new(x, y),
            Tint::default(),
        ));
    }
    world.insert_resource(CameraDemo::default());
    Ok(())
}

/// Position on the orbit of the first UFO.
pub fn orbit_position(angle: f32) -> Vector2 {
    vec2(angle.cos() * ORBIT_RADIUS, angle.sin() * ORBIT_RADIUS)
}

/// Move the camera so the world point under the mouse stays under it.
pub fn pan(camera: &mut Camera2D, irr: &ResolutionRenderer, from: Vector2, to: Vector2) {
    let before = camera.to_virtual(from, irr);
    let after = camera.to_virtual(to, irr);
    camera.move_by(sub_v2(before, after));
}

#[allow(clippy::too_many_arguments)]
pub fn camera_demo_system(
    time: Res<WorldTime>,
    input: Res<InputHelper>,
    irr: Res<ResolutionRenderer>,
    textures: NonSend<TextureStore>,
    mut camera: ResMut<Camera2D>,
    mut demo: ResMut<CameraDemo>,
    mut hud: ResMut<HudText>,
    mut ufos: Query<(Entity, &Ufo, &mut MapPosition, &mut Tint, &CompositeSprite)>,
) {
    demo.orbit_angle += ORBIT_SPEED * time.delta;

    let mut rects: Vec<(Entity, IRect)> = Vec::with_capacity(UFO_POSITIONS.len());
    for (entity, ufo, mut pos, _, sprite) in ufos.iter_mut() {
        if ufo.index == 0 {
            pos.pos = orbit_position(demo.orbit_angle);
        }
        let (w, h) = sprite
            .texture_size(0, |k| textures.size_of(k))
            .map_or((0, 0), |s| (s.x as i32, s.y as i32));
        rects.push((entity, pos.dest_rect(w, h)));
    }

    if input.is_mouse_pressed(MouseButton::Right, MouseButtonState::PressedOnly)
        && length_sq(input.mouse_pos_change()) > PAN_THRESHOLD_SQ
    {
        pan(&mut camera, &irr, input.last_mouse_pos(), input.mouse_pos());
    }

    let wheel = input.scroll_diff();
    if wheel != 0.0 {
        camera.zoom_by(wheel * ZOOM_STEP);
    }
    if input.is_key_down(KeyboardKey::KEY_Q) {
        camera.rotate_by(-ROTATE_STEP);
    }
    if input.is_key_down(KeyboardKey::KEY_E) {
        camera.rotate_by(ROTATE_STEP);
    }

    if input.is_mouse_pressed(MouseButton::Left, MouseButtonState::Click) {
        let world_pos = camera.to_virtual(input.mouse_pos(), &irr);
        demo.selected = rects
            .iter()
            .find(|(_, r)| InputHelper::is_pos_in_bound(world_pos, *r))
            .map(|(e, _)| *e);
        log::debug!("Selected {:?} at {:?}", demo.selected, world_pos);
    }
    for (entity, _, _, mut tint, _) in ufos.iter_mut() {
        tint.color = if Some(entity) == demo.selected {
            Color::RED
        } else {
            Color::WHITE
        };
    }

    let selected_rect = demo
        .selected
        .and_then(|sel| rects.iter().find(|(e, _)| *e == sel).map(|(_, r)| *r));
    let target = selected_rect.map_or(vec2(0.0, 0.0), |r| r.center().to_vector());

    if input.key_just_pressed(KeyboardKey::KEY_C) {
        if let Some(rect) = selected_rect {
            camera.stop_transition();
            camera.center_on_target(rect.inflated(CENTER_MARGIN, CENTER_MARGIN), &irr);
        }
    }
    if input.key_just_pressed(KeyboardKey::KEY_T) {
        camera.start_transition(target, DEFAULT_TRANSITION_SECS);
    }
    if input.key_just_pressed(KeyboardKey::KEY_F) {
        demo.follow = !demo.follow;
        if !demo.follow {
            camera.stop_transition();
        }
    }
    if demo.follow {
        ship::follow(&mut camera, target, 0.5);
    }
    if input.key_just_pressed(KeyboardKey::KEY_R) {
        demo.follow = false;
        camera.stop_transition();
        camera.set_position(vec2(0.0, 0.0));
        camera.set_zoom(1.0);
        camera.set_rotation(0.0);
    }

    let cam_pos = camera.position();
    hud.push(format!(
        "Camera {:.0},{:.0}  zoom {:.2}  rotation {:.2}",
        cam_pos.x,
        cam_pos.y,
        camera.zoom(),
        camera.rotation()
    ));
    hud.push(format!(
        "Selected: {}  follow: {}  transition: {}",
        demo.selected.map_or("none".to_string(), |e| format!("{:?}", e)),
        demo.follow,
        camera.is_transition_active()
    ));
    hud.push("RMB pan, wheel zoom, Q/E rotate, LMB select");
    hud.push("C center, T glide, F follow, R reset, Esc quit");
}
