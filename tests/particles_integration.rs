//! Particle effects driven through the update and demo systems.

use bevy_ecs::prelude::*;
use raylib::ffi::KeyboardKey;

use resolute2d::components::mapposition::MapPosition;
use resolute2d::demos::particles::{
    AFTERBURNER_ID, BEAM_ID, FIRE_ID, ParticlesDemo, SMOKE_ID, SPARKS_ID, build_effects, explode,
    particles_demo_system,
};
use resolute2d::demos::ship::{self, Ship};
use resolute2d::math::vec2;
use resolute2d::resources::camera2d::Camera2D;
use resolute2d::resources::hud::HudText;
use resolute2d::resources::input::{InputHelper, InputSnapshot, MouseButton};
use resolute2d::resources::particles::ParticlesManager;
use resolute2d::resources::resolution::ResolutionRenderer;
use resolute2d::resources::texturestore::TextureStore;
use resolute2d::resources::worldtime::WorldTime;
use resolute2d::systems::particles::particles_update_system;

const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world(delta: f32) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime {
        elapsed: 0.0,
        delta,
        time_scale: 1.0,
        frame_count: 0,
    });
    let mut particles = ParticlesManager::new();
    build_effects(&mut particles).unwrap();
    world.insert_resource(particles);
    world.insert_resource(Camera2D::new());
    world.insert_resource(ResolutionRenderer::new(1280, 720, 1280, 720).unwrap());
    world.insert_resource(InputHelper::new());
    world.insert_resource(HudText::default());
    world.insert_resource(ParticlesDemo::default());
    world.insert_non_send_resource(TextureStore::new());
    world
}

fn spawn_ship(world: &mut World) -> Entity {
    world
        .spawn((
            Ship::default(),
            ship::ship_sprite((48, 64), (16, 32), (80, 80)),
            MapPosition::new(0.0, 0.0),
        ))
        .id()
}

fn tick_particles(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(particles_update_system);
    schedule.run(world);
}

fn tick_demo(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(particles_demo_system);
    schedule.run(world);
}

fn count(world: &World, id: i32) -> usize {
    world
        .resource::<ParticlesManager>()
        .get(id)
        .map_or(0, |e| e.particles().len())
}

#[test]
fn short_lived_sparks_are_culled_first() {
    let mut world = make_world(0.75);
    explode(&mut world.resource_mut::<ParticlesManager>(), vec2(0.0, 0.0)).unwrap();
    assert!(count(&world, SPARKS_ID) > 0);
    let smoke = count(&world, SMOKE_ID);

    tick_particles(&mut world);

    assert_eq!(count(&world, SPARKS_ID), 0);
    assert_eq!(count(&world, SMOKE_ID), smoke);
}

#[test]
fn everything_expires_eventually() {
    let mut world = make_world(0.5);
    explode(&mut world.resource_mut::<ParticlesManager>(), vec2(5.0, 5.0)).unwrap();
    for _ in 0..5 {
        tick_particles(&mut world);
    }
    assert_eq!(world.resource::<ParticlesManager>().particle_count(), 0);
}

#[test]
fn thrusting_ship_leaves_afterburner_puffs() {
    let mut world = make_world(0.1);
    let ship = spawn_ship(&mut world);
    world
        .resource_mut::<InputHelper>()
        .advance(InputSnapshot::default().with_keys(&[KeyboardKey::KEY_W]));

    tick_demo(&mut world);

    assert!(world.get::<Ship>(ship).unwrap().thrusting);
    assert_eq!(count(&world, AFTERBURNER_ID), 3);
    assert_eq!(count(&world, BEAM_ID), 0);

    // Puffs start at the ship and drift backwards (down for an unrotated ship)
    let pos = world.get::<MapPosition>(ship).unwrap().pos;
    let pm = world.resource::<ParticlesManager>();
    for p in pm.get(AFTERBURNER_ID).unwrap().particles() {
        assert!(approx_eq(p.position.x, pos.x));
        assert!(p.velocity.y > 0.0);
    }
}

#[test]
fn coasting_ship_emits_nothing() {
    let mut world = make_world(0.1);
    spawn_ship(&mut world);
    tick_demo(&mut world);
    assert_eq!(world.resource::<ParticlesManager>().particle_count(), 0);
    assert_eq!(world.resource::<ParticlesDemo>().emit_timer, 0.0);
}

#[test]
fn space_fires_one_beam_per_frame() {
    let mut world = make_world(1.0 / 60.0);
    spawn_ship(&mut world);
    world
        .resource_mut::<InputHelper>()
        .advance(InputSnapshot::default().with_keys(&[KeyboardKey::KEY_SPACE]));

    tick_demo(&mut world);
    tick_demo(&mut world);

    assert_eq!(count(&world, BEAM_ID), 2);
}

#[test]
fn left_click_sets_off_an_explosion_under_the_mouse() {
    let mut world = make_world(0.016);
    spawn_ship(&mut world);
    {
        let mut input = world.resource_mut::<InputHelper>();
        input.advance(InputSnapshot::default().with_mouse(640.0, 360.0));
        input.advance(
            InputSnapshot::default()
                .with_mouse(640.0, 360.0)
                .with_button(MouseButton::Left, true),
        );
    }

    tick_demo(&mut world);

    assert_eq!(world.resource::<ParticlesDemo>().explosions, 1);
    for id in [SMOKE_ID, FIRE_ID, SPARKS_ID] {
        assert!(count(&world, id) > 0, "effect {} is empty", id);
    }
    // Camera at the origin puts the window center on world (0, 0)
    let pm = world.resource::<ParticlesManager>();
    for p in pm.get(SPARKS_ID).unwrap().particles() {
        assert!(p.position.x.abs() <= 100.0 + EPSILON);
        assert!(p.position.y.abs() <= 100.0 + EPSILON);
    }

    // Holding the button does not explode again
    tick_demo(&mut world);
    assert_eq!(world.resource::<ParticlesDemo>().explosions, 1);
    assert!(!world.resource::<HudText>().lines.is_empty());
}
