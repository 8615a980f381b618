//! Interactive demo programs.
//!
//! Each demo module exposes `setup`, which generates its textures and
//! spawns its entities and resources, and `add_systems`, which wires its
//! per-frame systems into the schedule between input polling and rendering.
//!
//! Submodules overview
//! - [`irr`] – virtual resolution on a resizable window
//! - [`camera`] – pan, zoom, rotate, select and glide with `Camera2D`
//! - [`sprite`] – composite sprites with solid and decal layers
//! - [`particles`] – afterburner, beam and explosion effects
//! - [`designer`] – the in-game UI layout designer
//! - [`ship`] – the steerable ship shared by the sprite and particles demos
//! - [`textures`] – procedurally drawn demo textures
use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::ValueEnum;
use thiserror::Error;

use crate::resources::particles::ParticleError;
use crate::resources::texturestore::TextureStore;
use crate::resources::uidesigner::LayoutError;
use crate::systems::camera::camera_update_system;
use crate::systems::input::update_input_helper;
use crate::systems::particles::particles_update_system;
use crate::systems::render::render_system;

pub mod camera;
pub mod designer;
pub mod irr;
pub mod particles;
pub mod ship;
pub mod sprite;
pub mod textures;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("failed to create texture '{key}': {reason}")]
    Texture { key: String, reason: String },
    #[error(transparent)]
    Particle(#[from] ParticleError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum DemoKind {
    /// Independent resolution rendering
    Irr,
    #[default]
    Camera,
    Sprite,
    Particles,
    /// UI layout designer
    Designer,
}

impl DemoKind {
    pub fn title(self) -> &'static str {
        match self {
            DemoKind::Irr => "resolute2d - resolution",
            DemoKind::Camera => "resolute2d - camera",
            DemoKind::Sprite => "resolute2d - composite sprite",
            DemoKind::Particles => "resolute2d - particles",
            DemoKind::Designer => "resolute2d - UI designer",
        }
    }
}

/// Window handles and stores a demo needs while setting up, before they are
/// moved into the world.
pub struct DemoContext<'a> {
    pub rl: &'a mut raylib::RaylibHandle,
    pub th: &'a raylib::RaylibThread,
    pub textures: &'a mut TextureStore,
    /// Designer layout file to load from and save to.
    pub layout: Option<PathBuf>,
}

pub fn setup(kind: DemoKind, world: &mut World, ctx: &mut DemoContext) -> Result<(), DemoError> {
    log::info!("Setting up {:?} demo", kind);
    match kind {
        DemoKind::Irr => irr::setup(world, ctx),
        DemoKind::Camera => camera::setup(world, ctx),
        DemoKind::Sprite => sprite::setup(world, ctx),
        DemoKind::Particles => particles::setup(world, ctx),
        DemoKind::Designer => designer::setup(world, ctx),
    }
}

/// Add the demo's systems so they see this frame's input and run before the
/// camera, particles and render systems.
pub fn add_systems(kind: DemoKind, schedule: &mut Schedule) {
    match kind {
        DemoKind::Irr => {
            schedule.add_systems(
                irr::irr_demo_system
                    .after(update_input_helper)
                    .before(render_system),
            );
        }
        DemoKind::Camera => {
            schedule.add_systems(
                camera::camera_demo_system
                    .after(update_input_helper)
                    .before(camera_update_system),
            );
        }
        DemoKind::Sprite => {
            schedule.add_systems(
                sprite::sprite_demo_system
                    .after(update_input_helper)
                    .before(camera_update_system),
            );
        }
        DemoKind::Particles => {
            schedule.add_systems(
                particles::particles_demo_system
                    .after(update_input_helper)
                    .before(camera_update_system)
                    .before(particles_update_system),
            );
        }
        DemoKind::Designer => designer::add_systems(schedule),
    }
}
