//! resolute2d demo runner.
//!
//! Resolution-independent 2D rendering helpers built on:
//! - **raylib** for windowing, input, textures and drawing
//! - **bevy_ecs** for the entity-component-system world and schedule
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (or the `--config` file) and open a resizable window
//! 2. Build the ECS world: resolution renderer, camera, input, particles, HUD
//! 3. Let the chosen demo generate its textures and spawn its entities
//! 4. Every frame: advance time, follow window resizes, poll input, run the
//!    demo systems, advance camera transitions and particles, then render
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --demo particles
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;

use bevy_ecs::prelude::*;
use clap::Parser;

use resolute2d::demos::{self, DemoContext, DemoKind};
use resolute2d::resources::appexit::AppExit;
use resolute2d::resources::camera2d::Camera2D;
use resolute2d::resources::gameconfig::GameConfig;
use resolute2d::resources::hud::HudText;
use resolute2d::resources::input::InputHelper;
use resolute2d::resources::particles::ParticlesManager;
use resolute2d::resources::resolution::ResolutionRenderer;
use resolute2d::resources::texturestore::TextureStore;
use resolute2d::resources::worldtime::WorldTime;
use resolute2d::systems::camera::camera_update_system;
use resolute2d::systems::input::update_input_helper;
use resolute2d::systems::particles::particles_update_system;
use resolute2d::systems::render::render_system;
use resolute2d::systems::resolution::sync_window_size;
use resolute2d::systems::time::update_world_time;

/// resolute2d demos
#[derive(Parser)]
#[command(
    version,
    about = "Resolution-independent rendering, 2D camera, sprites, particles and a UI designer"
)]
struct Cli {
    /// Demo to run.
    #[arg(long, value_enum, default_value_t = DemoKind::Camera)]
    demo: DemoKind,

    /// INI configuration file. Written with defaults when missing.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Designer layout (JSON) to load at startup and save with Ctrl+S.
    #[arg(long, value_name = "PATH")]
    layout: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // --------------- Config & window ---------------
    let mut config = GameConfig::with_path(&cli.config);
    if config.config_path.exists() {
        if let Err(e) = config.load_from_file() {
            log::warn!("{}; using defaults", e);
        }
    } else if let Err(e) = config.save_to_file() {
        log::warn!("{}", e);
    }

    let (window_width, window_height) = config.window_size();
    let mut builder = raylib::init();
    builder
        .size(window_width as i32, window_height as i32)
        .resizable()
        .title(cli.demo.title());
    if config.vsync {
        builder.vsync();
    }
    if config.fullscreen {
        builder.fullscreen();
    }
    let (mut rl, thread) = builder.build();
    rl.set_target_fps(config.target_fps);

    let (virtual_width, virtual_height) = config.virtual_size();
    let mut irr = match ResolutionRenderer::new(
        virtual_width,
        virtual_height,
        rl.get_screen_width().max(1) as u32,
        rl.get_screen_height().max(1) as u32,
    ) {
        Ok(irr) => irr,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    irr.background_color = config.background;

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(1.0));
    world.insert_resource(InputHelper::new());
    world.insert_resource(irr);
    world.insert_resource(Camera2D::new());
    world.insert_resource(ParticlesManager::new());
    world.insert_resource(HudText::default());
    world.insert_resource(AppExit::default());
    world.insert_resource(config);

    let mut textures = TextureStore::new();
    {
        let mut ctx = DemoContext {
            rl: &mut rl,
            th: &thread,
            textures: &mut textures,
            layout: cli.layout.clone(),
        };
        if let Err(e) = demos::setup(cli.demo, &mut world, &mut ctx) {
            log::error!("Demo setup failed: {}", e);
            std::process::exit(1);
        }
    }
    log::info!("{} textures generated", textures.len());

    world.insert_non_send_resource(textures);
    world.insert_non_send_resource(rl);
    world.insert_non_send_resource(thread);

    // --------------- Schedule ---------------
    let mut update = Schedule::default();
    update.add_systems(sync_window_size);
    update.add_systems(update_input_helper);
    demos::add_systems(cli.demo, &mut update);
    update.add_systems(camera_update_system.after(update_input_helper));
    update.add_systems(particles_update_system);
    update.add_systems(
        render_system
            .after(sync_window_size)
            .after(camera_update_system)
            .after(particles_update_system),
    );

    if let Err(e) = update.initialize(&mut world) {
        log::error!("Failed to initialize schedule: {}", e);
        std::process::exit(1);
    }

    // --------------- Main loop ---------------
    while !world
        .non_send_resource::<raylib::RaylibHandle>()
        .window_should_close()
        && !world.resource::<AppExit>().is_requested()
    {
        let dt = world
            .non_send_resource::<raylib::RaylibHandle>()
            .get_frame_time();
        update_world_time(&mut world, dt);

        update.run(&mut world);

        world.clear_trackers();
    }
    // Unload textures while the GL context is still alive
    world.non_send_resource_mut::<TextureStore>().clear();
    log::info!("Bye from {:?} demo", cli.demo);
}
