//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: input state, timing, resolution
//! mapping, camera, particle effects, asset stores and the UI designer.
//!
//! Overview
//! - `appexit` – quit flag checked by the main loop
//! - `camera2d` – 2D camera with zoom limits, rotation and transitions
//! - `gameconfig` – INI-backed window and render settings
//! - `hud` – lines of overlay text drawn in window pixels
//! - `input` – frame snapshots of keyboard and mouse with edge queries
//! - `particles` – particle effects and their manager
//! - `resolution` – virtual resolution to window viewport mapping
//! - `texturestore` – loaded textures keyed by string IDs
//! - `uidesigner` – in-game editor for UI element rectangles
//! - `worldtime` – simulation time and delta
pub mod appexit;
pub mod camera2d;
pub mod gameconfig;
pub mod hud;
pub mod input;
pub mod particles;
pub mod resolution;
pub mod texturestore;
pub mod uidesigner;
pub mod worldtime;
