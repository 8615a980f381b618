//! Engine systems.
//!
//! This module groups the ECS systems that advance time, input, camera,
//! particles and the UI designer, and the one that draws the frame.
//!
//! Submodules overview
//! - [`camera`] – advance `Camera2D` transitions
//! - [`input`] – read hardware input into [`crate::resources::input::InputHelper`]
//! - [`particles`] – age and integrate particle effects
//! - [`render`] – draw sprites, particles and HUD text with Raylib
//! - [`resolution`] – follow window resizes
//! - [`time`] – update simulation time and delta
//! - [`uidesigner`] – drive the in-game UI layout designer

pub mod camera;
pub mod input;
pub mod particles;
pub mod render;
pub mod resolution;
pub mod time;
pub mod uidesigner;
