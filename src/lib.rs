//! resolute2d library.
//!
//! Resolution-independent rendering, a 2D camera, composite sprites,
//! particle effects, an input helper and an in-game UI layout designer,
//! exposed as ECS components, resources and systems for the demos and for
//! integration tests.

pub mod components;
pub mod demos;
pub mod math;
pub mod resources;
pub mod systems;
