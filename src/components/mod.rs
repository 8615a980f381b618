//! ECS components for entities.
//!
//! Submodules overview:
//! - [`mapposition`] – position of an entity's destination rectangle
//! - [`renderspace`] – whether an entity is drawn through the camera or in virtual space
//! - [`sprite`] – multi-layer sprite with solid and decal layers
//! - [`tint`] – color multiplied into every layer of a sprite

pub mod mapposition;
pub mod renderspace;
pub mod sprite;
pub mod tint;
