use bevy_ecs::prelude::Component;

/// Which transform an entity is drawn with.
///
/// Entities without this component are drawn in [`RenderSpace::Camera`].
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderSpace {
    /// World space seen through the [`Camera2D`](crate::resources::camera2d::Camera2D).
    #[default]
    Camera,
    /// Fixed virtual-resolution space, unaffected by the camera.
    Virtual,
}
