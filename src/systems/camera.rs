//! Camera update system.
use bevy_ecs::prelude::*;

use crate::resources::camera2d::Camera2D;
use crate::resources::worldtime::WorldTime;

/// Advance an active camera transition by the frame delta.
pub fn camera_update_system(mut camera: ResMut<Camera2D>, time: Res<WorldTime>) {
    if !camera.is_transition_active() {
        return;
    }
    if camera.update(time.delta) {
        log::debug!("Camera transition reached {:?}", camera.position());
    }
}
