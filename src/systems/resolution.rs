//! Keeps the [`ResolutionRenderer`] in sync with the real window size.
use bevy_ecs::prelude::*;

use crate::resources::resolution::ResolutionRenderer;

/// Copy the Raylib screen size into the resolution renderer.
///
/// A no-op unless the window was actually resized.
pub fn sync_window_size(mut irr: ResMut<ResolutionRenderer>, rl: NonSend<raylib::RaylibHandle>) {
    let (w, h) = (rl.get_screen_width(), rl.get_screen_height());
    if w != irr.screen_width() || h != irr.screen_height() {
        irr.set_screen_size(w, h);
    }
}
