//! UI designer system.
//!
//! Feeds input to the [`UiDesigner`] resource, applies its clipboard
//! requests through Raylib and mirrors its status text into [`HudText`].
use bevy_ecs::prelude::*;

use crate::resources::hud::HudText;
use crate::resources::input::InputHelper;
use crate::resources::resolution::ResolutionRenderer;
use crate::resources::uidesigner::UiDesigner;

pub fn ui_designer_system(
    mut designer: ResMut<UiDesigner>,
    input: Res<InputHelper>,
    irr: Option<Res<ResolutionRenderer>>,
    mut hud: ResMut<HudText>,
    mut rl: NonSendMut<raylib::RaylibHandle>,
) {
    let output = designer.update(&input, irr.as_deref());

    if let Some(text) = output.clipboard {
        if let Err(e) = rl.set_clipboard_text(&text) {
            log::warn!("Failed to copy designer bounds to clipboard: {}", e);
        }
    }

    hud.lines.extend(designer.status_lines());
}
