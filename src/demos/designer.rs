//! UI designer demo.
//!
//! Three menu buttons are laid out with the [`UiDesigner`]. With `--layout`
//! the layout is loaded from that file at startup (when it exists) and
//! Ctrl+S writes it back. G logs the generated rectangle code.
use std::path::PathBuf;

use bevy_ecs::prelude::*;
use raylib::ffi::KeyboardKey;
use raylib::prelude::Color;

use super::{DemoContext, DemoError, textures};
use crate::math::IRect;
use crate::resources::input::InputHelper;
use crate::resources::uidesigner::{DesignerEntry, UiDesigner};
use crate::systems::input::update_input_helper;
use crate::systems::render::render_system;
use crate::systems::uidesigner::ui_designer_system;

#[derive(Resource, Debug, Default)]
pub struct DesignerDemo {
    pub layout_path: Option<PathBuf>,
}

/// Initial button rectangles in virtual pixels.
pub fn default_entries() -> Vec<DesignerEntry> {
    vec![
        DesignerEntry::new("Play", "btn_play", IRect::new(0, 636, 205, 51)),
        DesignerEntry::new("Options", "btn_options", IRect::new(1065, 631, 191, 51)),
        DesignerEntry::new("Quit", "btn_quit", IRect::new(1025, 21, 247, 65)),
    ]
}

pub fn setup(world: &mut World, ctx: &mut DemoContext) -> Result<(), DemoError> {
    let fills = [
        ("btn_play", "PLAY", Color::new(40, 140, 70, 255)),
        ("btn_options", "OPTIONS", Color::new(50, 90, 170, 255)),
        ("btn_quit", "QUIT", Color::new(160, 50, 50, 255)),
    ];
    let entries = default_entries();
    for (key, label, fill) in fills {
        let (w, h) = entries
            .iter()
            .find(|e| e.tex_key == key)
            .map_or((128, 48), |e| (e.bounds.w, e.bounds.h));
        textures::upload(ctx, key, &textures::button(w, h, fill, label))?;
    }

    let mut designer = UiDesigner::new(entries);
    designer.show_help = true;
    designer.red_tint_selected = true;
    if let Some(path) = ctx.layout.as_ref().filter(|p| p.exists()) {
        designer.load_layout(path)?;
    }

    world.insert_resource(designer);
    world.insert_resource(DesignerDemo {
        layout_path: ctx.layout.clone(),
    });
    Ok(())
}

pub fn designer_demo_system(
    input: Res<InputHelper>,
    designer: Res<UiDesigner>,
    demo: Res<DesignerDemo>,
) {
    if input.is_key_down(KeyboardKey::KEY_LEFT_CONTROL)
        && input.key_just_pressed(KeyboardKey::KEY_S)
    {
        match demo.layout_path.as_ref() {
            Some(path) => {
                if let Err(e) = designer.save_layout(path) {
                    log::error!("Failed to save layout: {}", e);
                }
            }
            None => log::warn!("No --layout path given, layout not saved"),
        }
    }
    if input.key_just_pressed(KeyboardKey::KEY_G) {
        log::info!("Generated layout code:\n{}", designer.generate_code());
    }
}

pub fn add_systems(schedule: &mut Schedule) {
    schedule.add_systems(
        (ui_designer_system, designer_demo_system)
            .chain()
            .after(update_input_helper)
            .before(render_system),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_entries_fit_the_default_virtual_screen() {
        let screen = IRect::new(0, 0, 1280, 720);
        for e in default_entries() {
            let b = e.bounds;
            assert!(screen.contains(b.x, b.y), "{}", e.name);
            assert!(b.x + b.w <= 1280 && b.y + b.h <= 720, "{}", e.name);
        }
    }
}
