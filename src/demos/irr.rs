//! Independent resolution rendering demo.
//!
//! A grid covering exactly the virtual resolution is drawn in virtual space
//! while the window can be resized freely. Keys 1-3 jump between window
//! presets to show letterboxing and pillarboxing. Clicking the UFO in the
//! middle exits, which checks that the mouse is mapped back into virtual
//! space correctly.
use bevy_ecs::prelude::*;
use raylib::ffi::KeyboardKey;
use raylib::prelude::Color;

use super::{DemoContext, DemoError, textures};
use crate::components::mapposition::MapPosition;
use crate::components::renderspace::RenderSpace;
use crate::components::sprite::CompositeSprite;
use crate::components::tint::Tint;
use crate::math::IRect;
use crate::resources::appexit::AppExit;
use crate::resources::hud::HudText;
use crate::resources::input::{InputHelper, MouseButton, MouseButtonState};
use crate::resources::resolution::ResolutionRenderer;
use crate::resources::texturestore::TextureStore;

/// Window sizes bound to keys 1, 2 and 3.
pub const WINDOW_PRESETS: [(KeyboardKey, i32, i32); 3] = [
    (KeyboardKey::KEY_ONE, 1000, 400),
    (KeyboardKey::KEY_TWO, 400, 500),
    (KeyboardKey::KEY_THREE, 800, 480),
];

/// Marks the clickable UFO.
#[derive(Component, Debug, Clone, Copy)]
pub struct TestTarget;

pub fn setup(world: &mut World, ctx: &mut DemoContext) -> Result<(), DemoError> {
    let (vw, vh) = {
        let irr = world.resource::<ResolutionRenderer>();
        (irr.virtual_width(), irr.virtual_height())
    };
    textures::upload(ctx, "irr_grid", &textures::grid(vw, vh, 64))?;
    textures::upload(ctx, "ufo", &textures::ufo())?;
    let (uw, uh) = ctx.textures.size_of("ufo").unwrap_or((0, 0));

    world.spawn((
        CompositeSprite {
            depth: 10.0,
            ..CompositeSprite::single("irr_grid")
        },
        MapPosition::new(0.0, 0.0),
        RenderSpace::Virtual,
    ));
    world.spawn((
        TestTarget,
        CompositeSprite::single("ufo"),
        MapPosition::new((vw / 2 - uw / 2) as f32, (vh / 2 - uh / 2) as f32),
        RenderSpace::Virtual,
        Tint::default(),
    ));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn irr_demo_system(
    input: Res<InputHelper>,
    irr: Res<ResolutionRenderer>,
    textures: NonSend<TextureStore>,
    mut rl: NonSendMut<raylib::RaylibHandle>,
    mut exit: ResMut<AppExit>,
    mut hud: ResMut<HudText>,
    mut targets: Query<(&MapPosition, &CompositeSprite, &mut Tint), With<TestTarget>>,
) {
    for (key, w, h) in WINDOW_PRESETS {
        if input.key_just_pressed(key) {
            log::info!("Window preset {}x{}", w, h);
            rl.set_window_size(w, h);
        }
    }

    let mouse = irr.to_virtual(input.mouse_pos());
    for (pos, sprite, mut tint) in targets.iter_mut() {
        let (w, h) = sprite
            .texture_size(0, |k| textures.size_of(k))
            .map_or((0, 0), |s| (s.x as i32, s.y as i32));
        let hit = InputHelper::is_pos_in_bound(mouse, pos.dest_rect(w, h));
        tint.color = if hit { Color::YELLOW } else { Color::WHITE };
        if hit && input.is_mouse_pressed(MouseButton::Left, MouseButtonState::Click) {
            exit.request();
        }
    }

    let vp: IRect = irr.viewport();
    hud.push(format!(
        "Window {}x{}  virtual {}x{}  scale {:.3}",
        irr.screen_width(),
        irr.screen_height(),
        irr.virtual_width(),
        irr.virtual_height(),
        irr.scale()
    ));
    hud.push(format!("Viewport [{},{}] [{},{}]", vp.x, vp.y, vp.w, vp.h));
    hud.push(format!("Virtual mouse {:.0},{:.0}", mouse.x, mouse.y));
    hud.push("Keys 1/2/3 resize the window, click the UFO to exit");
}
