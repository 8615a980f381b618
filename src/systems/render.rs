//! Rendering system.
//!
//! Everything is drawn inside one Raylib drawing scope:
//!
//! 1. the whole backbuffer is cleared with the background color
//! 2. drawing is scissored to the virtual viewport
//! 3. [`RenderSpace::Virtual`] sprites (and UI designer entries) are drawn
//!    through a Raylib camera that only applies the resolution scale
//! 4. [`RenderSpace::Camera`] sprites are drawn back to front through a
//!    Raylib camera built from [`Camera2D`] and the resolution scale
//! 5. particle effects follow, each inside its own blend mode
//! 6. the scissor ends and [`HudText`] is drawn in window pixels, then
//!    cleared for the next frame
//!
//! The camera conversions and draw ordering are plain functions so they can
//! be tested without a window.
use bevy_ecs::prelude::*;
use raylib::ffi::BlendMode;
use raylib::prelude::Camera2D as RlCamera2D;
use raylib::prelude::*;

use crate::components::mapposition::MapPosition;
use crate::components::renderspace::RenderSpace;
use crate::components::sprite::{CompositeSprite, LayerDraw};
use crate::components::tint::Tint;
use crate::math::vec2;
use crate::resources::camera2d::Camera2D;
use crate::resources::hud::HudText;
use crate::resources::particles::{Particle, ParticleBlend, ParticlesManager};
use crate::resources::resolution::ResolutionRenderer;
use crate::resources::texturestore::TextureStore;
use crate::resources::uidesigner::UiDesigner;

/// Raylib camera for virtual-space drawing: scale only, placed at the
/// viewport origin.
pub fn virtual_camera(irr: &ResolutionRenderer) -> RlCamera2D {
    let vp = irr.viewport();
    RlCamera2D {
        offset: vec2(vp.x as f32, vp.y as f32),
        target: vec2(0.0, 0.0),
        rotation: 0.0,
        zoom: irr.scale(),
    }
}

/// Raylib camera equivalent of [`Camera2D::view_transformation`] followed
/// by the viewport offset.
pub fn world_camera(camera: &Camera2D, irr: &ResolutionRenderer) -> RlCamera2D {
    let vp = irr.viewport();
    let center = irr.virtual_center();
    let scale = irr.scale();
    RlCamera2D {
        offset: vec2(vp.x as f32 + center.x * scale, vp.y as f32 + center.y * scale),
        target: camera.position(),
        rotation: camera.rotation().to_degrees(),
        zoom: camera.zoom() * scale,
    }
}

pub fn blend_mode(blend: ParticleBlend) -> BlendMode {
    match blend {
        ParticleBlend::Alpha => BlendMode::BLEND_ALPHA_PREMULTIPLY,
        ParticleBlend::Additive => BlendMode::BLEND_ADDITIVE,
        ParticleBlend::NonPremultiplied => BlendMode::BLEND_ALPHA,
    }
}

/// Destination rectangle and pivot for a particle drawn centered on its
/// position.
pub fn particle_dest(p: &Particle, tex_w: i32, tex_h: i32) -> (Rectangle, Vector2) {
    let w = tex_w as f32 * p.scale.x;
    let h = tex_h as f32 * p.scale.y;
    (
        Rectangle {
            x: p.position.x,
            y: p.position.y,
            width: w,
            height: h,
        },
        vec2(w * 0.5, h * 0.5),
    )
}

/// Order draws back to front: larger depth first, key order kept on ties.
pub fn sort_back_to_front(draws: &mut [LayerDraw]) {
    draws.sort_by(|a, b| b.depth.total_cmp(&a.depth));
}

fn full_source(tex: &Texture2D) -> Rectangle {
    Rectangle {
        x: 0.0,
        y: 0.0,
        width: tex.width as f32,
        height: tex.height as f32,
    }
}

fn draw_layers<D: RaylibDraw>(d: &mut D, textures: &TextureStore, draws: &[LayerDraw]) {
    for draw in draws {
        if let Some(tex) = textures.get(&draw.tex_key) {
            d.draw_texture_pro(tex, draw.source, draw.dest, draw.origin, draw.rotation, draw.tint);
        }
    }
}

fn draw_designer<D: RaylibDraw>(d: &mut D, textures: &TextureStore, designer: &UiDesigner) {
    let selected = designer.selected_index();
    for (i, entry) in designer.entries().iter().enumerate() {
        let is_selected = selected == Some(i);
        let tint = if is_selected && designer.red_tint_selected {
            Color::RED
        } else {
            Color::WHITE
        };
        let dest = entry.bounds.to_rectangle();
        match textures.get(&entry.tex_key) {
            Some(tex) => d.draw_texture_pro(tex, full_source(tex), dest, vec2(0.0, 0.0), 0.0, tint),
            None => d.draw_rectangle_rec(dest, Color::DARKGRAY),
        }
        if is_selected {
            d.draw_rectangle_lines_ex(dest, 1.0, Color::YELLOW);
        }
    }
}

fn draw_particles<D: RaylibDraw>(
    d: &mut D,
    textures: &TextureStore,
    particles: &ParticlesManager,
) {
    for (blend, effect) in particles.draw_batches() {
        let mut b = d.begin_blend_mode(blend_mode(blend));
        for p in effect.particles().iter().filter(|p| p.is_visible()) {
            let Some(tex) = effect
                .textures()
                .get(p.texture)
                .and_then(|key| textures.get(key))
            else {
                continue;
            };
            let (dest, origin) = particle_dest(p, tex.width, tex.height);
            b.draw_texture_pro(
                tex,
                full_source(tex),
                dest,
                origin,
                p.rotation.to_degrees(),
                p.color,
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn render_system(
    mut rl: NonSendMut<raylib::RaylibHandle>,
    th: NonSend<raylib::RaylibThread>,
    textures: NonSend<TextureStore>,
    irr: Res<ResolutionRenderer>,
    camera: Res<Camera2D>,
    particles: Res<ParticlesManager>,
    mut hud: ResMut<HudText>,
    designer: Option<Res<UiDesigner>>,
    query: Query<(
        &CompositeSprite,
        &MapPosition,
        Option<&Tint>,
        Option<&RenderSpace>,
    )>,
) {
    let size_of = |key: &str| textures.size_of(key);

    let mut virtual_draws = Vec::new();
    let mut world_draws = Vec::new();
    for (sprite, pos, tint, space) in query.iter() {
        let mut draws = sprite.compose(pos.dest_rect(0, 0), size_of);
        if let Some(tint) = tint {
            for draw in draws.iter_mut() {
                draw.tint = tint.modulate(draw.tint);
            }
        }
        match space.copied().unwrap_or_default() {
            RenderSpace::Virtual => virtual_draws.extend(draws),
            RenderSpace::Camera => world_draws.extend(draws),
        }
    }
    sort_back_to_front(&mut virtual_draws);
    sort_back_to_front(&mut world_draws);

    let full = irr.full_viewport();
    let vp = irr.viewport();
    let mut d = rl.begin_drawing(&th);
    {
        // Whole backbuffer, letterbox bars included
        let mut bars = d.begin_scissor_mode(full.x, full.y, full.w, full.h);
        bars.clear_background(irr.background_color);
    }
    {
        let mut s = d.begin_scissor_mode(vp.x, vp.y, vp.w, vp.h);
        {
            let mut v = s.begin_mode2D(virtual_camera(&irr));
            draw_layers(&mut v, &textures, &virtual_draws);
            if let Some(designer) = designer.as_deref() {
                draw_designer(&mut v, &textures, designer);
            }
        }
        {
            let mut w = s.begin_mode2D(world_camera(&camera, &irr));
            draw_layers(&mut w, &textures, &world_draws);
            draw_particles(&mut w, &textures, &particles);
        }
    }

    for (i, line) in hud.lines.iter().enumerate() {
        let at = hud.line_position(i);
        d.draw_text(line, at.x, at.y, hud.font_size, hud.color);
    }
    drop(d);
    // Lines are rebuilt by the systems that own them every frame
    hud.clear();
}
