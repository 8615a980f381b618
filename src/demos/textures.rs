//! Procedurally generated demo textures.
//!
//! The demos ship no image files. Every texture is drawn into a Raylib
//! [`Image`] on the CPU and uploaded once during setup.
use raylib::prelude::*;

use super::{DemoContext, DemoError};

/// Upload `image` and register it in the context's texture store as `key`.
pub fn upload(ctx: &mut DemoContext, key: &str, image: &Image) -> Result<(), DemoError> {
    let texture = ctx
        .rl
        .load_texture_from_image(ctx.th, image)
        .map_err(|e| DemoError::Texture {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
    log::debug!(
        "Generated texture '{}' ({}x{})",
        key,
        texture.width,
        texture.height
    );
    ctx.textures.add(key, texture);
    Ok(())
}

/// Checkerboard with a one-pixel frame and a cross through the center.
pub fn grid(width: i32, height: i32, cell: i32) -> Image {
    let cell = cell.max(1);
    let mut img = Image::gen_image_checked(
        width,
        height,
        cell,
        cell,
        Color::new(34, 40, 60, 255),
        Color::new(26, 30, 46, 255),
    );
    let line = Color::new(90, 110, 160, 255);
    img.draw_rectangle(0, 0, width, 1, line);
    img.draw_rectangle(0, height - 1, width, 1, line);
    img.draw_rectangle(0, 0, 1, height, line);
    img.draw_rectangle(width - 1, 0, 1, height, line);
    img.draw_rectangle(width / 2, 0, 1, height, Color::new(160, 60, 60, 255));
    img.draw_rectangle(0, height / 2, width, 1, Color::new(160, 60, 60, 255));
    img
}

pub fn ufo() -> Image {
    let mut img = Image::gen_image_color(64, 40, Color::BLANK);
    img.draw_circle(32, 16, 12, Color::new(120, 200, 255, 255));
    img.draw_rectangle(4, 20, 56, 10, Color::new(170, 170, 185, 255));
    img.draw_rectangle(12, 30, 40, 6, Color::new(110, 110, 125, 255));
    for x in [12, 24, 36, 48] {
        img.draw_circle(x + 2, 25, 2, Color::YELLOW);
    }
    img
}

pub fn ship_hull(damaged: bool) -> Image {
    let body = if damaged {
        Color::new(150, 90, 70, 255)
    } else {
        Color::new(200, 205, 215, 255)
    };
    let mut img = Image::gen_image_color(48, 64, Color::BLANK);
    img.draw_rectangle(18, 4, 12, 56, body);
    img.draw_rectangle(4, 36, 40, 14, body);
    img.draw_rectangle(10, 26, 28, 10, body);
    img.draw_circle(24, 18, 5, Color::new(60, 140, 230, 255));
    if damaged {
        img.draw_rectangle(8, 40, 6, 4, Color::BLACK);
        img.draw_rectangle(30, 12, 4, 8, Color::BLACK);
    }
    img
}

/// Exhaust flame, hot end at the top.
pub fn ship_tail() -> Image {
    let mut img = Image::gen_image_color(16, 32, Color::BLANK);
    let steps = [
        (0, 16, Color::new(255, 240, 160, 255)),
        (8, 12, Color::new(255, 200, 80, 255)),
        (16, 8, Color::new(255, 140, 40, 255)),
        (24, 4, Color::new(220, 70, 20, 255)),
    ];
    for (y, w, color) in steps {
        img.draw_rectangle(8 - w / 2, y, w, 8, color);
    }
    img
}

pub fn ship_shield() -> Image {
    let mut img = Image::gen_image_color(80, 80, Color::BLANK);
    img.draw_circle(40, 40, 39, Color::new(80, 160, 255, 110));
    img.draw_circle(40, 40, 35, Color::new(80, 160, 255, 40));
    img
}

pub fn asteroid() -> Image {
    let mut img = Image::gen_image_color(96, 96, Color::BLANK);
    img.draw_circle(48, 48, 40, Color::new(110, 100, 90, 255));
    img.draw_circle(30, 36, 16, Color::new(90, 82, 74, 255));
    img.draw_circle(62, 60, 12, Color::new(90, 82, 74, 255));
    img.draw_circle(58, 28, 7, Color::new(135, 125, 112, 255));
    img
}

/// White blob fading out toward the edge, tinted per particle.
pub fn soft_particle(size: i32) -> Image {
    let mut img = Image::gen_image_color(size, size, Color::BLANK);
    let c = size / 2;
    let rings = 6;
    for i in 0..rings {
        let r = c - i * c / rings;
        let a = (40 + i * 215 / rings) as u8;
        img.draw_circle(c, c, r, Color::new(255, 255, 255, a));
    }
    img
}

pub fn spark() -> Image {
    let mut img = Image::gen_image_color(8, 8, Color::BLANK);
    img.draw_rectangle(3, 0, 2, 8, Color::WHITE);
    img.draw_rectangle(0, 3, 8, 2, Color::WHITE);
    img
}

pub fn beam() -> Image {
    let mut img = Image::gen_image_color(6, 24, Color::BLANK);
    img.draw_rectangle(0, 0, 6, 24, Color::new(60, 200, 255, 160));
    img.draw_rectangle(2, 0, 2, 24, Color::WHITE);
    img
}

pub fn button(width: i32, height: i32, fill: Color, label: &str) -> Image {
    let mut img = Image::gen_image_color(width, height, fill);
    let border = Color::new(255, 255, 255, 200);
    img.draw_rectangle(0, 0, width, 2, border);
    img.draw_rectangle(0, height - 2, width, 2, border);
    img.draw_rectangle(0, 0, 2, height, border);
    img.draw_rectangle(width - 2, 0, 2, height, border);
    let font_size = (height / 2).max(10);
    img.draw_text(label, 12, (height - font_size) / 2, font_size, Color::WHITE);
    img
}
