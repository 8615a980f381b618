//! Input polling system.
//!
//! [`update_input_helper`] reads hardware input from Raylib each frame and
//! pushes it into [`InputHelper`](crate::resources::input::InputHelper) as a
//! new [`InputSnapshot`].
use bevy_ecs::prelude::*;
use raylib::ffi::{KeyboardKey, MouseButton as RlMouseButton};

use crate::resources::input::{InputHelper, InputSnapshot};

/// Keys sampled every frame. Anything else reads as "up".
pub const WATCHED_KEYS: &[KeyboardKey] = &[
    KeyboardKey::KEY_A,
    KeyboardKey::KEY_B,
    KeyboardKey::KEY_C,
    KeyboardKey::KEY_D,
    KeyboardKey::KEY_E,
    KeyboardKey::KEY_F,
    KeyboardKey::KEY_G,
    KeyboardKey::KEY_Q,
    KeyboardKey::KEY_R,
    KeyboardKey::KEY_S,
    KeyboardKey::KEY_T,
    KeyboardKey::KEY_V,
    KeyboardKey::KEY_W,
    KeyboardKey::KEY_ONE,
    KeyboardKey::KEY_TWO,
    KeyboardKey::KEY_THREE,
    KeyboardKey::KEY_FOUR,
    KeyboardKey::KEY_UP,
    KeyboardKey::KEY_DOWN,
    KeyboardKey::KEY_LEFT,
    KeyboardKey::KEY_RIGHT,
    KeyboardKey::KEY_LEFT_SHIFT,
    KeyboardKey::KEY_LEFT_CONTROL,
    KeyboardKey::KEY_SPACE,
    KeyboardKey::KEY_TAB,
    KeyboardKey::KEY_ESCAPE,
    KeyboardKey::KEY_MINUS,
    KeyboardKey::KEY_EQUAL,
    KeyboardKey::KEY_KP_ADD,
    KeyboardKey::KEY_KP_SUBTRACT,
];

/// Poll Raylib and advance the `InputHelper` by one frame.
///
/// Skipped while the window is unfocused, so edges are not lost to another
/// application.
pub fn update_input_helper(mut input: ResMut<InputHelper>, rl: NonSend<raylib::RaylibHandle>) {
    if !rl.is_window_focused() {
        return;
    }

    let mut snapshot = InputSnapshot::default();
    for &key in WATCHED_KEYS {
        if rl.is_key_down(key) {
            snapshot.keys_down.push(key);
        }
    }
    snapshot.buttons_down = [
        rl.is_mouse_button_down(RlMouseButton::MOUSE_BUTTON_LEFT),
        rl.is_mouse_button_down(RlMouseButton::MOUSE_BUTTON_RIGHT),
        rl.is_mouse_button_down(RlMouseButton::MOUSE_BUTTON_MIDDLE),
    ];
    snapshot.mouse_pos = rl.get_mouse_position();
    snapshot.wheel = input.current().wheel + rl.get_mouse_wheel_move();

    input.advance(snapshot);
}
