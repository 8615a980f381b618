//! Per-frame keyboard and mouse state with edge detection.
//!
//! The [`InputHelper`] resource keeps the current and previous
//! [`InputSnapshot`]. Queries compare the two, so "pressed" means "went down
//! this frame" and "released" means "went up this frame". The
//! [`update_input_helper`](crate::systems::input::update_input_helper)
//! system fills in a new snapshot every frame; tests build snapshots by hand.
//!
//! Mouse coordinates are raw window pixels. Convert them with
//! [`ResolutionRenderer::to_virtual`](crate::resources::resolution::ResolutionRenderer::to_virtual)
//! or [`Camera2D::to_virtual`](crate::resources::camera2d::Camera2D::to_virtual)
//! as needed.

use bevy_ecs::prelude::Resource;
use raylib::ffi::KeyboardKey;
use raylib::prelude::Vector2;
use smallvec::SmallVec;

use crate::math::{IRect, VEC2_ZERO, length_sq, normalize_or_zero, sub_v2, vec2};

/// Default threshold for [`InputHelper::mouse_drag_vector`], in pixels.
pub const DEFAULT_DRAG_LIMIT: f32 = 35.0;

/// Edge to test for in [`InputHelper::is_key_pressed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyState {
    /// Went down this frame.
    #[default]
    Pressed,
    /// Went up this frame.
    Released,
    /// Down this frame and the previous one.
    Holding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButtonState {
    /// Went down this frame.
    #[default]
    Click,
    /// Down, regardless of the previous frame.
    PressedOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
            MouseButton::Middle => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Raw input state for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    pub keys_down: SmallVec<[KeyboardKey; 8]>,
    /// Left, right, middle.
    pub buttons_down: [bool; 3],
    pub mouse_pos: Vector2,
    /// Accumulated wheel value; scrolling up increases it.
    pub wheel: f32,
}

impl InputSnapshot {
    pub fn is_key_down(&self, key: KeyboardKey) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down[button.index()]
    }

    pub fn with_keys(mut self, keys: &[KeyboardKey]) -> Self {
        self.keys_down.extend_from_slice(keys);
        self
    }

    pub fn with_button(mut self, button: MouseButton, down: bool) -> Self {
        self.buttons_down[button.index()] = down;
        self
    }

    pub fn with_mouse(mut self, x: f32, y: f32) -> Self {
        self.mouse_pos = vec2(x, y);
        self
    }

    pub fn with_wheel(mut self, wheel: f32) -> Self {
        self.wheel = wheel;
        self
    }
}

/// Keyboard and mouse state for the current and previous frame.
#[derive(Resource, Debug, Clone, Default)]
pub struct InputHelper {
    current: InputSnapshot,
    previous: InputSnapshot,
    drag_start: Option<Vector2>,
    drag_end: Option<Vector2>,
}

impl InputHelper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `snapshot` current and track left-button drags.
    pub fn advance(&mut self, snapshot: InputSnapshot) {
        self.previous = std::mem::replace(&mut self.current, snapshot);

        let was_down = self.previous.is_button_down(MouseButton::Left);
        let is_down = self.current.is_button_down(MouseButton::Left);
        let pos = self.current.mouse_pos;
        match (was_down, is_down) {
            (false, true) => {
                self.drag_start = Some(pos);
                self.drag_end = Some(pos);
            }
            (true, true) => self.drag_end = Some(pos),
            (true, false) => {
                self.drag_start = None;
                self.drag_end = None;
            }
            (false, false) => {}
        }
    }

    pub fn current(&self) -> &InputSnapshot {
        &self.current
    }

    pub fn previous(&self) -> &InputSnapshot {
        &self.previous
    }

    pub fn is_key_pressed(&self, key: KeyboardKey, state: KeyState) -> bool {
        let now = self.current.is_key_down(key);
        let before = self.previous.is_key_down(key);
        match state {
            KeyState::Pressed => now && !before,
            KeyState::Released => !now && before,
            KeyState::Holding => now && before,
        }
    }

    /// Shorthand for `is_key_pressed(key, KeyState::Pressed)`.
    pub fn key_just_pressed(&self, key: KeyboardKey) -> bool {
        self.is_key_pressed(key, KeyState::Pressed)
    }

    pub fn is_key_down(&self, key: KeyboardKey) -> bool {
        self.current.is_key_down(key)
    }

    pub fn is_mouse_pressed(&self, button: MouseButton, state: MouseButtonState) -> bool {
        let now = self.current.is_button_down(button);
        match state {
            MouseButtonState::Click => now && !self.previous.is_button_down(button),
            MouseButtonState::PressedOnly => now,
        }
    }

    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        !self.current.is_button_down(button) && self.previous.is_button_down(button)
    }

    pub fn is_mouse_wheel_scrolled(&self, direction: ScrollDirection) -> bool {
        let diff = self.scroll_diff();
        match direction {
            ScrollDirection::Up => diff > 0.0,
            ScrollDirection::Down => diff < 0.0,
        }
    }

    /// Wheel movement since the previous frame.
    pub fn scroll_diff(&self) -> f32 {
        self.current.wheel - self.previous.wheel
    }

    pub fn mouse_pos(&self) -> Vector2 {
        self.current.mouse_pos
    }

    pub fn last_mouse_pos(&self) -> Vector2 {
        self.previous.mouse_pos
    }

    /// Previous minus current position.
    pub fn mouse_pos_change(&self) -> Vector2 {
        sub_v2(self.previous.mouse_pos, self.current.mouse_pos)
    }

    /// Unit vector of [`Self::mouse_pos_change`], or zero.
    pub fn mouse_move_vector(&self) -> Vector2 {
        normalize_or_zero(self.mouse_pos_change())
    }

    pub fn is_mouse_moved(&self) -> bool {
        length_sq(self.mouse_pos_change()) > 0.0
    }

    /// True while the left button is held.
    pub fn is_mouse_dragged(&self) -> bool {
        self.drag_start.is_some()
    }

    /// Current drag end minus drag start, zero when not dragging.
    pub fn mouse_drag_change(&self) -> Vector2 {
        match (self.drag_start, self.drag_end) {
            (Some(start), Some(end)) => sub_v2(end, start),
            _ => VEC2_ZERO,
        }
    }

    /// The drag along its dominant axis, or zero when it is shorter than
    /// `limit`.
    pub fn mouse_drag_vector(&self, limit: f32) -> Vector2 {
        let src = self.mouse_drag_change();
        let (ax, ay) = (src.x.abs(), src.y.abs());
        if ax > ay {
            if ax > limit { vec2(src.x, 0.0) } else { VEC2_ZERO }
        } else if ay > limit {
            vec2(0.0, src.y)
        } else {
            VEC2_ZERO
        }
    }

    /// WASD as a normalized stick. Up (W) is +y.
    pub fn virtual_stick(&self) -> Vector2 {
        let mut stick = VEC2_ZERO;
        if self.is_key_down(KeyboardKey::KEY_A) {
            stick.x -= 1.0;
        }
        if self.is_key_down(KeyboardKey::KEY_D) {
            stick.x += 1.0;
        }
        if self.is_key_down(KeyboardKey::KEY_S) {
            stick.y -= 1.0;
        }
        if self.is_key_down(KeyboardKey::KEY_W) {
            stick.y += 1.0;
        }
        normalize_or_zero(stick)
    }

    pub fn is_pos_in_bound(pos: Vector2, zone: IRect) -> bool {
        zone.contains(pos.x as i32, pos.y as i32)
    }
}
