//! In-game layout designer for UI textures.
//!
//! [`UiDesigner`] holds a list of named textures with their bounds in
//! virtual coordinates and lets the user move and resize them live:
//!
//! | input                 | action                                        |
//! |-----------------------|-----------------------------------------------|
//! | Tab / left click      | select next entry / entry under the cursor    |
//! | arrows                | move by the shift size                        |
//! | LeftShift + arrows    | resize by the shift size                      |
//! | left drag             | move                                          |
//! | right drag            | resize (LeftShift keeps the aspect ratio)     |
//! | `+` / `-`             | change the shift size                         |
//! | R                     | reset the selection to its bounds on select   |
//! | V                     | toggle the on-screen text                     |
//! | C                     | copy `x,y,w,h` to the clipboard               |
//!
//! The designer is plain state: [`UiDesigner::update`] reads an
//! [`InputHelper`] and returns a [`DesignerOutput`] for the system to apply.
//! Layouts round-trip through JSON with [`UiDesigner::save_layout`] and
//! [`UiDesigner::load_layout`].

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use bevy_ecs::prelude::Resource;
use raylib::ffi::KeyboardKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::IRect;
use crate::resources::input::{InputHelper, KeyState, MouseButton, MouseButtonState};
use crate::resources::resolution::ResolutionRenderer;

const DEFAULT_SHIFT_SIZE: i32 = 3;
/// Smallest width/height the resize accumulators may reach.
const MIN_SIZE: f32 = 0.001;

const HELP_LINES: &[&str] = &[
    "Press TAB or LMB click to switch textures",
    "Press C to copy coordinates to clipboard",
    "Press R to reset bounds",
    "Press V to toggle screen text",
    "Press ARROWS or drag with LMB to move texture",
    "Press SHIFT+ARROWS or drag with RMB (+SHIFT keeps aspect) to resize texture",
    "Press +/- to change shift size",
];

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("rectangle must be four comma-separated integers, got '{0}'")]
    InvalidRect(String),
    #[error("layout file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("layout format error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One texture placed by the designer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignerEntry {
    pub name: String,
    pub tex_key: String,
    pub bounds: IRect,
}

impl DesignerEntry {
    pub fn new(name: impl Into<String>, tex_key: impl Into<String>, bounds: IRect) -> Self {
        Self {
            name: name.into(),
            tex_key: tex_key.into(),
            bounds,
        }
    }
}

/// What the caller should do after an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesignerOutput {
    /// Text to put on the system clipboard.
    pub clipboard: Option<String>,
    pub selection_changed: bool,
}

/// Parse `"x,y,w,h"` into a rectangle.
pub fn parse_rect(text: &str) -> Result<IRect, LayoutError> {
    let values = text
        .split(',')
        .map(|v| v.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| LayoutError::InvalidRect(text.to_string()))?;
    match values.as_slice() {
        [x, y, w, h] => Ok(IRect::new(*x, *y, *w, *h)),
        _ => Err(LayoutError::InvalidRect(text.to_string())),
    }
}

fn format_rect(r: &IRect) -> String {
    format!("{},{},{},{}", r.x, r.y, r.w, r.h)
}

#[derive(Resource, Debug, Clone)]
pub struct UiDesigner {
    entries: Vec<DesignerEntry>,
    selected: usize,
    saved_initial: IRect,
    pub shift_size: i32,
    pub text_visible: bool,
    pub show_help: bool,
    pub red_tint_selected: bool,
    dragging: bool,
    resizing: bool,
    // Fractional size, so aspect-keeping resizes do not drift
    tmp_width: f32,
    tmp_height: f32,
}

impl Default for UiDesigner {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl UiDesigner {
    pub fn new(entries: Vec<DesignerEntry>) -> Self {
        let mut designer = Self {
            entries,
            selected: 0,
            saved_initial: IRect::default(),
            shift_size: DEFAULT_SHIFT_SIZE,
            text_visible: true,
            show_help: false,
            red_tint_selected: false,
            dragging: false,
            resizing: false,
            tmp_width: 0.0,
            tmp_height: 0.0,
        };
        designer.select(0);
        designer
    }

    pub fn entries(&self) -> &[DesignerEntry] {
        &self.entries
    }

    pub fn selected_index(&self) -> Option<usize> {
        (self.selected < self.entries.len()).then_some(self.selected)
    }

    pub fn selected(&self) -> Option<&DesignerEntry> {
        self.entries.get(self.selected)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_resizing(&self) -> bool {
        self.resizing
    }

    /// Select entry `index` and remember its bounds for reset.
    pub fn select(&mut self, index: usize) {
        let Some(entry) = self.entries.get(index) else {
            return;
        };
        self.selected = index;
        self.saved_initial = entry.bounds;
        self.tmp_width = entry.bounds.w as f32;
        self.tmp_height = entry.bounds.h as f32;
    }

    pub fn reset_bounds(&mut self) {
        let saved = self.saved_initial;
        if let Some(entry) = self.entries.get_mut(self.selected) {
            entry.bounds = saved;
            self.tmp_width = saved.w as f32;
            self.tmp_height = saved.h as f32;
        }
    }

    pub fn add_entry(&mut self, entry: DesignerEntry) -> usize {
        self.entries.push(entry);
        if self.entries.len() == 1 {
            self.select(0);
        }
        self.entries.len() - 1
    }

    pub fn remove_entry(&mut self, index: usize) -> Option<DesignerEntry> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        match self.selected.cmp(&index) {
            // Same entry, new index: keep its saved bounds
            Ordering::Greater => self.selected -= 1,
            Ordering::Equal => {
                let next = index.min(self.entries.len().saturating_sub(1));
                self.select(next);
            }
            Ordering::Less => {}
        }
        Some(removed)
    }

    /// Swap entry `index` with the one before it. The selection follows the
    /// entry it was on.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.entries.len() {
            return false;
        }
        self.entries.swap(index - 1, index);
        self.follow_swap(index - 1, index);
        true
    }

    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.entries.len() {
            return false;
        }
        self.entries.swap(index, index + 1);
        self.follow_swap(index, index + 1);
        true
    }

    fn follow_swap(&mut self, a: usize, b: usize) {
        if self.selected == a {
            self.selected = b;
        } else if self.selected == b {
            self.selected = a;
        }
    }

    /// Append a copy of entry `index`, returning the new index.
    pub fn duplicate(&mut self, index: usize) -> Option<usize> {
        let copy = self.entries.get(index)?.clone();
        self.entries.push(copy);
        Some(self.entries.len() - 1)
    }

    /// Replace the bounds of entry `index` from `"x,y,w,h"` text.
    pub fn set_bounds_from_text(&mut self, index: usize, text: &str) -> Result<(), LayoutError> {
        let rect = parse_rect(text)?;
        if let Some(entry) = self.entries.get_mut(index) {
            entry.bounds = rect;
            if index == self.selected {
                self.tmp_width = rect.w as f32;
                self.tmp_height = rect.h as f32;
            }
        }
        Ok(())
    }

    /// One commented rectangle constructor per entry.
    pub fn generate_code(&self) -> String {
        self.entries
            .iter()
            .map(|e| {
                format!(
                    "//{}({})\nRectangle::new({},{},{},{})\n",
                    e.name, e.tex_key, e.bounds.x, e.bounds.y, e.bounds.w, e.bounds.h
                )
            })
            .collect()
    }

    pub fn save_layout(&self, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path.as_ref(), json)?;
        log::info!(
            "Saved {} layout entries to {}",
            self.entries.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Replace the entries with a layout file and select the first one.
    pub fn load_layout(&mut self, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        let text = fs::read_to_string(path.as_ref())?;
        let entries: Vec<DesignerEntry> = serde_json::from_str(&text)?;
        log::info!(
            "Loaded {} layout entries from {}",
            entries.len(),
            path.as_ref().display()
        );
        self.entries = entries;
        self.dragging = false;
        self.resizing = false;
        self.selected = 0;
        self.select(0);
        Ok(())
    }

    /// On-screen status text.
    pub fn status_lines(&self) -> Vec<String> {
        if !self.text_visible {
            return Vec::new();
        }
        let mut lines = Vec::with_capacity(2 + HELP_LINES.len());
        match self.selected() {
            Some(e) => {
                lines.push(format!("UIDesigner active: {} ({})", e.tex_key, e.name));
                lines.push(format!(
                    "Shift size: {}  Bounds: [{},{}] [{},{}]",
                    self.shift_size, e.bounds.x, e.bounds.y, e.bounds.w, e.bounds.h
                ));
            }
            None => lines.push("UIDesigner active: no textures".to_string()),
        }
        if self.show_help {
            lines.extend(HELP_LINES.iter().map(|l| l.to_string()));
        }
        lines
    }

    /// Apply one frame of input.
    ///
    /// Mouse positions are converted to virtual space through `irr` when
    /// given; without it window pixels are used as-is.
    pub fn update(
        &mut self,
        input: &InputHelper,
        irr: Option<&ResolutionRenderer>,
    ) -> DesignerOutput {
        let mut out = DesignerOutput::default();
        let pressed = |k| input.is_key_pressed(k, KeyState::Pressed);

        if pressed(KeyboardKey::KEY_V) {
            self.text_visible = !self.text_visible;
        }
        if pressed(KeyboardKey::KEY_MINUS) || pressed(KeyboardKey::KEY_KP_SUBTRACT) {
            self.shift_size = (self.shift_size - 1).max(1);
        }
        if pressed(KeyboardKey::KEY_EQUAL) || pressed(KeyboardKey::KEY_KP_ADD) {
            self.shift_size += 1;
        }
        if self.entries.is_empty() {
            return out;
        }

        if pressed(KeyboardKey::KEY_TAB) {
            let next = (self.selected + 1) % self.entries.len();
            self.select(next);
            out.selection_changed = true;
        }
        if pressed(KeyboardKey::KEY_R) {
            log::debug!("Designer bounds reset");
            self.reset_bounds();
        }

        self.apply_arrow_keys(input);

        let to_virtual = |p| irr.map_or(p, |r| r.to_virtual(p));
        let last = to_virtual(input.last_mouse_pos());
        let now = to_virtual(input.mouse_pos());
        // Mouse movement in virtual pixels, previous minus current
        let shift_x = (last.x - now.x).round();
        let shift_y = (last.y - now.y).round();

        // Resize with right mouse
        if input.is_mouse_pressed(MouseButton::Right, MouseButtonState::Click) {
            self.resizing = true;
        }
        if self.resizing {
            if !input.is_mouse_pressed(MouseButton::Right, MouseButtonState::PressedOnly) {
                self.resizing = false;
            } else if shift_x != 0.0 || shift_y != 0.0 {
                if input.is_key_down(KeyboardKey::KEY_LEFT_SHIFT) {
                    let width = self.tmp_width - shift_x;
                    if width >= MIN_SIZE && self.tmp_width > 0.0 {
                        let ratio = width / self.tmp_width;
                        self.tmp_width *= ratio;
                        self.tmp_height *= ratio;
                    }
                } else {
                    self.tmp_width -= shift_x;
                    self.tmp_height -= shift_y;
                }
            }
        }

        // Select and drag with left mouse
        if input.is_mouse_pressed(MouseButton::Left, MouseButtonState::Click) {
            let (px, py) = (now.x as i32, now.y as i32);
            if let Some(hit) = self.entries.iter().position(|e| e.bounds.contains(px, py)) {
                if hit != self.selected {
                    self.select(hit);
                    out.selection_changed = true;
                }
                self.dragging = true;
            }
        } else if self.dragging {
            if input.is_mouse_pressed(MouseButton::Left, MouseButtonState::PressedOnly) {
                let bounds = &mut self.entries[self.selected].bounds;
                bounds.x -= shift_x as i32;
                bounds.y -= shift_y as i32;
            } else {
                self.dragging = false;
            }
        }

        self.clamp_selected(irr);

        if pressed(KeyboardKey::KEY_C) {
            if let Some(e) = self.selected() {
                let text = format_rect(&e.bounds);
                log::info!("Copied bounds of '{}': {}", e.name, text);
                out.clipboard = Some(text);
            }
        }

        out
    }

    fn apply_arrow_keys(&mut self, input: &InputHelper) {
        let shift = self.shift_size;
        let resize = input.is_key_down(KeyboardKey::KEY_LEFT_SHIFT);
        let Some(entry) = self.entries.get_mut(self.selected) else {
            return;
        };
        let b = &mut entry.bounds;
        if input.is_key_down(KeyboardKey::KEY_RIGHT) {
            if resize {
                self.tmp_width += shift as f32;
            } else {
                b.x += shift;
            }
        }
        if input.is_key_down(KeyboardKey::KEY_LEFT) {
            if resize {
                self.tmp_width -= shift as f32;
            } else {
                b.x -= shift;
            }
        }
        if input.is_key_down(KeyboardKey::KEY_UP) {
            if resize {
                self.tmp_height -= shift as f32;
            } else {
                b.y -= shift;
            }
        }
        if input.is_key_down(KeyboardKey::KEY_DOWN) {
            if resize {
                self.tmp_height += shift as f32;
            } else {
                b.y += shift;
            }
        }
    }

    /// Keep the selection on screen and write back the size accumulators.
    fn clamp_selected(&mut self, irr: Option<&ResolutionRenderer>) {
        self.tmp_width = self.tmp_width.max(MIN_SIZE);
        self.tmp_height = self.tmp_height.max(MIN_SIZE);
        let (max_x, max_y) = irr.map_or((i32::MAX, i32::MAX), |r| {
            (r.virtual_width(), r.virtual_height())
        });
        let (w, h) = (self.tmp_width as i32, self.tmp_height as i32);
        if let Some(entry) = self.entries.get_mut(self.selected) {
            let b = &mut entry.bounds;
            b.x = b.x.clamp(0, max_x);
            b.y = b.y.clamp(0, max_y);
            b.w = w;
            b.h = h;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::input::InputSnapshot;

    fn designer() -> UiDesigner {
        UiDesigner::new(vec![
            DesignerEntry::new("Play", "play", IRect::new(0, 636, 205, 51)),
            DesignerEntry::new("Options", "options", IRect::new(1065, 631, 191, 51)),
            DesignerEntry::new("Quit", "quit", IRect::new(1025, 21, 247, 65)),
        ])
    }

    fn input(frames: Vec<InputSnapshot>) -> InputHelper {
        let mut i = InputHelper::new();
        for f in frames {
            i.advance(f);
        }
        i
    }

    fn key(k: KeyboardKey) -> InputHelper {
        input(vec![InputSnapshot::default(), InputSnapshot::default().with_keys(&[k])])
    }

    fn irr() -> ResolutionRenderer {
        ResolutionRenderer::new(1280, 720, 1280, 720).unwrap()
    }

    #[test]
    fn tab_cycles_selection() {
        let mut d = designer();
        let irr = irr();
        for expected in [1, 2, 0] {
            let out = d.update(&key(KeyboardKey::KEY_TAB), Some(&irr));
            assert!(out.selection_changed);
            assert_eq!(d.selected_index(), Some(expected));
        }
    }

    #[test]
    fn arrows_move_and_shift_arrows_resize() {
        let mut d = designer();
        let irr = irr();
        let held = InputSnapshot::default().with_keys(&[KeyboardKey::KEY_RIGHT]);
        d.update(&input(vec![held.clone(), held]), Some(&irr));
        assert_eq!(d.selected().unwrap().bounds, IRect::new(3, 636, 205, 51));

        let held = InputSnapshot::default()
            .with_keys(&[KeyboardKey::KEY_LEFT_SHIFT, KeyboardKey::KEY_DOWN]);
        d.update(&input(vec![held]), Some(&irr));
        assert_eq!(d.selected().unwrap().bounds, IRect::new(3, 636, 205, 54));
    }

    #[test]
    fn bounds_clamp_to_virtual_area() {
        let mut d = designer();
        let irr = irr();
        let held = InputSnapshot::default().with_keys(&[KeyboardKey::KEY_LEFT]);
        d.update(&input(vec![held]), Some(&irr));
        assert_eq!(d.selected().unwrap().bounds.x, 0);

        d.select(1);
        d.shift_size = 500;
        let held = InputSnapshot::default().with_keys(&[KeyboardKey::KEY_RIGHT]);
        d.update(&input(vec![held]), Some(&irr));
        assert_eq!(d.selected().unwrap().bounds.x, 1280);
    }

    #[test]
    fn shift_size_changes_and_stays_positive() {
        let mut d = designer();
        d.update(&key(KeyboardKey::KEY_EQUAL), None);
        assert_eq!(d.shift_size, 4);
        for _ in 0..10 {
            d.update(&key(KeyboardKey::KEY_MINUS), None);
        }
        assert_eq!(d.shift_size, 1);
    }

    #[test]
    fn reset_restores_bounds_from_selection_time() {
        let mut d = designer();
        let held = InputSnapshot::default().with_keys(&[KeyboardKey::KEY_DOWN]);
        d.update(&input(vec![held]), None);
        assert_ne!(d.selected().unwrap().bounds, IRect::new(0, 636, 205, 51));
        d.update(&key(KeyboardKey::KEY_R), None);
        assert_eq!(d.selected().unwrap().bounds, IRect::new(0, 636, 205, 51));
    }

    #[test]
    fn click_selects_and_drag_moves() {
        let mut d = designer();
        let irr = irr();
        let mut i = InputHelper::new();
        i.advance(InputSnapshot::default().with_mouse(1100.0, 40.0));
        i.advance(
            InputSnapshot::default()
                .with_mouse(1100.0, 40.0)
                .with_button(MouseButton::Left, true),
        );
        let out = d.update(&i, Some(&irr));
        assert!(out.selection_changed);
        assert_eq!(d.selected_index(), Some(2));
        assert!(d.is_dragging());

        i.advance(
            InputSnapshot::default()
                .with_mouse(1090.0, 50.0)
                .with_button(MouseButton::Left, true),
        );
        d.update(&i, Some(&irr));
        assert_eq!(d.selected().unwrap().bounds, IRect::new(1015, 31, 247, 65));

        i.advance(InputSnapshot::default().with_mouse(1090.0, 50.0));
        d.update(&i, Some(&irr));
        assert!(!d.is_dragging());
    }

    #[test]
    fn right_drag_resizes_keeping_aspect_with_shift() {
        let mut d =
            UiDesigner::new(vec![DesignerEntry::new("a", "a", IRect::new(10, 10, 100, 50))]);
        let mut i = InputHelper::new();
        i.advance(InputSnapshot::default().with_mouse(200.0, 200.0));
        i.advance(
            InputSnapshot::default()
                .with_mouse(200.0, 200.0)
                .with_button(MouseButton::Right, true),
        );
        d.update(&i, None);
        assert!(d.is_resizing());
        i.advance(
            InputSnapshot::default()
                .with_mouse(300.0, 200.0)
                .with_button(MouseButton::Right, true)
                .with_keys(&[KeyboardKey::KEY_LEFT_SHIFT]),
        );
        d.update(&i, None);
        assert_eq!(d.selected().unwrap().bounds, IRect::new(10, 10, 200, 100));
    }

    #[test]
    fn copy_key_emits_clipboard_text() {
        let mut d = designer();
        let out = d.update(&key(KeyboardKey::KEY_C), None);
        assert_eq!(out.clipboard.as_deref(), Some("0,636,205,51"));
    }

    #[test]
    fn text_toggle_hides_status() {
        let mut d = designer();
        assert_eq!(d.status_lines().len(), 2);
        d.update(&key(KeyboardKey::KEY_V), None);
        assert!(d.status_lines().is_empty());
    }

    #[test]
    fn parse_rect_requires_four_integers() {
        assert_eq!(parse_rect("1, 2,3,4").unwrap(), IRect::new(1, 2, 3, 4));
        assert!(matches!(parse_rect("1,2,3"), Err(LayoutError::InvalidRect(_))));
        assert!(matches!(parse_rect("1,2,x,4"), Err(LayoutError::InvalidRect(_))));
    }

    #[test]
    fn list_editing_keeps_selection_on_its_entry() {
        let mut d = designer();
        d.select(1);
        assert!(d.move_up(1));
        assert_eq!(d.selected().unwrap().name, "Options");
        assert_eq!(d.selected_index(), Some(0));
        assert!(!d.move_up(0));
        assert!(d.move_down(0));
        assert_eq!(d.selected_index(), Some(1));
        assert!(!d.move_down(2));

        assert_eq!(d.duplicate(2), Some(3));
        assert_eq!(d.entries()[3].name, "Quit");

        d.remove_entry(0);
        assert_eq!(d.selected().unwrap().name, "Options");
        assert_eq!(d.entries().len(), 3);
    }

    #[test]
    fn removing_another_entry_keeps_the_reset_snapshot() {
        let held = InputSnapshot::default().with_keys(&[KeyboardKey::KEY_DOWN]);

        // Removed entry after the selection
        let mut d = designer();
        d.update(&input(vec![held.clone()]), None);
        d.remove_entry(2);
        assert_eq!(d.selected_index(), Some(0));
        d.reset_bounds();
        assert_eq!(d.selected().unwrap().bounds, IRect::new(0, 636, 205, 51));

        // Removed entry before the selection
        let mut d = designer();
        d.select(1);
        d.update(&input(vec![held]), None);
        d.remove_entry(0);
        assert_eq!(d.selected().unwrap().name, "Options");
        d.reset_bounds();
        assert_eq!(d.selected().unwrap().bounds, IRect::new(1065, 631, 191, 51));
    }

    #[test]
    fn removing_the_selected_entry_selects_its_successor() {
        let mut d = designer();
        d.select(2);
        d.remove_entry(2);
        assert_eq!(d.selected().unwrap().name, "Options");
        d.remove_entry(0);
        assert_eq!(d.selected().unwrap().name, "Options");
        d.remove_entry(0);
        assert_eq!(d.selected_index(), None);
    }

    #[test]
    fn generate_code_lists_every_entry() {
        let d = designer();
        let code = d.generate_code();
        assert!(code.starts_with("//Play(play)\nRectangle::new(0,636,205,51)\n"));
        assert_eq!(code.lines().count(), 6);
    }

    #[test]
    fn layout_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.json");
        let d = designer();
        d.save_layout(&path).unwrap();
        let mut loaded = UiDesigner::default();
        loaded.load_layout(&path).unwrap();
        assert_eq!(loaded.entries(), d.entries());
        assert_eq!(loaded.selected_index(), Some(0));
    }

    #[test]
    fn set_bounds_from_text_rejects_garbage() {
        let mut d = designer();
        assert!(d.set_bounds_from_text(0, "nope").is_err());
        d.set_bounds_from_text(0, "5,6,7,8").unwrap();
        assert_eq!(d.entries()[0].bounds, IRect::new(5, 6, 7, 8));
    }
}
