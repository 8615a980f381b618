//! Game configuration resource.
//!
//! Settings loaded from an INI file. Defaults are safe to start with, and
//! every missing key keeps its default.
//!
//! # Configuration File Format
//!
//! ```ini
//! [render]
//! width = 1280
//! height = 720
//! background = 0,0,0
//!
//! [window]
//! width = 800
//! height = 400
//! fullscreen = false
//! vsync = true
//! target_fps = 60
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use raylib::prelude::Color;
use std::path::PathBuf;

const DEFAULT_VIRTUAL_WIDTH: u32 = 1280;
const DEFAULT_VIRTUAL_HEIGHT: u32 = 720;
const DEFAULT_WINDOW_WIDTH: u32 = 800;
const DEFAULT_WINDOW_HEIGHT: u32 = 400;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_VSYNC: bool = true;
const DEFAULT_FULLSCREEN: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
///
/// `virtual_*` is the fixed design resolution handed to the
/// [`ResolutionRenderer`](crate::resources::resolution::ResolutionRenderer);
/// `window_*` is only the initial window size.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    pub virtual_width: u32,
    pub virtual_height: u32,
    /// Clear color for the whole backbuffer, visible as letterbox bars.
    pub background: Color,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    pub vsync: bool,
    pub fullscreen: bool,
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `"r,g,b"` or `"r,g,b,a"`.
fn parse_color(text: &str) -> Option<Color> {
    let parts: Vec<u8> = text
        .split(',')
        .map(|p| p.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [r, g, b] => Some(Color::new(*r, *g, *b, 255)),
        [r, g, b, a] => Some(Color::new(*r, *g, *b, *a)),
        _ => None,
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            virtual_width: DEFAULT_VIRTUAL_WIDTH,
            virtual_height: DEFAULT_VIRTUAL_HEIGHT,
            background: Color::BLACK,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            vsync: DEFAULT_VSYNC,
            fullscreen: DEFAULT_FULLSCREEN,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current values.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [render] section
        if let Some(width) = config.getuint("render", "width").ok().flatten() {
            if width > 0 {
                self.virtual_width = width as u32;
            }
        }
        if let Some(height) = config.getuint("render", "height").ok().flatten() {
            if height > 0 {
                self.virtual_height = height as u32;
            }
        }
        if let Some(bg) = config.get("render", "background") {
            match parse_color(&bg) {
                Some(color) => self.background = color,
                None => warn!("Ignoring invalid background color '{}'", bg),
            }
        }

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(vsync) = config.getbool("window", "vsync").ok().flatten() {
            self.vsync = vsync;
        }
        if let Some(fullscreen) = config.getbool("window", "fullscreen").ok().flatten() {
            self.fullscreen = fullscreen;
        }

        info!(
            "Loaded config: {}x{} virtual, {}x{} window, fps={}, vsync={}, fullscreen={}",
            self.virtual_width,
            self.virtual_height,
            self.window_width,
            self.window_height,
            self.target_fps,
            self.vsync,
            self.fullscreen
        );

        Ok(())
    }

    /// Save configuration to the INI file, creating it if needed.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("render", "width", Some(self.virtual_width.to_string()));
        config.set("render", "height", Some(self.virtual_height.to_string()));
        config.set(
            "render",
            "background",
            Some(format!(
                "{},{},{}",
                self.background.r, self.background.g, self.background.b
            )),
        );

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "vsync", Some(self.vsync.to_string()));
        config.set("window", "fullscreen", Some(self.fullscreen.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    pub fn virtual_size(&self) -> (u32, u32) {
        (self.virtual_width, self.virtual_height)
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = GameConfig::with_path(dir.path().join("nope.ini"));
        assert!(cfg.load_from_file().is_err());
        assert_eq!(cfg.virtual_size(), (1280, 720));
        assert_eq!(cfg.window_size(), (800, 400));
    }

    #[test]
    fn partial_file_overrides_only_present_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[render]\nwidth = 640\nbackground = 10, 20, 30\n[window]\nvsync = false"
        )
        .unwrap();
        let mut cfg = GameConfig::with_path(file.path());
        cfg.load_from_file().unwrap();
        assert_eq!(cfg.virtual_size(), (640, 720));
        assert_eq!(cfg.background, Color::new(10, 20, 30, 255));
        assert!(!cfg.vsync);
        assert_eq!(cfg.target_fps, 60);
    }

    #[test]
    fn bad_background_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nbackground = red").unwrap();
        let mut cfg = GameConfig::with_path(file.path());
        cfg.load_from_file().unwrap();
        assert_eq!(cfg.background, Color::BLACK);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let mut cfg = GameConfig::with_path(&path);
        cfg.virtual_width = 320;
        cfg.virtual_height = 240;
        cfg.background = Color::new(1, 2, 3, 255);
        cfg.fullscreen = true;
        cfg.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded.virtual_size(), (320, 240));
        assert_eq!(loaded.background, Color::new(1, 2, 3, 255));
        assert!(loaded.fullscreen);
    }

    #[test]
    fn parse_color_accepts_rgb_and_rgba() {
        assert_eq!(parse_color("1,2,3"), Some(Color::new(1, 2, 3, 255)));
        assert_eq!(parse_color("1,2,3,4"), Some(Color::new(1, 2, 3, 4)));
        assert_eq!(parse_color("1,2"), None);
        assert_eq!(parse_color("1,2,300"), None);
    }
}
