//! Game settings and preferences
//!
//! Persisted as JSON in LocalStorage on the web, or in the file named by
//! `JUMP_SETTINGS` on native builds.

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::input::Button;
use crate::input::manager::{Binding, InputManager, InputSource};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Virtual screen width, in pixels
    pub screen_width: i32,
    /// Virtual screen height, in pixels
    pub screen_height: i32,
    /// Canvas pixels per virtual pixel
    pub window_scale: u32,
    /// Keyboard and joystick mappings
    pub bindings: Vec<Binding>,
    /// Frames simulated by a native (windowless) run
    pub headless_frames: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            window_scale: 2,
            bindings: default_bindings(),
            headless_frames: 600,
        }
    }
}

/// Keyboard: X/Z for A/B, arrows, Enter. Joystick 0: buttons 0/1/7, left stick.
pub fn default_bindings() -> Vec<Binding> {
    let key = |code: &str, button| Binding::new(InputSource::key(code), button);
    let joystick_button = |joystick_button, button| {
        Binding::new(
            InputSource::JoystickButton {
                joystick: 0,
                button: joystick_button,
            },
            button,
        )
    };
    let joystick_axis = |axis, sign, button| {
        Binding::new(
            InputSource::JoystickAxis {
                joystick: 0,
                axis,
                sign,
            },
            button,
        )
    };

    vec![
        key("KeyX", Button::A),
        key("KeyZ", Button::B),
        key("ArrowDown", Button::Down),
        key("ArrowLeft", Button::Left),
        key("ArrowRight", Button::Right),
        key("ArrowUp", Button::Up),
        key("Enter", Button::Start),
        joystick_button(0, Button::A),
        joystick_button(1, Button::B),
        joystick_axis(1, 1, Button::Down),
        joystick_axis(0, -1, Button::Left),
        joystick_axis(0, 1, Button::Right),
        joystick_axis(1, -1, Button::Up),
        joystick_button(7, Button::Start),
    ]
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "jump_settings";

    /// Environment variable naming the native settings file
    pub const PATH_VAR: &'static str = "JUMP_SETTINGS";

    /// Parse settings; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Build an input manager with these bindings
    pub fn input_manager(&self) -> InputManager {
        InputManager::with_bindings(self.bindings.clone())
    }

    /// Parse stored JSON, falling back to defaults
    fn from_stored(json: &str, source: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", source);
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings in {}: {}; using defaults", source, e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        match storage.map(|s| s.get_item(Self::STORAGE_KEY)) {
            Some(Ok(Some(json))) => Self::from_stored(&json, "LocalStorage"),
            Some(Ok(None)) => {
                log::info!("No stored settings; saving defaults");
                let settings = Self::default();
                settings.save();
                settings
            }
            _ => {
                log::warn!("LocalStorage unavailable; using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let Some(storage) = storage else {
            log::warn!("LocalStorage unavailable; settings not saved");
            return;
        };
        match self.to_json() {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to write settings to LocalStorage");
                } else {
                    log::info!("Settings saved");
                }
            }
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }

    /// Load settings from the `JUMP_SETTINGS` file, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        match std::env::var_os(Self::PATH_VAR) {
            Some(path) => Self::load_or_create(Path::new(&path)),
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from `path`, writing the defaults there if it does not exist
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            return Self::load_from(path);
        }
        log::info!("No settings file at {}; saving defaults", path.display());
        let settings = Self::default();
        settings.save_at(path);
        settings
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_stored(&json, &path.display().to_string()),
            Err(e) => {
                log::warn!(
                    "Cannot read settings file {}: {}; using defaults",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save settings to the `JUMP_SETTINGS` file, if set
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        match std::env::var_os(Self::PATH_VAR) {
            Some(path) => self.save_at(Path::new(&path)),
            None => log::debug!("{} not set; settings not saved", Self::PATH_VAR),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_at(&self, path: &Path) {
        match self.save_to(path) {
            Ok(()) => log::info!("Settings saved to {}", path.display()),
            Err(e) => log::warn!("Failed to save settings to {}: {}", path.display(), e),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}
