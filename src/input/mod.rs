//! Logical controller input
//!
//! Physical keys and gamepad controls are mapped onto seven logical buttons.
//! Game code sees input two ways:
//! - polled: [`ButtonState::is_button_pressed`] reflects the current frame
//! - edge-triggered: [`InputListener::on_button_press`] fires once when a
//!   button goes from released to pressed

pub mod manager;

pub use manager::{AXIS_THRESHOLD, Binding, InputManager, InputSource};

use serde::{Deserialize, Serialize};

/// Logical controller buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    A,
    B,
    Down,
    Left,
    Right,
    Up,
    Start,
}

impl Button {
    pub const COUNT: usize = 7;

    pub const ALL: [Button; Self::COUNT] = [
        Button::A,
        Button::B,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Up,
        Button::Start,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::Down => "Down",
            Button::Left => "Left",
            Button::Right => "Right",
            Button::Up => "Up",
            Button::Start => "Start",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "a" | "jump" => Some(Button::A),
            "b" | "run" => Some(Button::B),
            "down" => Some(Button::Down),
            "left" => Some(Button::Left),
            "right" => Some(Button::Right),
            "up" => Some(Button::Up),
            "start" => Some(Button::Start),
            _ => None,
        }
    }
}

/// Level-triggered button query
pub trait ButtonState {
    fn is_button_pressed(&self, button: Button) -> bool;
}

/// Receiver of edge-triggered button presses
pub trait InputListener {
    fn on_button_press(&mut self, button: Button);
}

/// Raw input hardware as seen by the input manager
pub trait InputDevice {
    /// Is the key with this code (e.g. `"ArrowLeft"`, `"KeyX"`) held?
    fn is_key_down(&self, code: &str) -> bool;

    /// Is a joystick button held? Unknown joysticks report `false`.
    fn joystick_button(&self, joystick: usize, button: usize) -> bool;

    /// Axis position in `-32768..=32767`. Unknown joysticks report 0.
    fn joystick_axis(&self, joystick: usize, axis: usize) -> i16;

    /// Has the user asked to quit (window close, Escape)?
    fn quit_requested(&self) -> bool;
}

/// A fixed set of held buttons, for tests and scripted play
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldButtons([bool; Button::COUNT]);

impl HeldButtons {
    pub fn new(buttons: &[Button]) -> Self {
        let mut held = Self::default();
        for &button in buttons {
            held.press(button);
        }
        held
    }

    pub fn press(&mut self, button: Button) {
        self.0[button.index()] = true;
    }

    pub fn release(&mut self, button: Button) {
        self.0[button.index()] = false;
    }
}

impl ButtonState for HeldButtons {
    fn is_button_pressed(&self, button: Button) -> bool {
        self.0[button.index()]
    }
}
