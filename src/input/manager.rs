//! Physical-to-logical input mapping

use serde::{Deserialize, Serialize};

use super::{Button, ButtonState, InputDevice, InputListener};

/// Axis deflection past which a mapped direction counts as pressed
pub const AXIS_THRESHOLD: i16 = 16384;

/// A physical control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputSource {
    /// Keyboard key, by `KeyboardEvent.code`
    Key { code: String },
    JoystickButton { joystick: usize, button: usize },
    /// Half of an axis; `sign` picks the direction
    JoystickAxis { joystick: usize, axis: usize, sign: i8 },
}

impl InputSource {
    pub fn key(code: &str) -> Self {
        InputSource::Key {
            code: code.to_string(),
        }
    }

    fn is_active(&self, device: &dyn InputDevice) -> bool {
        match self {
            InputSource::Key { code } => device.is_key_down(code),
            InputSource::JoystickButton { joystick, button } => {
                device.joystick_button(*joystick, *button)
            }
            InputSource::JoystickAxis {
                joystick,
                axis,
                sign,
            } => {
                let value = device.joystick_axis(*joystick, *axis);
                if *sign < 0 {
                    value < -AXIS_THRESHOLD
                } else {
                    value > AXIS_THRESHOLD
                }
            }
        }
    }
}

/// One physical control driving one logical button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub source: InputSource,
    pub button: Button,
}

impl Binding {
    pub fn new(source: InputSource, button: Button) -> Self {
        Self { source, button }
    }
}

/// Polls a device through a list of bindings and tracks logical button state
#[derive(Debug, Clone, Default)]
pub struct InputManager {
    bindings: Vec<Binding>,
    states: [bool; Button::COUNT],
    shutdown: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: Vec<Binding>) -> Self {
        Self {
            bindings,
            ..Default::default()
        }
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn map_key(&mut self, code: &str, button: Button) {
        self.bindings.push(Binding::new(InputSource::key(code), button));
    }

    pub fn map_joystick_button(&mut self, joystick: usize, joystick_button: usize, button: Button) {
        self.bindings.push(Binding::new(
            InputSource::JoystickButton {
                joystick,
                button: joystick_button,
            },
            button,
        ));
    }

    pub fn map_joystick_axis(&mut self, joystick: usize, axis: usize, sign: i8, button: Button) {
        self.bindings.push(Binding::new(
            InputSource::JoystickAxis {
                joystick,
                axis,
                sign,
            },
            button,
        ));
    }

    /// Mark a button pressed, notifying the listener if it was released
    pub fn set_button_pressed(&mut self, button: Button, listener: &mut dyn InputListener) {
        if !self.states[button.index()] {
            listener.on_button_press(button);
        }
        self.states[button.index()] = true;
    }

    pub fn set_button_released(&mut self, button: Button) {
        self.states[button.index()] = false;
    }

    /// Poll the device once.
    ///
    /// Each logical button is the OR of all of its bindings. Newly pressed
    /// buttons are reported to `listener` before their state is stored.
    pub fn update(&mut self, device: &dyn InputDevice, listener: &mut dyn InputListener) {
        if device.quit_requested() && !self.shutdown {
            log::info!("Shutdown requested");
            self.shutdown = true;
        }

        let mut active = [false; Button::COUNT];
        for binding in &self.bindings {
            active[binding.button.index()] |= binding.source.is_active(device);
        }

        for button in Button::ALL {
            if active[button.index()] {
                self.set_button_pressed(button, listener);
            } else {
                self.set_button_released(button);
            }
        }
    }

    pub fn shutdown_received(&self) -> bool {
        self.shutdown
    }
}

impl ButtonState for InputManager {
    fn is_button_pressed(&self, button: Button) -> bool {
        self.states[button.index()]
    }
}
