//! Game flow
//!
//! A stack of [`GameState`]s drives the game. Only the top state is updated,
//! rendered and told about button presses. States ask for stack changes
//! through [`StateCommands`]; the manager applies them once the state's
//! update has returned, and states that leave the stack are kept alive until
//! the end of that update.

pub mod states;

pub use states::{LevelState, StartupState};

use crate::input::{Button, ButtonState, InputDevice, InputListener, InputManager};
use crate::levels::{WorldProducer, create_test_level};
use crate::renderer::DrawSurface;

/// One screen of the game (title, level, menu...)
pub trait GameState {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Advance one frame
    fn on_update(&mut self, input: &dyn ButtonState, commands: &mut StateCommands);

    fn on_render(&self, surface: &mut dyn DrawSurface);

    /// A button went from released to pressed this frame
    fn on_button_press(&mut self, _button: Button) {}
}

enum StateCommand {
    Push(Box<dyn GameState>),
    Pop,
}

/// Stack changes requested by a state during its update
#[derive(Default)]
pub struct StateCommands {
    queue: Vec<StateCommand>,
}

impl StateCommands {
    pub fn push_state(&mut self, state: Box<dyn GameState>) {
        self.queue.push(StateCommand::Push(state));
    }

    pub fn pop_state(&mut self) {
        self.queue.push(StateCommand::Pop);
    }

    /// Replace the requesting state
    pub fn change_state(&mut self, state: Box<dyn GameState>) {
        self.pop_state();
        self.push_state(state);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Stack of game states
#[derive(Default)]
pub struct GameStateManager {
    stack: Vec<Box<dyn GameState>>,
    /// Popped states, dropped at the end of `update`
    dead: Vec<Box<dyn GameState>>,
}

impl GameStateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The game runs while any state is on the stack
    pub fn is_running(&self) -> bool {
        !self.stack.is_empty()
    }

    pub fn push_state(&mut self, state: Box<dyn GameState>) {
        log::info!("Entering state {}", state.name());
        self.stack.push(state);
    }

    /// Remove the top state. It stays alive until the end of the next update.
    pub fn pop_state(&mut self) {
        if let Some(state) = self.stack.pop() {
            log::info!("Leaving state {}", state.name());
            self.dead.push(state);
        }
    }

    /// Name of the top state
    pub fn current(&self) -> Option<&'static str> {
        self.stack.last().map(|state| state.name())
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Popped states not yet dropped
    pub fn pending_drops(&self) -> usize {
        self.dead.len()
    }

    pub fn render(&self, surface: &mut dyn DrawSurface) {
        if let Some(state) = self.stack.last() {
            state.on_render(surface);
        }
    }

    /// Update the top state, apply its stack changes, then drop dead states
    pub fn update(&mut self, input: &dyn ButtonState) {
        let mut commands = StateCommands::default();
        if let Some(state) = self.stack.last_mut() {
            state.on_update(input, &mut commands);
        }

        for command in commands.queue {
            match command {
                StateCommand::Push(state) => self.push_state(state),
                StateCommand::Pop => self.pop_state(),
            }
        }

        if !self.dead.is_empty() {
            log::debug!("Dropping {} dead state(s)", self.dead.len());
            self.dead.clear();
        }
    }
}

impl InputListener for GameStateManager {
    fn on_button_press(&mut self, button: Button) {
        if let Some(state) = self.stack.last_mut() {
            state.on_button_press(button);
        }
    }
}

/// Owns the state stack and the input manager, and runs frames
pub struct Game {
    states: GameStateManager,
    input: InputManager,
}

impl Game {
    /// Start from the startup state, playing the test level
    pub fn new(input: InputManager) -> Self {
        Self::with_level(input, create_test_level)
    }

    pub fn with_level(input: InputManager, level: WorldProducer) -> Self {
        let mut states = GameStateManager::new();
        states.push_state(Box::new(StartupState::new(level)));
        Self { states, input }
    }

    pub fn states(&self) -> &GameStateManager {
        &self.states
    }

    pub fn input(&self) -> &InputManager {
        &self.input
    }

    pub fn is_running(&self) -> bool {
        !self.input.shutdown_received() && self.states.is_running()
    }

    /// Run one frame: draw, poll input, update.
    ///
    /// Returns whether the game should keep running.
    pub fn frame(&mut self, surface: &mut dyn DrawSurface, device: &dyn InputDevice) -> bool {
        surface.clear_screen();
        self.states.render(surface);
        surface.update_screen();

        self.input.update(device, &mut self.states);

        self.states.update(&self.input);

        self.is_running()
    }
}
