//! Concrete game states

use super::{GameState, StateCommands};
use crate::consts::TILE_SIZE;
use crate::input::{Button, ButtonState, InputListener};
use crate::levels::WorldProducer;
use crate::renderer::DrawSurface;
use crate::sim::{Entity, EntityId, Player, World};

/// First state on the stack; hands over to the level on its first update
pub struct StartupState {
    level: WorldProducer,
}

impl StartupState {
    pub fn new(level: WorldProducer) -> Self {
        Self { level }
    }
}

impl GameState for StartupState {
    fn name(&self) -> &'static str {
        "startup"
    }

    fn on_update(&mut self, _input: &dyn ButtonState, commands: &mut StateCommands) {
        commands.change_state(Box::new(LevelState::new(self.level)));
    }

    fn on_render(&self, _surface: &mut dyn DrawSurface) {}
}

/// Plays a world with the player dropped in near the top-left corner
pub struct LevelState {
    world: World,
    player: EntityId,
}

impl LevelState {
    pub fn new(level: WorldProducer) -> Self {
        let mut world = level();
        let player = world.add_actor(
            Entity::at(TILE_SIZE as f32, TILE_SIZE as f32),
            Box::new(Player::new()),
        );
        Self { world, player }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> Option<&Entity> {
        self.world.entity(self.player)
    }
}

impl GameState for LevelState {
    fn name(&self) -> &'static str {
        "level"
    }

    fn on_update(&mut self, input: &dyn ButtonState, _commands: &mut StateCommands) {
        self.world.update(input);
    }

    fn on_render(&self, surface: &mut dyn DrawSurface) {
        let (width, height) = (surface.screen_width(), surface.screen_height());
        self.world.render(surface, 0, width, 0, height);
    }

    fn on_button_press(&mut self, button: Button) {
        self.world.on_button_press(button);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::HeldButtons;
    use crate::levels::create_test_level;
    use crate::renderer::recording::{DrawCall, RecordingSurface};

    #[test]
    fn test_startup_changes_to_level() {
        let mut startup = StartupState::new(create_test_level);
        let mut commands = StateCommands::default();
        startup.on_update(&HeldButtons::default(), &mut commands);
        assert!(!commands.is_empty());

        let mut surface = RecordingSurface::default();
        startup.on_render(&mut surface);
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn test_level_places_player() {
        let level = LevelState::new(create_test_level);
        assert_eq!(level.world().entities().len(), 1);
        let player = level.player().map(|p| (p.x(), p.y()));
        assert_eq!(player, Some((TILE_SIZE, TILE_SIZE)));
    }

    #[test]
    fn test_press_jumps_from_floor() {
        let mut level = LevelState::new(create_test_level);
        let idle = HeldButtons::default();
        let mut commands = StateCommands::default();
        for _ in 0..120 {
            level.on_update(&idle, &mut commands);
        }
        assert!(commands.is_empty());
        let floor = level.player().map(|p| p.y());

        level.on_button_press(Button::A);
        let held = HeldButtons::new(&[Button::A]);
        for _ in 0..10 {
            level.on_update(&held, &mut commands);
        }
        let after = level.player().map(|p| p.y());
        assert!(after < floor, "{after:?} should be above {floor:?}");
    }

    #[test]
    fn test_render_uses_screen_camera() {
        let level = LevelState::new(create_test_level);
        let mut surface = RecordingSurface::default();
        level.on_render(&mut surface);

        let shapes = surface.shapes();
        assert!(shapes.contains(&(0x00ff00, DrawCall::Rectangle(0, 0, 16, 16))));
        assert!(shapes.contains(&(0x00ff00, DrawCall::Rectangle(144, 160, 16, 16))));
        assert!(shapes.contains(&(0x0000ff, DrawCall::Rectangle(240, 160, 64, 64))));
        assert!(shapes.contains(&(0x00ff00, DrawCall::Line(80, 224, 96, 208))));
        assert_eq!(shapes.last(), Some(&(0xff0000, DrawCall::Rectangle(16, 16, 16, 16))));
    }
}
