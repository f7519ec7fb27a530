//! The player-controlled character
//!
//! Movement is tuned with hex constants in the classic tiles/pixels/subpixel
//! encoding (see [`physics_value_from_hex`]). Each frame the controller picks
//! velocity caps and accelerations from the current state; the world applies
//! them during the next frame's motion step.

use super::collision;
use super::entity::{Behavior, Entity, Surroundings};
use super::layer::Layer;
use crate::input::Button;
use crate::{physics_value_from_hex, sgn};

pub const MAX_WALKING_SPEED: f32 = physics_value_from_hex(0x0180);
pub const MAX_RUNNING_SPEED: f32 = physics_value_from_hex(0x0280);

pub const RUN_ACCELERATION: f32 = physics_value_from_hex(0x000e);
pub const STOP_DECELERATION: f32 = physics_value_from_hex(0x000e);
pub const SKID_DECELERATION: f32 = physics_value_from_hex(0x0020);

pub const JUMP_VELOCITY_1: f32 = physics_value_from_hex(0x0370);
pub const JUMP_VELOCITY_2: f32 = physics_value_from_hex(0x0390);
pub const JUMP_VELOCITY_3: f32 = physics_value_from_hex(0x03b0);

/// Horizontal speed needed for the second jump tier
pub const JUMP_VELOCITY_THRESHOLD_2: f32 = physics_value_from_hex(0x0100);
/// Horizontal speed needed for the third jump tier
pub const JUMP_VELOCITY_THRESHOLD_3: f32 = physics_value_from_hex(0x0200);

/// Gravity while the jump button is held early in a jump
pub const JUMP_GRAVITY_1: f32 = physics_value_from_hex(0x0010);
pub const JUMP_GRAVITY_2: f32 = physics_value_from_hex(0x0050);
/// Low gravity only applies while rising faster than this
pub const JUMP_GRAVITY_THRESHOLD_2: f32 = -physics_value_from_hex(0x0200);

pub const MAX_DOWNWARD_VELOCITY: f32 = physics_value_from_hex(0x0450);

pub const MAX_UNDERWATER_WALKING_SPEED: f32 = physics_value_from_hex(0x0100);
pub const UNDERWATER_GRAVITY_MOVING_UPWARD: f32 = physics_value_from_hex(0x0010);
pub const UNDERWATER_GRAVITY_MOVING_DOWNWARD: f32 = physics_value_from_hex(0x0008);
pub const UNDERWATER_GRAVITY_AT_SURFACE: f32 = physics_value_from_hex(0x000c);
pub const MAX_UNDERWATER_DOWNWARD_VELOCITY: f32 = physics_value_from_hex(0x0200);
pub const MAX_SWIMMING_SPEED: f32 = physics_value_from_hex(0x0300);
pub const UNDERWATER_ACCELERATION: f32 = physics_value_from_hex(0x0006);
pub const UNDERWATER_DECELERATION: f32 = physics_value_from_hex(0x0002);
pub const UNDERWATER_TURN_ACCELERATION: f32 = physics_value_from_hex(0x0008);
pub const UNDERWATER_JUMP_VELOCITY: f32 = physics_value_from_hex(0x0330);

pub const SWIM_POWER_MODIFIER: f32 = physics_value_from_hex(0x01f0);
pub const MAX_SWIM_POWER: f32 = physics_value_from_hex(0x0000);
pub const MIN_SWIM_POWER: f32 = -physics_value_from_hex(0x0200);

/// Player controller state
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// -1 facing left, 1 facing right
    direction_sign: i32,
    /// Horizontal speed cap carried into the air from the ground
    max_air_velocity_x: f32,
    was_at_surface_of_water_last_frame: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            direction_sign: 1,
            max_air_velocity_x: MAX_WALKING_SPEED,
            was_at_surface_of_water_last_frame: false,
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction_sign(&self) -> i32 {
        self.direction_sign
    }

    pub fn max_air_velocity_x(&self) -> f32 {
        self.max_air_velocity_x
    }

    /// Center is in water but the top row is not
    fn is_at_surface_of_water(layers: &[Layer], entity: &Entity) -> bool {
        !collision::is_underwater_at(layers, entity.center_x(), entity.top())
            && collision::is_underwater_at(layers, entity.center_x(), entity.center_y())
    }

    /// Pick the horizontal acceleration toward the held direction
    fn steer(&self, entity: &mut Entity, stopping: bool, decel: f32, turn: f32, accel: f32) {
        let vx = entity.velocity.x;
        if stopping {
            if vx.abs() > decel {
                entity.acceleration.x = -(sgn(vx) as f32) * decel;
            } else {
                entity.acceleration.x = 0.0;
                entity.velocity.x = 0.0;
            }
        } else if self.direction_sign != sgn(vx) {
            entity.acceleration.x = self.direction_sign as f32 * turn;
        } else {
            entity.acceleration.x = self.direction_sign as f32 * accel;
        }
    }

    fn update_underwater(
        &mut self,
        entity: &mut Entity,
        surroundings: &Surroundings<'_>,
        stopping: bool,
    ) -> bool {
        let max_velocity_x = if surroundings.is_on_ground(entity) {
            MAX_UNDERWATER_WALKING_SPEED
        } else {
            MAX_SWIMMING_SPEED
        };
        cap_velocity_x(entity, max_velocity_x);

        self.steer(
            entity,
            stopping,
            UNDERWATER_DECELERATION,
            UNDERWATER_TURN_ACCELERATION,
            UNDERWATER_ACCELERATION,
        );

        let at_surface = Self::is_at_surface_of_water(surroundings.layers, entity);
        if at_surface && !self.was_at_surface_of_water_last_frame {
            if surroundings.is_button_pressed(Button::Up)
                && surroundings.is_button_pressed(Button::A)
            {
                log::debug!("Leaping out of the water");
                entity.velocity.y = -UNDERWATER_JUMP_VELOCITY;
            } else {
                // Bob to a stop on reaching the surface
                entity.velocity.y = 0.0;
            }
        }

        if entity.velocity.y > MAX_UNDERWATER_DOWNWARD_VELOCITY {
            entity.velocity.y = MAX_UNDERWATER_DOWNWARD_VELOCITY;
        }

        entity.acceleration.y = if at_surface {
            UNDERWATER_GRAVITY_AT_SURFACE
        } else if entity.velocity.y < 0.0 {
            UNDERWATER_GRAVITY_MOVING_UPWARD
        } else {
            UNDERWATER_GRAVITY_MOVING_DOWNWARD
        };

        at_surface
    }

    fn update_regular(
        &mut self,
        entity: &mut Entity,
        surroundings: &Surroundings<'_>,
        stopping: bool,
    ) {
        if surroundings.is_on_ground(entity) {
            let max_velocity_x = if surroundings.is_button_pressed(Button::B) {
                MAX_RUNNING_SPEED
            } else {
                MAX_WALKING_SPEED
            };
            cap_velocity_x(entity, max_velocity_x);
            // Momentum carries into the next jump
            self.max_air_velocity_x = max_velocity_x;
        } else if entity.velocity.x > self.max_air_velocity_x {
            // Only rightward speed is held to the carried cap
            entity.velocity.x = self.max_air_velocity_x;
        }

        self.steer(
            entity,
            stopping,
            STOP_DECELERATION,
            SKID_DECELERATION,
            RUN_ACCELERATION,
        );

        if entity.velocity.y > MAX_DOWNWARD_VELOCITY {
            entity.velocity.y = MAX_DOWNWARD_VELOCITY;
        }

        // Holding jump early in the ascent gives a higher jump
        entity.acceleration.y = if surroundings.is_button_pressed(Button::A)
            && entity.velocity.y < JUMP_GRAVITY_THRESHOLD_2
        {
            JUMP_GRAVITY_1
        } else {
            JUMP_GRAVITY_2
        };
    }
}

fn cap_velocity_x(entity: &mut Entity, max: f32) {
    if entity.velocity.x.abs() > max {
        entity.velocity.x = max * sgn(entity.velocity.x) as f32;
    }
}

impl Behavior for Player {
    fn on_update(&mut self, entity: &mut Entity, surroundings: &Surroundings<'_>) {
        let mut stopping = false;
        if surroundings.is_button_pressed(Button::Left) {
            self.direction_sign = -1;
        } else if surroundings.is_button_pressed(Button::Right) {
            self.direction_sign = 1;
        } else {
            stopping = true;
        }

        let mut at_surface = false;
        if surroundings.is_underwater(entity) {
            at_surface = self.update_underwater(entity, surroundings, stopping);
        } else {
            self.update_regular(entity, surroundings, stopping);
        }
        self.was_at_surface_of_water_last_frame = at_surface;
    }

    fn on_button_press(&mut self, entity: &mut Entity, layers: &[Layer], button: Button) {
        if button != Button::A {
            return;
        }

        if collision::is_underwater_at(layers, entity.center_x(), entity.center_y()) {
            entity.velocity.y =
                (entity.velocity.y - SWIM_POWER_MODIFIER).clamp(MIN_SWIM_POWER, MAX_SWIM_POWER);
        } else if collision::is_entity_on_ground(layers, entity) {
            let speed = entity.velocity.x.abs();
            let jump_velocity = if speed > JUMP_VELOCITY_THRESHOLD_3 {
                JUMP_VELOCITY_3
            } else if speed > JUMP_VELOCITY_THRESHOLD_2 {
                JUMP_VELOCITY_2
            } else {
                JUMP_VELOCITY_1
            };
            log::debug!("Jump at speed {:.3}: {:.4}", speed, jump_velocity);
            entity.velocity.y = -jump_velocity;
            entity.acceleration.y = JUMP_GRAVITY_1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{HeldButtons, InputListener};
    use crate::sim::block::{Block, CollisionType};
    use crate::sim::world::World;

    /// 32×8 tiles, solid floor on row 7 and a 4×4 pool at tiles (20..24, 3..7)
    fn course() -> Layer {
        let mut layer = Layer::new(32, 8);
        for x in 0..32 {
            layer.add_block(x, 7, Block::new(CollisionType::Solid));
        }
        layer.add_block(20, 3, Block::with_size(CollisionType::Water, 4, 4));
        layer
    }

    /// Player body standing on the floor of `course`
    fn standing(x: f32) -> Entity {
        Entity::at(x, 96.0)
    }

    fn update(player: &mut Player, entity: &mut Entity, layers: &[Layer], held: &[Button]) {
        let input = HeldButtons::new(held);
        let surroundings = Surroundings {
            layers,
            input: &input,
        };
        player.on_update(entity, &surroundings);
    }

    #[test]
    fn test_constants_decode() {
        assert_eq!(MAX_WALKING_SPEED, 1.5);
        assert_eq!(MAX_RUNNING_SPEED, 2.5);
        assert_eq!(JUMP_VELOCITY_1, 3.4375);
        assert_eq!(JUMP_GRAVITY_THRESHOLD_2, -2.0);
        assert_eq!(MIN_SWIM_POWER, -2.0);
        assert_eq!(MAX_SWIM_POWER, 0.0);
    }

    #[test]
    fn test_initial_state() {
        let player = Player::new();
        assert_eq!(player.direction_sign(), 1);
        assert_eq!(player.max_air_velocity_x(), MAX_WALKING_SPEED);
    }

    #[test]
    fn test_jump_tiers() {
        let layers = [course()];
        for (speed, expected) in [
            (0.0, JUMP_VELOCITY_1),
            (1.0, JUMP_VELOCITY_1),
            (1.5, JUMP_VELOCITY_2),
            (-2.0, JUMP_VELOCITY_2),
            (2.5, JUMP_VELOCITY_3),
            (-2.5, JUMP_VELOCITY_3),
        ] {
            let mut player = Player::new();
            let mut entity = standing(40.0);
            entity.velocity.x = speed;
            player.on_button_press(&mut entity, &layers, Button::A);
            assert_eq!(entity.velocity.y, -expected, "speed {speed}");
            assert_eq!(entity.acceleration.y, JUMP_GRAVITY_1);
        }
    }

    #[test]
    fn test_no_jump_in_the_air_or_on_other_buttons() {
        let layers = [course()];
        let mut player = Player::new();

        let mut airborne = Entity::at(40.0, 50.0);
        airborne.velocity.y = 1.0;
        player.on_button_press(&mut airborne, &layers, Button::A);
        assert_eq!(airborne.velocity.y, 1.0);

        let mut grounded = standing(40.0);
        player.on_button_press(&mut grounded, &layers, Button::B);
        assert_eq!(grounded.velocity.y, 0.0);
    }

    #[test]
    fn test_swim_stroke_is_clamped() {
        let layers = [course()];
        let mut player = Player::new();
        // Center (328, 88) is inside the pool
        let mut entity = Entity::at(320.0, 80.0);

        entity.velocity.y = 1.0;
        player.on_button_press(&mut entity, &layers, Button::A);
        assert_eq!(entity.velocity.y, 1.0 - SWIM_POWER_MODIFIER);

        entity.velocity.y = -0.5;
        player.on_button_press(&mut entity, &layers, Button::A);
        assert_eq!(entity.velocity.y, MIN_SWIM_POWER);

        entity.velocity.y = 3.0;
        player.on_button_press(&mut entity, &layers, Button::A);
        assert_eq!(entity.velocity.y, MAX_SWIM_POWER);
    }

    #[test]
    fn test_ground_speed_caps() {
        let layers = [course()];
        let mut player = Player::new();
        let mut entity = standing(40.0);

        entity.velocity.x = 3.0;
        update(&mut player, &mut entity, &layers, &[Button::Right]);
        assert_eq!(entity.velocity.x, MAX_WALKING_SPEED);
        assert_eq!(entity.acceleration.x, RUN_ACCELERATION);
        assert_eq!(player.max_air_velocity_x(), MAX_WALKING_SPEED);

        entity.velocity.x = -3.0;
        update(&mut player, &mut entity, &layers, &[Button::Left, Button::B]);
        assert_eq!(entity.velocity.x, -MAX_RUNNING_SPEED);
        assert_eq!(player.max_air_velocity_x(), MAX_RUNNING_SPEED);
    }

    #[test]
    fn test_air_cap_only_limits_rightward_speed() {
        let layers = [course()];
        let mut player = Player::new();
        let mut entity = Entity::at(40.0, 40.0);

        entity.velocity.x = 2.0;
        update(&mut player, &mut entity, &layers, &[Button::Right]);
        assert_eq!(entity.velocity.x, MAX_WALKING_SPEED);

        entity.velocity.x = -2.0;
        update(&mut player, &mut entity, &layers, &[Button::Left]);
        assert_eq!(entity.velocity.x, -2.0);
        assert_eq!(entity.acceleration.x, -RUN_ACCELERATION);
    }

    #[test]
    fn test_stop_skid_and_run() {
        let layers = [course()];
        let mut player = Player::new();
        let mut entity = standing(40.0);

        // Stopping from speed decelerates against the motion
        entity.velocity.x = 1.0;
        update(&mut player, &mut entity, &layers, &[]);
        assert_eq!(entity.acceleration.x, -STOP_DECELERATION);

        // Slow enough: snap to a stop
        entity.velocity.x = -0.05;
        update(&mut player, &mut entity, &layers, &[]);
        assert_eq!(entity.velocity.x, 0.0);
        assert_eq!(entity.acceleration.x, 0.0);

        // Turning around skids
        entity.velocity.x = 1.0;
        update(&mut player, &mut entity, &layers, &[Button::Left]);
        assert_eq!(player.direction_sign(), -1);
        assert_eq!(entity.acceleration.x, -SKID_DECELERATION);

        // Standing still counts as facing right
        entity.velocity.x = 0.0;
        update(&mut player, &mut entity, &layers, &[Button::Right]);
        assert_eq!(entity.acceleration.x, RUN_ACCELERATION);
    }

    #[test]
    fn test_gravity_selection() {
        let layers = [course()];
        let mut player = Player::new();
        let mut entity = Entity::at(40.0, 40.0);

        entity.velocity.y = -3.0;
        update(&mut player, &mut entity, &layers, &[Button::A]);
        assert_eq!(entity.acceleration.y, JUMP_GRAVITY_1);

        update(&mut player, &mut entity, &layers, &[]);
        assert_eq!(entity.acceleration.y, JUMP_GRAVITY_2);

        entity.velocity.y = -1.0;
        update(&mut player, &mut entity, &layers, &[Button::A]);
        assert_eq!(entity.acceleration.y, JUMP_GRAVITY_2);

        entity.velocity.y = 9.0;
        update(&mut player, &mut entity, &layers, &[]);
        assert_eq!(entity.velocity.y, MAX_DOWNWARD_VELOCITY);
    }

    #[test]
    fn test_water_surface_stops_then_floats() {
        let layers = [course()];
        let mut player = Player::new();
        // Top row (y 40) above the pool, center (y 48) inside it
        let mut entity = Entity::at(336.0, 40.0);
        entity.velocity.y = -1.5;

        update(&mut player, &mut entity, &layers, &[]);
        assert_eq!(entity.velocity.y, 0.0);
        assert_eq!(entity.acceleration.y, UNDERWATER_GRAVITY_AT_SURFACE);

        // Still at the surface next frame: no second stop
        entity.velocity.y = -0.5;
        update(&mut player, &mut entity, &layers, &[]);
        assert_eq!(entity.velocity.y, -0.5);
        assert_eq!(entity.acceleration.y, UNDERWATER_GRAVITY_AT_SURFACE);
    }

    #[test]
    fn test_water_surface_leap() {
        let layers = [course()];
        let mut player = Player::new();
        let mut entity = Entity::at(336.0, 40.0);
        update(&mut player, &mut entity, &layers, &[Button::Up, Button::A]);
        assert_eq!(entity.velocity.y, -UNDERWATER_JUMP_VELOCITY);
    }

    #[test]
    fn test_underwater_motion() {
        let layers = [course()];
        let mut player = Player::new();
        // Deep in the pool, not touching the floor
        let mut entity = Entity::at(336.0, 64.0);

        entity.velocity.x = 5.0;
        entity.velocity.y = 3.0;
        update(&mut player, &mut entity, &layers, &[Button::Right]);
        assert_eq!(entity.velocity.x, MAX_SWIMMING_SPEED);
        assert_eq!(entity.acceleration.x, UNDERWATER_ACCELERATION);
        assert_eq!(entity.velocity.y, MAX_UNDERWATER_DOWNWARD_VELOCITY);
        assert_eq!(entity.acceleration.y, UNDERWATER_GRAVITY_MOVING_DOWNWARD);

        entity.velocity.y = -1.0;
        update(&mut player, &mut entity, &layers, &[Button::Left]);
        assert_eq!(entity.acceleration.x, -UNDERWATER_TURN_ACCELERATION);
        assert_eq!(entity.acceleration.y, UNDERWATER_GRAVITY_MOVING_UPWARD);

        // Walking on the pool floor is slower
        let mut walker = Entity::at(336.0, 96.0);
        walker.velocity.x = -2.0;
        update(&mut player, &mut walker, &layers, &[]);
        assert_eq!(walker.velocity.x, -MAX_UNDERWATER_WALKING_SPEED);
        assert_eq!(walker.acceleration.x, UNDERWATER_DECELERATION);
    }

    #[test]
    fn test_walk_reaches_top_speed() {
        let mut world = World::new();
        world.add_layer(course());
        let id = world.add_actor(standing(32.0), Box::new(Player::new()));

        let right = HeldButtons::new(&[Button::Right]);
        for _ in 0..60 {
            world.update(&right);
        }
        let entity = world.entity(id).unwrap();
        assert_eq!(entity.velocity.x, MAX_WALKING_SPEED);
        assert!(entity.x() > 80);
        assert!(world.is_entity_on_ground(entity));
    }

    #[test]
    fn test_jump_leaves_and_returns_to_ground() {
        let mut world = World::new();
        world.add_layer(course());
        let id = world.add_actor(standing(32.0), Box::new(Player::new()));
        let idle = HeldButtons::default();
        let jump = HeldButtons::new(&[Button::A]);

        world.update(&idle);
        world.on_button_press(Button::A);

        let mut highest = world.entity(id).unwrap().y();
        let mut landed_after = None;
        for frame in 0..120 {
            world.update(&jump);
            let entity = world.entity(id).unwrap();
            highest = highest.min(entity.y());
            if frame > 0 && world.is_entity_on_ground(entity) {
                landed_after = Some(frame);
                break;
            }
        }
        assert!(highest < 96 - 32, "peak y {highest}");
        assert!(landed_after.is_some());
        assert_eq!(world.entity(id).unwrap().bottom(), 111);
    }
}
