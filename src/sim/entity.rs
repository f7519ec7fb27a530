//! Moving actors
//!
//! An entity is a bounding box with sub-pixel position, velocity and
//! acceleration. Collision math always runs on whole pixels: the integer
//! coordinates are the floor of the floating-point position.
//!
//! Per-entity logic (e.g. the player controller) plugs in through the
//! [`Behavior`] trait, which receives the entity body and a read-only view of
//! the world's terrain (and, once per frame, the polled input).

use glam::Vec2;

use super::layer::Layer;
use crate::consts::TILE_SIZE;
use crate::input::{Button, ButtonState};

/// Handle to an entity slot inside its owning world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A dynamic, moving object in a world
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Slot in the owning world (set when attached)
    pub(crate) id: Option<EntityId>,
    /// Bounding box width, in pixels
    pub width: i32,
    /// Bounding box height, in pixels
    pub height: i32,
    /// Pixels
    pub position: Vec2,
    /// Pixels per frame
    pub velocity: Vec2,
    /// Pixels per frame per frame
    pub acceleration: Vec2,
}

impl Default for Entity {
    fn default() -> Self {
        Self {
            id: None,
            width: TILE_SIZE,
            height: TILE_SIZE,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
        }
    }
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a one-tile entity at a pixel position
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Default::default()
        }
    }

    /// Create an entity with a custom bounding box
    pub fn with_size(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Handle of the world slot this entity is attached to
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    /// Whole-pixel x position
    pub fn x(&self) -> i32 {
        self.position.x.floor() as i32
    }

    /// Whole-pixel y position
    pub fn y(&self) -> i32 {
        self.position.y.floor() as i32
    }

    pub fn left(&self) -> i32 {
        self.x()
    }

    pub fn right(&self) -> i32 {
        self.x() + self.width - 1
    }

    pub fn top(&self) -> i32 {
        self.y()
    }

    pub fn bottom(&self) -> i32 {
        self.y() + self.height - 1
    }

    pub fn center_x(&self) -> i32 {
        self.x() + self.width / 2
    }

    pub fn center_y(&self) -> i32 {
        self.y() + self.height / 2
    }

    pub fn set_x(&mut self, x: f32) {
        self.position.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.position.y = y;
    }

    pub fn set_velocity_x(&mut self, vx: f32) {
        self.velocity.x = vx;
    }

    pub fn set_velocity_y(&mut self, vy: f32) {
        self.velocity.y = vy;
    }

    pub fn set_acceleration_x(&mut self, ax: f32) {
        self.acceleration.x = ax;
    }

    pub fn set_acceleration_y(&mut self, ay: f32) {
        self.acceleration.y = ay;
    }
}

/// What an entity's behavior can see while it runs
pub struct Surroundings<'a> {
    pub layers: &'a [Layer],
    pub input: &'a dyn ButtonState,
}

impl Surroundings<'_> {
    /// Is the entity standing on any layer?
    pub fn is_on_ground(&self, entity: &Entity) -> bool {
        super::collision::is_entity_on_ground(self.layers, entity)
    }

    /// Is the entity's center underwater?
    pub fn is_underwater(&self, entity: &Entity) -> bool {
        self.is_underwater_at(entity.center_x(), entity.center_y())
    }

    pub fn is_underwater_at(&self, x: i32, y: i32) -> bool {
        super::collision::is_underwater_at(self.layers, x, y)
    }

    pub fn is_button_pressed(&self, button: Button) -> bool {
        self.input.is_button_pressed(button)
    }
}

/// Per-entity logic hooks
pub trait Behavior {
    /// Called once per frame, after the entity's motion has been integrated
    fn on_update(&mut self, _entity: &mut Entity, _surroundings: &Surroundings<'_>) {}

    /// Called synchronously when a button goes from released to pressed,
    /// before the frame's physics update
    fn on_button_press(&mut self, _entity: &mut Entity, _layers: &[Layer], _button: Button) {}
}

/// Behavior of an entity that only obeys physics
#[derive(Debug, Clone, Copy, Default)]
pub struct Inert;

impl Behavior for Inert {}
