//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One update per frame, velocities in pixels per frame
//! - Whole-pixel collision checks against every layer
//! - Stable iteration order (insertion order of layers and entities)
//! - No rendering or platform dependencies beyond the `DrawSurface` trait

pub mod block;
pub mod collision;
pub mod entity;
pub mod layer;
pub mod player;
pub mod world;

pub use block::{Block, CollisionType};
pub use entity::{Behavior, Entity, EntityId, Inert, Surroundings};
pub use layer::{BlockId, Layer};
pub use player::Player;
pub use world::World;
