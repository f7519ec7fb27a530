//! The world: layers, entities and the per-frame update

use std::collections::BTreeSet;

use super::block::CollisionType;
use super::collision;
use super::entity::{Behavior, Entity, EntityId, Inert, Surroundings};
use super::layer::Layer;
use crate::consts::TILE_SIZE;
use crate::input::{Button, ButtonState, InputListener};
use crate::renderer::DrawSurface;
use crate::renderer::vertex::colors;

/// A playable level
///
/// Layers and entities are kept in insertion order, which is also update and
/// draw order. Each entity is paired with the behavior that drives it.
#[derive(Default)]
pub struct World {
    layers: Vec<Layer>,
    entities: Vec<Entity>,
    behaviors: Vec<Box<dyn Behavior>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_layer(&mut self, layer: Layer) -> usize {
        self.layers.push(layer);
        self.layers.len() - 1
    }

    /// Attach an entity that only obeys physics
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        self.add_actor(entity, Box::new(Inert))
    }

    /// Attach an entity with the behavior that drives it
    pub fn add_actor(&mut self, mut entity: Entity, behavior: Box<dyn Behavior>) -> EntityId {
        let id = EntityId(self.entities.len());
        entity.id = Some(id);
        self.entities.push(entity);
        self.behaviors.push(behavior);
        id
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0)
    }

    pub fn can_entity_move_down(&self, entity: &Entity) -> bool {
        collision::can_entity_move_down(&self.layers, entity)
    }

    pub fn can_entity_move_left(&self, entity: &Entity) -> bool {
        collision::can_entity_move_left(&self.layers, entity)
    }

    pub fn can_entity_move_right(&self, entity: &Entity) -> bool {
        collision::can_entity_move_right(&self.layers, entity)
    }

    pub fn can_entity_move_up(&self, entity: &Entity) -> bool {
        collision::can_entity_move_up(&self.layers, entity)
    }

    pub fn is_entity_on_ground(&self, entity: &Entity) -> bool {
        collision::is_entity_on_ground(&self.layers, entity)
    }

    /// Is the entity's center pixel inside water?
    pub fn is_entity_underwater(&self, entity: &Entity) -> bool {
        self.is_underwater_at(entity.center_x(), entity.center_y())
    }

    pub fn is_underwater_at(&self, x: i32, y: i32) -> bool {
        collision::is_underwater_at(&self.layers, x, y)
    }

    /// Step one layer a single pixel, carrying and pushing entities. Unknown layers are ignored.
    pub fn move_layer_left(&mut self, index: usize) {
        if index < self.layers.len() {
            collision::move_layer_left(&mut self.layers, index, &mut self.entities);
        }
    }

    pub fn move_layer_right(&mut self, index: usize) {
        if index < self.layers.len() {
            collision::move_layer_right(&mut self.layers, index, &mut self.entities);
        }
    }

    pub fn move_layer_up(&mut self, index: usize) {
        if index < self.layers.len() {
            collision::move_layer_up(&mut self.layers, index, &mut self.entities);
        }
    }

    pub fn move_layer_down(&mut self, index: usize) {
        if index < self.layers.len() {
            collision::move_layer_down(&mut self.layers, index, &mut self.entities);
        }
    }

    /// Advance one frame: every layer moves, then every entity moves and runs its behavior
    pub fn update(&mut self, input: &dyn ButtonState) {
        for index in 0..self.layers.len() {
            collision::update_layer_motion_x(&mut self.layers, index, &mut self.entities);
            collision::update_layer_motion_y(&mut self.layers, index, &mut self.entities);
        }

        let surroundings = Surroundings {
            layers: &self.layers,
            input,
        };
        for (entity, behavior) in self.entities.iter_mut().zip(self.behaviors.iter_mut()) {
            collision::update_entity_motion(surroundings.layers, entity);
            behavior.on_update(entity, &surroundings);
        }
    }

    /// Draw the part of the world inside the camera rectangle.
    ///
    /// Block outlines are offset by the camera; entities are drawn at their
    /// world position.
    pub fn render(
        &self,
        surface: &mut dyn DrawSurface,
        left: i32,
        right: i32,
        top: i32,
        bottom: i32,
    ) {
        for layer in &self.layers {
            let mut visible = BTreeSet::new();
            for x in (left..right + TILE_SIZE).step_by(TILE_SIZE as usize) {
                for y in (top..bottom + TILE_SIZE).step_by(TILE_SIZE as usize) {
                    if let Some(id) = layer.block_id_at(x, y) {
                        visible.insert(id);
                    }
                }
            }

            let x_offset = layer.x() - left;
            let y_offset = layer.y() - top;
            for block in visible.into_iter().filter_map(|id| layer.block_by_id(id)) {
                surface.set_color(colors::TERRAIN);
                let (l, r) = (block.left() + x_offset, block.right() + 1 + x_offset);
                let (t, b) = (block.top() + y_offset, block.bottom() + 1 + y_offset);
                match block.collision_type() {
                    CollisionType::SlopeLeft => surface.draw_line(r, b, l, t),
                    CollisionType::SlopeRight => surface.draw_line(l, b, r, t),
                    CollisionType::Solid => {
                        surface.draw_rectangle(l, t, block.width(), block.height())
                    }
                    CollisionType::Platform => surface.draw_line(l, t, r, t),
                    CollisionType::Water => {
                        surface.set_color(colors::WATER);
                        surface.draw_rectangle(l, t, block.width(), block.height());
                    }
                    CollisionType::None => {}
                }
            }
        }

        surface.set_color(colors::ENTITY);
        for entity in &self.entities {
            surface.draw_rectangle(entity.x(), entity.y(), entity.width, entity.height);
        }
    }
}

impl InputListener for World {
    fn on_button_press(&mut self, button: Button) {
        for (entity, behavior) in self.entities.iter_mut().zip(self.behaviors.iter_mut()) {
            behavior.on_button_press(entity, &self.layers, button);
        }
    }
}
