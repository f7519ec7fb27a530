//! Pixel-stepped collision detection and response
//!
//! The tricky part of Jump: entities and layers never move more than one whole
//! pixel at a time, and every whole-pixel step is checked against the edge
//! predicates of every layer. Sub-pixel remainders are applied directly unless
//! they would cross into the next pixel, in which case the crossing is checked
//! like a full step.
//!
//! These are free functions over a layer slice so that the world can hand out
//! disjoint borrows of its layers and entities.

use super::block::CollisionType;
use super::entity::Entity;
use super::layer::Layer;

/// Is the fractional step `delta` going to cross into the neighbouring pixel?
#[inline]
fn crosses_pixel(position: f32, delta: f32) -> bool {
    (position + delta).floor() == (position + delta.signum()).floor()
}

pub fn can_entity_move_down(layers: &[Layer], entity: &Entity) -> bool {
    let below = entity.bottom() + 1;
    !layers.iter().any(|layer| {
        layer.has_slope_collision(entity.center_x(), below)
            || (0..entity.width).any(|x| layer.has_top_collision(entity.left() + x, below))
    })
}

pub fn can_entity_move_left(layers: &[Layer], entity: &Entity) -> bool {
    !layers.iter().any(|layer| {
        (0..entity.height).any(|y| layer.has_right_collision(entity.left() - 1, entity.top() + y))
    })
}

pub fn can_entity_move_right(layers: &[Layer], entity: &Entity) -> bool {
    !layers.iter().any(|layer| {
        (0..entity.height).any(|y| layer.has_left_collision(entity.right() + 1, entity.top() + y))
    })
}

pub fn can_entity_move_up(layers: &[Layer], entity: &Entity) -> bool {
    !layers.iter().any(|layer| {
        (0..entity.width).any(|x| layer.has_bottom_collision(entity.left() + x, entity.top() - 1))
    })
}

/// Is the entity supported by this layer (flat top or slope surface)?
pub fn is_entity_standing_on_layer(layer: &Layer, entity: &Entity) -> bool {
    let below = entity.bottom() + 1;
    layer.has_slope_collision(entity.center_x(), below)
        || (0..entity.width).any(|x| layer.has_top_collision(entity.left() + x, below))
}

pub fn is_entity_on_ground(layers: &[Layer], entity: &Entity) -> bool {
    layers.iter().any(|layer| is_entity_standing_on_layer(layer, entity))
}

pub fn is_underwater_at(layers: &[Layer], x: i32, y: i32) -> bool {
    layers.iter().any(|layer| {
        layer
            .block_at(x, y)
            .is_some_and(|block| block.collision_type() == CollisionType::Water)
    })
}

/// Step one pixel down if nothing is in the way
pub fn move_entity_down(layers: &[Layer], entity: &mut Entity) -> bool {
    if can_entity_move_down(layers, entity) {
        move_entity_y(entity, 1.0);
        return true;
    }
    false
}

/// Step one pixel left if nothing is in the way
pub fn move_entity_left(layers: &[Layer], entity: &mut Entity) -> bool {
    if can_entity_move_left(layers, entity) {
        move_entity_x(layers, entity, -1.0);
        return true;
    }
    false
}

/// Step one pixel right if nothing is in the way
pub fn move_entity_right(layers: &[Layer], entity: &mut Entity) -> bool {
    if can_entity_move_right(layers, entity) {
        move_entity_x(layers, entity, 1.0);
        return true;
    }
    false
}

/// Step one pixel up if nothing is in the way
pub fn move_entity_up(layers: &[Layer], entity: &mut Entity) -> bool {
    if can_entity_move_up(layers, entity) {
        move_entity_y(entity, -1.0);
        return true;
    }
    false
}

/// Unchecked horizontal move that follows slopes the entity is standing on.
///
/// Walking into a rising slope lifts the entity (if there is headroom);
/// walking onto a falling slope sinks it by one pixel unconditionally.
pub fn move_entity_x(layers: &[Layer], entity: &mut Entity, dx: f32) {
    let new_center_x = if dx > 0.0 {
        entity.center_x() + 1
    } else {
        entity.center_x() - 1
    };

    for layer in layers {
        if !is_entity_standing_on_layer(layer, entity) {
            continue;
        }

        // Uphill
        if layer.has_slope_collision(new_center_x, entity.bottom()) {
            entity.position.x += dx;
            move_entity_up(layers, entity);
            return;
        }

        // Downhill: forced sink
        if layer.has_slope_collision(new_center_x, entity.bottom() + 2) {
            entity.position.x += dx;
            move_entity_y(entity, 1.0);
            return;
        }
    }

    entity.position.x += dx;
}

/// Unchecked vertical move
#[inline]
pub fn move_entity_y(entity: &mut Entity, dy: f32) {
    entity.position.y += dy;
}

/// Consume the horizontal velocity one pixel at a time
pub fn update_entity_motion_x(layers: &[Layer], entity: &mut Entity) {
    let mut dx = entity.velocity.x;

    while dx >= 1.0 {
        if !move_entity_right(layers, entity) {
            entity.velocity.x = 0.0;
            return;
        }
        dx -= 1.0;
    }
    while dx <= -1.0 {
        if !move_entity_left(layers, entity) {
            entity.velocity.x = 0.0;
            return;
        }
        dx += 1.0;
    }

    if dx == 0.0 {
        return;
    }
    if !crosses_pixel(entity.position.x, dx) {
        entity.position.x += dx;
        return;
    }
    let clear = if dx > 0.0 {
        can_entity_move_right(layers, entity)
    } else {
        can_entity_move_left(layers, entity)
    };
    if clear {
        move_entity_x(layers, entity, dx);
    } else {
        entity.velocity.x = 0.0;
    }
}

/// Consume the vertical velocity one pixel at a time
pub fn update_entity_motion_y(layers: &[Layer], entity: &mut Entity) {
    let mut dy = entity.velocity.y;

    while dy >= 1.0 {
        if !move_entity_down(layers, entity) {
            entity.velocity.y = 0.0;
            return;
        }
        dy -= 1.0;
    }
    while dy <= -1.0 {
        if !move_entity_up(layers, entity) {
            entity.velocity.y = 0.0;
            return;
        }
        dy += 1.0;
    }

    if dy == 0.0 {
        return;
    }
    if !crosses_pixel(entity.position.y, dy) {
        entity.position.y += dy;
        return;
    }
    let clear = if dy > 0.0 {
        can_entity_move_down(layers, entity)
    } else {
        can_entity_move_up(layers, entity)
    };
    if clear {
        move_entity_y(entity, dy);
    } else {
        entity.velocity.y = 0.0;
    }
}

/// Apply acceleration and integrate both axes, X first
pub fn update_entity_motion(layers: &[Layer], entity: &mut Entity) {
    entity.velocity.x += entity.acceleration.x;
    update_entity_motion_x(layers, entity);
    entity.velocity.y += entity.acceleration.y;
    update_entity_motion_y(layers, entity);
}

/// Lift any entity whose bottom row has been shoved into a slope of this layer
fn settle_onto_slopes(layers: &[Layer], index: usize, entities: &mut [Entity]) {
    let layer = &layers[index];
    for entity in entities.iter_mut() {
        if layer.has_slope_collision(entity.center_x(), entity.bottom()) {
            move_entity_up(layers, entity);
        }
    }
}

/// Shift a layer one pixel left, carrying riders and pushing whatever its leading edge meets
pub fn move_layer_left(layers: &mut [Layer], index: usize, entities: &mut [Entity]) {
    {
        let all: &[Layer] = layers;
        let layer = &all[index];
        for entity in entities.iter_mut() {
            if is_entity_standing_on_layer(layer, entity) {
                if can_entity_move_left(all, entity) {
                    entity.position.x -= 1.0;
                }
                continue;
            }
            let touching = (0..entity.height)
                .any(|y| layer.has_left_collision(entity.right() + 1, entity.top() + y));
            if touching {
                move_entity_left(all, entity);
            }
        }
    }
    layers[index].position.x -= 1.0;
    settle_onto_slopes(layers, index, entities);
}

/// Shift a layer one pixel right, carrying riders and pushing whatever its leading edge meets
pub fn move_layer_right(layers: &mut [Layer], index: usize, entities: &mut [Entity]) {
    {
        let all: &[Layer] = layers;
        let layer = &all[index];
        for entity in entities.iter_mut() {
            if is_entity_standing_on_layer(layer, entity) {
                if can_entity_move_right(all, entity) {
                    entity.position.x += 1.0;
                }
                continue;
            }
            let touching = (0..entity.height)
                .any(|y| layer.has_right_collision(entity.left() - 1, entity.top() + y));
            if touching {
                move_entity_right(all, entity);
            }
        }
    }
    layers[index].position.x += 1.0;
    settle_onto_slopes(layers, index, entities);
}

/// Shift a layer one pixel up, lifting its riders
pub fn move_layer_up(layers: &mut [Layer], index: usize, entities: &mut [Entity]) {
    {
        let all: &[Layer] = layers;
        for entity in entities.iter_mut() {
            if is_entity_standing_on_layer(&all[index], entity) {
                move_entity_up(all, entity);
            }
        }
    }
    layers[index].position.y -= 1.0;
}

/// Shift a layer one pixel down, lowering its riders and pushing whatever is beneath it
pub fn move_layer_down(layers: &mut [Layer], index: usize, entities: &mut [Entity]) {
    for entity in entities.iter_mut() {
        if is_entity_standing_on_layer(&layers[index], entity) {
            // Get the layer out of the rider's way for the checked step
            let saved_y = layers[index].position.y;
            layers[index].position.y += 1.0;
            move_entity_down(layers, entity);
            layers[index].position.y = saved_y;
            continue;
        }
        let layer = &layers[index];
        let touching = (0..entity.width)
            .any(|x| layer.has_bottom_collision(entity.left() + x, entity.top() - 1));
        if touching {
            move_entity_down(layers, entity);
        }
    }
    layers[index].position.y += 1.0;
}

/// Consume a layer's horizontal velocity one pixel at a time
pub fn update_layer_motion_x(layers: &mut [Layer], index: usize, entities: &mut [Entity]) {
    let mut dx = layers[index].velocity.x;

    while dx >= 1.0 {
        move_layer_right(layers, index, entities);
        dx -= 1.0;
    }
    while dx <= -1.0 {
        move_layer_left(layers, index, entities);
        dx += 1.0;
    }

    if dx == 0.0 {
        return;
    }
    if crosses_pixel(layers[index].position.x, dx) {
        // Run the whole-pixel side effects, then take the pixel back before the fraction
        if dx > 0.0 {
            move_layer_right(layers, index, entities);
            layers[index].position.x -= 1.0;
        } else {
            move_layer_left(layers, index, entities);
            layers[index].position.x += 1.0;
        }
    }
    layers[index].position.x += dx;
}

/// Consume a layer's vertical velocity one pixel at a time
pub fn update_layer_motion_y(layers: &mut [Layer], index: usize, entities: &mut [Entity]) {
    let mut dy = layers[index].velocity.y;

    while dy >= 1.0 {
        move_layer_down(layers, index, entities);
        dy -= 1.0;
    }
    while dy <= -1.0 {
        move_layer_up(layers, index, entities);
        dy += 1.0;
    }

    if dy == 0.0 {
        return;
    }
    if crosses_pixel(layers[index].position.y, dy) {
        if dy > 0.0 {
            move_layer_down(layers, index, entities);
            layers[index].position.y -= 1.0;
        } else {
            move_layer_up(layers, index, entities);
            layers[index].position.y += 1.0;
        }
    }
    layers[index].position.y += dy;
}
