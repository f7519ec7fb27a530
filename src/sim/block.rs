//! Terrain tiles
//!
//! A block is a tiled piece of terrain. Its shape (collision type and size)
//! is fixed once placed; its position is stamped by the layer that owns it.


use crate::consts::TILE_SIZE;

/// Collision mask templates for blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionType {
    /// No collisions at all
    #[default]
    None,
    /// Collides only on its top row of pixels, from above
    Platform,
    /// Slope rising to the left, behaves like a platform
    SlopeLeft,
    /// Slope rising to the right, behaves like a platform
    SlopeRight,
    /// Collides on all four sides
    Solid,
    /// Triggers water physics
    Water,
}

/// A tiled piece of terrain
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    collision_type: CollisionType,
    /// Position within the owning layer, in tiles
    pub(crate) position_x: i32,
    pub(crate) position_y: i32,
    /// Size in tiles
    width: i32,
    height: i32,
}

impl Block {
    pub fn new(collision_type: CollisionType) -> Self {
        Self {
            collision_type,
            position_x: 0,
            position_y: 0,
            width: 1,
            height: 1,
        }
    }

    /// Build a multi-tile block
    pub fn with_size(collision_type: CollisionType, width: i32, height: i32) -> Self {
        let mut block = Self::new(collision_type);
        block.set_width(width);
        block.set_height(height);
        block
    }

    pub fn collision_type(&self) -> CollisionType {
        self.collision_type
    }

    /// Width in tiles
    pub fn tile_width(&self) -> i32 {
        self.width
    }

    /// Height in tiles
    pub fn tile_height(&self) -> i32 {
        self.height
    }

    /// Set the width, in tiles. Only meaningful before the block is placed.
    pub fn set_width(&mut self, width: i32) {
        self.width = width.max(1);
    }

    /// Set the height, in tiles. Only meaningful before the block is placed.
    pub fn set_height(&mut self, height: i32) {
        self.height = height.max(1);
    }

    /// Width in pixels
    pub fn width(&self) -> i32 {
        self.width * TILE_SIZE
    }

    /// Height in pixels
    pub fn height(&self) -> i32 {
        self.height * TILE_SIZE
    }

    /// Left edge within the layer, in pixels
    pub fn x(&self) -> i32 {
        self.position_x * TILE_SIZE
    }

    /// Top edge within the layer, in pixels
    pub fn y(&self) -> i32 {
        self.position_y * TILE_SIZE
    }

    pub fn left(&self) -> i32 {
        self.x()
    }

    pub fn right(&self) -> i32 {
        self.x() + self.width() - 1
    }

    pub fn top(&self) -> i32 {
        self.y()
    }

    pub fn bottom(&self) -> i32 {
        self.y() + self.height() - 1
    }

    // Collision predicates take pixel offsets relative to the block's top-left corner.

    pub fn has_left_collision(&self, x: i32, _y: i32) -> bool {
        self.collision_type == CollisionType::Solid && x == 0
    }

    pub fn has_right_collision(&self, x: i32, _y: i32) -> bool {
        self.collision_type == CollisionType::Solid && x == self.width() - 1
    }

    pub fn has_bottom_collision(&self, _x: i32, y: i32) -> bool {
        self.collision_type == CollisionType::Solid && y == self.height() - 1
    }

    pub fn has_top_collision(&self, _x: i32, y: i32) -> bool {
        match self.collision_type {
            CollisionType::Platform | CollisionType::Solid => y == 0,
            _ => false,
        }
    }

    /// Check for the surface pixel of a slope.
    ///
    /// The surface height is sampled at the pixel center, so a 1:1 slope
    /// rises exactly one pixel per column.
    pub fn has_slope_collision(&self, x: i32, y: i32) -> bool {
        let ratio = self.height as f32 / self.width as f32;
        match self.collision_type {
            CollisionType::SlopeLeft => {
                let h = (ratio * (x as f32 + 0.5)).floor() as i32;
                y == h
            }
            CollisionType::SlopeRight => {
                let h = (-ratio * (x as f32 + 0.5) + self.height() as f32).floor() as i32;
                y == h
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placed(collision_type: CollisionType, x: i32, y: i32) -> Block {
        let mut block = Block::new(collision_type);
        block.position_x = x;
        block.position_y = y;
        block
    }

    #[test]
    fn test_geometry_from_tile_position() {
        let block = placed(CollisionType::Solid, 2, 3);
        assert_eq!(block.x(), 32);
        assert_eq!(block.y(), 48);
        assert_eq!(block.left(), 32);
        assert_eq!(block.right(), 47);
        assert_eq!(block.top(), 48);
        assert_eq!(block.bottom(), 63);
        assert_eq!(block.width(), 16);
        assert_eq!(block.height(), 16);
    }

    #[test]
    fn test_solid_edges() {
        let block = Block::new(CollisionType::Solid);
        assert!(block.has_left_collision(0, 7));
        assert!(!block.has_left_collision(1, 7));
        assert!(block.has_right_collision(15, 0));
        assert!(!block.has_right_collision(14, 0));
        assert!(block.has_top_collision(9, 0));
        assert!(!block.has_top_collision(9, 1));
        assert!(block.has_bottom_collision(3, 15));
        assert!(!block.has_bottom_collision(3, 14));
        assert!(!block.has_slope_collision(0, 0));
    }

    #[test]
    fn test_platform_only_has_top() {
        let block = Block::new(CollisionType::Platform);
        assert!(block.has_top_collision(4, 0));
        assert!(!block.has_left_collision(0, 0));
        assert!(!block.has_right_collision(15, 0));
        assert!(!block.has_bottom_collision(0, 15));
    }

    #[test]
    fn test_water_and_none_never_collide() {
        for kind in [CollisionType::Water, CollisionType::None] {
            let block = Block::new(kind);
            for p in 0..16 {
                assert!(!block.has_top_collision(p, 0));
                assert!(!block.has_left_collision(0, p));
                assert!(!block.has_slope_collision(p, p));
            }
        }
    }

    #[test]
    fn test_slope_left_surface() {
        // Rises to the left: surface row equals the column for a 1:1 slope
        let block = Block::new(CollisionType::SlopeLeft);
        for x in 0..16 {
            assert!(block.has_slope_collision(x, x));
            assert!(!block.has_slope_collision(x, x + 1));
        }
    }

    #[test]
    fn test_slope_right_surface() {
        // Mirror image: column 0 is at the bottom row, column 15 at the top row
        let block = Block::new(CollisionType::SlopeRight);
        for x in 0..16 {
            assert!(block.has_slope_collision(x, 15 - x));
        }
        assert!(!block.has_slope_collision(0, 0));
    }

    #[test]
    fn test_shallow_slope_uses_tile_ratio() {
        // Two tiles wide, one tall: rises one pixel every two columns
        let block = Block::with_size(CollisionType::SlopeRight, 2, 1);
        assert!(block.has_slope_collision(0, 15));
        assert!(block.has_slope_collision(1, 15));
        assert!(block.has_slope_collision(2, 14));
        assert!(block.has_slope_collision(31, 0));
    }

    #[test]
    fn test_size_setters_clamp_to_one_tile() {
        let mut block = Block::new(CollisionType::Water);
        block.set_width(4);
        block.set_height(0);
        assert_eq!(block.width(), 64);
        assert_eq!(block.height(), 16);
    }
}
