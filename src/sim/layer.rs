//! Block grids
//!
//! A layer is a fixed-size grid of blocks with its own position and velocity.
//! Blocks live in an index-stable arena owned by the layer; grid cells refer
//! to them by index, so a block spanning several cells is stored once.

use glam::Vec2;

use super::block::Block;
use crate::consts::TILE_SIZE;

/// Index of a block inside its layer's arena
pub type BlockId = usize;

/// A positioned, independently moving grid of blocks
#[derive(Debug, Clone)]
pub struct Layer {
    /// Width in tiles
    width: i32,
    /// Height in tiles
    height: i32,
    /// Pixel offset of the grid origin
    pub(crate) position: Vec2,
    /// Pixels per frame
    pub(crate) velocity: Vec2,
    blocks: Vec<Block>,
    cells: Vec<Option<BlockId>>,
}

impl Layer {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            blocks: Vec::new(),
            cells: vec![None; (width * height) as usize],
        }
    }

    /// Width in tiles
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in tiles
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Place a block with its top-left tile at `(x, y)`.
    ///
    /// Footprint cells outside the grid are dropped; the rest are still occupied.
    pub fn add_block(&mut self, x: i32, y: i32, mut block: Block) -> BlockId {
        block.position_x = x;
        block.position_y = y;

        let id = self.blocks.len();
        let mut clipped = 0;
        for y_index in 0..block.tile_height() {
            for x_index in 0..block.tile_width() {
                match self.cell_index(x + x_index, y + y_index) {
                    Some(cell) => self.cells[cell] = Some(id),
                    None => clipped += 1,
                }
            }
        }
        if clipped > 0 {
            log::trace!("Block at ({}, {}) clipped {} cells outside the layer", x, y, clipped);
        }

        self.blocks.push(block);
        id
    }

    fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    /// Block occupying a tile, or `None` outside the grid
    pub fn block(&self, x: i32, y: i32) -> Option<&Block> {
        self.block_id(x, y).map(|id| &self.blocks[id])
    }

    /// Arena index of the block occupying a tile
    pub fn block_id(&self, x: i32, y: i32) -> Option<BlockId> {
        self.cell_index(x, y).and_then(|cell| self.cells[cell])
    }

    /// Block under a world pixel, taking the layer's position into account.
    ///
    /// Points above or left of the layer origin have no block.
    pub fn block_at(&self, x: i32, y: i32) -> Option<&Block> {
        self.block_id_at(x, y).map(|id| &self.blocks[id])
    }

    /// Arena index of the block under a world pixel
    pub fn block_id_at(&self, x: i32, y: i32) -> Option<BlockId> {
        let x = x - self.x();
        let y = y - self.y();
        if x < 0 || y < 0 {
            return None;
        }
        self.block_id(x / TILE_SIZE, y / TILE_SIZE)
    }

    /// Block by arena index
    pub fn block_by_id(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id)
    }

    /// All blocks owned by the layer, in insertion order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// X position of the grid origin, in whole pixels
    pub fn x(&self) -> i32 {
        self.position.x.floor() as i32
    }

    /// Y position of the grid origin, in whole pixels
    pub fn y(&self) -> i32 {
        self.position.y.floor() as i32
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
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

    /// Find the block under a world pixel and the pixel in that block's frame
    fn local_block(&self, x: i32, y: i32) -> Option<(&Block, i32, i32)> {
        let block = self.block_at(x, y)?;
        // World -> layer -> block coordinates
        let local_x = x - self.x() - block.x();
        let local_y = y - self.y() - block.y();
        Some((block, local_x, local_y))
    }

    pub fn has_bottom_collision(&self, x: i32, y: i32) -> bool {
        self.local_block(x, y)
            .is_some_and(|(block, bx, by)| block.has_bottom_collision(bx, by))
    }

    pub fn has_left_collision(&self, x: i32, y: i32) -> bool {
        self.local_block(x, y)
            .is_some_and(|(block, bx, by)| block.has_left_collision(bx, by))
    }

    pub fn has_right_collision(&self, x: i32, y: i32) -> bool {
        self.local_block(x, y)
            .is_some_and(|(block, bx, by)| block.has_right_collision(bx, by))
    }

    pub fn has_slope_collision(&self, x: i32, y: i32) -> bool {
        self.local_block(x, y)
            .is_some_and(|(block, bx, by)| block.has_slope_collision(bx, by))
    }

    pub fn has_top_collision(&self, x: i32, y: i32) -> bool {
        self.local_block(x, y)
            .is_some_and(|(block, bx, by)| block.has_top_collision(bx, by))
    }
}
