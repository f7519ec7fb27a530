//! Built-in levels

use crate::sim::{Block, CollisionType, Layer, World};

/// Signature of a function that builds a fresh world
pub type WorldProducer = fn() -> World;

/// A walled corridor with a slope bump, a ledge and a pool
pub fn create_test_level() -> World {
    let mut main_layer = Layer::new(256, 15);
    for x in 0..256 {
        main_layer.add_block(x, 0, Block::new(CollisionType::Solid));
        main_layer.add_block(x, 14, Block::new(CollisionType::Solid));
    }
    for y in 1..14 {
        main_layer.add_block(0, y, Block::new(CollisionType::Solid));
        main_layer.add_block(255, y, Block::new(CollisionType::Solid));
    }
    main_layer.add_block(5, 13, Block::new(CollisionType::SlopeRight));
    main_layer.add_block(6, 13, Block::new(CollisionType::SlopeLeft));
    main_layer.add_block(9, 10, Block::new(CollisionType::Solid));
    main_layer.add_block(15, 10, Block::with_size(CollisionType::Water, 4, 4));

    let mut world = World::new();
    world.add_layer(main_layer);
    log::info!(
        "Built test level: {} layer(s), {} block(s)",
        world.layers().len(),
        world.layers().iter().map(|l| l.blocks().len()).sum::<usize>()
    );
    world
}
