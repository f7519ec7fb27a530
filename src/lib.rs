//! Jump - A tile-based platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (blocks, layers, entities, collision, player)
//! - `input`: Logical buttons, polled state and press notifications
//! - `renderer`: Drawing surface contract and WebGPU pipeline
//! - `game`: Game state stack and frame driver
//! - `levels`: World producers
//! - `settings`: Persisted configuration

pub mod game;
pub mod input;
pub mod levels;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Size of a tile unit, in pixels
    pub const TILE_SIZE: i32 = 16;

    /// Virtual screen resolution (everything is drawn in these units)
    pub const SCREEN_WIDTH: i32 = 320;
    pub const SCREEN_HEIGHT: i32 = 240;

    /// Physics runs once per video frame
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum frames simulated per animation callback to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
}

/// Convert a hex tuning value of the form `0xABCD` to pixels.
///
/// - `A` is whole tiles
/// - `B` is whole pixels
/// - `C` is 1/16 pixels
/// - `D` is 1/256 pixels
pub const fn physics_value_from_hex(value: u16) -> f32 {
    16.0 * ((value & 0xf000) >> 12) as f32
        + ((value & 0x0f00) >> 8) as f32
        + 0.0625 * ((value & 0x00f0) >> 4) as f32
        + 0.003_906_25 * (value & 0x000f) as f32
}

/// Sign of a number, treating zero as positive
#[inline]
pub fn sgn(value: f32) -> i32 {
    if value >= 0.0 { 1 } else { -1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_value_nibbles() {
        assert_eq!(physics_value_from_hex(0x1000), 16.0);
        assert_eq!(physics_value_from_hex(0x0100), 1.0);
        assert_eq!(physics_value_from_hex(0x0010), 0.0625);
        assert_eq!(physics_value_from_hex(0x0001), 0.003_906_25);
        // Walking speed: one and a half pixels per frame
        assert_eq!(physics_value_from_hex(0x0180), 1.5);
        assert_eq!(physics_value_from_hex(0x03b0), 3.6875);
    }

    #[test]
    fn test_sgn_zero_is_positive() {
        assert_eq!(sgn(0.0), 1);
        assert_eq!(sgn(-0.0), 1);
        assert_eq!(sgn(2.5), 1);
        assert_eq!(sgn(-0.01), -1);
    }
}
