//! Tengen Chase - tick-exact control core of a console maze-chase game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (game flow, hunting timer, gatekeeper, speeds)
//! - `settings`: Game options chosen before a game starts
//! - `score`: Score accumulator and high score
//! - `error`: Configuration error taxonomy

pub mod error;
pub mod score;
pub mod settings;
pub mod sim;

pub use error::{GameError, GameResult};
pub use score::Score;
pub use settings::{Difficulty, MapCategory, PacBooster, Settings};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second of game time
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Tile edge length in pixels
    pub const TILE_SIZE: f32 = 8.0;
    /// Hardware speed subunits per pixel
    pub const SUBUNITS_PER_PIXEL: f32 = 32.0;

    /// Level numbers run 1..=LAST_LEVEL_NUMBER
    pub const LAST_LEVEL_NUMBER: u32 = 32;
    /// Lowest starting level that allows continuing after game over
    pub const MIN_CONTINUE_START_LEVEL: u32 = 10;
    /// Continue credits after replenishing
    pub const CONTINUE_CREDITS: u32 = 4;

    pub const INITIAL_LIVES: u32 = 3;
    pub const EXTRA_LIFE_SCORE: u32 = 10_000;

    pub const PELLET_POINTS: u32 = 10;
    pub const ENERGIZER_POINTS: u32 = 50;
    /// Points for the first ghost eaten with one energizer; doubles per ghost
    pub const FIRST_GHOST_POINTS: u32 = 200;

    /// Pellets eaten before the first and second bonus appear
    pub const BONUS_PELLET_THRESHOLDS: [u32; 2] = [64, 176];
    /// Ticks the eaten bonus value stays on screen
    pub const BONUS_EATEN_TICKS: u32 = 120;
}

/// Tile containing the given pixel position
#[inline]
pub fn tile_of(pos: Vec2) -> IVec2 {
    (pos / consts::TILE_SIZE).floor().as_ivec2()
}

/// Pixel position of the center of a tile
#[inline]
pub fn tile_center(tile: IVec2) -> Vec2 {
    tile.as_vec2() * consts::TILE_SIZE + Vec2::splat(consts::TILE_SIZE / 2.0)
}

/// Convert hardware subunits to pixels per tick
#[inline]
pub fn subunits(units: i32) -> f32 {
    units as f32 / consts::SUBUNITS_PER_PIXEL
}
