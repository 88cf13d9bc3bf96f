//! Speed model
//!
//! Pure lookups reproducing the cartridge's speed tables. Values are kept in
//! hardware subunits and converted once with [`subunits`]: 32 subunits are one
//! pixel per tick.

use super::actors::Personality;
use crate::settings::{Difficulty, PacBooster};
use crate::subunits;

/// Fixed ghost speed in tunnel tiles (pixels per tick)
pub const TUNNEL_SPEED: f32 = 0.4;
/// Ghost speed inside the house
pub const HOUSE_SPEED: f32 = 0.5;
/// Eyes travelling back to the house
pub const RETURNING_SPEED: f32 = 2.0;
/// Added to Pac's speed while the booster is effective
pub const BOOSTER_DELTA: f32 = 0.5;
/// Pac's speed while powered, relative to normal
pub const POWER_FACTOR: f32 = 1.1;
/// Frightened ghost speed, relative to attack speed
pub const FRIGHTENED_FACTOR: f32 = 0.5;
/// Bonus speed, relative to Pac's normal speed
pub const BONUS_FACTOR: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Pac,
    Ghost,
}

/// Snapshot of everything a speed query depends on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorSpeedInputs {
    pub level: u32,
    pub difficulty: Difficulty,
    pub booster: PacBooster,
    /// Booster button currently held
    pub booster_active: bool,
    pub personality: Personality,
    pub food_remaining: u32,
    pub in_tunnel: bool,
}

fn assert_level(level: u32) {
    assert!(level >= 1, "level numbers start at 1, got {level}");
}

fn base_player_units(level: u32) -> i32 {
    assert_level(level);
    match level {
        1..=4 => 0x20,
        5..=12 => 0x24,
        13..=16 => 0x28,
        17..=20 => 0x27,
        21..=24 => 0x26,
        25..=28 => 0x25,
        _ => 0x24,
    }
}

fn base_ghost_units(level: u32) -> i32 {
    assert_level(level);
    match level {
        1..=4 => 0x18,
        5..=12 => 0x19 + (level as i32 - 5),
        _ => 0x21,
    }
}

pub fn base_player_speed(level: u32) -> f32 {
    subunits(base_player_units(level))
}

pub fn base_ghost_speed(level: u32) -> f32 {
    subunits(base_ghost_units(level))
}

pub fn difficulty_delta(kind: ActorKind, difficulty: Difficulty) -> f32 {
    let units = match (kind, difficulty) {
        (ActorKind::Pac, Difficulty::Easy) => -4,
        (ActorKind::Pac, Difficulty::Normal) => 0,
        (ActorKind::Pac, Difficulty::Hard) => 12,
        (ActorKind::Pac, Difficulty::Crazy) => 24,
        (ActorKind::Ghost, Difficulty::Easy) => -8,
        (ActorKind::Ghost, Difficulty::Normal) => 0,
        (ActorKind::Ghost, Difficulty::Hard) => 16,
        (ActorKind::Ghost, Difficulty::Crazy) => 32,
    };
    subunits(units)
}

pub fn personality_delta(personality: Personality) -> f32 {
    let units = match personality {
        Personality::Red => 3,
        Personality::Orange => 2,
        Personality::Cyan => 1,
        Personality::Pink => 0,
    };
    subunits(units)
}

/// Ghosts speed up when little food is left, on Normal from level 5 on
pub fn food_remaining_bonus(level: u32, difficulty: Difficulty, food_remaining: u32) -> f32 {
    assert_level(level);
    if difficulty != Difficulty::Normal || level < 5 {
        return 0.0;
    }
    let units = match food_remaining {
        0..=7 => 5,
        8..=15 => 4,
        16..=23 => 3,
        24..=31 => 2,
        _ => 0,
    };
    subunits(units)
}

pub fn booster_delta() -> f32 {
    BOOSTER_DELTA
}

pub fn player_attack_speed(inputs: &ActorSpeedInputs) -> f32 {
    let mut speed =
        base_player_speed(inputs.level) + difficulty_delta(ActorKind::Pac, inputs.difficulty);
    if inputs.booster.is_effective(inputs.booster_active) {
        speed += booster_delta();
    }
    speed
}

pub fn player_power_speed(inputs: &ActorSpeedInputs) -> f32 {
    POWER_FACTOR * player_attack_speed(inputs)
}

pub fn pursuer_attack_speed(inputs: &ActorSpeedInputs) -> f32 {
    if inputs.in_tunnel {
        return TUNNEL_SPEED;
    }
    base_ghost_speed(inputs.level)
        + difficulty_delta(ActorKind::Ghost, inputs.difficulty)
        + personality_delta(inputs.personality)
        + food_remaining_bonus(inputs.level, inputs.difficulty, inputs.food_remaining)
}

pub fn pursuer_frightened_speed(inputs: &ActorSpeedInputs) -> f32 {
    FRIGHTENED_FACTOR * pursuer_attack_speed(inputs)
}

pub fn pursuer_house_speed() -> f32 {
    HOUSE_SPEED
}

pub fn pursuer_returning_speed() -> f32 {
    RETURNING_SPEED
}

pub fn bonus_item_speed(inputs: &ActorSpeedInputs) -> f32 {
    BONUS_FACTOR * player_attack_speed(inputs)
}
