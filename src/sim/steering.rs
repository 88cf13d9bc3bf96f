//! Direction choice at tile centers
//!
//! Ghosts pick the neighbour tile closest to a target tile and never reverse
//! on their own; Pac follows input, or the autopilot in demo levels.

use glam::IVec2;
use rand::Rng;

use super::actors::{Direction, Ghost, Pac, Personality};
use super::hunting::HuntingPhase;
use super::world::GridWorld;

/// Best non-reversing direction toward `target`, ties broken in
/// `Direction::ALL` order. Reverses only in a dead end.
pub fn direction_towards(
    tile: IVec2,
    current: Direction,
    target: IVec2,
    passable: impl Fn(IVec2) -> bool,
) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|&dir| dir != current.opposite())
        .filter(|&dir| passable(tile + dir.vector()))
        .min_by_key(|&dir| (tile + dir.vector()).distance_squared(target))
        .or_else(|| Some(current.opposite()).filter(|&dir| passable(tile + dir.vector())))
}

/// Random non-reversing direction (frightened ghosts)
pub fn random_direction(
    tile: IVec2,
    current: Direction,
    rng: &mut impl Rng,
    passable: impl Fn(IVec2) -> bool,
) -> Option<Direction> {
    let options: Vec<Direction> = Direction::ALL
        .into_iter()
        .filter(|&dir| dir != current.opposite())
        .filter(|&dir| passable(tile + dir.vector()))
        .collect();
    if options.is_empty() {
        return Some(current.opposite());
    }
    Some(options[rng.random_range(0..options.len())])
}

/// Scatter corner of a ghost, just outside the maze
pub fn scatter_tile(world: &GridWorld, personality: Personality) -> IVec2 {
    let (w, h) = (world.width(), world.height());
    match personality {
        Personality::Red => IVec2::new(w - 3, -3),
        Personality::Pink => IVec2::new(2, -3),
        Personality::Cyan => IVec2::new(w - 1, h),
        Personality::Orange => IVec2::new(0, h),
    }
}

/// Target tile while chasing
pub fn chase_tile(ghost: &Ghost, pac: &Pac, red_tile: IVec2, world: &GridWorld) -> IVec2 {
    let pac_tile = pac.tile();
    let ahead = pac.dir.vector();
    match ghost.personality {
        Personality::Red => pac_tile,
        Personality::Pink => pac_tile + ahead * 4,
        Personality::Cyan => (pac_tile + ahead * 2) * 2 - red_tile,
        Personality::Orange => {
            if ghost.tile().distance_squared(pac_tile) > 64 {
                pac_tile
            } else {
                scatter_tile(world, Personality::Orange)
            }
        }
    }
}

/// Target tile of a hunting ghost in the given phase
pub fn hunting_target(
    ghost: &Ghost,
    phase: HuntingPhase,
    pac: &Pac,
    red_tile: IVec2,
    world: &GridWorld,
) -> IVec2 {
    match phase {
        HuntingPhase::Scatter => scatter_tile(world, ghost.personality),
        HuntingPhase::Chase => chase_tile(ghost, pac, red_tile, world),
    }
}

/// Steers Pac through unattended levels: head for adjacent food, otherwise
/// keep going, otherwise take the first open turn.
#[derive(Debug, Clone, Default)]
pub struct Autopilot;

impl Autopilot {
    pub fn wish_direction(&self, pac: &Pac, world: &GridWorld) -> Option<Direction> {
        let tile = pac.tile();
        let open = |dir: Direction| world.is_open(tile + dir.vector());
        let forward = Direction::ALL
            .into_iter()
            .filter(|&dir| dir != pac.dir.opposite() && open(dir));

        if let Some(dir) = forward
            .clone()
            .find(|&dir| world.food_at(tile + dir.vector()).is_some())
        {
            return Some(dir);
        }
        if open(pac.dir) {
            return Some(pac.dir);
        }
        forward.chain(std::iter::once(pac.dir.opposite())).find(|&dir| open(dir))
    }
}
