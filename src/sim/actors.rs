//! Actors: Pac, the four ghosts and the moving bonus
//!
//! Positions are in pixels. Actors travel from tile center to tile center
//! and only change direction at a center (reversing is allowed anywhere).

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::world::GridWorld;
use crate::error::{GameError, GameResult};
use crate::{tile_center, tile_of};

/// Distance below which an actor counts as standing on a tile center
const CENTER_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    /// Tie-break order used when two moves are equally good
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    pub fn vector(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Down => IVec2::new(0, 1),
            Direction::Right => IVec2::new(1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Left => Direction::Right,
            Direction::Down => Direction::Up,
            Direction::Right => Direction::Left,
        }
    }
}

/// Ghost identity; the numeric ids are the hardware's
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Personality {
    Red = 0,
    Pink = 1,
    Cyan = 2,
    Orange = 3,
}

impl Personality {
    /// Release order
    pub const ALL: [Personality; 4] = [
        Personality::Red,
        Personality::Pink,
        Personality::Cyan,
        Personality::Orange,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Personality::Red => "Red ghost",
            Personality::Pink => "Pink ghost",
            Personality::Cyan => "Cyan ghost",
            Personality::Orange => "Orange ghost",
        }
    }
}

impl TryFrom<u8> for Personality {
    type Error = GameError;

    fn try_from(id: u8) -> GameResult<Self> {
        match id {
            0 => Ok(Personality::Red),
            1 => Ok(Personality::Pink),
            2 => Ok(Personality::Cyan),
            3 => Ok(Personality::Orange),
            other => Err(GameError::InvalidPersonality(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GhostState {
    /// Locked in the house, waiting for the gatekeeper
    Caged,
    LeavingHouse,
    Hunting,
    Frightened,
    /// Just eaten, frozen while its points are shown
    Eaten,
    /// Eyes travelling back to the house
    Returning,
    EnteringHouse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacAnimation {
    Munching,
    Dying,
}

/// Move along the grid for `budget` pixels.
///
/// `choose` is asked for a direction at every tile center passed; `None`
/// keeps the current one. The actor stops at a center when neither the chosen
/// nor the current direction is passable. Returns the distance travelled.
pub fn move_on_grid(
    pos: &mut Vec2,
    dir: &mut Direction,
    budget: f32,
    world: &GridWorld,
    passable: impl Fn(IVec2) -> bool,
    mut choose: impl FnMut(IVec2, Direction) -> Option<Direction>,
) -> f32 {
    let mut left = budget;
    while left > CENTER_EPSILON {
        let tile = tile_of(*pos);
        let center = tile_center(tile);
        let v = dir.vector().as_vec2();
        let ahead = (center - *pos).dot(v);

        if ahead.abs() <= CENTER_EPSILON {
            *pos = center;
            let mut tile = tile;
            if let Some(exit) = world.portal_exit(tile, *dir) {
                tile = exit;
                *pos = tile_center(exit);
            }
            let wanted = choose(tile, *dir).unwrap_or(*dir);
            if passable(tile + wanted.vector()) {
                *dir = wanted;
            } else if !passable(tile + dir.vector()) {
                break;
            }
            let step = left.min(crate::consts::TILE_SIZE);
            *pos += dir.vector().as_vec2() * step;
            left -= step;
        } else {
            // Center ahead in this tile, or the next tile's center once past it
            let distance = if ahead > 0.0 {
                ahead
            } else {
                crate::consts::TILE_SIZE + ahead
            };
            let step = left.min(distance);
            *pos += v * step;
            left -= step;
        }
    }
    budget - left
}

/// Move straight toward `target`, horizontal leg first when `horizontal_first`.
/// Returns true once the target is reached.
pub fn move_towards(pos: &mut Vec2, target: Vec2, speed: f32, horizontal_first: bool) -> bool {
    let mut left = speed;
    for horizontal in [horizontal_first, !horizontal_first] {
        let delta = if horizontal {
            target.x - pos.x
        } else {
            target.y - pos.y
        };
        let step = delta.abs().min(left);
        if horizontal {
            pos.x += step.copysign(delta);
        } else {
            pos.y += step.copysign(delta);
        }
        left -= step;
        if left <= 0.0 {
            break;
        }
    }
    pos.distance(target) <= CENTER_EPSILON
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pac {
    pub pos: Vec2,
    pub dir: Direction,
    /// Direction requested by input or autopilot
    pub wish_dir: Option<Direction>,
    pub speed: f32,
    pub visible: bool,
    pub animation: PacAnimation,
    pub animation_running: bool,
    /// Remaining power ticks (0 = not powered)
    pub power_ticks: u32,
    pub dead: bool,
    start_tile: IVec2,
}

impl Pac {
    pub fn new(start_tile: IVec2) -> Self {
        let mut pac = Self {
            pos: Vec2::ZERO,
            dir: Direction::Left,
            wish_dir: None,
            speed: 0.0,
            visible: false,
            animation: PacAnimation::Munching,
            animation_running: false,
            power_ticks: 0,
            dead: false,
            start_tile,
        };
        pac.reset();
        pac
    }

    /// Back to the start tile (level start, after losing a life)
    pub fn reset(&mut self) {
        self.pos = tile_center(self.start_tile);
        self.dir = Direction::Left;
        self.wish_dir = None;
        self.speed = 0.0;
        self.animation = PacAnimation::Munching;
        self.animation_running = false;
        self.power_ticks = 0;
        self.dead = false;
    }

    pub fn tile(&self) -> IVec2 {
        tile_of(self.pos)
    }

    pub fn is_powered(&self) -> bool {
        self.power_ticks > 0
    }

    /// Advance one tick at the current speed
    pub fn step(&mut self, world: &GridWorld) {
        let wish = self.wish_dir;
        if wish == Some(self.dir.opposite()) {
            self.dir = self.dir.opposite();
        }
        let mut pos = self.pos;
        let mut dir = self.dir;
        move_on_grid(
            &mut pos,
            &mut dir,
            self.speed,
            world,
            |tile| world.is_open(tile),
            |_, _| wish,
        );
        self.pos = pos;
        self.dir = dir;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ghost {
    pub personality: Personality,
    pub state: GhostState,
    pub pos: Vec2,
    pub dir: Direction,
    pub speed: f32,
    pub visible: bool,
    /// Points shown while in the `Eaten` state
    pub eaten_points: Option<u32>,
    start_tile: IVec2,
}

impl Ghost {
    pub fn new(personality: Personality, start_tile: IVec2) -> Self {
        let mut ghost = Self {
            personality,
            state: GhostState::Caged,
            pos: Vec2::ZERO,
            dir: Direction::Left,
            speed: 0.0,
            visible: false,
            eaten_points: None,
            start_tile,
        };
        ghost.reset();
        ghost
    }

    pub fn reset(&mut self) {
        self.pos = tile_center(self.start_tile);
        self.state = GhostState::Caged;
        self.dir = match self.personality {
            Personality::Red => Direction::Left,
            Personality::Pink => Direction::Down,
            Personality::Cyan | Personality::Orange => Direction::Up,
        };
        self.speed = 0.0;
        self.eaten_points = None;
    }

    pub fn tile(&self) -> IVec2 {
        tile_of(self.pos)
    }

    pub fn in_state(&self, states: &[GhostState]) -> bool {
        states.contains(&self.state)
    }

    /// Ghost kills Pac on contact unless Pac has power
    pub fn is_dangerous(&self) -> bool {
        self.state == GhostState::Hunting
    }

    pub fn reverse(&mut self) {
        self.dir = self.dir.opposite();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusState {
    Edible,
    Eaten { ticks_left: u32 },
}

/// Bonus symbol travelling through the maze
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bonus {
    pub symbol: u8,
    pub points: u32,
    pub state: BonusState,
    pub pos: Vec2,
    pub dir: Direction,
    pub speed: f32,
    route: Vec<IVec2>,
    waypoint: usize,
}

impl Bonus {
    /// Start at the first route tile heading for the next one
    pub fn new(symbol: u8, points: u32, route: Vec<IVec2>, dir: Direction) -> Self {
        let pos = route.first().copied().map_or(Vec2::ZERO, tile_center);
        Self {
            symbol,
            points,
            state: BonusState::Edible,
            pos,
            dir,
            speed: 0.0,
            route,
            waypoint: 1,
        }
    }

    pub fn tile(&self) -> IVec2 {
        tile_of(self.pos)
    }

    pub fn is_edible(&self) -> bool {
        self.state == BonusState::Edible
    }

    /// Advance one tick. Returns true when the bonus has finished (left the
    /// maze or its eaten display ran out).
    pub fn step(&mut self, world: &GridWorld) -> bool {
        match self.state {
            BonusState::Eaten { ticks_left } => {
                let ticks_left = ticks_left.saturating_sub(1);
                self.state = BonusState::Eaten { ticks_left };
                ticks_left == 0
            }
            BonusState::Edible => {
                let Some(&target) = self.route.get(self.waypoint) else {
                    return true;
                };
                let mut pos = self.pos;
                let mut dir = self.dir;
                move_on_grid(
                    &mut pos,
                    &mut dir,
                    self.speed,
                    world,
                    |tile| world.is_open(tile),
                    |tile, current| {
                        super::steering::direction_towards(tile, current, target, |t| {
                            world.is_open(t)
                        })
                    },
                );
                self.pos = pos;
                self.dir = dir;
                if tile_of(self.pos) == target {
                    self.waypoint += 1;
                }
                self.waypoint >= self.route.len()
            }
        }
    }
}
