//! Maze representation
//!
//! Tile classification, food bookkeeping, portals and the ghost house.
//! Map assets live outside the core; mazes arrive as ASCII rows:
//!
//! | char | meaning |
//! |------|---------|
//! | `#` | wall |
//! | `.` | pellet |
//! | `*` | energizer |
//! | `-` | house door |
//! | `T` | tunnel (open, slows ghosts) |
//! | `P` | Pac start |
//! | `G` | red ghost start (outside the house) |
//! | `1` `2` `3` | pink, cyan, orange ghost starts |
//! | ` ` | open, no food |

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::actors::{Direction, Personality};
use crate::error::{GameError, GameResult};

/// Maze used by the headless runner and the tests
pub const SAMPLE_MAZE: &[&str] = &[
    "#####################",
    "#.........#.........#",
    "#*###.###.#.###.###*#",
    "#...................#",
    "#.###.#.#####.#.###.#",
    "#.....#...G...#.....#",
    "#####.#.##-##.#.#####",
    "TTTT .#.#123#.#. TTTT",
    "#####.#.#####.#.#####",
    "#.........P.........#",
    "#.###.###.#.###.###.#",
    "#*..#.....#.....#..*#",
    "###.#.#.#####.#.#.###",
    "#.....#...#...#.....#",
    "#####################",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    Wall,
    Open,
    Door,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Food {
    Pellet,
    Energizer,
}

/// Ghost house geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    /// Door tile (passable for ghosts only)
    pub door: IVec2,
    /// Tile in front of the door, where leaving ghosts start hunting
    pub entry: IVec2,
    /// Tile behind the door, where eaten ghosts are revived
    pub revival: IVec2,
}

/// A pair of tiles on opposite maze edges connected by wrap-around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portal {
    pub left: IVec2,
    pub right: IVec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridWorld {
    width: i32,
    height: i32,
    terrain: Vec<Terrain>,
    tunnel: Vec<bool>,
    food: Vec<Option<Food>>,
    total_food: u32,
    eaten_food: u32,
    portals: Vec<Portal>,
    house: Option<House>,
    pac_start: IVec2,
    ghost_starts: [IVec2; 4],
}

impl GridWorld {
    /// Build a maze from ASCII rows
    pub fn parse(rows: &[&str]) -> GameResult<Self> {
        let Some(first) = rows.first() else {
            return Err(GameError::MalformedMaze {
                row: 0,
                reason: "no rows".to_string(),
            });
        };
        let width = first.chars().count();
        let height = rows.len();

        let mut terrain = Vec::with_capacity(width * height);
        let mut tunnel = Vec::with_capacity(width * height);
        let mut food = Vec::with_capacity(width * height);
        let mut pac_start = None;
        let mut ghost_starts: [Option<IVec2>; 4] = [None; 4];
        let mut door = None;

        for (y, row) in rows.iter().enumerate() {
            let columns = row.chars().count();
            if columns != width {
                return Err(GameError::MalformedMaze {
                    row: y,
                    reason: format!("expected {width} columns, found {columns}"),
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let tile = IVec2::new(x as i32, y as i32);
                let (t, f) = match ch {
                    '#' => (Terrain::Wall, None),
                    '.' => (Terrain::Open, Some(Food::Pellet)),
                    '*' => (Terrain::Open, Some(Food::Energizer)),
                    '-' => {
                        door.get_or_insert(tile);
                        (Terrain::Door, None)
                    }
                    ' ' | 'T' => (Terrain::Open, None),
                    'P' => {
                        pac_start = Some(tile);
                        (Terrain::Open, None)
                    }
                    'G' | '1' | '2' | '3' => {
                        let index = match ch {
                            'G' => 0,
                            '1' => 1,
                            '2' => 2,
                            _ => 3,
                        };
                        ghost_starts[index] = Some(tile);
                        (Terrain::Open, None)
                    }
                    other => {
                        return Err(GameError::MalformedMaze {
                            row: y,
                            reason: format!("unknown tile character {other:?} at column {x}"),
                        });
                    }
                };
                terrain.push(t);
                tunnel.push(ch == 'T');
                food.push(f);
            }
        }

        let pac_start = pac_start.ok_or(GameError::MissingStart("Pac"))?;
        let mut starts = [IVec2::ZERO; 4];
        for personality in Personality::ALL {
            starts[personality.index()] = ghost_starts[personality.index()]
                .ok_or(GameError::MissingStart(personality.name()))?;
        }

        let (w, h) = (width as i32, height as i32);
        let portals = (0..h)
            .filter(|&y| {
                terrain[(y * w) as usize] != Terrain::Wall
                    && terrain[(y * w + w - 1) as usize] != Terrain::Wall
            })
            .map(|y| Portal {
                left: IVec2::new(0, y),
                right: IVec2::new(w - 1, y),
            })
            .collect();

        let house = door.map(|door| House {
            door,
            entry: door + Direction::Up.vector(),
            revival: door + Direction::Down.vector(),
        });

        let total_food = food.iter().filter(|f| f.is_some()).count() as u32;
        Ok(Self {
            width: w,
            height: h,
            terrain,
            tunnel,
            food,
            total_food,
            eaten_food: 0,
            portals,
            house,
            pac_start,
            ghost_starts: starts,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, tile: IVec2) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height
    }

    fn index(&self, tile: IVec2) -> Option<usize> {
        self.in_bounds(tile)
            .then(|| (tile.y * self.width + tile.x) as usize)
    }

    /// Terrain at a tile; outside the maze counts as wall
    pub fn terrain(&self, tile: IVec2) -> Terrain {
        self.index(tile).map_or(Terrain::Wall, |i| self.terrain[i])
    }

    pub fn is_tunnel(&self, tile: IVec2) -> bool {
        self.index(tile).is_some_and(|i| self.tunnel[i])
    }

    /// Pac and the bonus may only use open tiles
    pub fn is_open(&self, tile: IVec2) -> bool {
        self.terrain(tile) == Terrain::Open
    }

    /// Ghosts may pass the door only when heading into the house
    pub fn is_passable_for_ghost(&self, tile: IVec2, through_door: bool) -> bool {
        match self.terrain(tile) {
            Terrain::Open => true,
            Terrain::Door => through_door,
            Terrain::Wall => false,
        }
    }

    pub fn food_at(&self, tile: IVec2) -> Option<Food> {
        self.index(tile).and_then(|i| self.food[i])
    }

    /// Remove the food at a tile, returning what was eaten
    pub fn eat_food(&mut self, tile: IVec2) -> Option<Food> {
        let i = self.index(tile)?;
        let eaten = self.food[i].take();
        if eaten.is_some() {
            self.eaten_food += 1;
        }
        eaten
    }

    pub fn total_food_count(&self) -> u32 {
        self.total_food
    }

    pub fn eaten_food_count(&self) -> u32 {
        self.eaten_food
    }

    pub fn uneaten_food_count(&self) -> u32 {
        self.total_food - self.eaten_food
    }

    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    pub fn house(&self) -> Option<&House> {
        self.house.as_ref()
    }

    pub fn pac_start(&self) -> IVec2 {
        self.pac_start
    }

    pub fn ghost_start(&self, personality: Personality) -> IVec2 {
        self.ghost_starts[personality.index()]
    }

    /// Where an actor leaving `tile` in `dir` reappears, if `tile` is a portal edge
    pub fn portal_exit(&self, tile: IVec2, dir: Direction) -> Option<IVec2> {
        self.portals.iter().find_map(|portal| match dir {
            Direction::Left if tile == portal.left => Some(portal.right),
            Direction::Right if tile == portal.right => Some(portal.left),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_maze() {
        let world = GridWorld::parse(SAMPLE_MAZE).unwrap();
        assert_eq!(world.width(), 21);
        assert_eq!(world.height(), 15);
        assert_eq!(world.total_food_count(), 139);
        assert_eq!(world.uneaten_food_count(), 139);
        assert_eq!(world.pac_start(), IVec2::new(10, 9));
        assert_eq!(world.ghost_start(Personality::Red), IVec2::new(10, 5));
        assert_eq!(world.ghost_start(Personality::Cyan), IVec2::new(10, 7));

        let house = world.house().unwrap();
        assert_eq!(house.door, IVec2::new(10, 6));
        assert_eq!(house.entry, IVec2::new(10, 5));
        assert_eq!(house.revival, IVec2::new(10, 7));

        assert_eq!(world.portals().len(), 1);
        assert!(world.is_tunnel(IVec2::new(0, 7)));
        assert!(!world.is_tunnel(IVec2::new(5, 7)));
    }

    #[test]
    fn test_terrain_classification() {
        let world = GridWorld::parse(SAMPLE_MAZE).unwrap();
        assert_eq!(world.terrain(IVec2::new(0, 0)), Terrain::Wall);
        assert_eq!(world.terrain(IVec2::new(-1, 3)), Terrain::Wall);
        assert!(!world.is_open(IVec2::new(10, 6)));
        assert!(world.is_passable_for_ghost(IVec2::new(10, 6), true));
        assert!(!world.is_passable_for_ghost(IVec2::new(10, 6), false));
        assert_eq!(world.food_at(IVec2::new(1, 2)), Some(Food::Energizer));
        assert_eq!(world.food_at(IVec2::new(1, 1)), Some(Food::Pellet));
    }

    #[test]
    fn test_eat_food_counts_once() {
        let mut world = GridWorld::parse(SAMPLE_MAZE).unwrap();
        let tile = IVec2::new(1, 1);
        assert_eq!(world.eat_food(tile), Some(Food::Pellet));
        assert_eq!(world.eat_food(tile), None);
        assert_eq!(world.eaten_food_count(), 1);
        assert_eq!(world.uneaten_food_count(), 138);
    }

    #[test]
    fn test_portal_exit() {
        let world = GridWorld::parse(SAMPLE_MAZE).unwrap();
        assert_eq!(
            world.portal_exit(IVec2::new(0, 7), Direction::Left),
            Some(IVec2::new(20, 7))
        );
        assert_eq!(
            world.portal_exit(IVec2::new(20, 7), Direction::Right),
            Some(IVec2::new(0, 7))
        );
        assert_eq!(world.portal_exit(IVec2::new(0, 7), Direction::Right), None);
    }

    #[test]
    fn test_parse_errors() {
        let ragged = ["#####", "#P.#"];
        assert!(matches!(
            GridWorld::parse(&ragged),
            Err(GameError::MalformedMaze { row: 1, .. })
        ));

        let unknown = ["#P?G#"];
        assert!(matches!(
            GridWorld::parse(&unknown),
            Err(GameError::MalformedMaze { row: 0, .. })
        ));

        let no_pac = ["#G123#"];
        assert_eq!(GridWorld::parse(&no_pac).unwrap_err(), GameError::MissingStart("Pac"));

        let no_orange = ["#PG12#"];
        assert_eq!(
            GridWorld::parse(&no_orange).unwrap_err(),
            GameError::MissingStart("Orange ghost")
        );
    }

    #[test]
    fn test_maze_without_door_has_no_house() {
        let world = GridWorld::parse(&["#PG123#"]).unwrap();
        assert!(world.house().is_none());
        assert!(world.portals().is_empty());
    }
}
