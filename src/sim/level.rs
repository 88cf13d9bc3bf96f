//! Level and round lifecycle
//!
//! A `Level` owns the maze copy and the actors for one level. The
//! `RoundContext` carries everything that survives from level to level:
//! level number, lives, score, continues and the game-wide flags.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actors::{Bonus, Direction, Ghost, Pac, Personality};
use super::world::GridWorld;
use crate::consts::{CONTINUE_CREDITS, INITIAL_LIVES, LAST_LEVEL_NUMBER, MIN_CONTINUE_START_LEVEL};
use crate::error::{GameError, GameResult};
use crate::score::{HighScore, Score};
use crate::settings::{MapCategory, Settings};

/// Power duration in seconds for levels 1..=19; later levels get none
const POWER_SECONDS: [u32; 19] = [6, 5, 4, 3, 2, 5, 2, 2, 1, 5, 2, 1, 1, 3, 1, 1, 0, 1, 0];

/// Bonus values in hundreds of points, indexed by symbol
const BONUS_VALUES: [u32; 14] = [1, 2, 5, 7, 10, 20, 50, 30, 40, 60, 70, 80, 90, 100];

/// Highest symbol (Flower) on big maps
const BIG_MAP_MAX_SYMBOL: u8 = 13;
/// Highest symbol (Banana) elsewhere
const DEFAULT_MAX_SYMBOL: u8 = 6;

pub fn validate_level_number(number: u32) -> GameResult<()> {
    if (1..=LAST_LEVEL_NUMBER).contains(&number) {
        Ok(())
    } else {
        Err(GameError::InvalidLevel {
            level: number,
            max: LAST_LEVEL_NUMBER,
        })
    }
}

/// Ticks of power an energizer gives on a level
pub fn power_ticks(level: u32) -> u32 {
    let seconds = match level {
        1..=19 => POWER_SECONDS[level as usize - 1],
        _ => 0,
    };
    seconds * crate::consts::TICKS_PER_SECOND
}

/// Points for eating a bonus symbol
pub fn bonus_value(symbol: u8) -> u32 {
    BONUS_VALUES[symbol as usize] * 100
}

pub fn max_bonus_symbol(category: MapCategory) -> u8 {
    match category {
        MapCategory::Big => BIG_MAP_MAX_SYMBOL,
        _ => DEFAULT_MAX_SYMBOL,
    }
}

/// Symbol for a level: one per level up to the category maximum, random after
pub fn bonus_symbol(level: u32, category: MapCategory, rng: &mut impl Rng) -> u8 {
    let max = max_bonus_symbol(category);
    match u8::try_from(level - 1) {
        Ok(index) if index <= max => index,
        _ => rng.random_range(0..=max),
    }
}

/// Cutscene shown after completing a level
pub fn intermission_after_level(level: u32) -> Option<u8> {
    match level {
        2 => Some(1),
        5 => Some(2),
        9 | 13 | 17 => Some(3),
        LAST_LEVEL_NUMBER => Some(4),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub number: u32,
    pub demo: bool,
    pub world: GridWorld,
    pub pac: Pac,
    /// In personality order
    pub ghosts: Vec<Ghost>,
    pub bonus: Option<Bonus>,
    bonus_symbols: [u8; 2],
    bonuses_activated: usize,
    power_ticks: u32,
    /// Ghosts eaten with the current energizer
    pub ghost_kills: u32,
    /// Which ghosts those were; they come back out hunting
    pub eaten_this_power: Vec<Personality>,
}

impl Level {
    pub fn new(
        number: u32,
        maze: &GridWorld,
        settings: &Settings,
        demo: bool,
        rng: &mut impl Rng,
    ) -> GameResult<Self> {
        validate_level_number(number)?;
        if maze.house().is_none() {
            return Err(GameError::MissingHouse);
        }
        if maze.portals().is_empty() {
            return Err(GameError::MissingPortal);
        }

        let world = maze.clone();
        let pac = Pac::new(world.pac_start());
        let ghosts = Personality::ALL
            .into_iter()
            .map(|p| Ghost::new(p, world.ghost_start(p)))
            .collect();
        let bonus_symbols = [
            bonus_symbol(number, settings.map_category, rng),
            bonus_symbol(number, settings.map_category, rng),
        ];

        log::info!(
            "Level {number} created{} (power {} ticks, bonus symbols {:?})",
            if demo { " (demo)" } else { "" },
            power_ticks(number),
            bonus_symbols
        );

        Ok(Self {
            number,
            demo,
            world,
            pac,
            ghosts,
            bonus: None,
            bonus_symbols,
            bonuses_activated: 0,
            power_ticks: power_ticks(number),
            ghost_kills: 0,
            eaten_this_power: Vec::new(),
        })
    }

    pub fn power_ticks(&self) -> u32 {
        self.power_ticks
    }

    pub fn bonus_symbols(&self) -> [u8; 2] {
        self.bonus_symbols
    }

    pub fn intermission_after(&self) -> Option<u8> {
        intermission_after_level(self.number)
    }

    pub fn ghost(&self, personality: Personality) -> &Ghost {
        &self.ghosts[personality.index()]
    }

    pub fn ghost_mut(&mut self, personality: Personality) -> &mut Ghost {
        &mut self.ghosts[personality.index()]
    }

    /// Actors back to their start tiles; food stays as it is
    pub fn reset_actors(&mut self) {
        self.pac.reset();
        for ghost in &mut self.ghosts {
            ghost.reset();
        }
        self.bonus = None;
        self.ghost_kills = 0;
        self.eaten_this_power.clear();
    }

    pub fn show_actors(&mut self, visible: bool) {
        self.pac.visible = visible;
        for ghost in &mut self.ghosts {
            ghost.visible = visible;
        }
    }

    pub fn show_ghosts(&mut self, visible: bool) {
        for ghost in &mut self.ghosts {
            ghost.visible = visible;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.world.uneaten_food_count() == 0
    }

    pub fn bonus_active(&self) -> bool {
        self.bonus.is_some()
    }

    /// Entry portal edge, house entry, exit portal edge
    pub fn bonus_route(&self, rng: &mut impl Rng) -> Option<(Vec<IVec2>, Direction)> {
        let portals = self.world.portals();
        let house = self.world.house()?;
        if portals.is_empty() {
            return None;
        }
        let entry = portals[rng.random_range(0..portals.len())];
        let exit = portals[rng.random_range(0..portals.len())];
        let (start, dir) = if rng.random_bool(0.5) {
            (entry.left, Direction::Right)
        } else {
            (entry.right, Direction::Left)
        };
        let goal = if rng.random_bool(0.5) { exit.left } else { exit.right };
        Some((vec![start, house.entry, goal], dir))
    }

    /// Let the next bonus enter the maze. Returns its symbol.
    pub fn activate_bonus(&mut self, rng: &mut impl Rng) -> Option<u8> {
        if self.bonuses_activated >= self.bonus_symbols.len() {
            return None;
        }
        if self.bonus_active() {
            log::warn!("Bonus still active, skipping activation");
            return None;
        }
        let Some((route, dir)) = self.bonus_route(rng) else {
            log::warn!("No bonus route in level {}, skipping activation", self.number);
            return None;
        };
        let symbol = self.bonus_symbols[self.bonuses_activated];
        self.bonuses_activated += 1;
        self.bonus = Some(Bonus::new(symbol, bonus_value(symbol), route, dir));
        log::debug!("Bonus {symbol} activated");
        Some(symbol)
    }
}

/// State carried across levels of one game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundContext {
    pub level_number: u32,
    pub lives: u32,
    pub score: Score,
    pub demo_level: bool,
    pub cheat_used: bool,
    pub immunity: bool,
    pub autopilot: bool,
    /// A game is in progress
    pub playing: bool,
    /// Start pressed on the options screen
    pub start_requested: bool,
    pub continues: u32,
    pub start_level: u32,
}

impl RoundContext {
    pub fn new(settings: &Settings) -> Self {
        Self {
            level_number: settings.start_level,
            lives: INITIAL_LIVES,
            score: Score::new(HighScore::default()),
            demo_level: false,
            cheat_used: false,
            immunity: settings.immunity,
            autopilot: settings.autopilot,
            playing: false,
            start_requested: false,
            continues: CONTINUE_CREDITS,
            start_level: settings.start_level,
        }
    }

    /// Fresh game from the chosen start level
    pub fn start_new_game(&mut self, settings: &Settings, high_score: HighScore) {
        self.level_number = settings.start_level;
        self.start_level = settings.start_level;
        self.lives = INITIAL_LIVES;
        self.score = Score::new(high_score);
        self.demo_level = false;
        self.immunity = settings.immunity;
        self.autopilot = settings.autopilot;
        self.cheat_used = settings.cheats_enabled();
        self.playing = false;
        log::info!("New game starting at level {}", self.level_number);
    }

    /// Demo levels: no scoring, no cheats, autopilot steering
    pub fn start_demo(&mut self, high_score: HighScore) {
        self.level_number = 1;
        self.lives = 1;
        self.score = Score::new(high_score);
        self.score.enabled = false;
        self.demo_level = true;
        self.immunity = false;
        self.playing = false;
    }

    /// Consume a continue if this game may be continued. Otherwise the
    /// credits are refilled for the next game.
    pub fn can_continue(&mut self) -> bool {
        if self.start_level >= MIN_CONTINUE_START_LEVEL && self.continues > 0 {
            self.continues -= 1;
            log::info!("Continue granted, {} left", self.continues);
            true
        } else {
            self.continues = CONTINUE_CREDITS;
            false
        }
    }

    /// Advance the level number. Returns false (and changes nothing) on the
    /// last level.
    pub fn advance_level(&mut self) -> bool {
        if self.level_number >= LAST_LEVEL_NUMBER {
            log::warn!("Level {} is the last level, not advancing", self.level_number);
            return false;
        }
        self.level_number += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actors::GhostState;
    use crate::sim::world::SAMPLE_MAZE;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn maze() -> GridWorld {
        GridWorld::parse(SAMPLE_MAZE).unwrap()
    }

    #[test]
    fn test_power_table() {
        assert_eq!(power_ticks(1), 360);
        assert_eq!(power_ticks(5), 120);
        assert_eq!(power_ticks(14), 180);
        assert_eq!(power_ticks(17), 0);
        assert_eq!(power_ticks(18), 60);
        assert_eq!(power_ticks(19), 0);
        assert_eq!(power_ticks(20), 0);
        assert_eq!(power_ticks(32), 0);
    }

    #[test]
    fn test_bonus_symbols_follow_level_then_random() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(bonus_symbol(1, MapCategory::Arcade, &mut rng), 0);
        assert_eq!(bonus_symbol(7, MapCategory::Arcade, &mut rng), 6);
        assert_eq!(bonus_symbol(14, MapCategory::Big, &mut rng), 13);
        for level in 8..=32 {
            assert!(bonus_symbol(level, MapCategory::Mini, &mut rng) <= 6);
        }
        assert_eq!(bonus_value(0), 100);
        assert_eq!(bonus_value(6), 5000);
        assert_eq!(bonus_value(13), 10_000);
    }

    #[test]
    fn test_intermissions() {
        let due: Vec<(u32, u8)> = (1..=LAST_LEVEL_NUMBER)
            .filter_map(|l| intermission_after_level(l).map(|n| (l, n)))
            .collect();
        assert_eq!(due, vec![(2, 1), (5, 2), (9, 3), (13, 3), (17, 3), (32, 4)]);
    }

    #[test]
    fn test_level_new_validates() {
        let mut rng = Pcg32::seed_from_u64(1);
        let settings = Settings::default();
        assert_eq!(
            Level::new(0, &maze(), &settings, false, &mut rng).unwrap_err(),
            GameError::InvalidLevel { level: 0, max: 32 }
        );
        assert_eq!(
            Level::new(33, &maze(), &settings, false, &mut rng).unwrap_err(),
            GameError::InvalidLevel { level: 33, max: 32 }
        );

        let no_house = GridWorld::parse(&["#######", "  P    ", "#G123##"]).unwrap();
        assert_eq!(
            Level::new(1, &no_house, &settings, false, &mut rng).unwrap_err(),
            GameError::MissingHouse
        );
        let no_portal = GridWorld::parse(&["#######", "# P   #", "#G-123#"]).unwrap();
        assert_eq!(
            Level::new(1, &no_portal, &settings, false, &mut rng).unwrap_err(),
            GameError::MissingPortal
        );
    }

    #[test]
    fn test_level_places_actors() {
        let mut rng = Pcg32::seed_from_u64(1);
        let level = Level::new(3, &maze(), &Settings::default(), false, &mut rng).unwrap();
        assert_eq!(level.pac.tile(), IVec2::new(10, 9));
        assert_eq!(level.ghost(Personality::Orange).tile(), IVec2::new(11, 7));
        assert!(level.ghosts.iter().all(|g| g.state == GhostState::Caged));
        assert_eq!(level.bonus_symbols(), [2, 2]);
        assert_eq!(level.power_ticks(), 240);
        assert_eq!(level.intermission_after(), None);
    }

    #[test]
    fn test_bonus_activation_twice_then_never() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut level = Level::new(2, &maze(), &Settings::default(), false, &mut rng).unwrap();
        assert_eq!(level.activate_bonus(&mut rng), Some(1));
        let bonus = level.bonus.as_ref().unwrap();
        assert_eq!(bonus.points, 200);
        assert_eq!(bonus.tile().y, 7);
        // Still on screen
        assert_eq!(level.activate_bonus(&mut rng), None);
        level.bonus = None;
        assert_eq!(level.activate_bonus(&mut rng), Some(1));
        level.bonus = None;
        assert_eq!(level.activate_bonus(&mut rng), None);
    }

    #[test]
    fn test_continues() {
        let mut settings = Settings::default();
        settings.start_level = 12;
        let mut round = RoundContext::new(&settings);
        for left in (0..4).rev() {
            assert!(round.can_continue());
            assert_eq!(round.continues, left);
        }
        assert!(!round.can_continue());
        assert_eq!(round.continues, 4);

        round.start_level = 9;
        assert!(!round.can_continue());
        assert_eq!(round.continues, 4);
    }

    #[test]
    fn test_advance_level_stops_at_last() {
        let mut round = RoundContext::new(&Settings::default());
        round.level_number = 31;
        assert!(round.advance_level());
        assert_eq!(round.level_number, 32);
        assert!(!round.advance_level());
        assert_eq!(round.level_number, 32);
    }

    #[test]
    fn test_new_game_flags_cheats() {
        let mut settings = Settings::default();
        settings.immunity = true;
        let mut round = RoundContext::new(&settings);
        round.start_new_game(&settings, HighScore { points: 500, level: 3 });
        assert!(round.cheat_used);
        assert_eq!(round.lives, 3);
        assert_eq!(round.score.high_score.points, 500);
    }
}
