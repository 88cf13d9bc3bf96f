//! Fixed timestep game flow
//!
//! `GameSession` owns the active state, its timer and everything the states
//! operate on. The host calls `update` once per tick. A transition requested
//! during a tick takes effect at the start of the next one.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::actors::{Direction, GhostState, PacAnimation};
use super::gatekeeper::GateKeeper;
use super::hunt::{HuntContext, hunting_step, move_returning_ghosts};
use super::hunting::HuntingTimer;
use super::level::{Level, RoundContext};
use super::state::{GameEvent, GameFlowState, StateTimer};
use super::world::GridWorld;
use crate::consts::LAST_LEVEL_NUMBER;
use crate::error::GameResult;
use crate::score::{HighScore, Score};
use crate::settings::Settings;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Direction Pac should take at the next opportunity
    pub pac_wish: Option<Direction>,
    /// Start button (intro and options screens)
    pub start: bool,
    /// Booster button held
    pub booster_pressed: bool,
    /// The presentation finished the scene of the current state
    pub scene_finished: bool,
}

// Tick indices of the scripted states
const NEW_GAME_SHOW_ACTORS_TICK: u32 = 120;
const NEW_GAME_HUNT_TICK: u32 = 240;
const CONTINUE_HUNT_TICK: u32 = 90;
const DEMO_HUNT_TICK: u32 = 120;
const DYING_HIDE_GHOSTS_TICK: u32 = 60;
const DYING_ANIMATION_TICK: u32 = 90;
const DYING_HIDE_PAC_TICK: u32 = 190;
const DYING_END_TICK: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    To(GameFlowState),
    Resume,
}

pub struct GameSession {
    settings: Settings,
    maze: GridWorld,
    state: GameFlowState,
    timer: StateTimer,
    previous: Option<(GameFlowState, StateTimer)>,
    pending: Option<Pending>,
    in_callback: bool,
    hunting_timer: HuntingTimer,
    gatekeeper: GateKeeper,
    round: RoundContext,
    level: Level,
    high_score: HighScore,
    rng: Pcg32,
    events: Vec<GameEvent>,
    ticks: u64,
}

impl GameSession {
    /// Validate the configuration and enter `Boot`
    pub fn new(settings: Settings, maze: GridWorld, seed: u64) -> GameResult<Self> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let level = Level::new(settings.start_level, &maze, &settings, false, &mut rng)?;
        let mut session = Self {
            round: RoundContext::new(&settings),
            gatekeeper: GateKeeper::new(settings.start_level),
            settings,
            maze,
            state: GameFlowState::Boot,
            timer: StateTimer::new(GameFlowState::Boot.timer_duration()),
            previous: None,
            pending: None,
            in_callback: false,
            hunting_timer: HuntingTimer::new(),
            level,
            high_score: HighScore::default(),
            rng,
            events: Vec::new(),
            ticks: 0,
        };
        log::info!("Game session created (seed {seed})");
        session.in_callback = true;
        session.enter_state(GameFlowState::Boot, false);
        session.in_callback = false;
        Ok(session)
    }

    /// Advance one tick
    pub fn update(&mut self, input: &TickInput) {
        self.apply_pending();
        if input.scene_finished && self.state.ends_with_scene() {
            self.timer.expire();
        }
        self.in_callback = true;
        self.update_state(input);
        self.in_callback = false;
        self.timer.tick();
        self.ticks += 1;
    }

    /// Ask for a state change at the next tick boundary. Only the active
    /// state's callbacks may do this.
    pub fn request_transition(&mut self, next: GameFlowState) {
        debug_assert!(
            self.in_callback,
            "transition to {} requested outside a state callback",
            next.as_str()
        );
        if !self.in_callback {
            log::error!("Ignoring transition to {} outside a state callback", next.as_str());
            return;
        }
        self.pending = Some(Pending::To(next));
    }

    /// Return to the state that was active before the last transition,
    /// with its timer as it was
    pub fn resume_previous(&mut self) {
        debug_assert!(self.in_callback, "resume requested outside a state callback");
        if !self.in_callback {
            log::error!("Ignoring resume outside a state callback");
            return;
        }
        self.pending = Some(Pending::Resume);
    }

    fn apply_pending(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        self.in_callback = true;
        let from = self.state;
        match pending {
            Pending::To(next) => {
                self.exit_state(from);
                self.previous = Some((from, self.timer));
                self.state = next;
                self.timer.restart(next.timer_duration());
                log::debug!("Game state {} -> {}", from.as_str(), next.as_str());
                self.enter_state(next, false);
            }
            Pending::Resume => match self.previous.take() {
                Some((previous, timer)) => {
                    self.exit_state(from);
                    self.state = previous;
                    self.timer = timer;
                    log::debug!("Game state {} -> {} (resumed)", from.as_str(), previous.as_str());
                    self.enter_state(previous, true);
                }
                None => log::error!("No state to resume from {}", from.as_str()),
            },
        }
        self.in_callback = false;
    }

    // === Entry and exit ===

    fn enter_state(&mut self, state: GameFlowState, resumed: bool) {
        match state {
            GameFlowState::Boot | GameFlowState::ShowingHallOfFame => {}
            GameFlowState::Intro => {
                self.round.playing = false;
            }
            GameFlowState::SettingOptions => {
                self.round.start_requested = false;
            }
            GameFlowState::StartingGameOrLevel => {}
            GameFlowState::Hunting => {
                if !resumed {
                    self.hunting_timer.start(self.level.number);
                    self.events.push(GameEvent::HuntingPhaseStarted { index: 0 });
                }
            }
            GameFlowState::LevelComplete => {
                self.hunting_timer.stop();
                self.level.bonus = None;
                self.events.push(GameEvent::StopAllSounds);
                self.events.push(GameEvent::LevelCompleted {
                    number: self.level.number,
                });
                if self.level.number == LAST_LEVEL_NUMBER && !self.round.demo_level {
                    log::info!("Last level completed");
                    self.round.playing = false;
                    self.commit_high_score();
                }
            }
            GameFlowState::LevelTransition => self.start_next_level(),
            GameFlowState::EatingGhost => {
                self.level.pac.visible = false;
            }
            GameFlowState::PacDying => {
                self.level.pac.dead = true;
                self.level.pac.power_ticks = 0;
                self.level.bonus = None;
                self.hunting_timer.stop();
                self.gatekeeper.enable_global_counter();
                self.events.push(GameEvent::StopAllSounds);
            }
            GameFlowState::GameOver => {
                self.round.playing = false;
                self.events.push(GameEvent::GameOver);
                if !self.round.demo_level {
                    self.commit_high_score();
                }
            }
            GameFlowState::Intermission => {
                if let Some(number) = self.level.intermission_after() {
                    self.events.push(GameEvent::IntermissionStarted { number });
                }
            }
        }
    }

    fn exit_state(&mut self, state: GameFlowState) {
        if state == GameFlowState::EatingGhost {
            self.level.pac.visible = true;
            for ghost in self.level.ghosts.iter_mut() {
                if ghost.state == GhostState::Eaten {
                    ghost.state = GhostState::Returning;
                    ghost.eaten_points = None;
                }
            }
        }
    }

    // === Per-tick behavior ===

    fn update_state(&mut self, input: &TickInput) {
        let expired = self.timer.has_expired();
        match self.state {
            GameFlowState::Boot => {
                if expired {
                    self.request_transition(GameFlowState::Intro);
                }
            }
            GameFlowState::Intro => {
                if input.start {
                    self.request_transition(GameFlowState::SettingOptions);
                } else if expired {
                    self.round.demo_level = true;
                    self.request_transition(GameFlowState::StartingGameOrLevel);
                }
            }
            GameFlowState::SettingOptions => {
                if input.start {
                    self.round.start_requested = true;
                    self.round.demo_level = false;
                    self.request_transition(GameFlowState::StartingGameOrLevel);
                }
            }
            GameFlowState::ShowingHallOfFame => {
                if expired {
                    self.request_transition(GameFlowState::Intro);
                }
            }
            GameFlowState::StartingGameOrLevel => {
                if self.round.playing {
                    self.continue_game();
                } else if self.round.demo_level {
                    self.start_demo_level();
                } else {
                    self.start_new_game();
                }
            }
            GameFlowState::Hunting => self.hunt(input),
            GameFlowState::LevelComplete => {
                if expired {
                    let next = if self.round.demo_level {
                        GameFlowState::ShowingHallOfFame
                    } else if self.level.intermission_after().is_some() {
                        GameFlowState::Intermission
                    } else {
                        GameFlowState::LevelTransition
                    };
                    self.request_transition(next);
                }
            }
            GameFlowState::LevelTransition => {
                if expired {
                    self.request_transition(GameFlowState::StartingGameOrLevel);
                }
            }
            GameFlowState::EatingGhost => {
                if expired {
                    self.resume_previous();
                } else {
                    move_returning_ghosts(&mut self.level);
                }
            }
            GameFlowState::PacDying => self.pac_dying(),
            GameFlowState::GameOver => {
                if expired {
                    let next = if self.round.demo_level {
                        GameFlowState::ShowingHallOfFame
                    } else if self.round.can_continue() {
                        GameFlowState::SettingOptions
                    } else {
                        GameFlowState::Intro
                    };
                    self.request_transition(next);
                }
            }
            GameFlowState::Intermission => {
                if expired {
                    let next = if self.round.playing {
                        GameFlowState::LevelTransition
                    } else {
                        GameFlowState::Intro
                    };
                    self.request_transition(next);
                }
            }
        }
    }

    fn start_new_game(&mut self) {
        match self.timer.tick_count() {
            1 => {
                self.round.start_new_game(&self.settings, self.high_score);
                self.round.start_requested = false;
                self.events.push(GameEvent::GameStarted);
                self.create_level(self.round.level_number, false);
            }
            2 => self.start_level(),
            NEW_GAME_SHOW_ACTORS_TICK => self.level.show_actors(true),
            NEW_GAME_HUNT_TICK => {
                self.round.playing = true;
                self.request_transition(GameFlowState::Hunting);
            }
            _ => {}
        }
    }

    fn continue_game(&mut self) {
        match self.timer.tick_count() {
            1 => {
                self.level.reset_actors();
                self.level.show_actors(true);
            }
            CONTINUE_HUNT_TICK => self.request_transition(GameFlowState::Hunting),
            _ => {}
        }
    }

    fn start_demo_level(&mut self) {
        match self.timer.tick_count() {
            1 => {
                self.round.start_demo(self.high_score);
                self.create_level(1, true);
            }
            2 => self.start_level(),
            3 => self.level.show_actors(true),
            DEMO_HUNT_TICK => self.request_transition(GameFlowState::Hunting),
            _ => {}
        }
    }

    fn hunt(&mut self, input: &TickInput) {
        let mut ctx = HuntContext {
            level: &mut self.level,
            round: &mut self.round,
            hunting_timer: &mut self.hunting_timer,
            gatekeeper: &mut self.gatekeeper,
            settings: &self.settings,
            rng: &mut self.rng,
            events: &mut self.events,
        };
        let outcome = hunting_step(&mut ctx, input);

        if outcome.level_complete {
            self.request_transition(GameFlowState::LevelComplete);
        } else if outcome.pac_killed {
            log::debug!("Pac killed at tile {}", self.level.pac.tile());
            self.request_transition(GameFlowState::PacDying);
        } else if outcome.ghosts_eaten > 0 {
            self.request_transition(GameFlowState::EatingGhost);
        }
    }

    fn pac_dying(&mut self) {
        if self.timer.has_expired() {
            let next = if self.round.demo_level {
                GameFlowState::GameOver
            } else {
                self.round.lives = self.round.lives.saturating_sub(1);
                log::info!("Pac lost a life, {} left", self.round.lives);
                if self.round.lives == 0 {
                    GameFlowState::GameOver
                } else {
                    GameFlowState::StartingGameOrLevel
                }
            };
            self.request_transition(next);
            return;
        }
        match self.timer.tick_count() {
            DYING_HIDE_GHOSTS_TICK => {
                self.level.show_ghosts(false);
                self.level.pac.animation = PacAnimation::Dying;
            }
            DYING_ANIMATION_TICK => {
                self.level.pac.animation_running = true;
                self.events.push(GameEvent::PacDying);
            }
            DYING_HIDE_PAC_TICK => self.level.pac.visible = false,
            DYING_END_TICK => {
                self.events.push(GameEvent::PacDead);
                self.timer.expire();
            }
            _ => {}
        }
    }

    // === Level lifecycle ===

    /// Build a level, falling back to the intro when it cannot be created
    fn create_level(&mut self, number: u32, demo: bool) -> bool {
        match Level::new(number, &self.maze, &self.settings, demo, &mut self.rng) {
            Ok(level) => {
                self.level = level;
                self.round.level_number = number;
                self.events.push(GameEvent::LevelCreated { number });
                true
            }
            Err(err) => {
                log::error!("Cannot create level {number}: {err}");
                self.round.playing = false;
                self.request_transition(GameFlowState::Intro);
                false
            }
        }
    }

    fn start_level(&mut self) {
        let number = self.level.number;
        self.level.reset_actors();
        self.level.show_actors(false);
        self.gatekeeper.reset(number);
        self.hunting_timer.stop();
        self.round.score.enabled = !self.level.demo;
        self.events.push(GameEvent::LevelStarted { number });
        log::info!("Level {number} started");
    }

    fn start_next_level(&mut self) {
        if !self.round.advance_level() {
            return;
        }
        if self.create_level(self.round.level_number, false) {
            self.start_level();
        }
    }

    fn commit_high_score(&mut self) {
        if self.round.cheat_used {
            log::info!("Cheats were used, high score not saved");
            return;
        }
        if self.round.score.beats(&self.high_score) {
            self.high_score = self.round.score.high_score;
            log::info!(
                "New high score {} on level {}",
                self.high_score.points,
                self.high_score.level
            );
        }
    }

    // === Host access ===

    pub fn state(&self) -> GameFlowState {
        self.state
    }

    pub fn previous_state(&self) -> Option<GameFlowState> {
        self.previous.map(|(state, _)| state)
    }

    pub fn timer(&self) -> &StateTimer {
        &self.timer
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Direct level access for hosts and debugging tools
    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn round(&self) -> &RoundContext {
        &self.round
    }

    pub fn score(&self) -> &Score {
        &self.round.score
    }

    /// Best score of this session (never set by games with cheats)
    pub fn high_score(&self) -> HighScore {
        self.high_score
    }

    /// Seed the high score from storage
    pub fn set_high_score(&mut self, high_score: HighScore) {
        self.high_score = high_score;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn hunting_timer(&self) -> &HuntingTimer {
        &self.hunting_timer
    }

    pub fn gatekeeper(&self) -> &GateKeeper {
        &self.gatekeeper
    }

    /// Ticks since the session was created
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::SAMPLE_MAZE;

    fn session() -> GameSession {
        let maze = GridWorld::parse(SAMPLE_MAZE).unwrap();
        GameSession::new(Settings::default(), maze, 42).unwrap()
    }

    fn scene_done() -> TickInput {
        TickInput {
            scene_finished: true,
            ..Default::default()
        }
    }

    fn start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_new_rejects_bad_settings() {
        let maze = GridWorld::parse(SAMPLE_MAZE).unwrap();
        let settings = Settings {
            start_level: 40,
            ..Default::default()
        };
        assert!(GameSession::new(settings, maze, 1).is_err());
    }

    #[test]
    fn test_transition_is_deferred_to_next_tick() {
        let mut s = session();
        assert_eq!(s.state(), GameFlowState::Boot);
        s.update(&scene_done());
        assert_eq!(s.state(), GameFlowState::Boot);
        s.update(&TickInput::default());
        assert_eq!(s.state(), GameFlowState::Intro);
        assert_eq!(s.previous_state(), Some(GameFlowState::Boot));
    }

    #[test]
    fn test_timer_restarts_on_entry() {
        let mut s = session();
        for _ in 0..50 {
            s.update(&TickInput::default());
        }
        assert_eq!(s.timer().tick_count(), 50);
        s.update(&scene_done());
        s.update(&TickInput::default());
        assert_eq!(s.state(), GameFlowState::Intro);
        assert_eq!(s.timer().tick_count(), 1);
    }

    #[test]
    fn test_new_game_timeline() {
        let mut s = session();
        s.update(&scene_done());
        s.update(&start());
        s.update(&start());
        assert_eq!(s.state(), GameFlowState::SettingOptions);
        s.update(&TickInput::default());
        assert_eq!(s.state(), GameFlowState::StartingGameOrLevel);
        // Tick 0 ran; ticks 1 and 2 create and start the level
        s.update(&TickInput::default());
        s.update(&TickInput::default());
        let events = s.drain_events();
        assert!(events.contains(&GameEvent::GameStarted));
        assert!(events.contains(&GameEvent::LevelCreated { number: 1 }));
        assert!(events.contains(&GameEvent::LevelStarted { number: 1 }));
        assert!(!s.level().pac.visible);

        while s.timer().tick_count() <= NEW_GAME_SHOW_ACTORS_TICK {
            s.update(&TickInput::default());
        }
        assert!(s.level().pac.visible);
        assert!(!s.round().playing);

        while s.state() == GameFlowState::StartingGameOrLevel {
            s.update(&TickInput::default());
        }
        assert_eq!(s.state(), GameFlowState::Hunting);
        assert!(s.round().playing);
        assert!(s.hunting_timer().is_running());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "outside a state callback")]
    fn test_request_outside_callback_panics_in_debug() {
        let mut s = session();
        s.request_transition(GameFlowState::Hunting);
    }
}
