//! Tengen Chase headless runner
//!
//! Plays one game on the sample maze with the autopilot steering Pac and
//! logs every game event. Presentation scenes end immediately.
//!
//! Usage: `tengen-chase [settings.json]`
//!
//! Environment overrides: `TENGEN_SEED`, `TENGEN_MAX_TICKS`,
//! `TENGEN_DIFFICULTY`, `TENGEN_BOOSTER`, `TENGEN_MAP_CATEGORY`,
//! `TENGEN_START_LEVEL`.

use std::process::ExitCode;

use tengen_chase::sim::{GameFlowState, GameSession, GridWorld, SAMPLE_MAZE, TickInput};
use tengen_chase::{Difficulty, GameError, GameResult, MapCategory, PacBooster, Settings};

/// One hour of game time
const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 60;

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn load_settings() -> GameResult<Settings> {
    let mut settings = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| GameError::InvalidSettings(format!("{path}: {e}")))?;
            Settings::from_json(&json)?
        }
        None => Settings::default(),
    };

    if let Some(name) = env_var("TENGEN_DIFFICULTY") {
        settings.difficulty =
            Difficulty::from_str(&name).ok_or(GameError::InvalidDifficulty(name))?;
    }
    if let Some(name) = env_var("TENGEN_BOOSTER") {
        settings.booster = PacBooster::from_str(&name).ok_or(GameError::InvalidBooster(name))?;
    }
    if let Some(name) = env_var("TENGEN_MAP_CATEGORY") {
        settings.map_category =
            MapCategory::from_str(&name).ok_or(GameError::InvalidMapCategory(name))?;
    }
    if let Some(level) = env_var("TENGEN_START_LEVEL") {
        let level = level
            .parse::<u32>()
            .map_err(|e| GameError::InvalidSettings(format!("TENGEN_START_LEVEL={level}: {e}")))?;
        settings.select_start_level(level)?;
    }
    settings.autopilot = true;
    settings.validate()?;
    Ok(settings)
}

fn run() -> GameResult<()> {
    let settings = load_settings()?;
    let seed = env_var("TENGEN_SEED")
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5EED);
    let max_ticks = env_var("TENGEN_MAX_TICKS")
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_TICKS);

    let maze = GridWorld::parse(SAMPLE_MAZE)?;
    let mut session = GameSession::new(settings, maze, seed)?;
    let mut game_started = false;

    while session.ticks() < max_ticks {
        let state = session.state();
        let input = TickInput {
            start: matches!(state, GameFlowState::Intro | GameFlowState::SettingOptions)
                && !game_started,
            scene_finished: true,
            ..Default::default()
        };
        session.update(&input);
        game_started |= session.round().playing;

        for event in session.drain_events() {
            log::info!("[tick {}] {:?}", session.ticks(), event);
        }
        if game_started && !session.round().playing {
            break;
        }
    }

    let round = session.round();
    println!(
        "Finished after {} ticks in state {}: level {}, score {}, lives {}",
        session.ticks(),
        session.state().as_str(),
        round.level_number,
        round.score.points,
        round.lives
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Tengen Chase (headless) starting...");
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
