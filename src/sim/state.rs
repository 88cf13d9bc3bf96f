//! Game flow states, the state timer and the events sent to the host

use serde::{Deserialize, Serialize};

use super::actors::Personality;

/// Phase of the game flow. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameFlowState {
    Boot,
    Intro,
    SettingOptions,
    ShowingHallOfFame,
    StartingGameOrLevel,
    Hunting,
    LevelComplete,
    LevelTransition,
    EatingGhost,
    PacDying,
    GameOver,
    Intermission,
}

impl GameFlowState {
    pub const ALL: [GameFlowState; 12] = [
        GameFlowState::Boot,
        GameFlowState::Intro,
        GameFlowState::SettingOptions,
        GameFlowState::ShowingHallOfFame,
        GameFlowState::StartingGameOrLevel,
        GameFlowState::Hunting,
        GameFlowState::LevelComplete,
        GameFlowState::LevelTransition,
        GameFlowState::EatingGhost,
        GameFlowState::PacDying,
        GameFlowState::GameOver,
        GameFlowState::Intermission,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameFlowState::Boot => "Boot",
            GameFlowState::Intro => "Intro",
            GameFlowState::SettingOptions => "SettingOptions",
            GameFlowState::ShowingHallOfFame => "ShowingHallOfFame",
            GameFlowState::StartingGameOrLevel => "StartingGameOrLevel",
            GameFlowState::Hunting => "Hunting",
            GameFlowState::LevelComplete => "LevelComplete",
            GameFlowState::LevelTransition => "LevelTransition",
            GameFlowState::EatingGhost => "EatingGhost",
            GameFlowState::PacDying => "PacDying",
            GameFlowState::GameOver => "GameOver",
            GameFlowState::Intermission => "Intermission",
        }
    }

    /// Timer duration on entry; `None` runs until expired explicitly
    pub fn timer_duration(&self) -> Option<u32> {
        match self {
            GameFlowState::EatingGhost => Some(60),
            GameFlowState::LevelTransition => Some(120),
            GameFlowState::GameOver => Some(180),
            _ => None,
        }
    }

    /// States that last as long as the presentation's scene does
    pub fn ends_with_scene(&self) -> bool {
        matches!(
            self,
            GameFlowState::Boot
                | GameFlowState::Intro
                | GameFlowState::ShowingHallOfFame
                | GameFlowState::LevelComplete
                | GameFlowState::Intermission
        )
    }
}

/// Tick counter of the active state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateTimer {
    ticks: u32,
    duration: Option<u32>,
    expired: bool,
}

impl StateTimer {
    pub fn new(duration: Option<u32>) -> Self {
        Self {
            ticks: 0,
            duration,
            expired: false,
        }
    }

    pub fn restart(&mut self, duration: Option<u32>) {
        *self = Self::new(duration);
    }

    pub fn tick(&mut self) {
        if self.expired {
            return;
        }
        self.ticks += 1;
        if self.duration.is_some_and(|d| self.ticks >= d) {
            self.expired = true;
        }
    }

    pub fn expire(&mut self) {
        self.expired = true;
    }

    pub fn has_expired(&self) -> bool {
        self.expired
    }

    pub fn tick_count(&self) -> u32 {
        self.ticks
    }

    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    pub fn is_indefinite(&self) -> bool {
        self.duration.is_none()
    }
}

/// Notifications for sound, animation and UI collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted,
    LevelCreated { number: u32 },
    LevelStarted { number: u32 },
    HuntingPhaseStarted { index: usize },
    PelletEaten,
    EnergizerEaten,
    PacGetsPower,
    PacLostPower,
    BonusActivated { symbol: u8 },
    BonusEaten { symbol: u8, points: u32 },
    BonusExpired,
    GhostReleased { personality: Personality },
    GhostEaten { personality: Personality, points: u32 },
    PacDying,
    PacDead,
    LevelCompleted { number: u32 },
    GameOver,
    ExtraLifeWon,
    NewHighScore,
    StopAllSounds,
    IntermissionStarted { number: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_timer_expires() {
        let mut timer = StateTimer::new(GameFlowState::EatingGhost.timer_duration());
        for _ in 0..59 {
            timer.tick();
        }
        assert!(!timer.has_expired());
        timer.tick();
        assert!(timer.has_expired());
        assert_eq!(timer.tick_count(), 60);
        timer.tick();
        assert_eq!(timer.tick_count(), 60);
    }

    #[test]
    fn test_indefinite_timer_needs_expire() {
        let mut timer = StateTimer::new(None);
        for _ in 0..10_000 {
            timer.tick();
        }
        assert!(!timer.has_expired());
        timer.expire();
        assert!(timer.has_expired());
        timer.restart(Some(5));
        assert!(!timer.has_expired());
        assert_eq!(timer.tick_count(), 0);
    }

    #[test]
    fn test_timer_durations() {
        let fixed: Vec<_> = GameFlowState::ALL
            .into_iter()
            .filter_map(|s| s.timer_duration().map(|d| (s, d)))
            .collect();
        assert_eq!(
            fixed,
            vec![
                (GameFlowState::LevelTransition, 120),
                (GameFlowState::EatingGhost, 60),
                (GameFlowState::GameOver, 180),
            ]
        );
        assert!(!GameFlowState::PacDying.ends_with_scene());
        assert!(GameFlowState::Intermission.ends_with_scene());
    }
}
