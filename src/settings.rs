//! Game options
//!
//! Chosen before a game starts and read-only during a session. Persisting
//! them is up to the host; JSON is the exchange format.

use serde::{Deserialize, Serialize};

use crate::consts::LAST_LEVEL_NUMBER;
use crate::error::{GameError, GameResult};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Crazy,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Crazy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Crazy => "Crazy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "crazy" => Some(Difficulty::Crazy),
            _ => None,
        }
    }
}

/// Pac booster mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PacBooster {
    #[default]
    Off,
    AlwaysOn,
    /// Active only while the booster button is held
    OnDemand,
}

impl PacBooster {
    pub fn as_str(&self) -> &'static str {
        match self {
            PacBooster::Off => "Off",
            PacBooster::AlwaysOn => "Always On",
            PacBooster::OnDemand => "On Demand",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "off" => Some(PacBooster::Off),
            "alwayson" | "always" => Some(PacBooster::AlwaysOn),
            "ondemand" | "button" => Some(PacBooster::OnDemand),
            _ => None,
        }
    }

    /// Whether the booster applies this tick
    pub fn is_effective(&self, button_held: bool) -> bool {
        match self {
            PacBooster::Off => false,
            PacBooster::AlwaysOn => true,
            PacBooster::OnDemand => button_held,
        }
    }
}

/// Maze set. Selects external map data and the bonus symbol range only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MapCategory {
    #[default]
    Arcade,
    Mini,
    Big,
    Strange,
}

impl MapCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MapCategory::Arcade => "Arcade",
            MapCategory::Mini => "Mini",
            MapCategory::Big => "Big",
            MapCategory::Strange => "Strange",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "arcade" => Some(MapCategory::Arcade),
            "mini" => Some(MapCategory::Mini),
            "big" => Some(MapCategory::Big),
            "strange" => Some(MapCategory::Strange),
            _ => None,
        }
    }
}

/// Game options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    pub booster: PacBooster,
    pub map_category: MapCategory,
    /// First level of a new game (1..=32)
    pub start_level: u32,

    // === Cheats ===
    /// Ghosts cannot kill Pac
    pub immunity: bool,
    /// Pac is steered by the autopilot
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            booster: PacBooster::Off,
            map_category: MapCategory::Arcade,
            start_level: 1,
            immunity: false,
            autopilot: false,
        }
    }
}

impl Settings {
    /// Parse and validate a JSON settings document
    pub fn from_json(json: &str) -> GameResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        log::info!(
            "Loaded settings: {} / booster {} / {} maps / start level {}",
            settings.difficulty.as_str(),
            settings.booster.as_str(),
            settings.map_category.as_str(),
            settings.start_level
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> GameResult<()> {
        if !(1..=LAST_LEVEL_NUMBER).contains(&self.start_level) {
            return Err(GameError::InvalidLevel {
                level: self.start_level,
                max: LAST_LEVEL_NUMBER,
            });
        }
        Ok(())
    }

    /// Change the start level (options screen)
    pub fn select_start_level(&mut self, level: u32) -> GameResult<()> {
        if !(1..=LAST_LEVEL_NUMBER).contains(&level) {
            return Err(GameError::InvalidLevel {
                level,
                max: LAST_LEVEL_NUMBER,
            });
        }
        self.start_level = level;
        Ok(())
    }

    /// Any cheat enabled
    pub fn cheats_enabled(&self) -> bool {
        self.immunity || self.autopilot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_partial_document_uses_defaults() {
        let settings = Settings::from_json(r#"{"difficulty":"Hard","start_level":12}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.start_level, 12);
        assert_eq!(settings.booster, PacBooster::Off);
        assert!(!settings.cheats_enabled());
    }

    #[test]
    fn test_from_json_rejects_level_out_of_range() {
        let err = Settings::from_json(r#"{"start_level":33}"#).unwrap_err();
        assert_eq!(err, GameError::InvalidLevel { level: 33, max: 32 });
        assert!(Settings::from_json(r#"{"start_level":0}"#).is_err());
    }

    #[test]
    fn test_from_json_rejects_unknown_enum_value() {
        let err = Settings::from_json(r#"{"difficulty":"Insane"}"#).unwrap_err();
        assert!(matches!(err, GameError::InvalidSettings(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.booster = PacBooster::OnDemand;
        settings.select_start_level(7).unwrap();
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_names() {
        assert_eq!(Difficulty::from_str("CRAZY"), Some(Difficulty::Crazy));
        assert_eq!(PacBooster::from_str("always-on"), Some(PacBooster::AlwaysOn));
        assert_eq!(PacBooster::from_str("On Demand"), Some(PacBooster::OnDemand));
        assert_eq!(MapCategory::from_str("big"), Some(MapCategory::Big));
        assert_eq!(MapCategory::from_str("huge"), None);
    }

    #[test]
    fn test_booster_effective() {
        assert!(!PacBooster::Off.is_effective(true));
        assert!(PacBooster::AlwaysOn.is_effective(false));
        assert!(PacBooster::OnDemand.is_effective(true));
        assert!(!PacBooster::OnDemand.is_effective(false));
    }
}
