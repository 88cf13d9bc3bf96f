use std::fmt;

/// Configuration errors. These surface from construction APIs only; the
/// per-tick update path never produces them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameError {
    /// Level number outside 1..=max
    InvalidLevel { level: u32, max: u32 },
    /// Ghost personality id other than 0..=3
    InvalidPersonality(u8),
    /// Unknown difficulty name
    InvalidDifficulty(String),
    /// Unknown booster mode name
    InvalidBooster(String),
    /// Unknown map category name
    InvalidMapCategory(String),
    /// Settings document could not be parsed
    InvalidSettings(String),
    /// Maze rows are ragged or contain an unknown character
    MalformedMaze { row: usize, reason: String },
    /// Maze lacks a required start tile
    MissingStart(&'static str),
    /// Maze has no ghost house (door tile)
    MissingHouse,
    /// Maze has no portal row
    MissingPortal,
}

/// Type alias for Results using GameError
pub type GameResult<T> = Result<T, GameError>;

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLevel { level, max } => {
                write!(f, "invalid level number {level} (allowed 1..={max})")
            }
            Self::InvalidPersonality(id) => write!(f, "invalid ghost personality id: {id}"),
            Self::InvalidDifficulty(name) => write!(f, "unknown difficulty: {name:?}"),
            Self::InvalidBooster(name) => write!(f, "unknown booster mode: {name:?}"),
            Self::InvalidMapCategory(name) => write!(f, "unknown map category: {name:?}"),
            Self::InvalidSettings(msg) => write!(f, "invalid settings: {msg}"),
            Self::MalformedMaze { row, reason } => write!(f, "malformed maze at row {row}: {reason}"),
            Self::MissingStart(what) => write!(f, "maze has no start tile for {what}"),
            Self::MissingHouse => write!(f, "maze has no ghost house"),
            Self::MissingPortal => write!(f, "maze has no portal"),
        }
    }
}

impl std::error::Error for GameError {}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::InvalidSettings(err.to_string())
    }
}
