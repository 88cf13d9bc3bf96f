//! Score accumulator and high score
//!
//! Serializable so the host can persist the high score; the core never
//! touches storage itself.

use serde::{Deserialize, Serialize};

use crate::consts::EXTRA_LIFE_SCORE;

/// High score entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub points: u32,
    /// Level reached when the high score was set
    pub level: u32,
}

/// Score of the running game plus the high score it competes with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    pub points: u32,
    pub high_score: HighScore,
    /// False while scoring is disabled (demo level)
    #[serde(skip, default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(skip)]
    extra_life_awarded: bool,
    #[serde(skip)]
    high_score_taken: bool,
}

/// Result of adding points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreChange {
    pub extra_life: bool,
    pub new_high_score: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl Default for Score {
    fn default() -> Self {
        Self::new(HighScore::default())
    }
}

impl Score {
    /// Create an empty score competing with the given high score
    pub fn new(high_score: HighScore) -> Self {
        Self {
            points: 0,
            high_score,
            enabled: true,
            extra_life_awarded: false,
            high_score_taken: false,
        }
    }

    /// Add points; the high score follows the running score
    pub fn add_points(&mut self, points: u32, level: u32) -> ScoreChange {
        if !self.enabled {
            return ScoreChange::default();
        }
        let before = self.points;
        self.points += points;

        let mut change = ScoreChange::default();
        if !self.extra_life_awarded && before < EXTRA_LIFE_SCORE && self.points >= EXTRA_LIFE_SCORE {
            self.extra_life_awarded = true;
            change.extra_life = true;
        }
        if self.points > self.high_score.points {
            change.new_high_score = !self.high_score_taken;
            self.high_score_taken = true;
            self.high_score = HighScore {
                points: self.points,
                level,
            };
        }
        change
    }

    /// Check if the running score beats a stored high score
    pub fn beats(&self, stored: &HighScore) -> bool {
        self.points > stored.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_life_awarded_once() {
        let mut score = Score::new(HighScore::default());
        assert!(!score.add_points(9_990, 1).extra_life);
        assert!(score.add_points(10, 1).extra_life);
        assert!(!score.add_points(10_000, 2).extra_life);
        assert_eq!(score.points, 20_000);
    }

    #[test]
    fn test_high_score_follows_points() {
        let mut score = Score::new(HighScore { points: 100, level: 3 });
        score.add_points(50, 1);
        assert_eq!(score.high_score.points, 100);
        let change = score.add_points(60, 2);
        assert!(change.new_high_score);
        assert_eq!(score.high_score, HighScore { points: 110, level: 2 });
        // Already the high score - not reported again
        assert!(!score.add_points(10, 2).new_high_score);
    }

    #[test]
    fn test_disabled_score_ignores_points() {
        let mut score = Score::new(HighScore::default());
        score.enabled = false;
        score.add_points(500, 1);
        assert_eq!(score.points, 0);
    }

    #[test]
    fn test_default_score_counts_points() {
        let mut score = Score::default();
        score.add_points(500, 1);
        assert_eq!(score.points, 500);
        assert!(score.beats(&HighScore::default()));
    }

    #[test]
    fn test_restored_score_keeps_counting() {
        let mut score = Score::new(HighScore { points: 300, level: 2 });
        score.add_points(100, 1);
        let json = serde_json::to_string(&score).unwrap();
        let mut restored: Score = serde_json::from_str(&json).unwrap();
        assert!(restored.enabled);
        assert_eq!(restored.points, 100);
        assert_eq!(restored.high_score, HighScore { points: 300, level: 2 });
        restored.add_points(500, 3);
        assert_eq!(restored.points, 600);
        assert_eq!(restored.high_score, HighScore { points: 600, level: 3 });
    }
}
