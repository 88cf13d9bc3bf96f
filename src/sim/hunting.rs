//! Scatter/chase schedule
//!
//! Eight phases per level, alternating scatter (even index) and chase (odd
//! index). The last phase never ends.

use serde::{Deserialize, Serialize};

/// Duration marking a phase that runs until the level ends
pub const INDEFINITE: u32 = u32::MAX;

/// Phase durations in ticks for levels 1-4
pub const HUNTING_TICKS_LEVEL_1_TO_4: [u32; 8] = [420, 1200, 420, 1200, 300, 1200, 300, INDEFINITE];
/// Phase durations in ticks for levels 5 and up
pub const HUNTING_TICKS_LEVEL_5_PLUS: [u32; 8] = [300, 1200, 300, 1200, 300, 62220, 1, INDEFINITE];

const LAST_PHASE: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HuntingPhase {
    Scatter,
    Chase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuntingTimer {
    durations: [u32; 8],
    phase_index: usize,
    remaining: u32,
    running: bool,
}

impl Default for HuntingTimer {
    fn default() -> Self {
        Self {
            durations: HUNTING_TICKS_LEVEL_1_TO_4,
            phase_index: 0,
            remaining: HUNTING_TICKS_LEVEL_1_TO_4[0],
            running: false,
        }
    }
}

impl HuntingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Duration table for a level
    pub fn durations_for_level(level: u32) -> &'static [u32; 8] {
        assert!(level >= 1, "level numbers start at 1, got {level}");
        if level <= 4 {
            &HUNTING_TICKS_LEVEL_1_TO_4
        } else {
            &HUNTING_TICKS_LEVEL_5_PLUS
        }
    }

    /// Select the level's table and start the first scatter phase
    pub fn start(&mut self, level: u32) {
        self.durations = *Self::durations_for_level(level);
        self.phase_index = 0;
        self.remaining = self.durations[0];
        self.running = true;
        log::debug!("Hunting timer started for level {level}: {:?}", self.durations);
    }

    /// Advance one tick. Returns true when a new phase began.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.remaining == INDEFINITE {
            return false;
        }
        self.remaining -= 1;
        if self.remaining > 0 || self.phase_index == LAST_PHASE {
            return false;
        }
        self.phase_index += 1;
        self.remaining = self.durations[self.phase_index];
        log::debug!(
            "Hunting phase {} ({:?}) begins",
            self.phase_index,
            self.phase_kind()
        );
        true
    }

    /// Suspend the schedule (Pac has power)
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Continue a suspended schedule
    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn current_phase(&self) -> usize {
        self.phase_index
    }

    pub fn phase_kind(&self) -> HuntingPhase {
        if self.phase_index % 2 == 0 {
            HuntingPhase::Scatter
        } else {
            HuntingPhase::Chase
        }
    }

    /// Ticks left in the current phase, `None` for the unbounded last phase
    pub fn remaining_ticks(&self) -> Option<u32> {
        (self.remaining != INDEFINITE).then_some(self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_selection() {
        assert_eq!(HuntingTimer::durations_for_level(1), &HUNTING_TICKS_LEVEL_1_TO_4);
        assert_eq!(HuntingTimer::durations_for_level(4), &HUNTING_TICKS_LEVEL_1_TO_4);
        assert_eq!(HuntingTimer::durations_for_level(5), &HUNTING_TICKS_LEVEL_5_PLUS);
        assert_eq!(HuntingTimer::durations_for_level(32), &HUNTING_TICKS_LEVEL_5_PLUS);
    }

    #[test]
    fn test_first_phase_change() {
        let mut timer = HuntingTimer::new();
        timer.start(1);
        assert_eq!(timer.phase_kind(), HuntingPhase::Scatter);
        for _ in 0..419 {
            assert!(!timer.tick());
        }
        assert!(timer.tick());
        assert_eq!(timer.current_phase(), 1);
        assert_eq!(timer.phase_kind(), HuntingPhase::Chase);
        assert_eq!(timer.remaining_ticks(), Some(1200));
    }

    #[test]
    fn test_reaches_unbounded_last_phase() {
        let mut timer = HuntingTimer::new();
        timer.start(5);
        let total: u32 = HUNTING_TICKS_LEVEL_5_PLUS[..7].iter().sum();
        for _ in 0..total {
            timer.tick();
        }
        assert_eq!(timer.current_phase(), 7);
        assert_eq!(timer.remaining_ticks(), None);
        for _ in 0..10_000 {
            assert!(!timer.tick());
        }
        assert_eq!(timer.current_phase(), 7);
        assert_eq!(timer.phase_kind(), HuntingPhase::Chase);
    }

    #[test]
    fn test_stop_suspends_phase() {
        let mut timer = HuntingTimer::new();
        timer.start(2);
        timer.tick();
        timer.stop();
        for _ in 0..1000 {
            timer.tick();
        }
        assert_eq!(timer.current_phase(), 0);
        assert_eq!(timer.remaining_ticks(), Some(419));
        timer.resume();
        timer.tick();
        assert_eq!(timer.remaining_ticks(), Some(418));
    }

    #[test]
    fn test_restart_resets_phase() {
        let mut timer = HuntingTimer::new();
        timer.start(1);
        for _ in 0..500 {
            timer.tick();
        }
        assert_eq!(timer.current_phase(), 1);
        timer.start(6);
        assert_eq!(timer.current_phase(), 0);
        assert_eq!(timer.remaining_ticks(), Some(300));
    }
}
