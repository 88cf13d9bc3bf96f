//! Ghost release policy
//!
//! Decides when a caged ghost may leave the house. Each ghost has a private
//! food counter; after Pac has died a shared global counter takes over until
//! Orange is out. A starvation timer forces a release when Pac stops eating.

use serde::{Deserialize, Serialize};

use super::actors::{Ghost, GhostState, Personality};

/// Global counter value that switches the global counter off again
const GLOBAL_COUNTER_OFF: u32 = 32;

/// Global counter limits per personality (Red and Orange have none)
const GLOBAL_LIMITS: [Option<u32>; 4] = [None, Some(7), Some(17), None];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseReason {
    /// Red never waits
    Immediate,
    PrivateCounter,
    GlobalCounter,
    /// Pac has not eaten for too long
    Starvation,
}

/// Private food limits per personality for a level
pub fn private_limits(level: u32) -> [u32; 4] {
    assert!(level >= 1, "level numbers start at 1, got {level}");
    match level {
        1 => [0, 0, 30, 60],
        2 => [0, 0, 0, 50],
        _ => [0; 4],
    }
}

/// Ticks without eating before a release is forced
pub fn starvation_limit(level: u32) -> u32 {
    if level < 5 { 240 } else { 180 }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateKeeper {
    private_counters: [u32; 4],
    private_limits: [u32; 4],
    global_counter: u32,
    global_enabled: bool,
    starving_ticks: u32,
    starvation_limit: u32,
}

impl Default for GateKeeper {
    fn default() -> Self {
        Self::new(1)
    }
}

impl GateKeeper {
    pub fn new(level: u32) -> Self {
        let mut keeper = Self {
            private_counters: [0; 4],
            private_limits: [0; 4],
            global_counter: 0,
            global_enabled: false,
            starving_ticks: 0,
            starvation_limit: 0,
        };
        keeper.reset(level);
        keeper
    }

    /// Fresh counters for a level start
    pub fn reset(&mut self, level: u32) {
        self.private_counters = [0; 4];
        self.private_limits = private_limits(level);
        self.global_counter = 0;
        self.global_enabled = false;
        self.starving_ticks = 0;
        self.starvation_limit = starvation_limit(level);
    }

    /// Switch to the global counter (after Pac lost a life)
    pub fn enable_global_counter(&mut self) {
        self.global_counter = 0;
        self.global_enabled = true;
        log::debug!("Global ghost release counter enabled");
    }

    pub fn global_counter_enabled(&self) -> bool {
        self.global_enabled
    }

    pub fn global_counter(&self) -> u32 {
        self.global_counter
    }

    pub fn private_counter(&self, personality: Personality) -> u32 {
        self.private_counters[personality.index()]
    }

    pub fn starving_ticks(&self) -> u32 {
        self.starving_ticks
    }

    /// Count one eaten pellet or energizer
    pub fn register_food_eaten(&mut self, ghosts: &[Ghost]) {
        self.starving_ticks = 0;
        let caged = |p: Personality| is_caged(ghosts, p);
        if self.global_enabled {
            if caged(Personality::Orange) && self.global_counter == GLOBAL_COUNTER_OFF {
                self.global_enabled = false;
                self.global_counter = 0;
                log::debug!("Global ghost release counter disabled");
            } else {
                self.global_counter += 1;
            }
        } else if let Some(p) = Personality::ALL
            .into_iter()
            .filter(|&p| p != Personality::Red)
            .find(|&p| caged(p))
        {
            self.private_counters[p.index()] += 1;
        }
    }

    /// Release at most one caged ghost. Called once per hunting tick.
    /// The starvation timer counts ticks since food was last eaten, or since
    /// the last forced release; counter-based releases do not reset it.
    pub fn unlock_ghosts(&mut self, ghosts: &mut [Ghost]) -> Option<(Personality, ReleaseReason)> {
        self.starving_ticks += 1;
        let ghost = Personality::ALL.into_iter().find_map(|p| {
            ghosts
                .iter()
                .position(|g| g.personality == p && g.state == GhostState::Caged)
        })?;
        let personality = ghosts[ghost].personality;
        let reason = self.release_reason(personality)?;
        if reason == ReleaseReason::Starvation {
            self.starving_ticks = 0;
        }
        ghosts[ghost].state = GhostState::LeavingHouse;
        log::debug!("{} released ({reason:?})", personality.name());
        Some((personality, reason))
    }

    fn release_reason(&self, personality: Personality) -> Option<ReleaseReason> {
        let i = personality.index();
        if personality == Personality::Red {
            return Some(ReleaseReason::Immediate);
        }
        if !self.global_enabled && self.private_counters[i] >= self.private_limits[i] {
            return Some(ReleaseReason::PrivateCounter);
        }
        if self.global_enabled
            && GLOBAL_LIMITS[i].is_some_and(|limit| self.global_counter >= limit)
        {
            return Some(ReleaseReason::GlobalCounter);
        }
        if self.starving_ticks >= self.starvation_limit {
            return Some(ReleaseReason::Starvation);
        }
        None
    }
}

fn is_caged(ghosts: &[Ghost], personality: Personality) -> bool {
    ghosts
        .iter()
        .any(|g| g.personality == personality && g.state == GhostState::Caged)
}
