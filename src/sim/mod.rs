//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (ghosts in personality order)
//! - No rendering, audio or platform dependencies

pub mod actors;
pub mod gatekeeper;
pub mod hunt;
pub mod hunting;
pub mod level;
pub mod speed;
pub mod state;
pub mod steering;
pub mod tick;
pub mod world;

pub use actors::{Bonus, BonusState, Direction, Ghost, GhostState, Pac, PacAnimation, Personality};
pub use gatekeeper::{GateKeeper, ReleaseReason};
pub use hunt::{HuntContext, HuntOutcome, hunting_step};
pub use hunting::{HuntingPhase, HuntingTimer};
pub use level::{Level, RoundContext};
pub use speed::ActorSpeedInputs;
pub use state::{GameEvent, GameFlowState, StateTimer};
pub use steering::Autopilot;
pub use tick::{GameSession, TickInput};
pub use world::{Food, GridWorld, House, Portal, SAMPLE_MAZE, Terrain};
