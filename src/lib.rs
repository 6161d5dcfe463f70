//! Aries Runner - An endless-runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor, track streaming, collisions, scoring)
//! - `input`: Discrete intents and the sources that produce them
//! - `runner`: Fixed-step driver, event stream, best-score reporting
//! - `highscores`: Best-score persistence boundary
//! - `platform`: Browser bindings (wasm32 only)
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod input;
pub mod platform;
pub mod runner;
pub mod sim;
pub mod tuning;

pub use highscores::{BestScore, ScoreStore, StoreError};
pub use input::{InputSource, Intent};
pub use runner::Simulation;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (tab switches, debugger stops)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Number of whole fixed ticks covering `seconds` (at least one)
#[inline]
pub fn seconds_to_ticks(seconds: f32, dt: f32) -> u64 {
    if dt <= 0.0 {
        return 1;
    }
    ((seconds / dt).round() as u64).max(1)
}
