//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads lives in [`Tuning`]. Values
//! deserialize from JSON with per-field defaults, so a balance file only needs
//! to mention the numbers it overrides.
//!
//! Coordinates are screen space: +x runs forward, +y points down.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on `max_jumps`: ground jump plus one air jump
pub const MAX_JUMPS_LIMIT: u8 = 2;

/// Errors raised while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tuning json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Tunable simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Actor physics ===
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Vertical velocity applied by a jump (negative is up)
    pub jump_velocity: f32,
    /// Extra horizontal speed on top of run speed while dashing
    pub dash_boost: f32,
    /// Dash window (seconds)
    pub dash_duration: f32,
    /// Jumps allowed per ground contact (1 or 2)
    pub max_jumps: u8,
    /// Flip rotation window after a double jump (seconds)
    pub flip_duration: f32,
    /// Actor falls out of the world below this y
    pub death_y: f32,
    /// Actor spawn x
    pub start_x: f32,
    /// Actor bounding box (width, height)
    pub actor_size: Vec2,

    // === Track streaming ===
    /// Distance between consecutive platform centers
    pub spawn_stride: f32,
    /// Spawn while the actor is within this distance of the frontier
    pub lookahead: f32,
    /// Despawn segments further than this behind the actor
    pub trailing_window: f32,
    /// Chance a spawned platform carries a hazard
    pub hazard_probability: f32,
    /// Hazard x offset from its platform (min, max)
    pub hazard_offset_range: (f32, f32),
    /// Hazard-free platforms laid before hazards are enabled
    pub safe_start_segments: u32,
    /// Platform center y
    pub floor_y: f32,
    /// Platform bounding box (width, height)
    pub platform_size: Vec2,
    /// Hazard bounding box (width, height)
    pub hazard_size: Vec2,

    // === Scoring / difficulty ===
    /// Pixels per distance point
    pub distance_unit: f32,
    /// Points awarded for dashing through a hazard
    pub hazard_bonus: u64,
    /// Total-score points per speed level
    pub speed_ramp_interval: u64,
    /// Run speed added per speed level
    pub speed_increment: f32,
    /// Run speed at the start of a run (pixels/s)
    pub initial_speed: f32,

    // === Run lifecycle ===
    /// Delay between death and the score report (seconds)
    pub death_report_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 1400.0,
            jump_velocity: -700.0,
            dash_boost: 500.0,
            dash_duration: 0.2,
            max_jumps: 2,
            flip_duration: 0.4,
            death_y: 700.0,
            start_x: 100.0,
            actor_size: Vec2::new(32.0, 32.0),

            spawn_stride: 60.0,
            lookahead: 1600.0,
            trailing_window: 400.0,
            hazard_probability: 0.3,
            hazard_offset_range: (8.0, 40.0),
            safe_start_segments: 25,
            floor_y: 550.0,
            platform_size: Vec2::new(64.0, 64.0),
            hazard_size: Vec2::new(28.0, 28.0),

            distance_unit: 100.0,
            hazard_bonus: 50,
            speed_ramp_interval: 500,
            speed_increment: 40.0,
            initial_speed: 300.0,

            death_report_delay: 1.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if self.max_jumps == 0 {
            return invalid("max_jumps", "must allow at least one jump");
        }
        if self.max_jumps > MAX_JUMPS_LIMIT {
            return invalid("max_jumps", "at most a double jump");
        }
        if self.spawn_stride <= 0.0 {
            return invalid("spawn_stride", "must be positive");
        }
        if self.spawn_stride > self.platform_size.x {
            return invalid("spawn_stride", "must not exceed platform width (gaps are fatal)");
        }
        if self.lookahead <= self.spawn_stride {
            return invalid("lookahead", "must exceed spawn_stride");
        }
        if self.trailing_window < 0.0 {
            return invalid("trailing_window", "must not be negative");
        }
        if !(0.0..=1.0).contains(&self.hazard_probability) {
            return invalid("hazard_probability", "must be within 0..=1");
        }
        if self.hazard_offset_range.0 > self.hazard_offset_range.1 {
            return invalid("hazard_offset_range", "min must not exceed max");
        }
        if self.distance_unit <= 0.0 {
            return invalid("distance_unit", "must be positive");
        }
        if self.speed_ramp_interval == 0 {
            return invalid("speed_ramp_interval", "must be positive");
        }
        if self.speed_increment < 0.0 {
            return invalid("speed_increment", "speed may never decrease");
        }
        if self.initial_speed <= 0.0 {
            return invalid("initial_speed", "actor must advance");
        }
        if self.dash_duration <= 0.0 {
            return invalid("dash_duration", "must be positive");
        }
        Ok(())
    }

    /// Y of the walkable platform surface
    #[inline]
    pub fn floor_top(&self) -> f32 {
        self.floor_y - self.platform_size.y / 2.0
    }

    /// Actor center y when resting on the floor
    #[inline]
    pub fn actor_rest_y(&self) -> f32 {
        self.floor_top() - self.actor_size.y / 2.0
    }

    /// Hazard center y when resting on the floor
    #[inline]
    pub fn hazard_rest_y(&self) -> f32 {
        self.floor_top() - self.hazard_size.y / 2.0
    }
}
