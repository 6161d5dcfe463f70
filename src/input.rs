//! Discrete player intents and where they come from
//!
//! The simulation only ever sees [`Intent`] values. Pointer and keyboard
//! handlers translate device events with [`intent_for_pointer`] and
//! [`intent_for_key`]; tests and demos feed intents through [`ScriptedInput`]
//! or let [`Autopilot`] play.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, GameState};

/// A discrete input event, decoupled from its physical source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Jump,
    Dash,
    Restart,
}

/// Produces the intents for the tick about to run
pub trait InputSource {
    fn poll(&mut self, state: &GameState) -> Vec<Intent>;
}

/// Tap zones: left half jumps, right half dashes
pub fn intent_for_pointer(x: f32, surface_width: f32) -> Intent {
    if x < surface_width / 2.0 {
        Intent::Jump
    } else {
        Intent::Dash
    }
}

/// Keyboard equivalents, keyed by `KeyboardEvent.code`
pub fn intent_for_key(code: &str) -> Option<Intent> {
    match code {
        "Space" | "ArrowUp" | "KeyW" => Some(Intent::Jump),
        "KeyD" | "ShiftLeft" | "ShiftRight" => Some(Intent::Dash),
        "KeyR" | "Enter" => Some(Intent::Restart),
        _ => None,
    }
}

/// FIFO filled by device handlers, drained once per tick
#[derive(Debug, Clone, Default)]
pub struct IntentQueue {
    queue: VecDeque<Intent>,
}

impl IntentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, intent: Intent) {
        self.queue.push_back(intent);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Intent> {
        self.queue.drain(..).collect()
    }
}

impl InputSource for IntentQueue {
    fn poll(&mut self, _state: &GameState) -> Vec<Intent> {
        self.drain()
    }
}

/// Replays intents at fixed tick numbers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptedInput {
    script: BTreeMap<u64, Vec<Intent>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `intent` on tick number `tick` (ticks count from 1)
    pub fn at(mut self, tick: u64, intent: Intent) -> Self {
        self.script.entry(tick).or_default().push(intent);
        self
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, state: &GameState) -> Vec<Intent> {
        self.script
            .remove(&(state.time_ticks + 1))
            .unwrap_or_default()
    }
}

/// Simple bot for demos: dashes through (or jumps over) the next hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Autopilot {
    /// React when the next hazard is this many seconds away at run speed
    pub lead_time: f32,
    /// Dash through hazards when possible instead of jumping
    pub prefer_dash: bool,
    /// Start a new run as soon as the last one is reported
    pub auto_restart: bool,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            lead_time: 0.06,
            prefer_dash: true,
            auto_restart: false,
        }
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, state: &GameState) -> Vec<Intent> {
        match state.phase {
            GamePhase::Reported if self.auto_restart => return vec![Intent::Restart],
            GamePhase::Running => {}
            _ => return Vec::new(),
        }

        let actor = &state.actor;
        let front = actor.bounds().max.x;
        let Some(gap) = state
            .track
            .hazards()
            .map(|h| h.bounds().min.x - front)
            .find(|gap| *gap >= 0.0)
        else {
            return Vec::new();
        };

        if gap > state.world.speed * self.lead_time {
            return Vec::new();
        }
        if self.prefer_dash && !actor.is_dashing() {
            vec![Intent::Dash]
        } else if actor.is_grounded() {
            vec![Intent::Jump]
        } else {
            Vec::new()
        }
    }
}
