//! wasm-bindgen surface for the browser front-end

use wasm_bindgen::prelude::*;

use crate::highscores::LocalStore;
use crate::input::{intent_for_key, intent_for_pointer};
use crate::runner::Simulation;
use crate::tuning::Tuning;

/// Install the console logger and panic hook (idempotent)
#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Aries Runner core loaded");
}

/// Browser handle to a running simulation
#[wasm_bindgen]
pub struct WebRunner {
    sim: Simulation,
}

#[wasm_bindgen]
impl WebRunner {
    /// Create a runner. `tuning_json` may be empty for defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, tuning_json: &str) -> Result<WebRunner, JsValue> {
        let tuning = if tuning_json.trim().is_empty() {
            Tuning::default()
        } else {
            Tuning::from_json(tuning_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        Ok(Self {
            sim: Simulation::new(seed, tuning, Box::new(LocalStore)),
        })
    }

    /// Pointer/touch down at `x` on a surface `width` wide
    pub fn pointer_down(&mut self, x: f32, width: f32) {
        self.sim.push_intent(intent_for_pointer(x, width));
    }

    /// Key down, by `KeyboardEvent.code`
    pub fn key_down(&mut self, code: &str) {
        if let Some(intent) = intent_for_key(code) {
            self.sim.push_intent(intent);
        }
    }

    /// Advance by a frame's elapsed milliseconds; returns the events as JSON
    pub fn frame(&mut self, dt_ms: f64) -> String {
        let events = self.sim.advance((dt_ms / 1000.0) as f32);
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Event serialization failed: {}", e);
            "[]".to_string()
        })
    }

    /// Full state snapshot as JSON for the renderer
    pub fn snapshot(&self) -> String {
        serde_json::to_string(self.sim.state()).unwrap_or_else(|e| {
            log::warn!("Snapshot serialization failed: {}", e);
            "{}".to_string()
        })
    }

    pub fn best_score(&mut self) -> u64 {
        self.sim.refresh_best_score()
    }

    pub fn score(&self) -> u64 {
        self.sim.state().total_score()
    }
}
