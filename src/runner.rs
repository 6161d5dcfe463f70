//! Fixed-step driver around the simulation
//!
//! [`Simulation`] owns the game state, collects intents between ticks, runs
//! the fixed-timestep accumulator and turns death reports into best-score
//! updates. Everything it emits is a [`GameEvent`]; rendering and audio only
//! ever listen.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::{self, ScoreStore};
use crate::input::{InputSource, Intent};
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// The simulation loop plus its best-score store
pub struct Simulation {
    state: GameState,
    store: Box<dyn ScoreStore>,
    /// Best score as of the last menu read or report
    best_score: u64,
    accumulator: f32,
    /// Intents received since the last tick
    pending: Vec<Intent>,
}

impl Simulation {
    pub fn new(seed: u64, tuning: Tuning, store: Box<dyn ScoreStore>) -> Self {
        let best_score = highscores::load_or_zero(store.as_ref());
        log::info!("Simulation ready (seed {}, best score {})", seed, best_score);
        Self {
            state: GameState::new(seed, tuning),
            store,
            best_score,
            accumulator: 0.0,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Re-read the stored best (menu display)
    pub fn refresh_best_score(&mut self) -> u64 {
        self.best_score = highscores::load_or_zero(self.store.as_ref());
        self.best_score
    }

    /// Queue an intent for the next tick
    pub fn push_intent(&mut self, intent: Intent) {
        self.pending.push(intent);
    }

    /// Run exactly one fixed tick with the queued intents
    pub fn step(&mut self) -> Vec<GameEvent> {
        let input = TickInput::from_intents(&self.pending);
        self.pending.clear();
        let mut events = Vec::new();
        self.tick_once(&input, &mut events);
        events
    }

    /// Feed a frame's worth of wall time through the fixed-step accumulator
    pub fn advance(&mut self, frame_dt: f32) -> Vec<GameEvent> {
        // NaN would poison the accumulator for good
        if !frame_dt.is_finite() {
            log::warn!("Ignoring non-finite frame delta {}", frame_dt);
            return Vec::new();
        }
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput::from_intents(&self.pending);
            // One-shot intents apply to the first substep only
            self.pending.clear();
            self.tick_once(&input, &mut events);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop the backlog instead of carrying it into the next frame
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        events
    }

    /// Drive `ticks` fixed ticks from an input source
    pub fn run<S: InputSource + ?Sized>(&mut self, source: &mut S, ticks: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            let mut intents = source.poll(&self.state);
            intents.append(&mut self.pending);
            let input = TickInput::from_intents(&intents);
            self.tick_once(&input, &mut events);
        }
        events
    }

    fn tick_once(&mut self, input: &TickInput, events: &mut Vec<GameEvent>) {
        // A restart must not swallow the report of a run that died moments ago
        if input.restart {
            self.state.flush_report();
            self.report(events);
        }
        tick(&mut self.state, input, SIM_DT, events);
        self.report(events);
    }

    fn report(&mut self, events: &mut Vec<GameEvent>) {
        let Some(final_score) = self.state.take_pending_report() else {
            return;
        };
        let outcome = highscores::record_if_improved(self.store.as_mut(), final_score);
        self.best_score = self.best_score.max(outcome.best_score);
        events.push(GameEvent::RunReported {
            final_score,
            best_score: self.best_score,
            new_best: outcome.new_best,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;

    #[test]
    fn test_reads_best_at_start() {
        let sim = Simulation::new(1, Tuning::default(), Box::new(MemoryStore::with_best(77)));
        assert_eq!(sim.best_score(), 77);
        assert_eq!(sim.phase(), GamePhase::Running);
    }

    #[test]
    fn test_advance_caps_substeps() {
        let mut sim = Simulation::new(1, Tuning::default(), Box::new(MemoryStore::new()));
        sim.advance(10.0);
        assert_eq!(sim.state().time_ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_advance_accumulates_partial_frames() {
        let mut sim = Simulation::new(1, Tuning::default(), Box::new(MemoryStore::new()));
        sim.advance(SIM_DT * 0.5);
        assert_eq!(sim.state().time_ticks, 0);
        sim.advance(SIM_DT * 0.6);
        assert_eq!(sim.state().time_ticks, 1);
    }

    #[test]
    fn test_non_finite_frame_is_skipped() {
        let mut sim = Simulation::new(1, Tuning::default(), Box::new(MemoryStore::new()));
        assert!(sim.advance(f32::NAN).is_empty());
        assert!(sim.advance(f32::INFINITY).is_empty());
        assert_eq!(sim.state().time_ticks, 0);
        for _ in 0..60 {
            sim.advance(1.0 / 60.0);
        }
        // 60 frames at 60 Hz is one second of 120 Hz ticks (give or take float drift)
        let ticks = sim.state().time_ticks;
        assert!((119..=120).contains(&ticks), "ticks = {}", ticks);
    }

    #[test]
    fn test_backlog_dropped_at_substep_cap() {
        let mut sim = Simulation::new(1, Tuning::default(), Box::new(MemoryStore::new()));
        for _ in 0..10 {
            sim.advance(MAX_FRAME_DT);
        }
        assert_eq!(sim.state().time_ticks, 10 * MAX_SUBSTEPS as u64);
        // Once frames speed up again there is no catch-up burst
        let before = sim.state().time_ticks;
        sim.advance(SIM_DT * 0.5);
        assert!(sim.state().time_ticks - before <= 1);
    }

    #[test]
    fn test_intent_consumed_by_first_substep() {
        let mut sim = Simulation::new(1, Tuning::default(), Box::new(MemoryStore::new()));
        sim.push_intent(Intent::Jump);
        let events = sim.advance(SIM_DT * 3.5);
        let jumps = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Jumped { .. }))
            .count();
        assert_eq!(jumps, 1);
        assert_eq!(sim.state().actor.jump_count(), 1);
    }

    #[test]
    fn test_step_runs_one_tick() {
        let mut sim = Simulation::new(1, Tuning::default(), Box::new(MemoryStore::new()));
        sim.push_intent(Intent::Dash);
        let events = sim.step();
        assert_eq!(events, vec![GameEvent::Dashed]);
        assert_eq!(sim.state().time_ticks, 1);
    }
}
