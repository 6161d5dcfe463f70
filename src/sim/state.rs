//! Game state and core simulation types
//!
//! Everything one run needs lives in [`GameState`]; a restart rebuilds the
//! per-run parts in place and bumps the run generation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::progression;
use super::rng::run_seed;
use super::schedule::{Schedule, ScheduledAction};
use super::track::Track;
use crate::seconds_to_ticks;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Actor alive, world advancing
    Running,
    /// Actor died; simulation frozen until the score report
    Dead,
    /// Final score reported; waiting for a restart
    Reported,
}

/// Observable events for rendering, audio and camera collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// `jump` is 1 for the first jump, 2 for the double jump (flip)
    Jumped { jump: u8 },
    Dashed,
    DashEnded,
    HazardCleared { position: Vec2 },
    /// Landed after being airborne
    GroundContact,
    Died { final_score: u64 },
    SpeedLevelUp { level: u32, new_speed: f32 },
    Restarted { generation: u32 },
    /// Final score compared against the stored best
    RunReported {
        final_score: u64,
        best_score: u64,
        new_best: bool,
    },
}

/// Per-run world values shared by the streamer and the progression tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    /// Horizontal run speed (pixels/s)
    pub speed: f32,
    /// Speed ramp counter
    pub speed_level: u32,
    /// Bonus points from cleared hazards (distance score is derived)
    pub score: u64,
}

impl WorldState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            speed: tuning.initial_speed,
            speed_level: 0,
            score: 0,
        }
    }

    /// Distance score at `actor_x` plus bonus
    pub fn total_score(&self, actor_x: f32, tuning: &Tuning) -> u64 {
        progression::total_score(actor_x, self.score, tuning)
    }
}

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Base seed; each run derives its own track seed from it
    pub seed: u64,
    /// Incremented on every restart
    pub generation: u32,
    /// Simulation tick counter (monotonic across runs)
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub tuning: Tuning,
    pub actor: Actor,
    pub world: WorldState,
    pub track: Track,
    pub schedule: Schedule,
    /// Score frozen at death
    pub final_score: Option<u64>,
    /// Final score waiting to be persisted by the runner
    #[serde(skip)]
    pending_report: Option<u64>,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let run = run_seed(seed, 0);
        Self {
            seed,
            generation: 0,
            time_ticks: 0,
            phase: GamePhase::Running,
            actor: Actor::new(&tuning),
            world: WorldState::new(&tuning),
            track: Track::new(run, &tuning),
            schedule: Schedule::new(),
            final_score: None,
            pending_report: None,
            tuning,
        }
    }

    /// Current total score (frozen once the actor is dead)
    pub fn total_score(&self) -> u64 {
        self.final_score
            .unwrap_or_else(|| self.world.total_score(self.actor.pos.x, &self.tuning))
    }

    /// Freeze the run after the actor died and arm the delayed report
    pub(crate) fn enter_dead(&mut self, dt: f32) {
        if self.phase != GamePhase::Running {
            return;
        }
        let score = self.world.total_score(self.actor.pos.x, &self.tuning);
        self.phase = GamePhase::Dead;
        self.final_score = Some(score);
        let due = self.time_ticks + seconds_to_ticks(self.tuning.death_report_delay, dt);
        self.schedule
            .schedule(due, self.generation, ScheduledAction::ReportDeath);
        log::info!(
            "Run {} ended at x={:.0} with score {}",
            self.generation,
            self.actor.pos.x,
            score
        );
    }

    /// Move a dead run to `Reported`, queueing its score for persistence.
    /// No-op in any other phase.
    pub fn flush_report(&mut self) {
        if self.phase != GamePhase::Dead {
            return;
        }
        self.phase = GamePhase::Reported;
        self.pending_report = self.final_score;
    }

    /// Final score reported since the last call, if any
    pub fn take_pending_report(&mut self) -> Option<u64> {
        self.pending_report.take()
    }

    /// Rebuild actor, world and track for a fresh run.
    ///
    /// Deferred actions from the previous run stay queued but are dropped when
    /// they come due because their generation no longer matches.
    pub fn restart(&mut self) {
        self.flush_report();
        self.generation += 1;
        let run = run_seed(self.seed, self.generation);
        self.actor = Actor::new(&self.tuning);
        self.world = WorldState::new(&self.tuning);
        self.track = Track::new(run, &self.tuning);
        self.final_score = None;
        self.phase = GamePhase::Running;
        log::info!("Run {} started (track seed {})", self.generation, run);
    }
}
