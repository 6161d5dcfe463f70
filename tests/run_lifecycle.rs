//! Full runs through the public `Simulation` API

use aries_runner::consts::SIM_DT;
use aries_runner::highscores::{MemoryStore, ScoreStore, StoreError};
use aries_runner::input::{Autopilot, Intent, IntentQueue, ScriptedInput};
use aries_runner::seconds_to_ticks;
use aries_runner::sim::{GameEvent, GamePhase};
use aries_runner::{Simulation, Tuning};

/// Store shared with the test so writes can be inspected after the run
#[derive(Clone, Default)]
struct SharedStore(std::rc::Rc<std::cell::RefCell<MemoryStore>>);

impl ScoreStore for SharedStore {
    fn load(&self) -> Result<u64, StoreError> {
        self.0.borrow().load()
    }

    fn save(&mut self, best: u64) -> Result<(), StoreError> {
        self.0.borrow_mut().save(best)
    }
}

/// Hazard-dense tuning where an idle runner dies soon after the safe stretch
fn deadly() -> Tuning {
    Tuning {
        hazard_probability: 1.0,
        safe_start_segments: 10,
        ..Tuning::default()
    }
}

fn run_until_phase(sim: &mut Simulation, phase: GamePhase, max_ticks: u64) -> Vec<GameEvent> {
    let mut idle = IntentQueue::new();
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        if sim.phase() == phase {
            break;
        }
        events.extend(sim.run(&mut idle, 1));
    }
    events
}

#[test]
fn idle_run_dies_and_reports_new_best() {
    let store = SharedStore::default();
    let mut sim = Simulation::new(3, deadly(), Box::new(store.clone()));

    let events = run_until_phase(&mut sim, GamePhase::Dead, 10_000);
    assert_eq!(sim.phase(), GamePhase::Dead);
    let final_score = sim.state().final_score.expect("frozen score");
    assert!(final_score > 0);
    assert!(events.contains(&GameEvent::Died { final_score }));

    let events = run_until_phase(&mut sim, GamePhase::Reported, 10_000);
    assert_eq!(sim.phase(), GamePhase::Reported);
    assert_eq!(
        events.last(),
        Some(&GameEvent::RunReported {
            final_score,
            best_score: final_score,
            new_best: true,
        })
    );
    assert_eq!(store.load().unwrap(), final_score);
    assert_eq!(sim.best_score(), final_score);
}

#[test]
fn worse_run_keeps_stored_best() {
    let store = SharedStore::default();
    store.0.borrow_mut().save(1_000_000).unwrap();
    let mut sim = Simulation::new(3, deadly(), Box::new(store.clone()));
    assert_eq!(sim.best_score(), 1_000_000);

    let events = run_until_phase(&mut sim, GamePhase::Reported, 20_000);
    let report = events
        .iter()
        .find(|e| matches!(e, GameEvent::RunReported { .. }))
        .expect("run reported");
    assert!(matches!(
        report,
        GameEvent::RunReported {
            best_score: 1_000_000,
            new_best: false,
            ..
        }
    ));
    assert_eq!(store.load().unwrap(), 1_000_000);
}

#[test]
fn early_restart_still_reports_death() {
    let store = SharedStore::default();
    let mut sim = Simulation::new(3, deadly(), Box::new(store.clone()));
    run_until_phase(&mut sim, GamePhase::Dead, 10_000);
    let final_score = sim.state().final_score.unwrap();

    sim.push_intent(Intent::Restart);
    let events = sim.step();
    assert_eq!(
        events,
        vec![
            GameEvent::RunReported {
                final_score,
                best_score: final_score,
                new_best: true,
            },
            GameEvent::Restarted { generation: 1 },
        ]
    );
    assert_eq!(sim.phase(), GamePhase::Running);
    assert_eq!(store.load().unwrap(), final_score);

    // The first run's delayed report must not fire into the new run
    let delay = seconds_to_ticks(sim.state().tuning.death_report_delay, SIM_DT);
    let mut idle = IntentQueue::new();
    let later = sim.run(&mut idle, delay + 1);
    assert!(!later.iter().any(|e| matches!(e, GameEvent::RunReported { .. })));
}

#[test]
fn restart_resets_speed_and_score() {
    let mut sim = Simulation::new(3, deadly(), Box::new(MemoryStore::new()));
    run_until_phase(&mut sim, GamePhase::Reported, 20_000);

    sim.push_intent(Intent::Restart);
    sim.step();
    let state = sim.state();
    assert_eq!(state.generation, 1);
    assert_eq!(state.world.speed, state.tuning.initial_speed);
    assert_eq!(state.world.score, 0);
    assert_eq!(state.actor.pos.x, state.tuning.start_x);
    assert!(state.actor.is_alive());
    assert_eq!(state.track.hazards().count(), 0);
}

#[test]
fn scripted_double_jump_then_landing() {
    let mut sim = Simulation::new(8, Tuning::default(), Box::new(MemoryStore::new()));
    let mut script = ScriptedInput::new()
        .at(1, Intent::Jump)
        .at(10, Intent::Jump)
        .at(20, Intent::Jump);

    let events = sim.run(&mut script, 30);
    let jumps: Vec<u8> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Jumped { jump } => Some(*jump),
            _ => None,
        })
        .collect();
    assert_eq!(jumps, vec![1, 2]);
    assert_eq!(sim.state().actor.jump_count(), 2);
    assert!(sim.state().actor.is_flipping());

    // Two jumps keep the actor up for well under 3 seconds
    let events = sim.run(&mut script, 360);
    assert!(events.contains(&GameEvent::GroundContact));
    assert_eq!(sim.state().actor.jump_count(), 0);
    assert!(!sim.state().actor.is_flipping());
}

#[test]
fn autopilot_dashes_through_hazards() {
    let mut sim = Simulation::new(11, Tuning::default(), Box::new(MemoryStore::new()));
    let mut pilot = Autopilot::default();
    let events = sim.run(&mut pilot, 120 * 20);

    let cleared = events
        .iter()
        .filter(|e| matches!(e, GameEvent::HazardCleared { .. }))
        .count();
    assert!(cleared > 0);
    let state = sim.state();
    assert!(state.world.score >= state.tuning.hazard_bonus * cleared as u64);
    // Memory stays bounded however far the run went
    let window = state.tuning.lookahead + state.tuning.trailing_window + state.tuning.spawn_stride;
    let max_live = 2 * (window / state.tuning.spawn_stride).ceil() as usize + 2;
    assert!(state.track.live_count() <= max_live);
}
