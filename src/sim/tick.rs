//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. Per tick:
//! due deferred actions, intents, actor integration, collisions, track
//! streaming, then the speed ramp.

use super::collision;
use super::progression;
use super::schedule::ScheduledAction;
use super::state::{GameEvent, GamePhase, GameState};
use crate::input::Intent;
use crate::seconds_to_ticks;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump (left half of the screen / space)
    pub jump: bool,
    /// Dash (right half of the screen / D)
    pub dash: bool,
    /// Start a fresh run
    pub restart: bool,
}

impl TickInput {
    /// Collapse the intents gathered since the last tick
    pub fn from_intents(intents: &[Intent]) -> Self {
        let mut input = Self::default();
        for intent in intents {
            match intent {
                Intent::Jump => input.jump = true,
                Intent::Dash => input.dash = true,
                Intent::Restart => input.restart = true,
            }
        }
        input
    }

    pub fn is_empty(&self) -> bool {
        !(self.jump || self.dash || self.restart)
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, events: &mut Vec<GameEvent>) {
    state.time_ticks += 1;

    for action in state.schedule.poll(state.time_ticks, state.generation) {
        match action {
            ScheduledAction::EndDash => {
                state.actor.end_dash(state.world.speed, events);
            }
            ScheduledAction::ReportDeath => state.flush_report(),
        }
    }

    if input.restart {
        state.restart();
        events.push(GameEvent::Restarted {
            generation: state.generation,
        });
        return;
    }

    // Frozen after death
    if state.phase != GamePhase::Running {
        return;
    }

    if input.jump {
        state.actor.try_jump(&state.tuning, events);
    }
    if input.dash && state.actor.try_dash(state.world.speed, &state.tuning, events) {
        let due = state.time_ticks + seconds_to_ticks(state.tuning.dash_duration, dt);
        state
            .schedule
            .schedule(due, state.generation, ScheduledAction::EndDash);
    }

    state.actor.tick(dt, &state.world, &state.tuning, events);

    collision::resolve(
        &mut state.actor,
        &mut state.track,
        &mut state.world,
        &state.tuning,
        events,
    );

    if !state.actor.is_alive() {
        state.enter_dead(dt);
        return;
    }

    let actor_x = state.actor.pos.x;
    let spawned = state.track.stream_tick(actor_x, true, &state.tuning);
    let despawned = state.track.despawn_tick(actor_x, &state.tuning);
    if spawned > 0 || despawned > 0 {
        log::trace!(
            "Track: +{} -{} segments, {} live, frontier {:.0}",
            spawned,
            despawned,
            state.track.live_count(),
            state.track.frontier_x()
        );
    }

    progression::update(&mut state.world, actor_x, &state.tuning, events);
}
