//! The runner and its ability state machine
//!
//! Jump, dash, landing and death all go through [`Actor`] methods. Calls that
//! are not legal in the current state (jumping while dead, dashing mid-dash,
//! dying twice) are silent no-ops that return `false`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::state::{GameEvent, WorldState};
use crate::tuning::{MAX_JUMPS_LIMIT, Tuning};

/// Derived ability state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorState {
    Grounded,
    Airborne,
    Dashing,
    Dead,
}

/// The player-controlled runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    /// Bounding box size
    pub size: Vec2,
    jump_count: u8,
    grounded: bool,
    dashing: bool,
    alive: bool,
    flipping: bool,
    /// Seconds of flip rotation left
    flip_timer: f32,
    /// Whether the actor stood on a platform at the start of this tick
    supported: bool,
    /// Center position before the last integration step
    prev_pos: Vec2,
}

impl Actor {
    /// Fresh actor resting on the first platform
    pub fn new(tuning: &Tuning) -> Self {
        let pos = Vec2::new(tuning.start_x, tuning.actor_rest_y());
        Self {
            pos,
            vel: Vec2::new(tuning.initial_speed, 0.0),
            size: tuning.actor_size,
            jump_count: 0,
            grounded: true,
            dashing: false,
            alive: true,
            flipping: false,
            flip_timer: 0.0,
            supported: true,
            prev_pos: pos,
        }
    }

    pub fn state(&self) -> ActorState {
        if !self.alive {
            ActorState::Dead
        } else if self.dashing {
            ActorState::Dashing
        } else if self.grounded {
            ActorState::Grounded
        } else {
            ActorState::Airborne
        }
    }

    pub fn jump_count(&self) -> u8 {
        self.jump_count
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_dashing(&self) -> bool {
        self.dashing
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_flipping(&self) -> bool {
        self.flipping
    }

    pub fn prev_pos(&self) -> Vec2 {
        self.prev_pos
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    /// Bounds at the start of the last integration step
    pub fn prev_bounds(&self) -> Aabb {
        Aabb::from_center(self.prev_pos, self.size)
    }

    /// Gravity currently acting on the actor (suspended while dashing)
    pub fn effective_gravity(&self, tuning: &Tuning) -> f32 {
        if self.dashing { 0.0 } else { tuning.gravity }
    }

    /// Jump if the actor is alive and has jumps left since its last landing
    pub fn try_jump(&mut self, tuning: &Tuning, events: &mut Vec<GameEvent>) -> bool {
        if !self.alive || self.jump_count >= tuning.max_jumps {
            return false;
        }
        self.vel.y = tuning.jump_velocity;
        self.jump_count += 1;
        // Only the air jump flips
        if self.jump_count == MAX_JUMPS_LIMIT {
            self.flipping = true;
            self.flip_timer = tuning.flip_duration;
        }
        events.push(GameEvent::Jumped {
            jump: self.jump_count,
        });
        true
    }

    /// Start a dash. The caller schedules the matching [`Actor::end_dash`].
    pub fn try_dash(
        &mut self,
        run_speed: f32,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if !self.alive || self.dashing {
            return false;
        }
        self.dashing = true;
        self.vel.x = run_speed + tuning.dash_boost;
        events.push(GameEvent::Dashed);
        true
    }

    /// Revert a dash. Ignored once dead or when no dash is active.
    pub fn end_dash(&mut self, run_speed: f32, events: &mut Vec<GameEvent>) -> bool {
        if !self.alive || !self.dashing {
            return false;
        }
        self.dashing = false;
        self.vel.x = run_speed;
        events.push(GameEvent::DashEnded);
        true
    }

    /// Confirmed footing. Returns `true` when this is a landing rather than
    /// continued standing; only landings emit `GroundContact`.
    pub fn on_ground_contact(&mut self, events: &mut Vec<GameEvent>) -> bool {
        let landed = !self.supported && !self.grounded;
        self.grounded = true;
        self.jump_count = 0;
        self.flipping = false;
        self.flip_timer = 0.0;
        if landed {
            events.push(GameEvent::GroundContact);
        }
        landed
    }

    /// Kill the actor. Only the first call has any effect.
    pub fn die(&mut self, final_score: u64, events: &mut Vec<GameEvent>) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.dashing = false;
        self.flipping = false;
        events.push(GameEvent::Died { final_score });
        true
    }

    /// Integrate one fixed step. Footing is re-established by the collision pass.
    pub fn tick(
        &mut self,
        dt: f32,
        world: &WorldState,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) {
        if !self.alive {
            return;
        }

        self.supported = self.grounded;
        self.grounded = false;

        if self.flipping {
            self.flip_timer -= dt;
            if self.flip_timer <= 0.0 {
                self.flipping = false;
                self.flip_timer = 0.0;
            }
        }

        if !self.dashing {
            self.vel.x = world.speed;
        }
        self.vel.y += self.effective_gravity(tuning) * dt;

        self.prev_pos = self.pos;
        self.pos += self.vel * dt;

        if self.pos.y > tuning.death_y {
            log::debug!("Actor fell out of the world at x={:.1}", self.pos.x);
            self.die(world.total_score(self.pos.x, tuning), events);
        }
    }
}
