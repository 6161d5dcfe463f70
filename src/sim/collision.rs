//! Collision detection and outcome resolution
//!
//! Everything on the track is an axis-aligned box. Each tick the actor is
//! tested against hazards first (clear or die), and only a surviving actor is
//! then resolved against platforms as solid footing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::state::{GameEvent, WorldState};
use super::track::Track;
use crate::tuning::Tuning;

/// Slack when deciding whether the actor came down onto a surface
const CONTACT_TOLERANCE: f32 = 0.01;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Strict overlap (touching edges do not count)
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// How a solid contact was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSide {
    /// Came down onto the top surface
    Top,
    /// Hit the underside while rising
    Bottom,
    /// Ran into a side face
    Side,
}

/// Outcome of one hazard pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HazardOutcome {
    pub cleared: u32,
    pub killed: bool,
}

/// Resolve every live hazard overlapping the actor.
///
/// Dashing clears the hazard and awards the bonus; any other overlap is fatal.
/// Safe to call repeatedly: a dead actor cannot die again.
pub fn resolve_hazards(
    actor: &mut Actor,
    track: &mut Track,
    world: &mut WorldState,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> HazardOutcome {
    let mut outcome = HazardOutcome::default();
    if !actor.is_alive() {
        return outcome;
    }

    let bounds = actor.bounds();
    let hits: Vec<u32> = track
        .hazards()
        .filter(|h| h.bounds().overlaps(&bounds))
        .map(|h| h.id)
        .collect();

    for id in hits {
        if actor.is_dashing() {
            if let Some(hazard) = track.remove_hazard(id) {
                world.score += tuning.hazard_bonus;
                outcome.cleared += 1;
                events.push(GameEvent::HazardCleared {
                    position: hazard.pos,
                });
            }
        } else {
            let final_score = world.total_score(actor.pos.x, tuning);
            if actor.die(final_score, events) {
                outcome.killed = true;
                log::info!("Actor hit hazard {} at x={:.1}", id, actor.pos.x);
            }
        }
    }

    outcome
}

/// Resolve platform contacts as solid geometry.
///
/// Returns `true` if the actor is standing on a platform after resolution.
pub fn resolve_platforms(actor: &mut Actor, track: &Track, events: &mut Vec<GameEvent>) -> bool {
    if !actor.is_alive() {
        return false;
    }

    let mut standing = false;
    for platform in track.platforms() {
        let p = platform.bounds();
        // Bounds move as earlier contacts push the actor out
        if !actor.bounds().overlaps(&p) {
            continue;
        }
        match contact_side(actor, &p) {
            ContactSide::Top => {
                actor.pos.y = p.min.y - actor.size.y / 2.0;
                actor.vel.y = 0.0;
                actor.on_ground_contact(events);
                standing = true;
            }
            ContactSide::Bottom => {
                actor.pos.y = p.max.y + actor.size.y / 2.0;
                actor.vel.y = 0.0;
            }
            ContactSide::Side => {
                let half = actor.size.x / 2.0;
                actor.pos.x = if actor.pos.x < p.center().x {
                    p.min.x - half
                } else {
                    p.max.x + half
                };
            }
        }
    }
    standing
}

/// Classify an overlap from where the actor was before this step
fn contact_side(actor: &Actor, platform: &Aabb) -> ContactSide {
    let prev = actor.prev_bounds();
    if actor.vel.y >= 0.0 && prev.max.y <= platform.min.y + CONTACT_TOLERANCE {
        ContactSide::Top
    } else if actor.vel.y < 0.0 && prev.min.y >= platform.max.y - CONTACT_TOLERANCE {
        ContactSide::Bottom
    } else {
        ContactSide::Side
    }
}

/// Full collision pass: hazards first, footing only for a survivor
pub fn resolve(
    actor: &mut Actor,
    track: &mut Track,
    world: &mut WorldState,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> HazardOutcome {
    let outcome = resolve_hazards(actor, track, world, tuning, events);
    if actor.is_alive() {
        resolve_platforms(actor, track, events);
    }
    outcome
}
