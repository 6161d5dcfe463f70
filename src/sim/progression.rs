//! Score and difficulty ramp
//!
//! Score is distance plus dash bonuses. Every `speed_ramp_interval` points the
//! run speed goes up by `speed_increment`, one step per threshold crossed, and
//! never comes back down.

use super::state::{GameEvent, WorldState};
use crate::tuning::Tuning;

/// Whole distance units covered at `x` (nothing before the origin)
pub fn distance_score(x: f32, distance_unit: f32) -> u64 {
    if x <= 0.0 || distance_unit <= 0.0 {
        return 0;
    }
    (x / distance_unit).floor() as u64
}

/// Distance score plus accumulated bonus
pub fn total_score(x: f32, bonus: u64, tuning: &Tuning) -> u64 {
    distance_score(x, tuning.distance_unit) + bonus
}

/// Speed level implied by a total score
pub fn speed_level(total: u64, interval: u64) -> u32 {
    if interval == 0 {
        return 0;
    }
    (total / interval).min(u32::MAX as u64) as u32
}

/// Ratchet speed up to the level implied by the actor's score.
///
/// Returns the number of levels gained this update.
pub fn update(
    world: &mut WorldState,
    actor_x: f32,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let total = world.total_score(actor_x, tuning);
    let target = speed_level(total, tuning.speed_ramp_interval);

    let mut gained = 0;
    while world.speed_level < target {
        world.speed_level += 1;
        world.speed += tuning.speed_increment;
        gained += 1;
        log::debug!(
            "Speed level {} (score {}), run speed {:.0}",
            world.speed_level,
            total,
            world.speed
        );
        events.push(GameEvent::SpeedLevelUp {
            level: world.speed_level,
            new_speed: world.speed,
        });
    }
    gained
}
