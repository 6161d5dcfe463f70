//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (track sorted by x)
//! - No rendering, audio or storage dependencies

pub mod actor;
pub mod collision;
pub mod progression;
pub mod rng;
pub mod schedule;
pub mod state;
pub mod tick;
pub mod track;

pub use actor::{Actor, ActorState};
pub use collision::{Aabb, HazardOutcome, resolve, resolve_hazards, resolve_platforms};
pub use rng::SpawnRng;
pub use schedule::{Schedule, ScheduledAction};
pub use state::{GameEvent, GamePhase, GameState, WorldState};
pub use tick::{TickInput, tick};
pub use track::{Segment, SegmentKind, Track};
