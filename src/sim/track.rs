//! Infinite track streaming
//!
//! The track is a window of platform/hazard segments around the actor. New
//! segments are laid at the frontier while the actor is within `lookahead` of
//! it, and segments more than `trailing_window` behind the actor are dropped,
//! so the live count stays bounded however far the run goes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::rng::SpawnRng;
use crate::tuning::Tuning;

/// Segment types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Solid footing
    Platform,
    /// Lethal unless the actor is dashing
    Hazard,
}

/// A platform or hazard on the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    pub kind: SegmentKind,
    /// Center position
    pub pos: Vec2,
    pub size: Vec2,
    /// Hazard smashed by a dash (never set on platforms)
    pub destroyed: bool,
}

impl Segment {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    pub fn is_platform(&self) -> bool {
        self.kind == SegmentKind::Platform
    }

    pub fn is_live_hazard(&self) -> bool {
        self.kind == SegmentKind::Hazard && !self.destroyed
    }
}

/// Streamed track state (sorted by x for deterministic iteration)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    segments: Vec<Segment>,
    /// Next platform spawn x
    frontier_x: f32,
    rng: SpawnRng,
    next_id: u32,
}

impl Track {
    /// Lay the hazard-free starting stretch.
    ///
    /// The first platform is centered under the actor's spawn point.
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut track = Self {
            segments: Vec::new(),
            frontier_x: tuning.start_x,
            rng: SpawnRng::new(seed),
            next_id: 1,
        };
        for _ in 0..tuning.safe_start_segments {
            track.spawn(false, tuning);
        }
        log::debug!(
            "Track seeded with {} safe platforms, frontier at {}",
            tuning.safe_start_segments,
            track.frontier_x
        );
        track
    }

    pub fn frontier_x(&self) -> f32 {
        self.frontier_x
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn live_count(&self) -> usize {
        self.segments.len()
    }

    pub fn platforms(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_platform())
    }

    pub fn hazards(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(|s| s.is_live_hazard())
    }

    /// X of the furthest platform laid so far
    pub fn furthest_platform_x(&self) -> Option<f32> {
        self.platforms().map(|p| p.pos.x).last()
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert_sorted(&mut self, segment: Segment) {
        let idx = self.segments.partition_point(|s| s.pos.x <= segment.pos.x);
        self.segments.insert(idx, segment);
    }

    /// Lay one platform at the frontier (and maybe a hazard on it), then advance
    pub fn spawn(&mut self, allow_hazards: bool, tuning: &Tuning) {
        let x = self.frontier_x;
        let platform = Segment {
            id: self.next_entity_id(),
            kind: SegmentKind::Platform,
            pos: Vec2::new(x, tuning.floor_y),
            size: tuning.platform_size,
            destroyed: false,
        };
        self.insert_sorted(platform);

        if allow_hazards && self.rng.next_f32() < tuning.hazard_probability {
            let (min, max) = tuning.hazard_offset_range;
            let offset = self.rng.range(min, max);
            let hazard = Segment {
                id: self.next_entity_id(),
                kind: SegmentKind::Hazard,
                pos: Vec2::new(x + offset, tuning.hazard_rest_y()),
                size: tuning.hazard_size,
                destroyed: false,
            };
            self.insert_sorted(hazard);
        }

        self.frontier_x += tuning.spawn_stride;
    }

    /// Spawn until the frontier is at least `lookahead` ahead of the actor.
    /// Returns the number of platforms laid.
    pub fn stream_tick(&mut self, actor_x: f32, allow_hazards: bool, tuning: &Tuning) -> usize {
        let mut spawned = 0;
        while actor_x > self.frontier_x - tuning.lookahead {
            self.spawn(allow_hazards, tuning);
            spawned += 1;
        }
        spawned
    }

    /// Drop every segment strictly behind the trailing boundary.
    /// Returns the number of segments removed.
    pub fn despawn_tick(&mut self, actor_x: f32, tuning: &Tuning) -> usize {
        let boundary = actor_x - tuning.trailing_window;
        // Sorted by x, so everything to despawn is a prefix
        let cut = self.segments.partition_point(|s| s.pos.x < boundary);
        self.segments.drain(..cut);
        cut
    }

    /// Mark a hazard destroyed and take it off the track
    pub fn remove_hazard(&mut self, id: u32) -> Option<Segment> {
        let idx = self
            .segments
            .iter()
            .position(|s| s.id == id && s.kind == SegmentKind::Hazard)?;
        let mut hazard = self.segments.remove(idx);
        hazard.destroyed = true;
        Some(hazard)
    }

    /// Place a hazard directly (scenario setup and tests)
    pub fn insert_hazard(&mut self, pos: Vec2, tuning: &Tuning) -> u32 {
        let id = self.next_entity_id();
        self.insert_sorted(Segment {
            id,
            kind: SegmentKind::Hazard,
            pos,
            size: tuning.hazard_size,
            destroyed: false,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_sorted(track: &Track) -> bool {
        track
            .segments()
            .windows(2)
            .all(|w| w[0].pos.x <= w[1].pos.x)
    }

    #[test]
    fn test_safe_start_has_no_hazards() {
        let tuning = Tuning {
            hazard_probability: 1.0,
            ..Tuning::default()
        };
        let track = Track::new(1, &tuning);
        assert_eq!(track.live_count(), tuning.safe_start_segments as usize);
        assert_eq!(track.hazards().count(), 0);
        assert_eq!(
            track.frontier_x(),
            tuning.start_x + tuning.safe_start_segments as f32 * tuning.spawn_stride
        );
    }

    #[test]
    fn test_spawn_with_certain_hazard() {
        let tuning = Tuning {
            hazard_probability: 1.0,
            ..Tuning::default()
        };
        let mut track = Track::new(3, &tuning);
        let frontier = track.frontier_x();
        track.spawn(true, &tuning);

        let hazard = track.hazards().next().expect("hazard spawned");
        let (min, max) = tuning.hazard_offset_range;
        assert!(hazard.pos.x >= frontier + min && hazard.pos.x <= frontier + max);
        assert_eq!(hazard.pos.y, tuning.hazard_rest_y());
        // Hazard bottom sits on the platform surface
        assert!((hazard.bounds().max.y - tuning.floor_top()).abs() < 1e-3);
        assert_eq!(track.frontier_x(), frontier + tuning.spawn_stride);
        assert!(is_sorted(&track));
    }

    #[test]
    fn test_spawn_without_hazards_allowed() {
        let tuning = Tuning {
            hazard_probability: 1.0,
            ..Tuning::default()
        };
        let mut track = Track::new(3, &tuning);
        track.spawn(false, &tuning);
        assert_eq!(track.hazards().count(), 0);
    }

    #[test]
    fn test_stream_tick_keeps_lookahead() {
        let tuning = Tuning::default();
        let mut track = Track::new(9, &tuning);
        let actor_x = 5000.0;
        let spawned = track.stream_tick(actor_x, true, &tuning);
        assert!(spawned > 0);
        assert!(track.frontier_x() >= actor_x + tuning.lookahead);
        assert!(track.frontier_x() < actor_x + tuning.lookahead + tuning.spawn_stride);
        // Nothing more to do at the same position
        assert_eq!(track.stream_tick(actor_x, true, &tuning), 0);
    }

    #[test]
    fn test_despawn_boundary_is_exclusive() {
        let tuning = Tuning::default();
        let mut track = Track::new(9, &tuning);
        // Platform centers are start_x + k * stride; put the boundary exactly on one
        let boundary_x = tuning.start_x + 5.0 * tuning.spawn_stride;
        let actor_x = boundary_x + tuning.trailing_window;
        let removed = track.despawn_tick(actor_x, &tuning);
        assert_eq!(removed, 5);
        let first = &track.segments()[0];
        assert_eq!(first.pos.x, boundary_x);
        assert!(track.segments().iter().all(|s| s.pos.x >= boundary_x));
    }

    #[test]
    fn test_remove_hazard_only_hits_hazards() {
        let tuning = Tuning::default();
        let mut track = Track::new(9, &tuning);
        let platform_id = track.segments()[0].id;
        assert!(track.remove_hazard(platform_id).is_none());

        let id = track.insert_hazard(Vec2::new(300.0, tuning.hazard_rest_y()), &tuning);
        assert!(is_sorted(&track));
        let removed = track.remove_hazard(id).expect("hazard present");
        assert!(removed.destroyed);
        assert_eq!(track.hazards().count(), 0);
    }

    #[test]
    fn test_same_seed_same_track() {
        let tuning = Tuning::default();
        let mut a = Track::new(77, &tuning);
        let mut b = Track::new(77, &tuning);
        a.stream_tick(20_000.0, true, &tuning);
        b.stream_tick(20_000.0, true, &tuning);
        let xs = |t: &Track| t.hazards().map(|h| h.pos.x).collect::<Vec<_>>();
        assert_eq!(xs(&a), xs(&b));
        assert!(a.hazards().count() > 0);
    }
}
