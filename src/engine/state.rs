//! Session state and core engine types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::ImageHandle;

/// Engine life-cycle phase. "Stopped" is transient: `stop()` reports the
/// session and returns straight to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// A friendly-image hazard was hit (instant loss)
    FriendlyShot,
    /// Score dropped below zero
    ScoreNegative,
    TimeLimit,
    ScoreLimit,
    StopButton,
    Manual,
}

/// Object type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// Worth +1; escaping costs a point when the miss penalty is on
    Target,
    /// Worth -1; image-payload friendlies are instant-loss hazards
    Friendly,
}

/// Play-area dimensions, read fresh from the host each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Spawn-to-bias trajectory, kept for optional path visualization
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrajectoryPath {
    pub start: Vec2,
    pub end: Vec2,
}

/// A live on-screen object. Owned and mutated by the engine; the renderer
/// sees it for one draw call at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameObject {
    pub pos: Vec2,
    /// Velocity in pixels per millisecond
    pub vel: Vec2,
    pub kind: ObjectKind,
    pub radius: f32,
    /// Score delta when hit: +1 target, -1 friendly
    pub points: i32,
    pub word: Option<String>,
    pub image: Option<ImageHandle>,
    pub color: String,
    /// True only for a friendly with an image payload; hitting it ends the
    /// session immediately. Hazards never carry a word.
    pub hazard: bool,
    pub path: TrajectoryPath,
}

impl GameObject {
    /// Euclidean hit test against the object's circle
    pub fn contains(&self, point: Vec2) -> bool {
        self.pos.distance(point) <= self.radius
    }
}

/// Read-only diagnostic view of the engine, for tests and debug overlays
#[derive(Debug, Clone, Serialize)]
pub struct EngineSnapshot {
    pub phase: Phase,
    pub score: i32,
    pub hits: u32,
    pub misses: u32,
    pub clicks: u32,
    pub targets_penalized: u32,
    pub object_count: usize,
    /// Reason the most recent session ended; cleared on the next `start()`
    pub end_reason: Option<EndReason>,
}
