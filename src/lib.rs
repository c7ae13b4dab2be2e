//! Skeet - an arcade reflex game engine
//!
//! Shapes spawn at the play-area edges, drift toward a jittered center
//! point, and the player scores by clicking targets before they escape.
//! Core modules:
//! - `engine`: session state machine, spawner, physics, hit testing
//! - `config`: live config + per-session snapshot
//! - `stats`: session records, history and rank calculators
//! - `hooks`: host callback interface (rendering, sound, captions)
//!
//! The engine owns no clock: every operation takes `now_ms` from the host,
//! so tests can drive time deterministically.

pub mod assets;
pub mod config;
pub mod engine;
pub mod hooks;
pub mod stats;

pub use assets::{Assets, ImageHandle};
pub use config::{ConfigPatch, FriendlyMode, GameConfig};
pub use engine::{EndReason, Engine, GameObject, ObjectKind, Phase, PlayArea};
pub use hooks::{EngineHooks, NoHooks, SoundCue};
pub use stats::{SessionHistory, SessionRecord};

/// Engine tuning constants
pub mod consts {
    /// Object travel speed at `speed = 1.0`, in pixels per second
    pub const BASE_SPEED: f32 = 150.0;
    /// Frame delta clamp so a suspended tab cannot teleport objects (ms)
    pub const MAX_FRAME_DELTA_MS: f64 = 50.0;
    /// Off-screen cull margin as a multiple of the configured object size
    pub const CULL_MARGIN_FACTOR: f32 = 2.0;
    /// Cadence the host should drive `guard_tick` at when a time limit is set (ms)
    pub const GUARD_INTERVAL_MS: f64 = 250.0;

    /// Palette used when `use_random_colors` is on
    pub const PALETTE: [&str; 11] = [
        "#ff0000", "#ff8800", "#ffff00", "#88ff00", "#00ff00", "#00ffff",
        "#0088ff", "#0000ff", "#8800ff", "#ff00ff", "#ff0088",
    ];
}
