//! Host callback interface
//!
//! The engine is UI-agnostic: score displays, timers, captions, sound and
//! drawing all happen on the host side through these hooks. Every method
//! defaults to a no-op so hosts implement only what they show. All calls
//! are best-effort notifications; the engine never depends on a result.

use crate::engine::{EndReason, GameObject};
use crate::stats::SessionRecord;

/// Sound effect requested by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// A target was hit
    TargetHit,
    /// A friendly carrying a word was hit
    FriendlyHit,
    /// A friendly-image hazard was hit (instant loss)
    HazardHit,
}

/// Engine-to-host notifications
pub trait EngineHooks {
    fn score_changed(&mut self, _score: i32) {}

    /// Timer display text, `mm:ss`; forced to `"00:00"` when idle
    fn timer_updated(&mut self, _text: &str) {}

    /// A word-carrying object was hit; append its word to the caption
    fn caption_word(&mut self, _word: &str) {}

    fn play_sound(&mut self, _cue: SoundCue) {}

    /// The session ended. Fires exactly once per session, before internal
    /// state resets. The record is not retained by the engine.
    fn session_over(&mut self, _reason: EndReason, _record: &SessionRecord) {}

    /// Draw one frame. The slice is valid for this call only; objects may
    /// move or disappear by the next tick.
    fn render_frame(&mut self, _objects: &[GameObject], _started: bool) {}
}

/// Hookless engine, handy for tests and headless runs
#[derive(Debug, Default)]
pub struct NoHooks;

impl EngineHooks for NoHooks {}
