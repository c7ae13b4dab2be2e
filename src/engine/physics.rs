//! Per-frame physics and culling
//!
//! Straight-line ballistic motion only. Objects whose center drifts past a
//! generous margin beyond any edge are culled; an escaped target costs a
//! point when the miss penalty is on, which can end the session mid-pass.

use glam::Vec2;

use super::session::Engine;
use super::state::{EndReason, ObjectKind, PlayArea};
use crate::consts::CULL_MARGIN_FACTOR;
use crate::hooks::EngineHooks;

/// Center crossed `margin` px beyond any play-area edge
pub(crate) fn off_bounds(pos: Vec2, area: PlayArea, margin: f32) -> bool {
    pos.x < -margin || pos.x > area.width + margin || pos.y < -margin || pos.y > area.height + margin
}

impl<H: EngineHooks> Engine<H> {
    /// Advance all live objects by `dt_ms` and cull escapees. Reverse index
    /// order keeps in-place removal safe. Aborts as soon as a penalty drives
    /// the score negative; `stop()` clears the rest anyway.
    pub(crate) fn advance_and_cull(&mut self, now_ms: f64, dt_ms: f64, area: PlayArea) {
        // Margin follows the configured base size, not the per-object
        // radius; large variants may linger a frame or two before culling
        let margin = self.config.object_size * CULL_MARGIN_FACTOR;

        let mut i = self.objects.len();
        while i > 0 {
            i -= 1;
            let obj = &mut self.objects[i];
            obj.pos += obj.vel * dt_ms as f32;

            if !off_bounds(obj.pos, area, margin) {
                continue;
            }
            let escaped_target = obj.kind == ObjectKind::Target;
            self.objects.remove(i);

            if escaped_target && self.config.miss_penalty_enabled {
                self.score -= 1;
                self.targets_penalized += 1;
                self.hooks.score_changed(self.score);
                if self.score < 0 {
                    self.stop(now_ms, EndReason::ScoreNegative);
                    return;
                }
            }
        }
    }
}
