//! Pointer hit testing
//!
//! Newer objects draw last, so the hit scan runs newest to oldest and the
//! later-spawned object wins when several overlap the pointer.

use glam::Vec2;

use super::state::GameObject;

/// Index of the topmost object containing `point`, if any
pub(crate) fn topmost_hit(objects: &[GameObject], point: Vec2) -> Option<usize> {
    objects.iter().rposition(|obj| obj.contains(point))
}
