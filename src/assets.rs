//! Opaque asset handles
//!
//! Images are loaded and decoded by the host before the engine runs; the
//! engine only picks handles to attach to spawned objects. The renderer
//! resolves a handle back to whatever it loaded.

use serde::{Deserialize, Serialize};

/// Host-assigned identifier for a loaded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub u32);

/// Asset bundle the spawner draws friendly-image payloads from
#[derive(Debug, Clone, Default)]
pub struct Assets {
    pub friendly_images: Vec<ImageHandle>,
}

impl Assets {
    pub fn new(friendly_images: Vec<ImageHandle>) -> Self {
        Self { friendly_images }
    }
}
