//! Game engine core
//!
//! All gameplay logic lives here, behind host-provided hooks:
//! - Fixed contract with the host clock (every operation takes `now_ms`)
//! - Seeded RNG only
//! - No rendering, storage, or platform dependencies

mod collision;
mod physics;
pub mod session;
mod spawn;
pub mod state;

pub use session::Engine;
pub use state::{
    EndReason, EngineSnapshot, GameObject, ObjectKind, Phase, PlayArea, TrajectoryPath,
};
