//! `drive_shared`
//!
//! Shared driving core used by the client loop and the tests.
//!
//! Design goals:
//! - Deterministic per-frame update: same keys, same pose, bit for bit.
//! - Clear separation of concerns (input, motion, camera, assets, rendering).
//! - Traits at the collaborator seams (asset loading, rendering).
//! - No `unsafe`.

pub mod asset;
pub mod camera;
pub mod config;
pub mod input;
pub mod math;
pub mod motion;
pub mod render;
pub mod sim;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::camera::*;
    pub use crate::config::*;
    pub use crate::input::*;
    pub use crate::math::*;
    pub use crate::motion::*;
    pub use crate::sim::*;
}
