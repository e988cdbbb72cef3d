//! Self-timed things that live inside a scene.
//! Each entity checks its own ticker and returns early when it is not due.

mod bunny;
mod playback;
mod rocket;
mod scroller;
mod snowflake;

pub use bunny::{Bunny, Hop, BUNNY, HOP_CYCLE};
pub use playback::Playback;
pub use rocket::{ExplosionParticle, Rocket, RocketState};
pub use scroller::{Scroller, SCROLL_STEP};
pub use snowflake::Snowflake;

use std::time::{Duration, Instant};

use crate::engine::Stage;
use crate::error::SceneError;

/// Nearest depth an entity can have
pub const MIN_DEPTH: u8 = 1;
/// Farthest depth an entity can have
pub const MAX_DEPTH: u8 = 10;
/// Lowest row of the grid
pub const BOTTOM_ROW: u8 = 7;

pub trait Entity {
    /// Advance one step if due. A no-op returns Ok without touching any state.
    fn update(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError>;
}

pub fn validate_depth(depth: u8) -> Result<u8, SceneError> {
    if (MIN_DEPTH..=MAX_DEPTH).contains(&depth) {
        Ok(depth)
    } else {
        Err(SceneError::InvalidDepth(depth))
    }
}

/// Base update interval for a depth: 1 -> 0.1s, 10 -> 1.0s
pub fn interval_for_depth(depth: u8) -> Duration {
    debug_assert!((MIN_DEPTH..=MAX_DEPTH).contains(&depth));
    Duration::from_millis(u64::from(depth) * 100)
}
