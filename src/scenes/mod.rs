//! Selectable animations. Each scene owns its entities and is driven by the
//! controller's frame loop through the shared [`Stage`].

mod christmas;
mod easter;
mod new_year;
mod playback;

pub use christmas::{ChristmasScene, DEFAULT_GREETING, DEFAULT_SNOWFLAKES};
pub use easter::EasterScene;
pub use new_year::{NewYearScene, DEFAULT_ROCKETS};
pub use playback::{PlaybackScene, VIDEO_BUFFER_FRAMES};

use std::time::Instant;

use crate::engine::{Stage, COLUMN_COUNT};
use crate::error::SceneError;

/// One animation program
pub trait Scene {
    /// Scene name for logging
    fn name(&self) -> &str;

    /// Draw the backdrop and spawn entities. The display is already blank.
    fn init(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError>;

    /// One pass of the frame loop: update every entity in insertion order
    fn next_frame(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError>;
}

/// Column-bound scenes cannot hold more entities than there are columns
fn check_lane_count(requested: usize) -> Result<usize, SceneError> {
    let available = usize::from(COLUMN_COUNT);
    if requested > available {
        return Err(SceneError::PoolExhausted {
            requested,
            available,
        });
    }
    Ok(requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_lane_count() {
        assert_eq!(check_lane_count(0).unwrap(), 0);
        assert_eq!(check_lane_count(8).unwrap(), 8);
        assert!(matches!(
            check_lane_count(9),
            Err(SceneError::PoolExhausted {
                requested: 9,
                available: 8
            })
        ));
    }
}
