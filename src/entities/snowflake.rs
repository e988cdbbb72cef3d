//! A snowflake drops one row per tick. Its depth sets both the fall speed
//! (far flakes fall slower) and whether the tree hides it.

use std::time::{Duration, Instant};

use super::{interval_for_depth, validate_depth, Entity, BOTTOM_ROW};
use crate::display::WHITE;
use crate::engine::{is_visible, Stage};
use crate::error::SceneError;
use crate::util::Ticker;

#[derive(Debug, Clone)]
pub struct Snowflake {
    x: u8,
    y: u8,
    depth: u8,
    ticker: Ticker,
}

impl Snowflake {
    /// Spawn at the top of an already acquired column with a random depth
    pub fn new(x: u8, stage: &mut Stage, now: Instant) -> Self {
        let depth = stage.roll_depth();
        Self {
            x,
            y: 0,
            depth,
            ticker: Ticker::new(now, interval_for_depth(depth)),
        }
    }

    pub fn with_depth(x: u8, y: u8, depth: u8, now: Instant) -> Result<Self, SceneError> {
        let depth = validate_depth(depth)?;
        Ok(Self {
            x,
            y,
            depth,
            ticker: Ticker::new(now, interval_for_depth(depth)),
        })
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn interval(&self) -> Duration {
        self.ticker.interval()
    }

    /// Back to the top of a fresh random column with a fresh depth
    fn respawn(&mut self, stage: &mut Stage) -> Result<(), SceneError> {
        stage.release_column(self.x)?;
        self.depth = stage.roll_depth();
        self.ticker.set_interval(interval_for_depth(self.depth));
        self.y = 0;
        self.x = stage.acquire_column()?;
        Ok(())
    }
}

impl Entity for Snowflake {
    fn update(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        if !self.ticker.is_due(now) {
            return Ok(());
        }
        self.ticker.mark(now);

        stage.clear_at(i32::from(self.x), i32::from(self.y));
        self.y += 1;
        if self.y > BOTTOM_ROW {
            self.respawn(stage)?;
        }

        let (x, y) = (i32::from(self.x), i32::from(self.y));
        if is_visible(self.depth, stage.depth_at(x, y)) {
            stage.draw(x, y, WHITE);
        }
        Ok(())
    }
}
