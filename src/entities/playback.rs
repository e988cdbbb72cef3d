use std::time::{Duration, Instant};

use super::Entity;
use crate::display::Frame;
use crate::engine::Stage;
use crate::error::{AssetError, SceneError};
use crate::util::Ticker;

/// Loops over a growing list of decoded frames at a fixed rate
#[derive(Debug, Clone)]
pub struct Playback {
    frames: Vec<Frame>,
    ticker: Ticker,
    current: usize,
}

impl Playback {
    pub fn new(fps: f32, now: Instant) -> Result<Self, AssetError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(AssetError::InvalidFrameRate(fps));
        }
        let interval =
            Duration::try_from_secs_f32(1.0 / fps).map_err(|_| AssetError::InvalidFrameRate(fps))?;
        Ok(Self {
            frames: Vec::new(),
            ticker: Ticker::new(now, interval),
            current: 0,
        })
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the frame shown on the next due tick
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn interval(&self) -> Duration {
        self.ticker.interval()
    }
}

impl Entity for Playback {
    fn update(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        if self.frames.is_empty() || !self.ticker.is_due(now) {
            return Ok(());
        }
        self.ticker.mark(now);
        stage.show_frame(&self.frames[self.current]);
        self.current = (self.current + 1) % self.frames.len();
        Ok(())
    }
}
