use std::time::Instant;

use super::Scene;
use crate::assets::FrameSource;
use crate::engine::Stage;
use crate::entities::{Entity, Playback};
use crate::error::{AssetError, SceneError};

/// Frames buffered up front before video playback starts
pub const VIDEO_BUFFER_FRAMES: usize = 50;

/// Loops a pre-decoded frame feed. Frames beyond the initial buffer are
/// pulled one per loop iteration until the feed runs dry.
pub struct PlaybackScene {
    name: &'static str,
    source: Box<dyn FrameSource>,
    buffer: usize,
    exhausted: bool,
    playback: Option<Playback>,
}

impl PlaybackScene {
    /// Static fill: the whole feed is decoded at init
    pub fn fill(source: Box<dyn FrameSource>) -> Self {
        let buffer = source.frame_count();
        Self::new("fill", source, buffer)
    }

    pub fn video(source: Box<dyn FrameSource>) -> Self {
        let buffer = source.frame_count().min(VIDEO_BUFFER_FRAMES);
        Self::new("video", source, buffer)
    }

    fn new(name: &'static str, source: Box<dyn FrameSource>, buffer: usize) -> Self {
        Self {
            name,
            source,
            buffer,
            exhausted: false,
            playback: None,
        }
    }

    pub fn playback(&self) -> Option<&Playback> {
        self.playback.as_ref()
    }

    /// Pull one frame into the playback list; false once the feed is done
    fn pull(&mut self) -> bool {
        let Some(playback) = self.playback.as_mut() else {
            return false;
        };
        match self.source.next_frame() {
            Some(Ok(frame)) => playback.push(frame),
            Some(Err(e)) => log::error!("Could not read frame: {}", e),
            None => {
                self.exhausted = true;
                return false;
            }
        }
        true
    }
}

impl Scene for PlaybackScene {
    fn name(&self) -> &str {
        self.name
    }

    fn init(&mut self, _stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        if self.source.frame_count() == 0 {
            return Err(AssetError::Empty.into());
        }
        self.playback = Some(Playback::new(self.source.fps(), now)?);

        log::info!("Buffering the first {} frames", self.buffer);
        for _ in 0..self.buffer {
            if !self.pull() {
                break;
            }
        }
        // Keep going past undecodable frames until there is something to show
        while self.playback.as_ref().is_some_and(Playback::is_empty) && self.pull() {}
        let buffered = self.playback.as_ref().map_or(0, Playback::len);
        if buffered == 0 {
            return Err(AssetError::Empty.into());
        }
        log::info!("Buffered {} frames", buffered);
        Ok(())
    }

    fn next_frame(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        if !self.exhausted {
            self.pull();
        }
        match self.playback.as_mut() {
            Some(playback) => playback.update(stage, now),
            None => Ok(()),
        }
    }
}
