//! Pre-baked frame feeds for the fill and video scenes.
//!
//! Two on-disk formats are understood:
//! - a JSON object mapping frame numbers (`"0"`, `"1"`, ...) to 64 `[r, g, b]` triples
//! - raw RGB24 video, 192 bytes per 8x8 frame, rows top to bottom

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use crate::display::{Frame, Rgb, BLACK, PIXEL_COUNT};
use crate::error::AssetError;

/// Bytes per raw RGB24 frame
pub const RAW_FRAME_BYTES: usize = PIXEL_COUNT * 3;

/// A finite stream of decoded frames
pub trait FrameSource {
    /// Total number of frames, decodable or not
    fn frame_count(&self) -> usize;

    /// Native playback rate
    fn fps(&self) -> f32;

    /// Decode the next frame. `None` once the feed is exhausted; a single bad
    /// frame yields `Some(Err(_))` and the feed can still be pulled further.
    fn next_frame(&mut self) -> Option<Result<Frame, AssetError>>;
}

// ============================================================================
// JSON frames
// ============================================================================

pub struct JsonFrames {
    frames: std::vec::IntoIter<(usize, serde_json::Value)>,
    count: usize,
    fps: f32,
}

impl JsonFrames {
    pub fn load(path: impl AsRef<Path>, fps: f32) -> Result<Self, AssetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AssetError::Missing(path.to_path_buf()));
        }
        let json = fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&json, fps)
    }

    pub fn parse(json: &str, fps: f32) -> Result<Self, AssetError> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut frames = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            match key.parse::<usize>() {
                Ok(index) => frames.push((index, value)),
                Err(_) => log::warn!("Skipping non-numeric frame key '{}'", key),
            }
        }
        // String keys sort "10" before "2"
        frames.sort_by_key(|(index, _)| *index);
        Ok(Self {
            count: frames.len(),
            frames: frames.into_iter(),
            fps,
        })
    }

    fn decode(index: usize, value: serde_json::Value) -> Result<Frame, AssetError> {
        let bad = |reason: String| AssetError::BadFrame { index, reason };
        let triples: Vec<[i64; 3]> =
            serde_json::from_value(value).map_err(|e| bad(e.to_string()))?;
        if triples.len() != PIXEL_COUNT {
            return Err(bad(format!(
                "expected {} pixels, found {}",
                PIXEL_COUNT,
                triples.len()
            )));
        }
        let mut frame = [BLACK; PIXEL_COUNT];
        for (cell, [r, g, b]) in frame.iter_mut().zip(triples) {
            *cell = Rgb::clamped(r, g, b);
        }
        Ok(frame)
    }
}

impl FrameSource for JsonFrames {
    fn frame_count(&self) -> usize {
        self.count
    }

    fn fps(&self) -> f32 {
        self.fps
    }

    fn next_frame(&mut self) -> Option<Result<Frame, AssetError>> {
        let (index, value) = self.frames.next()?;
        Some(Self::decode(index, value))
    }
}

// ============================================================================
// Raw RGB24 video
// ============================================================================

pub struct RawVideo<R> {
    reader: R,
    count: usize,
    next: usize,
    fps: f32,
}

impl RawVideo<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>, fps: f32) -> Result<Self, AssetError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AssetError::Missing(path.to_path_buf()));
        }
        let io_err = |source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();
        Ok(Self::new(BufReader::new(file), len as usize, fps))
    }
}

impl<R: Read> RawVideo<R> {
    /// `len_bytes` is the size of the whole stream. A trailing partial frame
    /// still counts and decodes as an error.
    pub fn new(reader: R, len_bytes: usize, fps: f32) -> Self {
        Self {
            reader,
            count: len_bytes.div_ceil(RAW_FRAME_BYTES),
            next: 0,
            fps,
        }
    }
}

impl<R: Read> FrameSource for RawVideo<R> {
    fn frame_count(&self) -> usize {
        self.count
    }

    fn fps(&self) -> f32 {
        self.fps
    }

    fn next_frame(&mut self) -> Option<Result<Frame, AssetError>> {
        if self.next >= self.count {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let mut buf = Vec::with_capacity(RAW_FRAME_BYTES);
        if let Err(source) = (&mut self.reader)
            .take(RAW_FRAME_BYTES as u64)
            .read_to_end(&mut buf)
        {
            return Some(Err(AssetError::Read { index, source }));
        }
        if buf.is_empty() {
            // Stream was shorter than announced
            self.next = self.count;
            return None;
        }
        if buf.len() < RAW_FRAME_BYTES {
            return Some(Err(AssetError::ShortFrame {
                index,
                bytes: buf.len(),
            }));
        }

        let mut frame = [BLACK; PIXEL_COUNT];
        for (cell, rgb) in frame.iter_mut().zip(buf.chunks_exact(3)) {
            *cell = Rgb(rgb[0], rgb[1], rgb[2]);
        }
        Some(Ok(frame))
    }
}
