//! Sense HAT LED matrix through its Linux framebuffer device
//!
//! The driver exposes the panel as a 8x8, 16 bits-per-pixel framebuffer
//! (RGB565, little-endian). Draws land in a shadow grid and the whole 128-byte
//! image is written on `flush`; `clear` and `configure` write straight away.

use std::fs::{self, File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::{DisplaySettings, Frame, LedMatrix, MemoryMatrix, Position, Rgb, PIXEL_COUNT};
use crate::error::DisplayError;

const SYSFS_GRAPHICS: &str = "/sys/class/graphics";
const SENSE_HAT_FB_NAME: &str = "RPi-Sense FB";
/// Where the Sense HAT framebuffer usually shows up
pub const DEFAULT_DEVICE: &str = "/dev/fb1";

pub struct FramebufferMatrix {
    shadow: MemoryMatrix,
    device: File,
    path: PathBuf,
    dirty: bool,
}

impl FramebufferMatrix {
    /// Open the framebuffer device and blank it
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DisplayError> {
        let path = path.as_ref().to_path_buf();
        let device = OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(|source| DisplayError::Open {
                path: path.clone(),
                source,
            })?;
        log::debug!("Opened LED framebuffer {}", path.display());

        let mut matrix = Self {
            shadow: MemoryMatrix::new(),
            device,
            path,
            dirty: false,
        };
        matrix.sync()?;
        Ok(matrix)
    }

    /// Open whichever framebuffer the Sense HAT driver registered, or /dev/fb1
    pub fn detect() -> Result<Self, DisplayError> {
        let path = find_sense_hat_device().unwrap_or_else(|| {
            log::debug!("No Sense HAT driver found in sysfs, trying {}", DEFAULT_DEVICE);
            PathBuf::from(DEFAULT_DEVICE)
        });
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sync(&mut self) -> Result<(), DisplayError> {
        let bytes = encode_rgb565(&self.shadow.physical_frame());
        self.device.seek(SeekFrom::Start(0))?;
        self.device.write_all(&bytes)?;
        self.dirty = false;
        Ok(())
    }
}

impl LedMatrix for FramebufferMatrix {
    fn configure(&mut self, settings: DisplaySettings) -> Result<(), DisplayError> {
        self.shadow.configure(settings)?;
        self.sync()
    }

    fn set_pixel(&mut self, pos: Position, color: Rgb) -> Result<(), DisplayError> {
        if self.shadow.get_pixel(pos) != color {
            self.shadow.set_pixel(pos, color)?;
            self.dirty = true;
        }
        Ok(())
    }

    fn set_pixels(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        if self.shadow.frame() != frame {
            self.shadow.set_pixels(frame)?;
            self.dirty = true;
        }
        Ok(())
    }

    fn get_pixel(&self, pos: Position) -> Rgb {
        self.shadow.get_pixel(pos)
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.shadow.clear()?;
        self.sync()
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        if self.dirty {
            self.sync()?;
        }
        Ok(())
    }
}

/// Pack a frame as RGB565 little-endian words
pub fn encode_rgb565(frame: &Frame) -> [u8; PIXEL_COUNT * 2] {
    let mut out = [0u8; PIXEL_COUNT * 2];
    for (chunk, c) in out.chunks_exact_mut(2).zip(frame.iter()) {
        let r = u16::from(c.0 >> 3);
        let g = u16::from(c.1 >> 2);
        let b = u16::from(c.2 >> 3);
        let word = (r << 11) | (g << 5) | b;
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    out
}

/// Look through /sys/class/graphics/fb*/name for the Sense HAT driver
pub fn find_sense_hat_device() -> Option<PathBuf> {
    let entries = fs::read_dir(SYSFS_GRAPHICS).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with("fb") {
            continue;
        }
        let Ok(driver) = fs::read_to_string(entry.path().join("name")) else {
            continue;
        };
        if driver.trim() == SENSE_HAT_FB_NAME {
            return Some(Path::new("/dev").join(name.as_ref()));
        }
    }
    None
}
