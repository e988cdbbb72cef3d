//! The 8x8 LED matrix capability and its backends

#[cfg(feature = "emulator")]
mod emulator;
pub mod font;
mod framebuffer;
mod memory;

#[cfg(feature = "emulator")]
pub use emulator::EmulatorMatrix;
pub use framebuffer::{encode_rgb565, find_sense_hat_device, FramebufferMatrix};
pub use memory::MemoryMatrix;

use crate::error::DisplayError;

pub const GRID_SIZE: usize = 8;
pub const PIXEL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// One LED colour. Channels are u8, so [0, 255] holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const WHITE: Rgb = Rgb(255, 255, 255);

impl Rgb {
    /// Build a colour from wider integers, clamping every channel into [0, 255]
    pub fn clamped(r: i64, g: i64, b: i64) -> Self {
        let c = |v: i64| v.clamp(0, 255) as u8;
        Self(c(r), c(g), c(b))
    }

    #[inline]
    pub fn is_black(self) -> bool {
        self == BLACK
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self(c[0], c[1], c[2])
    }
}

/// A full grid of colours in row-major order (index = x + 8 * y)
pub type Frame = [Rgb; PIXEL_COUNT];

/// A cell coordinate that is known to lie on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    x: u8,
    y: u8,
}

impl Position {
    /// Validate a raw coordinate. Out-of-range values are rejected, never wrapped.
    pub fn new(x: i32, y: i32) -> Option<Self> {
        let max = GRID_SIZE as i32;
        if (0..max).contains(&x) && (0..max).contains(&y) {
            Some(Self {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        (index < PIXEL_COUNT).then(|| Self {
            x: (index % GRID_SIZE) as u8,
            y: (index / GRID_SIZE) as u8,
        })
    }

    #[inline]
    pub fn x(self) -> u8 {
        self.x
    }

    #[inline]
    pub fn y(self) -> u8 {
        self.y
    }

    #[inline]
    pub fn index(self) -> usize {
        self.x as usize + GRID_SIZE * self.y as usize
    }

    /// Every cell in row-major order
    pub fn all() -> impl Iterator<Item = Position> {
        (0..PIXEL_COUNT).filter_map(Self::from_index)
    }
}

/// Clockwise rotation applied between logical and physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl TryFrom<u16> for Rotation {
    type Error = DisplayError;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(DisplayError::InvalidRotation(other)),
        }
    }
}

impl Rotation {
    /// Where a logical cell lands on the physical panel
    pub fn apply(self, pos: Position) -> Position {
        let max = GRID_SIZE as u8 - 1;
        let (x, y) = (pos.x, pos.y);
        let (nx, ny) = match self {
            Self::Deg0 => (x, y),
            // (x, y) -> (height - 1 - y, x)
            Self::Deg90 => (max - y, x),
            // (x, y) -> (width - 1 - x, height - 1 - y)
            Self::Deg180 => (max - x, max - y),
            // (x, y) -> (y, width - 1 - x)
            Self::Deg270 => (y, max - x),
        };
        Position { x: nx, y: ny }
    }
}

/// One-time orientation and brightness setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplaySettings {
    pub rotation: Rotation,
    pub low_light: bool,
}

/// The display capability the scene engine draws through.
/// Backends own the hardware; the engine only ever sees logical cells.
pub trait LedMatrix {
    /// Apply rotation and low-light mode
    fn configure(&mut self, settings: DisplaySettings) -> Result<(), DisplayError>;

    /// Write one cell
    fn set_pixel(&mut self, pos: Position, color: Rgb) -> Result<(), DisplayError>;

    /// Write the whole grid in row-major order
    fn set_pixels(&mut self, frame: &Frame) -> Result<(), DisplayError>;

    /// Read back the logical colour of one cell
    fn get_pixel(&self, pos: Position) -> Rgb;

    /// Set every cell to black
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Push buffered output, called once per frame-loop iteration
    fn flush(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}
