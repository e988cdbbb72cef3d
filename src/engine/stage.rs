use super::background::{Background, FAR_DEPTH};
use super::pool::IndexPool;
use crate::display::{Frame, LedMatrix, Position, Rgb, BLACK};
use crate::entities::{MAX_DEPTH, MIN_DEPTH};
use crate::error::SceneError;
use crate::util::Rng;

/// Everything a scene and its entities may touch during a frame:
/// the display, the optional backdrop, the free-column pool and the RNG.
pub struct Stage {
    display: Box<dyn LedMatrix>,
    background: Option<Background>,
    pool: IndexPool,
    rng: Rng,
}

impl Stage {
    pub fn new(display: Box<dyn LedMatrix>, rng: Rng) -> Self {
        Self {
            display,
            background: None,
            pool: IndexPool::default(),
            rng,
        }
    }

    pub fn display(&self) -> &dyn LedMatrix {
        self.display.as_ref()
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    pub fn pool(&self) -> &IndexPool {
        &self.pool
    }

    pub fn rng(&mut self) -> &mut Rng {
        &mut self.rng
    }

    /// Paint the backdrop and use it for depth tests and restores from now on
    pub fn install_background(&mut self, background: Background) {
        self.show_frame(background.pixels());
        self.background = Some(background);
    }

    /// Occlusion depth at a cell; off-grid cells and backdrop-less scenes are far
    pub fn depth_at(&self, x: i32, y: i32) -> u8 {
        match (Position::new(x, y), &self.background) {
            (Some(pos), Some(bg)) => bg.depth_at(pos),
            _ => FAR_DEPTH,
        }
    }

    /// Backdrop colour of a cell, black without a backdrop
    pub fn background_pixel(&self, pos: Position) -> Rgb {
        self.background
            .as_ref()
            .map_or(BLACK, |bg| bg.pixel_at(pos))
    }

    /// Bounds-checked single cell write. Off-grid writes are skipped with a warning.
    pub fn draw(&mut self, x: i32, y: i32, color: Rgb) {
        let Some(pos) = Position::new(x, y) else {
            log::warn!("Tried to draw out of display ({}, {})", x, y);
            return;
        };
        if let Err(e) = self.display.set_pixel(pos, color) {
            log::warn!("Failed to draw at ({}, {}): {}", x, y, e);
        }
    }

    /// Restore a cell to the backdrop (or black)
    pub fn clear_at(&mut self, x: i32, y: i32) {
        let Some(pos) = Position::new(x, y) else {
            log::warn!("Tried to clear out of display ({}, {})", x, y);
            return;
        };
        let color = self.background_pixel(pos);
        if let Err(e) = self.display.set_pixel(pos, color) {
            log::warn!("Failed to clear ({}, {}): {}", x, y, e);
        }
    }

    pub fn show_frame(&mut self, frame: &Frame) {
        if let Err(e) = self.display.set_pixels(frame) {
            log::warn!("Failed to write frame: {}", e);
        }
    }

    /// Blank the whole display, ignoring the backdrop
    pub fn clear(&mut self) {
        if let Err(e) = self.display.clear() {
            log::warn!("Failed to clear display: {}", e);
        }
    }

    pub fn flush(&mut self) {
        if let Err(e) = self.display.flush() {
            log::warn!("Failed to flush display: {}", e);
        }
    }

    // ========================================================================
    // Spawning
    // ========================================================================

    /// Reserve one random free column as a spawn lane
    pub fn acquire_column(&mut self) -> Result<u8, SceneError> {
        self.pool
            .acquire_random(&mut self.rng)
            .ok_or(SceneError::NoFreeColumn)
    }

    /// Reserve a specific column
    pub fn acquire_exact(&mut self, column: u8) -> Result<u8, SceneError> {
        if self.pool.acquire(column) {
            Ok(column)
        } else {
            Err(SceneError::NoFreeColumn)
        }
    }

    /// Give a lane back on despawn
    pub fn release_column(&mut self, column: u8) -> Result<(), SceneError> {
        if self.pool.release(column) {
            Ok(())
        } else {
            Err(SceneError::ColumnAlreadyFree(column))
        }
    }

    /// Random depth in [MIN_DEPTH, MAX_DEPTH]
    pub fn roll_depth(&mut self) -> u8 {
        self.rng
            .range_i32(i32::from(MIN_DEPTH), i32::from(MAX_DEPTH)) as u8
    }

    pub fn roll_color(&mut self) -> Rgb {
        Rgb(self.rng.next_u8(), self.rng.next_u8(), self.rng.next_u8())
    }
}
