//! A message that scrolls right to left across the matrix once, entering and
//! leaving through blank screens.

use std::time::{Duration, Instant};

use super::Entity;
use crate::display::font::text_columns;
use crate::display::{Frame, Rgb, BLACK, GRID_SIZE, PIXEL_COUNT};
use crate::engine::Stage;
use crate::error::SceneError;
use crate::util::Ticker;

/// Time per one-column shift
pub const SCROLL_STEP: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct Scroller {
    columns: Vec<u8>,
    offset: usize,
    color: Rgb,
    ticker: Ticker,
}

impl Scroller {
    pub fn new(text: &str, color: Rgb, now: Instant) -> Self {
        let mut columns = vec![0; GRID_SIZE];
        columns.extend(text_columns(text));
        columns.extend(std::iter::repeat(0).take(GRID_SIZE));
        Self {
            columns,
            offset: 0,
            color,
            ticker: Ticker::new(now, SCROLL_STEP),
        }
    }

    /// Number of frames the whole pass takes
    pub fn steps(&self) -> usize {
        self.columns.len() - GRID_SIZE + 1
    }

    pub fn is_finished(&self) -> bool {
        self.offset >= self.steps()
    }

    pub fn interval(&self) -> Duration {
        self.ticker.interval()
    }

    /// The 8x8 window starting at `offset`
    fn window(&self, offset: usize) -> Frame {
        let mut frame = [BLACK; PIXEL_COUNT];
        for (x, bits) in self.columns[offset..offset + GRID_SIZE].iter().enumerate() {
            for y in 0..GRID_SIZE {
                if bits >> y & 1 == 1 {
                    frame[x + GRID_SIZE * y] = self.color;
                }
            }
        }
        frame
    }
}

impl Entity for Scroller {
    fn update(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        if self.is_finished() || !self.ticker.is_due(now) {
            return Ok(());
        }
        self.ticker.mark(now);
        stage.show_frame(&self.window(self.offset));
        self.offset += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{font::text_width, MemoryMatrix, Position, WHITE};
    use crate::util::Rng;

    fn lit(stage: &Stage) -> Vec<Position> {
        Position::all()
            .filter(|&p| !stage.display().get_pixel(p).is_black())
            .collect()
    }

    #[test]
    fn test_pass_length() {
        let scroller = Scroller::new("Hi", WHITE, Instant::now());
        assert_eq!(scroller.steps(), text_width("Hi") + GRID_SIZE + 1);
        assert!(!scroller.is_finished());
    }

    #[test]
    fn test_scrolls_in_from_the_right_and_out_to_the_left() {
        let mut stage = Stage::new(Box::new(MemoryMatrix::new()), Rng::new(1));
        let mut now = Instant::now();
        let mut scroller = Scroller::new("I", Rgb(255, 0, 0), now);

        // Not due yet
        scroller.update(&mut stage, now).unwrap();
        assert!(lit(&stage).is_empty());

        let mut frames = Vec::new();
        while !scroller.is_finished() {
            now += scroller.interval();
            scroller.update(&mut stage, now).unwrap();
            frames.push(lit(&stage));
        }
        assert_eq!(frames.len(), scroller.steps());

        // Blank, then the serifs of the I enter at the right edge, then its stem
        assert!(frames[0].is_empty());
        assert!(frames[1].is_empty());
        assert_eq!(
            frames[2],
            vec![Position::new(7, 0).unwrap(), Position::new(7, 6).unwrap()]
        );
        assert_eq!(frames[3].len(), 9);
        assert!(frames[3].iter().all(|p| p.x() >= 6));
        assert!(frames.last().unwrap().is_empty());
        assert!(frames.iter().flatten().all(|p| p.y() < 7));

        // Done: further ticks leave the display alone
        stage.show_frame(&[WHITE; PIXEL_COUNT]);
        scroller.update(&mut stage, now + Duration::from_secs(5)).unwrap();
        assert_eq!(lit(&stage).len(), PIXEL_COUNT);
    }
}
