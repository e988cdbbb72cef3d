//! Hopping bunny: the whole sprite shifts up, right, then down, with an
//! idle beat before every hop.

use std::time::{Duration, Instant};

use super::Entity;
use crate::display::{Frame, Position, Rgb, BLACK, GRID_SIZE, PIXEL_COUNT, WHITE};
use crate::engine::Stage;
use crate::error::SceneError;
use crate::util::Ticker;

const HOP_INTERVAL: Duration = Duration::from_millis(100);
/// Pause before the first motion of every cycle
const IDLE_BEAT: Duration = Duration::from_millis(800);

const W: Rgb = WHITE;
const O: Rgb = BLACK;
const B: Rgb = Rgb(53, 22, 6);
const L: Rgb = Rgb(137, 98, 71);
const P: Rgb = Rgb(214, 149, 184);

#[rustfmt::skip]
pub const BUNNY: Frame = [
    O, O, O, O, O, O, O, O,
    O, O, O, O, B, L, O, O,
    O, O, O, O, B, L, O, O,
    O, O, O, O, B, O, B, O,
    O, B, B, B, B, B, P, O,
    W, L, L, B, B, B, O, O,
    W, L, L, B, B, B, O, O,
    O, L, L, L, O, B, B, O,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hop {
    Up,
    Right,
    Down,
}

pub const HOP_CYCLE: [Hop; 3] = [Hop::Up, Hop::Right, Hop::Down];

impl Hop {
    /// Shift a whole frame one cell. Rows leaving vertically are lost,
    /// the column leaving on the right comes back on the left.
    pub fn apply(self, frame: &Frame) -> Frame {
        let n = GRID_SIZE;
        let mut out = [BLACK; PIXEL_COUNT];
        for (i, cell) in out.iter_mut().enumerate() {
            let (x, y) = (i % n, i / n);
            *cell = match self {
                Hop::Up if y + 1 < n => frame[i + n],
                Hop::Down if y > 0 => frame[i - n],
                Hop::Up | Hop::Down => BLACK,
                Hop::Right if x > 0 => frame[i - 1],
                Hop::Right => frame[y * n + n - 1],
            };
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct Bunny {
    sprite: Frame,
    ticker: Ticker,
    phase: usize,
}

impl Bunny {
    pub fn new(now: Instant) -> Self {
        Self::with_sprite(BUNNY, now)
    }

    pub fn with_sprite(sprite: Frame, now: Instant) -> Self {
        Self {
            sprite,
            ticker: Ticker::new(now, HOP_INTERVAL),
            phase: 0,
        }
    }

    pub fn sprite(&self) -> &Frame {
        &self.sprite
    }

    pub fn next_hop(&self) -> Hop {
        HOP_CYCLE[self.phase]
    }

    fn extra_wait(&self) -> Duration {
        if self.phase == 0 {
            IDLE_BEAT
        } else {
            Duration::ZERO
        }
    }
}

impl Entity for Bunny {
    fn update(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        if !self.ticker.is_due_after(now, self.extra_wait()) {
            return Ok(());
        }
        self.ticker.mark(now);

        self.sprite = self.next_hop().apply(&self.sprite);
        for pos in Position::all() {
            stage.draw(i32::from(pos.x()), i32::from(pos.y()), self.sprite[pos.index()]);
        }
        self.phase = (self.phase + 1) % HOP_CYCLE.len();
        Ok(())
    }
}
