//! Desktop stand-in for the LED matrix, drawn with SDL2.
//! Closing the window (or pressing Escape) requests shutdown like a signal would.

use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;
use sdl2::EventPump;

use super::{DisplaySettings, Frame, LedMatrix, MemoryMatrix, Position, Rgb, GRID_SIZE};
use crate::error::DisplayError;
use crate::shutdown::ShutdownToken;

const CELL_SIZE: u32 = 48;
const CELL_GAP: u32 = 6;
const REFRESH_INTERVAL: Duration = Duration::from_millis(16);

pub struct EmulatorMatrix {
    shadow: MemoryMatrix,
    canvas: Canvas<Window>,
    event_pump: EventPump,
    shutdown: ShutdownToken,
    last_present: Option<Instant>,
}

impl EmulatorMatrix {
    pub fn new(title: &str, shutdown: ShutdownToken) -> Result<Self, DisplayError> {
        let sdl_context = sdl2::init().map_err(DisplayError::Backend)?;
        let video_subsystem = sdl_context.video().map_err(DisplayError::Backend)?;

        let side = GRID_SIZE as u32 * (CELL_SIZE + CELL_GAP) + CELL_GAP;
        let window = video_subsystem
            .window(title, side, side)
            .position_centered()
            .build()
            .map_err(|e| DisplayError::Backend(e.to_string()))?;

        let canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| DisplayError::Backend(e.to_string()))?;
        let event_pump = sdl_context.event_pump().map_err(DisplayError::Backend)?;

        Ok(Self {
            shadow: MemoryMatrix::new(),
            canvas,
            event_pump,
            shutdown,
            last_present: None,
        })
    }

    fn poll_events(&mut self) {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => self.shutdown.cancel(),
                _ => {},
            }
        }
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        self.canvas.set_draw_color(Color::RGB(12, 12, 12));
        self.canvas.clear();

        let physical = self.shadow.physical_frame();
        for pos in Position::all() {
            let c = physical[pos.index()];
            let x = CELL_GAP + u32::from(pos.x()) * (CELL_SIZE + CELL_GAP);
            let y = CELL_GAP + u32::from(pos.y()) * (CELL_SIZE + CELL_GAP);
            self.canvas.set_draw_color(Color::RGB(c.0, c.1, c.2));
            self.canvas
                .fill_rect(Rect::new(x as i32, y as i32, CELL_SIZE, CELL_SIZE))
                .map_err(DisplayError::Backend)?;
        }

        self.canvas.present();
        Ok(())
    }
}

impl LedMatrix for EmulatorMatrix {
    fn configure(&mut self, settings: DisplaySettings) -> Result<(), DisplayError> {
        self.shadow.configure(settings)
    }

    fn set_pixel(&mut self, pos: Position, color: Rgb) -> Result<(), DisplayError> {
        self.shadow.set_pixel(pos, color)
    }

    fn set_pixels(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.shadow.set_pixels(frame)
    }

    fn get_pixel(&self, pos: Position) -> Rgb {
        self.shadow.get_pixel(pos)
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.shadow.clear()?;
        // Shutdown clears and exits without another loop iteration, so show it now
        self.present()
    }

    /// The frame loop spins without delay; repaint at most once per refresh interval
    fn flush(&mut self) -> Result<(), DisplayError> {
        let now = Instant::now();
        if let Some(last) = self.last_present {
            if now.duration_since(last) < REFRESH_INTERVAL {
                return Ok(());
            }
        }
        self.last_present = Some(now);
        self.poll_events();
        self.present()
    }
}
