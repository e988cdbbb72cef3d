use super::{DisplaySettings, Frame, LedMatrix, Position, Rgb, BLACK, PIXEL_COUNT};
use crate::error::DisplayError;

/// Peak channel value when low-light mode is on
const LOW_LIGHT_PEAK: u16 = 48;

/// In-process 8x8 grid.
/// Holds logical colours; rotation and dimming are only applied to `physical_frame()`.
/// Also the shadow buffer behind the hardware and emulator backends.
#[derive(Debug, Clone)]
pub struct MemoryMatrix {
    pixels: Frame,
    settings: DisplaySettings,
}

impl MemoryMatrix {
    pub fn new() -> Self {
        Self {
            pixels: [BLACK; PIXEL_COUNT],
            settings: DisplaySettings::default(),
        }
    }

    /// Logical colours in row-major order
    #[inline]
    pub fn frame(&self) -> &Frame {
        &self.pixels
    }

    #[inline]
    pub fn settings(&self) -> DisplaySettings {
        self.settings
    }

    /// What the panel actually shows: rotated and, in low-light mode, dimmed
    pub fn physical_frame(&self) -> Frame {
        let mut out = [BLACK; PIXEL_COUNT];
        for pos in Position::all() {
            let dst = self.settings.rotation.apply(pos);
            out[dst.index()] = self.output_color(self.pixels[pos.index()]);
        }
        out
    }

    fn output_color(&self, c: Rgb) -> Rgb {
        if !self.settings.low_light {
            return c;
        }
        let dim = |v: u8| (u16::from(v) * LOW_LIGHT_PEAK / 255) as u8;
        Rgb(dim(c.0), dim(c.1), dim(c.2))
    }
}

impl Default for MemoryMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl LedMatrix for MemoryMatrix {
    fn configure(&mut self, settings: DisplaySettings) -> Result<(), DisplayError> {
        self.settings = settings;
        Ok(())
    }

    fn set_pixel(&mut self, pos: Position, color: Rgb) -> Result<(), DisplayError> {
        self.pixels[pos.index()] = color;
        Ok(())
    }

    fn set_pixels(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        self.pixels = *frame;
        Ok(())
    }

    fn get_pixel(&self, pos: Position) -> Rgb {
        self.pixels[pos.index()]
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.pixels.fill(BLACK);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{Rotation, WHITE};

    #[test]
    fn test_set_and_get_pixel() {
        let mut m = MemoryMatrix::new();
        let pos = Position::new(3, 5).unwrap();
        m.set_pixel(pos, WHITE).unwrap();
        assert_eq!(m.get_pixel(pos), WHITE);
        assert_eq!(m.frame()[3 + 8 * 5], WHITE);
    }

    #[test]
    fn test_clear() {
        let mut m = MemoryMatrix::new();
        m.set_pixels(&[WHITE; PIXEL_COUNT]).unwrap();
        m.clear().unwrap();
        assert!(m.frame().iter().all(|c| c.is_black()));
    }

    #[test]
    fn test_rotation_only_affects_physical_output() {
        let mut m = MemoryMatrix::new();
        m.configure(DisplaySettings {
            rotation: Rotation::Deg180,
            low_light: false,
        })
        .unwrap();
        let pos = Position::new(0, 0).unwrap();
        m.set_pixel(pos, WHITE).unwrap();

        assert_eq!(m.get_pixel(pos), WHITE);
        let physical = m.physical_frame();
        assert_eq!(physical[63], WHITE);
        assert!(physical[0].is_black());
    }

    #[test]
    fn test_low_light_dims_output() {
        let mut m = MemoryMatrix::new();
        m.configure(DisplaySettings {
            rotation: Rotation::Deg0,
            low_light: true,
        })
        .unwrap();
        let pos = Position::new(1, 1).unwrap();
        m.set_pixel(pos, WHITE).unwrap();
        assert_eq!(m.physical_frame()[pos.index()], Rgb(48, 48, 48));
        assert_eq!(m.get_pixel(pos), WHITE);
    }
}
