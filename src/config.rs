//! Optional JSON configuration file. Every field has a default and command
//! line flags take precedence over anything set here.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::display::Rgb;
use crate::error::ConfigError;
use crate::scenes::{DEFAULT_GREETING, DEFAULT_ROCKETS, DEFAULT_SNOWFLAKES};

pub const DEFAULT_FILL_FRAMES: &str = "/etc/rpi-season-screen/bad_apple.json";
pub const DEFAULT_FILL_FPS: f32 = 27.0;
pub const DEFAULT_VIDEO_FPS: f32 = 25.0;

/// Where frames end up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Sense HAT LED framebuffer
    #[default]
    Framebuffer,
    /// In-process grid, nothing is shown
    Memory,
    /// Desktop window (requires the `emulator` feature)
    Emulator,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub christmas: ChristmasConfig,
    pub new_year: NewYearConfig,
    pub fill: FillConfig,
    pub video: VideoConfig,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub rotation: u16,
    pub low_light: bool,
    pub backend: Backend,
    pub device: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChristmasConfig {
    pub snowflakes: usize,
    /// Scrolled once before the tree; empty disables it
    pub greeting: String,
}

impl Default for ChristmasConfig {
    fn default() -> Self {
        Self {
            snowflakes: DEFAULT_SNOWFLAKES,
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewYearConfig {
    pub rockets: usize,
    /// Fixed burst colour, random per launch when unset
    pub color: Option<[u8; 3]>,
}

impl Default for NewYearConfig {
    fn default() -> Self {
        Self {
            rockets: DEFAULT_ROCKETS,
            color: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    pub frames: PathBuf,
    pub fps: f32,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            frames: PathBuf::from(DEFAULT_FILL_FRAMES),
            fps: DEFAULT_FILL_FPS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    pub path: Option<PathBuf>,
    pub fps: f32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            path: None,
            fps: DEFAULT_VIDEO_FPS,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn rocket_color(&self) -> Option<Rgb> {
        self.new_year.color.map(Rgb::from)
    }
}

/// Parse `R,G,B` with each channel in 0..=255
pub fn parse_color(s: &str) -> Result<Rgb, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [r, g, b] = parts.as_slice() else {
        return Err(format!("expected R,G,B, got '{}'", s));
    };
    let channel = |v: &str| {
        v.parse::<u8>()
            .map_err(|e| format!("invalid channel '{}': {}", v, e))
    };
    Ok(Rgb(channel(r)?, channel(g)?, channel(b)?))
}
