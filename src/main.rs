// Allow unused code for designed-but-not-yet-used APIs
// Remove these as the codebase matures
#![allow(dead_code)]

mod assets;
mod config;
mod display;
mod engine;
mod entities;
mod error;
mod scenes;
mod shutdown;
mod util;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use assets::{JsonFrames, RawVideo};
use config::{parse_color, Backend, Config};
use display::{DisplaySettings, FramebufferMatrix, LedMatrix, MemoryMatrix, Rgb, Rotation};
use engine::SceneController;
use scenes::{ChristmasScene, EasterScene, NewYearScene, PlaybackScene, Scene};
use shutdown::ShutdownToken;
use util::{current_month_utc, seed_from_clock};

/// Exit status when the scene could not be set up
const EXIT_STARTUP: u8 = 2;

/// Seasonal animations for the Sense HAT LED matrix
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file; flags given here take precedence
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Display rotation in degrees (0, 90, 180 or 270)
    #[arg(long, global = true, value_name = "DEGREES")]
    rotation: Option<u16>,
    /// Dim the LEDs
    #[arg(long, global = true)]
    low_light_mode: bool,
    /// Output backend
    #[arg(long, global = true, value_enum)]
    backend: Option<Backend>,
    /// LED framebuffer device (autodetected when omitted)
    #[arg(long, global = true, value_name = "PATH")]
    device: Option<PathBuf>,
    /// Seed for depths, columns and colours
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Pick a scene from the current month
    Auto,
    /// Christmas tree with falling snow
    Christmas {
        /// Number of snowflakes, at most 8
        #[arg(long)]
        snowflakes: Option<usize>,
        /// Message scrolled before the tree appears
        #[arg(long, value_name = "TEXT")]
        greeting: Option<String>,
        /// Go straight to the tree
        #[arg(long, conflicts_with = "greeting")]
        no_greeting: bool,
    },
    /// Fireworks
    NewYear {
        /// Number of rockets, at most 8
        #[arg(long)]
        rockets: Option<usize>,
        /// Fixed burst colour instead of a random one per launch
        #[arg(long, value_name = "R,G,B", value_parser = parse_color)]
        color: Option<Rgb>,
    },
    /// Hopping bunny
    Easter,
    /// Loop a JSON frame file
    Fill {
        #[arg(long, value_name = "PATH")]
        frames: Option<PathBuf>,
        #[arg(long)]
        fps: Option<f32>,
    },
    /// Play a raw 8x8 RGB24 video file
    Video {
        #[arg(short = 'f', long, value_name = "PATH")]
        video_path: Option<PathBuf>,
        #[arg(long)]
        fps: Option<f32>,
    },
}

/// January is fireworks, December is Christmas, the rest of the year is fill
fn seasonal_command(month: u32) -> Command {
    match month {
        1 => Command::NewYear {
            rockets: None,
            color: None,
        },
        12 => Command::Christmas {
            snowflakes: None,
            greeting: None,
            no_greeting: false,
        },
        _ => Command::Fill {
            frames: None,
            fps: None,
        },
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    env_logger::Builder::from_env(env).init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let config = Config::load(path)?;
            log::info!("Loaded config from {}", path.display());
            Ok(config)
        },
        None => Ok(Config::default()),
    }
}

fn open_display(
    backend: Backend,
    device: Option<&Path>,
    shutdown: &ShutdownToken,
) -> Result<Box<dyn LedMatrix>> {
    match backend {
        Backend::Framebuffer => {
            let matrix = match device {
                Some(path) => FramebufferMatrix::open(path)?,
                None => FramebufferMatrix::detect()?,
            };
            log::info!("Drawing to {}", matrix.path().display());
            Ok(Box::new(matrix))
        },
        Backend::Memory => {
            log::info!("Drawing to an in-memory matrix");
            Ok(Box::new(MemoryMatrix::new()))
        },
        #[cfg(feature = "emulator")]
        Backend::Emulator => {
            let matrix = display::EmulatorMatrix::new("Season Screen", shutdown.clone())?;
            Ok(Box::new(matrix))
        },
        #[cfg(not(feature = "emulator"))]
        Backend::Emulator => {
            let _ = shutdown;
            anyhow::bail!("the emulator backend needs the `emulator` feature")
        },
    }
}

fn build_scene(command: &Command, config: &Config) -> Result<Box<dyn Scene>> {
    let scene: Box<dyn Scene> = match command {
        Command::Auto => {
            let month = current_month_utc();
            let seasonal = seasonal_command(month);
            log::info!("Month {} selects {:?}", month, seasonal);
            return build_scene(&seasonal, config);
        },
        Command::Christmas {
            snowflakes,
            greeting,
            no_greeting,
        } => {
            let count = snowflakes.unwrap_or(config.christmas.snowflakes);
            let greeting = match (no_greeting, greeting) {
                (true, _) => "",
                (false, Some(text)) => text.as_str(),
                (false, None) => config.christmas.greeting.as_str(),
            };
            Box::new(ChristmasScene::new(count)?.with_greeting(greeting))
        },
        Command::NewYear { rockets, color } => {
            let count = rockets.unwrap_or(config.new_year.rockets);
            let color = color.or_else(|| config.rocket_color());
            Box::new(NewYearScene::new(count, color)?)
        },
        Command::Easter => Box::new(EasterScene::new()),
        Command::Fill { frames, fps } => {
            let path = frames.as_deref().unwrap_or(config.fill.frames.as_path());
            let fps = fps.unwrap_or(config.fill.fps);
            let source = JsonFrames::load(path, fps)
                .with_context(|| format!("failed to load fill frames {}", path.display()))?;
            Box::new(PlaybackScene::fill(Box::new(source)))
        },
        Command::Video { video_path, fps } => {
            let path = video_path
                .as_deref()
                .or(config.video.path.as_deref())
                .context("no video given, pass --video-path or set video.path in the config")?;
            let fps = fps.unwrap_or(config.video.fps);
            let source = RawVideo::open(path, fps)
                .with_context(|| format!("failed to open video {}", path.display()))?;
            Box::new(PlaybackScene::video(Box::new(source)))
        },
    };
    Ok(scene)
}

fn setup(cli: &Cli, shutdown: &ShutdownToken) -> Result<SceneController> {
    shutdown
        .register_signals()
        .context("failed to register signal handlers")?;

    let config = load_config(cli.config.as_deref())?;

    let settings = DisplaySettings {
        rotation: Rotation::try_from(cli.rotation.unwrap_or(config.display.rotation))?,
        low_light: cli.low_light_mode || config.display.low_light,
    };
    let backend = cli.backend.unwrap_or(config.display.backend);
    let device = cli.device.as_deref().or(config.display.device.as_deref());

    // Assets are loaded before the display is touched
    let scene = build_scene(&cli.command, &config)?;
    let display = open_display(backend, device, shutdown)?;

    let seed = cli.seed.or(config.seed).unwrap_or_else(seed_from_clock);
    log::debug!("Random seed {}", seed);

    let controller = SceneController::new(display, settings, scene, shutdown.clone(), seed)?;
    Ok(controller)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let shutdown = ShutdownToken::new();
    let mut controller = match setup(&cli, &shutdown) {
        Ok(controller) => controller,
        Err(e) => {
            log::error!("{:#}", e);
            return ExitCode::from(EXIT_STARTUP);
        },
    };

    if let Err(e) = controller.init_scene() {
        log::error!("Failed to initialize scene '{}': {}", controller.scene_name(), e);
        controller.shutdown();
        return ExitCode::from(EXIT_STARTUP);
    }

    let result = controller.start_scene();
    match shutdown.received_signal() {
        Some(signum) => controller.handle_signal(signum),
        None => controller.shutdown(),
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seasonal_command() {
        assert!(matches!(seasonal_command(1), Command::NewYear { .. }));
        assert!(matches!(seasonal_command(12), Command::Christmas { .. }));
        for month in 2..=11 {
            assert!(matches!(seasonal_command(month), Command::Fill { .. }));
        }
    }

    #[test]
    fn test_cli_parses_globals_after_subcommand() {
        let cli = Cli::try_parse_from([
            "season-screen",
            "new-year",
            "--rockets",
            "3",
            "--color",
            "255,0,0",
            "--rotation",
            "90",
            "--backend",
            "memory",
        ])
        .unwrap();
        assert_eq!(cli.rotation, Some(90));
        assert_eq!(cli.backend, Some(Backend::Memory));
        match cli.command {
            Command::NewYear { rockets, color } => {
                assert_eq!(rockets, Some(3));
                assert_eq!(color, Some(Rgb(255, 0, 0)));
            },
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_greeting_flags() {
        let cli = Cli::try_parse_from(["season-screen", "christmas", "--greeting", "Ho ho ho"]).unwrap();
        match cli.command {
            Command::Christmas {
                greeting,
                no_greeting,
                ..
            } => {
                assert_eq!(greeting.as_deref(), Some("Ho ho ho"));
                assert!(!no_greeting);
            },
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::try_parse_from(["season-screen", "christmas", "--no-greeting"]).unwrap();
        assert!(matches!(cli.command, Command::Christmas { no_greeting: true, .. }));

        assert!(Cli::try_parse_from([
            "season-screen",
            "christmas",
            "--no-greeting",
            "--greeting",
            "hi"
        ])
        .is_err());
    }

    #[test]
    fn test_cli_rejects_bad_color() {
        assert!(Cli::try_parse_from(["season-screen", "new-year", "--color", "red"]).is_err());
    }

    #[test]
    fn test_build_scene_respects_config() {
        let mut config = Config::default();
        config.christmas.snowflakes = 9;
        let christmas = |snowflakes| Command::Christmas {
            snowflakes,
            greeting: None,
            no_greeting: false,
        };
        assert!(build_scene(&christmas(None), &config).is_err());

        let scene = build_scene(&christmas(Some(3)), &config).unwrap();
        assert_eq!(scene.name(), "christmas");
        let scene = build_scene(&Command::Easter, &config).unwrap();
        assert_eq!(scene.name(), "easter");
    }

    #[test]
    fn test_build_scene_missing_assets() {
        let mut config = Config::default();
        config.fill.frames = PathBuf::from("/nonexistent/season-screen/frames.json");
        assert!(build_scene(&Command::Fill { frames: None, fps: None }, &config).is_err());
        assert!(build_scene(&Command::Video { video_path: None, fps: None }, &config).is_err());
    }

    #[test]
    fn test_memory_backend_opens() {
        let token = ShutdownToken::new();
        assert!(open_display(Backend::Memory, None, &token).is_ok());
    }
}
