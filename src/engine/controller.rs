use std::time::Instant;

use super::stage::Stage;
use crate::display::{DisplaySettings, LedMatrix};
use crate::error::SceneError;
use crate::scenes::Scene;
use crate::shutdown::{signal_name, ShutdownToken};
use crate::util::Rng;

/// Runs one scene on one display until cancelled.
///
/// Lifecycle: `new` (configures the display) -> `init_scene` -> `start_scene`
/// (busy frame loop) -> `handle_signal` / `shutdown` (clears the display once).
pub struct SceneController {
    stage: Stage,
    scene: Box<dyn Scene>,
    shutdown: ShutdownToken,
    running: bool,
    cleaned_up: bool,
}

impl SceneController {
    pub fn new(
        mut display: Box<dyn LedMatrix>,
        settings: DisplaySettings,
        scene: Box<dyn Scene>,
        shutdown: ShutdownToken,
        seed: u64,
    ) -> Result<Self, SceneError> {
        display.configure(settings)?;
        Ok(Self {
            stage: Stage::new(display, Rng::new(seed)),
            scene,
            shutdown,
            running: false,
            cleaned_up: false,
        })
    }

    pub fn scene_name(&self) -> &str {
        self.scene.name()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn is_running(&self) -> bool {
        self.running && !self.shutdown.is_cancelled()
    }

    pub fn init_scene(&mut self) -> Result<(), SceneError> {
        self.init_scene_at(Instant::now())
    }

    /// Clear the display, mark running and let the scene draw its backdrop and spawn entities
    pub fn init_scene_at(&mut self, now: Instant) -> Result<(), SceneError> {
        log::info!("Clearing display");
        self.stage.clear();
        self.running = true;
        log::info!("Initializing scene '{}'", self.scene.name());
        self.scene.init(&mut self.stage, now)?;
        self.stage.flush();
        Ok(())
    }

    /// Busy frame loop. Pacing is each entity's own job via its ticker.
    /// Cancellation is only observed between iterations.
    pub fn start_scene(&mut self) -> Result<(), SceneError> {
        log::info!("Starting scene loop");
        while self.is_running() {
            if let Err(e) = self.next_frame(Instant::now()) {
                log::error!("Scene '{}' stopped: {}", self.scene.name(), e);
                self.running = false;
                return Err(e);
            }
        }
        Ok(())
    }

    pub fn next_frame(&mut self, now: Instant) -> Result<(), SceneError> {
        self.scene.next_frame(&mut self.stage, now)?;
        self.stage.flush();
        Ok(())
    }

    /// Termination handler. Safe to call repeatedly; only the first call touches the display.
    pub fn handle_signal(&mut self, signum: i32) {
        if self.cleaned_up {
            log::debug!("Ignoring {}, already shutting down", signal_name(signum));
            self.stop();
            return;
        }
        log::info!("Received {}, stopping scene", signal_name(signum));
        self.shutdown();
    }

    /// Stop the loop and blank the display (exactly once)
    pub fn shutdown(&mut self) {
        self.stop();
        if self.cleaned_up {
            return;
        }
        log::info!("Clearing display");
        self.stage.clear();
        self.stage.flush();
        self.cleaned_up = true;
        log::info!("Finishing up, goodbye!");
    }

    fn stop(&mut self) {
        self.running = false;
        self.shutdown.cancel();
    }
}
