use std::time::Instant;

use super::Scene;
use crate::engine::Stage;
use crate::entities::{Bunny, Entity};
use crate::error::SceneError;

/// A bunny hopping through the void
#[derive(Default)]
pub struct EasterScene {
    bunny: Option<Bunny>,
}

impl EasterScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bunny(&self) -> Option<&Bunny> {
        self.bunny.as_ref()
    }
}

impl Scene for EasterScene {
    fn name(&self) -> &str {
        "easter"
    }

    fn init(&mut self, _stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        self.bunny = Some(Bunny::new(now));
        Ok(())
    }

    fn next_frame(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        match self.bunny.as_mut() {
            Some(bunny) => bunny.update(stage, now),
            None => Ok(()),
        }
    }
}
