use std::time::Instant;

use super::{check_lane_count, Scene};
use crate::display::Rgb;
use crate::engine::Stage;
use crate::entities::{Entity, Rocket};
use crate::error::SceneError;

pub const DEFAULT_ROCKETS: usize = 5;

/// Fireworks over a black sky
pub struct NewYearScene {
    count: usize,
    color: Option<Rgb>,
    rockets: Vec<Rocket>,
}

impl NewYearScene {
    /// `color` pins every burst to one colour; None rolls a colour per launch
    pub fn new(count: usize, color: Option<Rgb>) -> Result<Self, SceneError> {
        Ok(Self {
            count: check_lane_count(count)?,
            color,
            rockets: Vec::with_capacity(count),
        })
    }

    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }
}

impl Scene for NewYearScene {
    fn name(&self) -> &str {
        "new-year"
    }

    fn init(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        for _ in 0..self.count {
            let x = stage.acquire_column()?;
            self.rockets.push(Rocket::new(x, self.color, stage, now));
        }
        log::debug!("Spawned {} rockets", self.rockets.len());
        Ok(())
    }

    fn next_frame(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        for rocket in &mut self.rockets {
            rocket.update(stage, now)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MemoryMatrix;
    use crate::entities::RocketState;
    use crate::util::Rng;
    use std::collections::BTreeSet;
    use std::time::Duration;

    fn stage(seed: u64) -> Stage {
        Stage::new(Box::new(MemoryMatrix::new()), Rng::new(seed))
    }

    #[test]
    fn test_default_rocket_count() {
        let mut stage = stage(1);
        let mut scene = NewYearScene::new(DEFAULT_ROCKETS, None).unwrap();
        scene.init(&mut stage, Instant::now()).unwrap();
        assert_eq!(scene.rockets().len(), 5);
        assert_eq!(stage.pool().len(), 3);
        assert!(scene
            .rockets()
            .iter()
            .all(|r| r.state() == RocketState::Flying && r.y() == 7));
    }

    #[test]
    fn test_too_many_rockets() {
        assert!(matches!(
            NewYearScene::new(12, None),
            Err(SceneError::PoolExhausted { requested: 12, .. })
        ));
    }

    #[test]
    fn test_long_run_follows_life_cycle_and_keeps_pool_consistent() {
        let gold = Rgb(255, 215, 0);
        for (count, seed) in [(1, 3), (5, 99), (8, 4242)] {
            let mut stage = stage(seed);
            let mut scene = NewYearScene::new(count, Some(gold)).unwrap();
            let mut now = Instant::now();
            scene.init(&mut stage, now).unwrap();

            let mut states: Vec<RocketState> = scene.rockets().iter().map(|r| r.state()).collect();
            let mut respawns = 0;
            for _ in 0..3_000 {
                now += Duration::from_millis(40);
                scene.next_frame(&mut stage, now).unwrap();

                for (rocket, prev) in scene.rockets().iter().zip(states.iter_mut()) {
                    assert!(prev.can_transition_to(rocket.state()) || *prev == rocket.state());
                    if *prev == RocketState::Destroyed {
                        respawns += 1;
                    }
                    assert_eq!(rocket.color(), gold);
                    *prev = rocket.state();
                }

                let lanes: BTreeSet<u8> = scene.rockets().iter().map(|r| r.x()).collect();
                assert_eq!(lanes.len(), count);
                for col in 0..8u8 {
                    assert_eq!(stage.pool().is_free(col), !lanes.contains(&col));
                }
            }
            assert!(respawns > 0);
        }
    }
}
