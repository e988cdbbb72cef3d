use std::time::Instant;

use super::{check_lane_count, Scene};
use crate::display::WHITE;
use crate::engine::{Background, Stage};
use crate::entities::{Entity, Scroller, Snowflake};
use crate::error::SceneError;

pub const DEFAULT_SNOWFLAKES: usize = 8;
pub const DEFAULT_GREETING: &str = "Merry Christmas!";

/// Christmas tree with snow falling in front of and behind it,
/// optionally preceded by a scrolling greeting
pub struct ChristmasScene {
    count: usize,
    greeting: Option<String>,
    scroller: Option<Scroller>,
    snowflakes: Vec<Snowflake>,
}

impl ChristmasScene {
    pub fn new(count: usize) -> Result<Self, SceneError> {
        Ok(Self {
            count: check_lane_count(count)?,
            greeting: None,
            scroller: None,
            snowflakes: Vec::with_capacity(count),
        })
    }

    /// Scroll `text` once before the tree appears. Empty text means no greeting.
    pub fn with_greeting(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.greeting = (!text.is_empty()).then_some(text);
        self
    }

    pub fn snowflakes(&self) -> &[Snowflake] {
        &self.snowflakes
    }

    pub fn is_greeting(&self) -> bool {
        self.scroller.is_some()
    }

    fn plant_tree(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        stage.install_background(Background::christmas_tree());
        for _ in 0..self.count {
            let x = stage.acquire_column()?;
            self.snowflakes.push(Snowflake::new(x, stage, now));
        }
        log::debug!("Spawned {} snowflakes", self.snowflakes.len());
        Ok(())
    }
}

impl Scene for ChristmasScene {
    fn name(&self) -> &str {
        "christmas"
    }

    fn init(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        match &self.greeting {
            Some(text) => {
                log::info!("Showing greeting '{}'", text);
                self.scroller = Some(Scroller::new(text, WHITE, now));
                Ok(())
            },
            None => self.plant_tree(stage, now),
        }
    }

    fn next_frame(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        if let Some(scroller) = &mut self.scroller {
            scroller.update(stage, now)?;
            if scroller.is_finished() {
                self.scroller = None;
                self.plant_tree(stage, now)?;
            }
            return Ok(());
        }
        for flake in &mut self.snowflakes {
            flake.update(stage, now)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{MemoryMatrix, Position};
    use crate::engine::background::TREE;
    use crate::entities::SCROLL_STEP;
    use crate::util::Rng;
    use std::collections::BTreeSet;
    use std::time::Duration;

    fn stage(seed: u64) -> Stage {
        Stage::new(Box::new(MemoryMatrix::new()), Rng::new(seed))
    }

    #[test]
    fn test_too_many_snowflakes() {
        assert!(matches!(
            ChristmasScene::new(9),
            Err(SceneError::PoolExhausted { .. })
        ));
    }

    #[test]
    fn test_init_draws_tree_and_spawns_distinct_columns() {
        let mut stage = stage(5);
        let mut scene = ChristmasScene::new(6).unwrap();
        scene.init(&mut stage, Instant::now()).unwrap();

        for p in Position::all() {
            assert_eq!(stage.display().get_pixel(p), TREE[p.index()]);
        }
        let columns: BTreeSet<u8> = scene.snowflakes().iter().map(|f| f.x()).collect();
        assert_eq!(columns.len(), 6);
        assert!(scene.snowflakes().iter().all(|f| f.y() == 0));
        assert_eq!(stage.pool().len(), 2);
    }

    #[test]
    fn test_greeting_scrolls_before_tree() {
        let mut stage = stage(8);
        let mut scene = ChristmasScene::new(4)
            .unwrap()
            .with_greeting(DEFAULT_GREETING);
        let mut now = Instant::now();
        scene.init(&mut stage, now).unwrap();

        assert!(scene.is_greeting());
        assert!(stage.background().is_none());
        assert!(scene.snowflakes().is_empty());
        assert_eq!(stage.pool().len(), 8);

        let mut lit_frames = 0;
        let mut steps = 0;
        while scene.is_greeting() {
            now += SCROLL_STEP;
            scene.next_frame(&mut stage, now).unwrap();
            steps += 1;
            if scene.is_greeting() {
                assert!(stage.background().is_none());
                let lit = Position::all().any(|p| stage.display().get_pixel(p) == WHITE);
                lit_frames += usize::from(lit);
            }
            assert!(steps < 1_000);
        }
        assert!(lit_frames > 0);

        for p in Position::all() {
            assert_eq!(stage.display().get_pixel(p), TREE[p.index()]);
        }
        assert!(stage.background().is_some());
        assert_eq!(scene.snowflakes().len(), 4);
        assert_eq!(stage.pool().len(), 4);
    }

    #[test]
    fn test_empty_greeting_is_skipped() {
        let mut stage = stage(8);
        let mut scene = ChristmasScene::new(2).unwrap().with_greeting("");
        scene.init(&mut stage, Instant::now()).unwrap();
        assert!(!scene.is_greeting());
        assert!(stage.background().is_some());
    }

    #[test]
    fn test_pool_matches_live_lanes_over_time() {
        for count in [1, 4, 8] {
            let mut stage = stage(count as u64 * 17);
            let mut scene = ChristmasScene::new(count).unwrap();
            let mut now = Instant::now();
            scene.init(&mut stage, now).unwrap();

            for _ in 0..2_000 {
                now += Duration::from_millis(50);
                scene.next_frame(&mut stage, now).unwrap();

                let lanes: BTreeSet<u8> = scene.snowflakes().iter().map(|f| f.x()).collect();
                assert_eq!(lanes.len(), count);
                for col in 0..8u8 {
                    assert_eq!(stage.pool().is_free(col), !lanes.contains(&col));
                }
            }
        }
    }
}
