//! Firework rocket.
//!
//! A rocket climbs from the bottom row, slowing down as it goes, pauses at an
//! apex set by its depth, bursts into up to eight particles and finally
//! respawns in a new random column. Nearer rockets climb higher, faster and
//! burst wider.

use std::time::{Duration, Instant};

use super::{interval_for_depth, validate_depth, Entity, BOTTOM_ROW};
use crate::display::{Position, Rgb, WHITE};
use crate::engine::Stage;
use crate::error::SceneError;
use crate::util::Ticker;

/// Burst radius of the nearest rockets
pub const MAX_RADIUS: u8 = 4;
/// Interval growth per row while climbing
const CLIMB_SLOWDOWN: f64 = 1.2;
/// Interval shrink per burst step
const BURST_SPEEDUP: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RocketState {
    Flying,
    Waiting,
    Exploding,
    Destroyed,
}

impl RocketState {
    /// Edges of the rocket life cycle (self-loops included)
    pub fn can_transition_to(self, next: RocketState) -> bool {
        use RocketState::*;
        matches!(
            (self, next),
            (Flying, Flying | Waiting)
                | (Waiting, Exploding)
                | (Exploding, Exploding | Destroyed)
                | (Destroyed, Flying)
        )
    }
}

/// One spark of a burst. Diagonal sparks only move every other step so
/// they do not outrun the straight ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplosionParticle {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    lifetime: u8,
    waiting: bool,
}

impl ExplosionParticle {
    pub fn new(x: i32, y: i32, dx: i32, dy: i32, lifetime: u8) -> Self {
        Self {
            x,
            y,
            dx,
            dy,
            lifetime,
            waiting: false,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn direction(&self) -> (i32, i32) {
        (self.dx, self.dy)
    }

    pub fn lifetime(&self) -> u8 {
        self.lifetime
    }

    pub fn is_diagonal(&self) -> bool {
        self.dx.abs() + self.dy.abs() > 1
    }

    pub fn in_bounds(&self) -> bool {
        Position::new(self.x, self.y).is_some()
    }

    /// One burst step: diagonals alternate between skipping and moving
    pub fn advance(&mut self) {
        if self.is_diagonal() {
            self.waiting = !self.waiting;
            if self.waiting {
                return;
            }
        }
        self.x += self.dx;
        self.y += self.dy;
        self.lifetime = self.lifetime.saturating_sub(1);
    }
}

#[derive(Debug, Clone)]
pub struct Rocket {
    x: u8,
    y: u8,
    depth: u8,
    color: Rgb,
    fixed_color: bool,
    ticker: Ticker,
    state: RocketState,
    particles: Vec<ExplosionParticle>,
}

impl Rocket {
    /// Launch from the bottom of an already acquired column.
    /// `color` pins the burst colour across respawns; None rolls a new one each launch.
    pub fn new(x: u8, color: Option<Rgb>, stage: &mut Stage, now: Instant) -> Self {
        let depth = stage.roll_depth();
        let (color, fixed_color) = match color {
            Some(c) => (c, true),
            None => (stage.roll_color(), false),
        };
        Self::launch(x, depth, color, fixed_color, now)
    }

    /// Launch with a known depth and a pinned colour
    pub fn with_depth(x: u8, depth: u8, color: Rgb, now: Instant) -> Result<Self, SceneError> {
        let depth = validate_depth(depth)?;
        Ok(Self::launch(x, depth, color, true, now))
    }

    fn launch(x: u8, depth: u8, color: Rgb, fixed_color: bool, now: Instant) -> Self {
        Self {
            x,
            y: BOTTOM_ROW,
            depth,
            color,
            fixed_color,
            ticker: Ticker::new(now, interval_for_depth(depth)),
            state: RocketState::Flying,
            particles: Vec::new(),
        }
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn state(&self) -> RocketState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.ticker.interval()
    }

    pub fn particles(&self) -> &[ExplosionParticle] {
        &self.particles
    }

    /// Row at which the climb stops (1..=5 for depths 2..=10, 0 for depth 1)
    pub fn apex_row(&self) -> u8 {
        self.depth / 2
    }

    /// Steps each spark travels
    pub fn particle_lifetime(&self) -> u8 {
        MAX_RADIUS - self.depth / 3
    }

    fn transition(&mut self, next: RocketState) -> Result<(), SceneError> {
        if !self.state.can_transition_to(next) {
            return Err(SceneError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    fn fly(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        if self.ticker.is_due(now) {
            self.ticker.mark(now);
            self.ticker.scale(CLIMB_SLOWDOWN);
            stage.clear_at(i32::from(self.x), i32::from(self.y));
            self.y = self.y.saturating_sub(1);
            if self.y <= self.apex_row() {
                self.transition(RocketState::Waiting)?;
                stage.clear_at(i32::from(self.x), i32::from(self.y));
            }
        }
        // Redrawn every frame so the head stays lit
        stage.draw(i32::from(self.x), i32::from(self.y), WHITE);
        Ok(())
    }

    fn wait(&mut self, now: Instant) -> Result<(), SceneError> {
        if self.ticker.is_due(now) {
            self.ticker.set_interval(interval_for_depth(self.depth));
            self.transition(RocketState::Exploding)?;
        }
        Ok(())
    }

    fn explode(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        if self.particles.is_empty() {
            self.spawn_particles();
        }
        if !self.ticker.is_due(now) {
            return Ok(());
        }
        self.ticker.mark(now);
        self.ticker.scale(BURST_SPEEDUP);

        let mut burnt_out = false;
        for p in &mut self.particles {
            if !p.in_bounds() {
                continue;
            }
            let (x, y) = p.position();
            stage.clear_at(x, y);
            if p.lifetime() > 0 {
                p.advance();
                if !p.in_bounds() {
                    continue;
                }
                let (x, y) = p.position();
                stage.draw(x, y, self.color);
            } else {
                burnt_out = true;
            }
        }

        if burnt_out {
            self.transition(RocketState::Destroyed)?;
        } else {
            self.transition(RocketState::Exploding)?;
        }
        Ok(())
    }

    /// One spark per neighbouring cell that lies on the grid
    fn spawn_particles(&mut self) {
        let (cx, cy) = (i32::from(self.x), i32::from(self.y));
        let lifetime = self.particle_lifetime();
        self.particles = (-1..=1)
            .flat_map(|dx| (-1..=1).map(move |dy| (dx, dy)))
            .filter(|&(dx, dy)| (dx, dy) != (0, 0))
            .filter(|&(dx, dy)| Position::new(cx + dx, cy + dy).is_some())
            .map(|(dx, dy)| ExplosionParticle::new(cx, cy, dx, dy, lifetime))
            .collect();
    }

    fn respawn(&mut self, stage: &mut Stage) -> Result<(), SceneError> {
        for p in self.particles.iter().filter(|p| p.in_bounds()) {
            let (x, y) = p.position();
            stage.clear_at(x, y);
        }
        stage.release_column(self.x)?;
        self.depth = stage.roll_depth();
        self.ticker.set_interval(interval_for_depth(self.depth));
        self.y = BOTTOM_ROW;
        self.x = stage.acquire_column()?;
        if !self.fixed_color {
            self.color = stage.roll_color();
        }
        self.particles.clear();
        self.transition(RocketState::Flying)
    }
}

impl Entity for Rocket {
    fn update(&mut self, stage: &mut Stage, now: Instant) -> Result<(), SceneError> {
        match self.state {
            RocketState::Flying => self.fly(stage, now),
            RocketState::Waiting => self.wait(now),
            RocketState::Exploding => self.explode(stage, now),
            RocketState::Destroyed => self.respawn(stage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MemoryMatrix;
    use crate::util::Rng;
    use RocketState::*;

    const GOLD: Rgb = Rgb(255, 200, 0);

    fn stage() -> Stage {
        Stage::new(Box::new(MemoryMatrix::new()), Rng::new(31))
    }

    fn pixel(stage: &Stage, x: i32, y: i32) -> Rgb {
        stage.display().get_pixel(Position::new(x, y).unwrap())
    }

    #[test]
    fn test_transition_table() {
        let all = [Flying, Waiting, Exploding, Destroyed];
        let allowed = [
            (Flying, Flying),
            (Flying, Waiting),
            (Waiting, Exploding),
            (Exploding, Exploding),
            (Exploding, Destroyed),
            (Destroyed, Flying),
        ];
        for from in all {
            for to in all {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_depth_derived_shape() {
        let now = Instant::now();
        let r = Rocket::with_depth(3, 6, GOLD, now).unwrap();
        assert_eq!(r.apex_row(), 3);
        assert_eq!(r.particle_lifetime(), 2);
        let r = Rocket::with_depth(3, 1, GOLD, now).unwrap();
        assert_eq!(r.apex_row(), 0);
        assert_eq!(r.particle_lifetime(), 4);
        assert!(Rocket::with_depth(3, 0, GOLD, now).is_err());
    }

    #[test]
    fn test_diagonal_particle_moves_every_other_step() {
        let mut p = ExplosionParticle::new(3, 3, 1, 1, 2);
        p.advance();
        assert_eq!((p.position(), p.lifetime()), ((3, 3), 2));
        p.advance();
        assert_eq!((p.position(), p.lifetime()), ((4, 4), 1));
        p.advance();
        assert_eq!((p.position(), p.lifetime()), ((4, 4), 1));
        p.advance();
        assert_eq!((p.position(), p.lifetime()), ((5, 5), 0));

        let mut straight = ExplosionParticle::new(3, 3, 0, -1, 2);
        straight.advance();
        assert_eq!((straight.position(), straight.lifetime()), ((3, 2), 1));
    }

    #[test]
    fn test_corner_burst_drops_offgrid_particles() {
        // Depth 1 climbs all the way to row 0
        let mut r = Rocket::with_depth(0, 1, GOLD, Instant::now()).unwrap();
        r.y = 0;
        r.spawn_particles();
        let mut dirs: Vec<_> = r.particles().iter().map(|p| p.direction()).collect();
        dirs.sort();
        assert_eq!(dirs, vec![(0, 1), (1, 0), (1, 1)]);
        assert!(r.particles().iter().all(|p| p.lifetime() == 4));
    }

    #[test]
    fn test_full_life_cycle_depth_six() {
        let mut stage = stage();
        let mut now = Instant::now();
        stage.acquire_exact(3).unwrap();
        let mut r = Rocket::with_depth(3, 6, GOLD, now).unwrap();

        // Head is drawn even on frames that are not due
        r.update(&mut stage, now).unwrap();
        assert_eq!(pixel(&stage, 3, 7), WHITE);

        // Climb 7 -> 3, slowing down by 1.2x per row
        let mut climbs = 0;
        while r.state() == Flying {
            let before = r.interval();
            now += before;
            r.update(&mut stage, now).unwrap();
            climbs += 1;
            assert_eq!(r.interval(), before.mul_f64(1.2));
        }
        assert_eq!(climbs, 4);
        assert_eq!(r.state(), Waiting);
        assert_eq!(r.y(), 3);
        assert_eq!(pixel(&stage, 3, 3), WHITE);
        assert!(pixel(&stage, 3, 4).is_black());

        // Not due yet: stays waiting
        r.update(&mut stage, now).unwrap();
        assert_eq!(r.state(), Waiting);

        now += r.interval();
        r.update(&mut stage, now).unwrap();
        assert_eq!(r.state(), Exploding);
        assert_eq!(r.interval(), interval_for_depth(6));

        // Step 1: eight sparks, straight ones move one cell
        now += r.interval();
        r.update(&mut stage, now).unwrap();
        assert_eq!(r.particles().len(), 8);
        assert_eq!(r.state(), Exploding);
        assert_eq!(pixel(&stage, 4, 3), GOLD);
        assert_eq!(pixel(&stage, 3, 2), GOLD);
        // Diagonals hold still and keep the centre lit
        assert_eq!(pixel(&stage, 3, 3), GOLD);
        assert!(pixel(&stage, 4, 4).is_black());

        // Step 2: straight sparks reach radius 2, diagonals move once
        now += r.interval();
        r.update(&mut stage, now).unwrap();
        assert_eq!(r.state(), Exploding);
        assert_eq!(pixel(&stage, 5, 3), GOLD);
        assert_eq!(pixel(&stage, 3, 1), GOLD);
        assert_eq!(pixel(&stage, 4, 4), GOLD);
        assert!(pixel(&stage, 4, 3).is_black());

        // Step 3: straight sparks burn out
        now += r.interval();
        r.update(&mut stage, now).unwrap();
        assert_eq!(r.state(), Destroyed);
        assert!(pixel(&stage, 5, 3).is_black());

        // Respawn clears the rest and relaunches from the bottom
        r.update(&mut stage, now).unwrap();
        assert_eq!(r.state(), Flying);
        assert_eq!(r.y(), 7);
        assert!(r.particles().is_empty());
        assert_eq!(r.color(), GOLD);
        assert!(Position::all().all(|p| stage.display().get_pixel(p).is_black()));
        assert_eq!(stage.pool().len(), 7);
        assert!(!stage.pool().is_free(r.x()));
    }

    #[test]
    fn test_random_color_rerolled_on_respawn() {
        let mut stage = stage();
        let mut now = Instant::now();
        let x = stage.acquire_column().unwrap();
        let mut r = Rocket::new(x, None, &mut stage, now);
        let mut colors = vec![r.color()];
        let mut launches = 0;
        while launches < 5 {
            now += r.interval();
            let before = r.state();
            r.update(&mut stage, now).unwrap();
            if before == Destroyed {
                launches += 1;
                colors.push(r.color());
            }
        }
        colors.dedup();
        assert!(colors.len() > 1);
    }
}
