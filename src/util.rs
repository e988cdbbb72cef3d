//! Shared utilities

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Simple deterministic RNG using xorshift64
/// Every random roll in a scene goes through one of these so a fixed seed replays a run
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) } // Ensure non-zero
    }

    /// Get the next random u64
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Get a random u8
    #[inline]
    pub fn next_u8(&mut self) -> u8 {
        (self.next_u64() >> 56) as u8
    }

    /// Get a random i32 in [min, max]
    ///
    /// # Panics
    /// Panics in debug builds if `min > max`
    #[inline]
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        debug_assert!(min <= max, "range_i32: min ({}) must be <= max ({})", min, max);
        if min >= max {
            return min;
        }
        let range = (max - min + 1) as u64;
        min + (self.next_u64() % range) as i32
    }

    /// Get a random index in [0, len), or None for an empty range
    #[inline]
    pub fn index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.next_u64() % len as u64) as usize)
    }
}

/// Seed derived from the wall clock, for runs without `--seed`
pub fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EA5_0715)
}

// ============================================================================
// Ticker
// ============================================================================

/// Per-entity update cadence.
/// An entity is due once `interval` has passed since the last `mark`.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    last: Instant,
    interval: Duration,
}

impl Ticker {
    pub fn new(now: Instant, interval: Duration) -> Self {
        Self {
            last: now,
            interval,
        }
    }

    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        self.is_due_after(now, Duration::ZERO)
    }

    /// Due check with an extra one-off pause on top of the interval
    #[inline]
    pub fn is_due_after(&self, now: Instant, extra: Duration) -> bool {
        now >= self.last + self.interval + extra
    }

    #[inline]
    pub fn mark(&mut self, now: Instant) {
        self.last = now;
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Multiply the interval (>1 slows down, <1 speeds up)
    pub fn scale(&mut self, factor: f64) {
        self.interval = self.interval.mul_f64(factor);
    }
}

// ============================================================================
// Calendar
// ============================================================================

/// Calendar month (1-12) for a count of days since 1970-01-01.
/// Civil-from-days conversion on the proleptic Gregorian calendar.
pub fn month_from_unix_days(days: i64) -> u32 {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    if mp < 10 {
        (mp + 3) as u32
    } else {
        (mp - 9) as u32
    }
}

/// Current calendar month in UTC
pub fn current_month_utc() -> u32 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    month_from_unix_days((secs / 86_400) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut a = Rng::new(42);
        let mut b = Rng::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_range_i32_bounds() {
        let mut rng = Rng::new(7);
        for _ in 0..1000 {
            let v = rng.range_i32(1, 10);
            assert!((1..=10).contains(&v));
        }
    }

    #[test]
    fn test_index_empty() {
        let mut rng = Rng::new(7);
        assert_eq!(rng.index(0), None);
        assert_eq!(rng.index(1), Some(0));
    }

    #[test]
    fn test_ticker_due_on_boundary() {
        let t0 = Instant::now();
        let ticker = Ticker::new(t0, Duration::from_millis(500));
        assert!(!ticker.is_due(t0 + Duration::from_millis(499)));
        assert!(ticker.is_due(t0 + Duration::from_millis(500)));
        assert!(!ticker.is_due_after(t0 + Duration::from_millis(500), Duration::from_millis(1)));
    }

    #[test]
    fn test_ticker_scale() {
        let mut ticker = Ticker::new(Instant::now(), Duration::from_millis(1000));
        ticker.scale(0.5);
        assert_eq!(ticker.interval(), Duration::from_millis(500));
    }

    #[test]
    fn test_month_from_unix_days() {
        assert_eq!(month_from_unix_days(0), 1); // 1970-01-01
        assert_eq!(month_from_unix_days(333), 11); // 1970-11-30
        assert_eq!(month_from_unix_days(334), 12); // 1970-12-01
        assert_eq!(month_from_unix_days(19_723), 1); // 2024-01-01
        assert_eq!(month_from_unix_days(19_782), 2); // 2024-02-29
    }
}
