use std::collections::BTreeSet;

use crate::util::Rng;

/// Number of spawn lanes on the matrix
pub const COLUMN_COUNT: u8 = 8;

/// Spawn columns not currently owned by a live entity.
/// A column is in the pool iff no entity holds it as its lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPool {
    free: BTreeSet<u8>,
    capacity: u8,
}

impl IndexPool {
    /// A pool with every column `0..capacity` free
    pub fn new(capacity: u8) -> Self {
        Self {
            free: (0..capacity).collect(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    pub fn is_free(&self, column: u8) -> bool {
        self.free.contains(&column)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.free.iter().copied()
    }

    /// Take a uniformly random free column out of the pool
    pub fn acquire_random(&mut self, rng: &mut Rng) -> Option<u8> {
        let pick = rng.index(self.free.len())?;
        let column = self.free.iter().nth(pick).copied()?;
        self.free.remove(&column);
        Some(column)
    }

    /// Take a specific column. Returns false if it is not free.
    pub fn acquire(&mut self, column: u8) -> bool {
        self.free.remove(&column)
    }

    /// Hand a column back. Returns false if it was already free or is not a lane.
    pub fn release(&mut self, column: u8) -> bool {
        column < self.capacity && self.free.insert(column)
    }
}

impl Default for IndexPool {
    fn default() -> Self {
        Self::new(COLUMN_COUNT)
    }
}
