//! Weighted random selection
//!
//! Each entry is drawn with probability `weight / total_weight`. The table
//! keeps cumulative weights and binary-searches a uniform roll, which selects
//! exactly the same entry as indexing a flat pool where every entry is
//! repeated `weight` times.

use rand::Rng;

use crate::error::{FaError, FaResult};

/// Immutable weighted table built once from a catalog
#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    entries: Vec<T>,
    weights: Vec<u32>,
    /// Running sum of weights; `cumulative[i]` is the exclusive upper bound of entry `i`'s band
    cumulative: Vec<u64>,
    total: u64,
}

impl<T> WeightedTable<T> {
    /// Build a table from `(entry, weight)` pairs
    ///
    /// Zero-weight entries are kept (so indices line up with the catalog)
    /// but can never be drawn.
    pub fn new(items: impl IntoIterator<Item = (T, u32)>) -> FaResult<Self> {
        let mut entries = Vec::new();
        let mut weights = Vec::new();
        let mut cumulative = Vec::new();
        let mut total = 0u64;

        for (entry, weight) in items {
            total += u64::from(weight);
            entries.push(entry);
            weights.push(weight);
            cumulative.push(total);
        }

        if entries.is_empty() {
            return Err(FaError::InvalidParam("weighted table has no entries".into()));
        }
        if total == 0 {
            return Err(FaError::InvalidParam(
                "weighted table has zero total weight".into(),
            ));
        }

        Ok(Self {
            entries,
            weights,
            cumulative,
            total,
        })
    }

    /// Draw one entry
    pub fn draw<R: Rng>(&self, rng: &mut R) -> &T {
        let roll = rng.random_range(0..self.total);
        &self.entries[self.index_for_roll(roll)]
    }

    /// Draw `count` independent entries, in draw order
    pub fn draw_many<R: Rng>(&self, rng: &mut R, count: usize) -> Vec<&T> {
        (0..count).map(|_| self.draw(rng)).collect()
    }

    /// Entry index selected by a roll in `0..total_weight`
    ///
    /// Equivalent to `flat_pool[roll]` for the expanded pool. Rolls past the
    /// end clamp to the last drawable entry.
    pub fn index_for_roll(&self, roll: u64) -> usize {
        let roll = roll.min(self.total - 1);
        self.cumulative.partition_point(|&bound| bound <= roll)
    }

    /// Probability of drawing the entry at `index`
    pub fn probability(&self, index: usize) -> f64 {
        self.weights
            .get(index)
            .map(|&w| w as f64 / self.total as f64)
            .unwrap_or(0.0)
    }

    /// Sum of all weights
    pub fn total_weight(&self) -> u64 {
        self.total
    }

    /// Weight of the entry at `index`
    pub fn weight(&self, index: usize) -> Option<u32> {
        self.weights.get(index).copied()
    }

    /// All entries in catalog order
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn flat_pool(items: &[(char, u32)]) -> Vec<usize> {
        let mut pool = Vec::new();
        for (idx, (_, weight)) in items.iter().enumerate() {
            for _ in 0..*weight {
                pool.push(idx);
            }
        }
        pool
    }

    #[test]
    fn test_rejects_empty_and_zero_weight() {
        assert!(WeightedTable::<char>::new(Vec::new()).is_err());
        assert!(WeightedTable::new(vec![('a', 0), ('b', 0)]).is_err());
    }

    #[test]
    fn test_matches_flat_pool() {
        let items = vec![('a', 3), ('b', 0), ('c', 5), ('d', 1), ('e', 0)];
        let table = WeightedTable::new(items.clone()).unwrap();
        let pool = flat_pool(&items);

        assert_eq!(table.total_weight(), pool.len() as u64);
        for (roll, expected) in pool.iter().enumerate() {
            assert_eq!(table.index_for_roll(roll as u64), *expected, "roll {}", roll);
        }
    }

    #[test]
    fn test_zero_weight_never_drawn() {
        let table = WeightedTable::new(vec![('a', 0), ('b', 1), ('c', 0)]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1_000 {
            assert_eq!(*table.draw(&mut rng), 'b');
        }
    }

    #[test]
    fn test_probability() {
        let table = WeightedTable::new(vec![('a', 1), ('b', 3)]).unwrap();
        assert!((table.probability(0) - 0.25).abs() < 1e-12);
        assert!((table.probability(1) - 0.75).abs() < 1e-12);
        assert_eq!(table.probability(9), 0.0);
    }

    #[test]
    fn test_empirical_frequency_converges() {
        let table = WeightedTable::new(vec![('a', 20), ('b', 15), ('c', 5), ('d', 60)]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0xA11CE);
        let trials = 200_000;
        let mut counts = [0usize; 4];

        for _ in 0..trials {
            let idx = match table.draw(&mut rng) {
                'a' => 0,
                'b' => 1,
                'c' => 2,
                _ => 3,
            };
            counts[idx] += 1;
        }

        for (idx, count) in counts.iter().enumerate() {
            let observed = *count as f64 / trials as f64;
            let expected = table.probability(idx);
            assert!(
                (observed - expected).abs() < 0.01,
                "entry {}: observed {:.4}, expected {:.4}",
                idx,
                observed,
                expected
            );
        }
    }

    #[test]
    fn test_draw_many_len() {
        let table = WeightedTable::new(vec![(1u8, 1), (2u8, 1)]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(table.draw_many(&mut rng, 5).len(), 5);
    }
}
