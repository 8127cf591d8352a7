use super::error::EngineError;
use crate::core::models::mutation::{Mutation, MutationSet, PositionResidueMap};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, instrument, warn};

/// Eager materialization stops here and reports a [`LibraryTooLargeWarning`].
pub const MAX_SEQUENCES_IN_MEMORY: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Exactly `n` distinct positions mutated per set.
    Nmer { n: usize },
    /// Every position mutated in every set.
    Simultaneous,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Nmer { n } => write!(f, "{n}-mer"),
            StrategyKind::Simultaneous => f.write_str("simultaneous"),
        }
    }
}

/// Attached to [`Materialized`] when the library was cut at [`MAX_SEQUENCES_IN_MEMORY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryTooLargeWarning {
    pub library_size: u128,
    pub returned: usize,
}

impl fmt::Display for LibraryTooLargeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "library of {} mutation sets exceeds the in-memory limit; returning the first {}. \
             Iterate with enumerate() to stream the whole library",
            self.library_size, self.returned
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Materialized {
    pub mutation_sets: Vec<MutationSet>,
    pub warning: Option<LibraryTooLargeWarning>,
}

/// Enumerates the combinatorial space of [`MutationSet`]s over a [`PositionResidueMap`].
///
/// Library order is fixed by the map: positions in insertion order, residues in the order
/// given. An N-mer library is ordered lexicographically on `(p1, r1, p2, r2, ...)` with
/// strictly increasing position indices, which is the order of n-combinations over the
/// flattened `(position, residue)` list once combinations repeating a position are dropped.
/// A simultaneous library is the Cartesian product of every position's residues with the
/// last position varying fastest; it is the N-mer that chooses every position, and both
/// kinds share one cursor and one unranking table.
#[derive(Debug, Clone)]
pub struct RandomizationStrategy {
    kind: StrategyKind,
    map: PositionResidueMap,
    sizes: Vec<u128>,
    choose: usize,
    // completions[j][p]: number of ways to fill j slots from positions p.. onwards.
    completions: Vec<Vec<u128>>,
    library_size: u128,
}

impl RandomizationStrategy {
    pub fn new(kind: StrategyKind, map: PositionResidueMap) -> Result<Self, EngineError> {
        map.validate()?;
        let m = map.len();
        let choose = match kind {
            StrategyKind::Nmer { n } => {
                if n == 0 {
                    return Err(EngineError::InvalidArgument(
                        "N-mer strategy needs at least one position per mutation set".to_string(),
                    ));
                }
                if n > m {
                    return Err(EngineError::InvalidArgument(format!(
                        "cannot mutate {n} positions at once when only {m} are randomized"
                    )));
                }
                n
            }
            StrategyKind::Simultaneous => m,
        };

        let sizes: Vec<u128> = map.cardinalities().into_iter().map(|s| s as u128).collect();
        let completions = completion_table(&sizes, choose).ok_or_else(|| {
            EngineError::InvalidArgument(format!(
                "{kind} library over {m} positions has more than {} members",
                u128::MAX
            ))
        })?;
        let library_size = completions[choose][0];

        debug!(%kind, positions = m, library_size, "Built randomization strategy.");
        Ok(Self {
            kind,
            map,
            sizes,
            choose,
            completions,
            library_size,
        })
    }

    pub fn nmer(n: usize, map: PositionResidueMap) -> Result<Self, EngineError> {
        Self::new(StrategyKind::Nmer { n }, map)
    }

    pub fn simultaneous(map: PositionResidueMap) -> Result<Self, EngineError> {
        Self::new(StrategyKind::Simultaneous, map)
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    pub fn map(&self) -> &PositionResidueMap {
        &self.map
    }

    /// Exact member count. Held as `u128`, so twenty residues at up to 29 positions still fit.
    pub fn library_size(&self) -> u128 {
        self.library_size
    }

    /// A fresh lazy stream over the whole library. Every call starts from the beginning.
    pub fn enumerate(&self) -> Enumeration<'_> {
        Enumeration {
            strategy: self,
            slots: (0..self.choose).map(|k| (k, 0)).collect(),
            remaining: self.library_size,
        }
    }

    pub fn enumerate_prefix(&self, n: usize) -> Vec<MutationSet> {
        self.enumerate().take(n).collect()
    }

    pub fn enumerate_prefix_signed(&self, n: i64) -> Result<Vec<MutationSet>, EngineError> {
        let n = usize::try_from(n).map_err(|_| {
            EngineError::InvalidArgument(format!("prefix length must be non-negative, got {n}"))
        })?;
        Ok(self.enumerate_prefix(n))
    }

    /// Materializes the library, stopping at [`MAX_SEQUENCES_IN_MEMORY`] sets.
    pub fn enumerate_all(&self) -> Materialized {
        self.materialize(MAX_SEQUENCES_IN_MEMORY)
    }

    /// Materializes at most `first` sets. A bound at or below [`MAX_SEQUENCES_IN_MEMORY`] is
    /// honoured silently; a larger one is capped like [`enumerate_all`](Self::enumerate_all).
    pub fn enumerate_all_bounded(&self, first: usize) -> Materialized {
        if first <= MAX_SEQUENCES_IN_MEMORY {
            return Materialized {
                mutation_sets: self.enumerate_prefix(first),
                warning: None,
            };
        }
        self.materialize(MAX_SEQUENCES_IN_MEMORY)
    }

    fn materialize(&self, cap: usize) -> Materialized {
        let mutation_sets = self.enumerate_prefix(cap);
        let warning = (self.library_size > cap as u128).then(|| {
            let warning = LibraryTooLargeWarning {
                library_size: self.library_size,
                returned: mutation_sets.len(),
            };
            warn!("{warning}");
            warning
        });
        Materialized {
            mutation_sets,
            warning,
        }
    }

    /// Draws `k` distinct library indices uniformly at random and yields the corresponding
    /// sets in library order. Only the indices are held in memory.
    ///
    /// Libraries addressable by `usize` use `rand::seq::index::sample`. Larger ones draw
    /// indices over the full `u128` range and reject repeats; with `k` far below the library
    /// size repeats are vanishingly rare.
    #[instrument(level = "debug", skip(self), fields(kind = %self.kind, library_size = self.library_size))]
    pub fn sample(&self, k: usize, seed: Option<u64>) -> Result<Sample<'_>, EngineError> {
        if k as u128 > self.library_size {
            return Err(EngineError::InvalidArgument(format!(
                "sample size {k} exceeds library size {}",
                self.library_size
            )));
        }

        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let indices: Vec<u128> = match usize::try_from(self.library_size) {
            Ok(length) => {
                let mut indices: Vec<u128> = rand::seq::index::sample(&mut rng, length, k)
                    .into_iter()
                    .map(|i| i as u128)
                    .collect();
                indices.sort_unstable();
                indices
            }
            Err(_) => {
                let mut drawn = BTreeSet::new();
                while drawn.len() < k {
                    drawn.insert(rng.gen_range(0..self.library_size));
                }
                drawn.into_iter().collect()
            }
        };

        Ok(Sample {
            strategy: self,
            indices: indices.into_iter(),
        })
    }

    /// The set at `index` in [`enumerate`](Self::enumerate) order.
    pub fn get(&self, index: u128) -> Option<MutationSet> {
        if index >= self.library_size {
            return None;
        }
        let m = self.sizes.len();
        let mut remaining = index;
        let mut position = 0;
        let mut slots = Vec::with_capacity(self.choose);

        for slot in 0..self.choose {
            let rest = self.choose - slot - 1;
            loop {
                if position >= m {
                    return None;
                }
                let tail = self.completions[rest][position + 1];
                let block = self.sizes[position] * tail;
                if remaining < block {
                    slots.push((position, (remaining / tail) as usize));
                    remaining %= tail;
                    position += 1;
                    break;
                }
                remaining -= block;
                position += 1;
            }
        }
        Some(self.build_set(&slots))
    }

    fn build_set(&self, slots: &[(usize, usize)]) -> MutationSet {
        let mutations = slots
            .iter()
            .map(|&(index, residue)| {
                let (position, residues) = self.map.entry(index);
                Mutation::new(position, residues[residue])
            })
            .collect();
        MutationSet::from_distinct(mutations)
    }

    /// Moves `slots` to the next set in library order. Returns `false` past the last one.
    fn advance(&self, slots: &mut [(usize, usize)]) -> bool {
        let m = self.sizes.len();
        let n = slots.len();
        for k in (0..n).rev() {
            let (position, residue) = slots[k];
            if ((residue + 1) as u128) < self.sizes[position] {
                slots[k].1 = residue + 1;
            } else if position + 1 + (n - 1 - k) < m {
                slots[k] = (position + 1, 0);
            } else {
                continue;
            }
            for j in k + 1..n {
                slots[j] = (slots[j - 1].0 + 1, 0);
            }
            return true;
        }
        false
    }
}

// T(0, p) = 1; T(j, m) = 0 for j > 0; T(j, p) = s_p * T(j-1, p+1) + T(j, p+1).
// None when an entry overflows `u128`. `s_p * T(j-1, p+1)` never exceeds T(j, p), so
// unranking cannot overflow once the table is built.
fn completion_table(sizes: &[u128], choose: usize) -> Option<Vec<Vec<u128>>> {
    let m = sizes.len();
    let mut table = vec![vec![0u128; m + 1]; choose + 1];
    table[0].fill(1);
    for j in 1..=choose {
        for p in (0..m).rev() {
            table[j][p] = sizes[p]
                .checked_mul(table[j - 1][p + 1])?
                .checked_add(table[j][p + 1])?;
        }
    }
    Some(table)
}

/// Lazy, deterministic stream over a strategy's library.
#[derive(Debug, Clone)]
pub struct Enumeration<'a> {
    strategy: &'a RandomizationStrategy,
    slots: Vec<(usize, usize)>,
    remaining: u128,
}

impl Iterator for Enumeration<'_> {
    type Item = MutationSet;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let set = self.strategy.build_set(&self.slots);
        self.remaining -= 1;
        if self.remaining > 0 && !self.strategy.advance(&mut self.slots) {
            self.remaining = 0;
        }
        Some(set)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

/// Lazy stream over a random subset of a strategy's library, in library order.
#[derive(Debug)]
pub struct Sample<'a> {
    strategy: &'a RandomizationStrategy,
    indices: std::vec::IntoIter<u128>,
}

impl Iterator for Sample<'_> {
    type Item = MutationSet;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.indices.next()?;
        self.strategy.get(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for Sample<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(usize, &str)]) -> PositionResidueMap {
        PositionResidueMap::from_entries(entries.iter().map(|(p, r)| (*p, r.chars()))).unwrap()
    }

    fn abcd_map() -> PositionResidueMap {
        map(&[(1, "ABCD"), (2, "ABCD"), (3, "ABCD"), (4, "ABCD")])
    }

    fn pairs(set: &MutationSet) -> Vec<(usize, char)> {
        set.iter().map(|m| (m.position, m.residue)).collect()
    }

    #[test]
    fn nmer_library_size_matches_enumeration() {
        let strategy =
            RandomizationStrategy::nmer(2, map(&[(1, "ACDE"), (3, "ACDE"), (6, "ACDE")])).unwrap();
        assert_eq!(strategy.library_size(), 48);
        assert_eq!(strategy.enumerate().count(), 48);
    }

    #[test]
    fn nmer_enumerates_in_pair_lexicographic_order() {
        let strategy =
            RandomizationStrategy::nmer(2, map(&[(1, "ACDE"), (3, "ACDE"), (6, "ACDE")])).unwrap();
        let first: Vec<_> = strategy.enumerate_prefix(10).iter().map(pairs).collect();
        assert_eq!(
            first,
            vec![
                vec![(1, 'A'), (3, 'A')],
                vec![(1, 'A'), (3, 'C')],
                vec![(1, 'A'), (3, 'D')],
                vec![(1, 'A'), (3, 'E')],
                vec![(1, 'A'), (6, 'A')],
                vec![(1, 'A'), (6, 'C')],
                vec![(1, 'A'), (6, 'D')],
                vec![(1, 'A'), (6, 'E')],
                vec![(1, 'C'), (3, 'A')],
                vec![(1, 'C'), (3, 'C')],
            ]
        );
    }

    #[test]
    fn nmer_sizes_over_four_positions() {
        assert_eq!(RandomizationStrategy::nmer(2, abcd_map()).unwrap().library_size(), 96);
        assert_eq!(RandomizationStrategy::nmer(3, abcd_map()).unwrap().library_size(), 256);
        assert_eq!(RandomizationStrategy::nmer(4, abcd_map()).unwrap().library_size(), 256);
    }

    #[test]
    fn trimer_starts_with_first_three_positions() {
        let strategy = RandomizationStrategy::nmer(3, abcd_map()).unwrap();
        let first: Vec<_> = strategy.enumerate_prefix(4).iter().map(pairs).collect();
        assert_eq!(
            first,
            vec![
                vec![(1, 'A'), (2, 'A'), (3, 'A')],
                vec![(1, 'A'), (2, 'A'), (3, 'B')],
                vec![(1, 'A'), (2, 'A'), (3, 'C')],
                vec![(1, 'A'), (2, 'A'), (3, 'D')],
            ]
        );
        let fifth = strategy.get(4).unwrap();
        assert_eq!(pairs(&fifth), vec![(1, 'A'), (2, 'A'), (4, 'A')]);
    }

    #[test]
    fn nmer_with_n_equal_to_positions_matches_simultaneous() {
        let nmer = RandomizationStrategy::nmer(4, abcd_map()).unwrap();
        let simultaneous = RandomizationStrategy::simultaneous(abcd_map()).unwrap();
        assert!(nmer.enumerate().eq(simultaneous.enumerate()));
    }

    #[test]
    fn simultaneous_varies_last_position_fastest() {
        let strategy =
            RandomizationStrategy::simultaneous(map(&[(1, "ACDE"), (3, "ACDE"), (6, "ACDE")]))
                .unwrap();
        assert_eq!(strategy.library_size(), 64);
        let all: Vec<_> = strategy.enumerate().collect();
        assert_eq!(all.len(), 64);
        assert_eq!(pairs(&all[0]), vec![(1, 'A'), (3, 'A'), (6, 'A')]);
        assert_eq!(pairs(&all[1]), vec![(1, 'A'), (3, 'A'), (6, 'C')]);
        assert_eq!(pairs(&all[4]), vec![(1, 'A'), (3, 'C'), (6, 'A')]);
        assert_eq!(pairs(&all[63]), vec![(1, 'E'), (3, 'E'), (6, 'E')]);
    }

    #[test]
    fn uneven_residue_sets_are_counted_exactly() {
        let strategy =
            RandomizationStrategy::nmer(2, map(&[(0, "A"), (5, "CD"), (9, "EFG")])).unwrap();
        assert_eq!(strategy.library_size(), 2 + 3 + 6);
        assert_eq!(strategy.enumerate().count(), 11);
    }

    #[test]
    fn enumeration_is_restartable() {
        let strategy = RandomizationStrategy::nmer(2, abcd_map()).unwrap();
        let first: Vec<_> = strategy.enumerate().collect();
        let second: Vec<_> = strategy.enumerate().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn get_agrees_with_enumeration() {
        for n in 1..=4 {
            let strategy = RandomizationStrategy::nmer(n, abcd_map()).unwrap();
            for (index, set) in strategy.enumerate().enumerate() {
                assert_eq!(strategy.get(index as u128).as_ref(), Some(&set));
            }
            assert_eq!(strategy.get(strategy.library_size()), None);
        }
    }

    #[test]
    fn invalid_strategies_are_rejected() {
        assert!(matches!(
            RandomizationStrategy::nmer(0, abcd_map()),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            RandomizationStrategy::nmer(5, abcd_map()),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            RandomizationStrategy::simultaneous(PositionResidueMap::new()),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            RandomizationStrategy::simultaneous(map(&[(1, "A"), (2, "")])),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn libraries_beyond_u64_are_sized_and_indexed() {
        let residues = "ACDEFGHIKLMNPQRSTVWY";
        let entries: Vec<_> = (0..15).map(|p| (p, residues)).collect();
        let strategy = RandomizationStrategy::simultaneous(map(&entries)).unwrap();
        assert_eq!(strategy.library_size(), 20u128.pow(15));
        assert!(strategy.library_size() > u64::MAX as u128);

        let last = strategy.get(strategy.library_size() - 1).unwrap();
        assert!(last.iter().all(|m| m.residue == 'Y'));
        assert_eq!(strategy.get(strategy.library_size()), None);
        assert_eq!(strategy.enumerate().next(), strategy.get(0));

        let sampled: Vec<_> = strategy.sample(5, Some(3)).unwrap().collect();
        assert_eq!(sampled.len(), 5);
        assert!(sampled.iter().all(|set| set.len() == 15));
    }

    #[test]
    fn nmer_library_sizes_beyond_u64_are_exact() {
        let residues = "ACDEFGHIKLMNPQRSTVWY";
        let entries: Vec<_> = (0..20).map(|p| (p, residues)).collect();
        let strategy = RandomizationStrategy::nmer(19, map(&entries)).unwrap();
        // C(20, 19) * 20^19
        assert_eq!(strategy.library_size(), 20 * 20u128.pow(19));
    }

    #[test]
    fn library_larger_than_u128_is_rejected() {
        let residues = "ACDEFGHIKLMNPQRSTVWY";
        let entries: Vec<_> = (0..40).map(|p| (p, residues)).collect();
        let result = RandomizationStrategy::simultaneous(map(&entries));
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn enumerate_all_truncates_large_libraries_with_warning() {
        let residues = "ACDEFGHIKLMNPQRSTVWY";
        let strategy = RandomizationStrategy::simultaneous(map(&[
            (0, residues),
            (1, residues),
            (2, residues),
            (3, residues),
        ]))
        .unwrap();
        assert_eq!(strategy.library_size(), 160_000);

        let materialized = strategy.enumerate_all();
        assert_eq!(materialized.mutation_sets.len(), MAX_SEQUENCES_IN_MEMORY);
        let warning = materialized.warning.unwrap();
        assert_eq!(warning.library_size, 160_000);
        assert_eq!(warning.returned, MAX_SEQUENCES_IN_MEMORY);

        let bounded = strategy.enumerate_all_bounded(25);
        assert_eq!(bounded.mutation_sets.len(), 25);
        assert!(bounded.warning.is_none());
    }

    #[test]
    fn enumerate_all_returns_small_libraries_whole() {
        let strategy = RandomizationStrategy::nmer(2, abcd_map()).unwrap();
        let materialized = strategy.enumerate_all();
        assert_eq!(materialized.mutation_sets.len() as u128, strategy.library_size());
        assert!(materialized.warning.is_none());
    }

    #[test]
    fn prefix_of_zero_is_empty_and_negative_is_rejected() {
        let strategy = RandomizationStrategy::nmer(2, abcd_map()).unwrap();
        assert!(strategy.enumerate_prefix(0).is_empty());
        assert_eq!(strategy.enumerate_prefix_signed(3).unwrap().len(), 3);
        assert!(matches!(
            strategy.enumerate_prefix_signed(-1),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn seeded_sample_is_deterministic_distinct_and_ordered() {
        let strategy = RandomizationStrategy::nmer(2, abcd_map()).unwrap();
        let first: Vec<_> = strategy.sample(20, Some(7)).unwrap().collect();
        let second: Vec<_> = strategy.sample(20, Some(7)).unwrap().collect();
        assert_eq!(first.len(), 20);
        assert_eq!(first, second);

        let order: Vec<_> = strategy.enumerate().collect();
        let ranks: Vec<_> = first
            .iter()
            .map(|set| order.iter().position(|s| s == set).unwrap())
            .collect();
        assert!(ranks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn different_seeds_draw_different_samples() {
        let residues = "ACDEFGHIKLMNPQRSTVWY";
        let strategy = RandomizationStrategy::simultaneous(map(&[
            (0, residues),
            (1, residues),
            (2, residues),
            (3, residues),
        ]))
        .unwrap();
        let one: Vec<_> = strategy.sample(10, Some(1)).unwrap().collect();
        let two: Vec<_> = strategy.sample(10, Some(2)).unwrap().collect();
        assert_eq!(one.len(), 10);
        assert_eq!(two.len(), 10);
        assert_ne!(one, two);
    }

    #[test]
    fn sample_of_entire_library_yields_everything() {
        let strategy = RandomizationStrategy::nmer(3, abcd_map()).unwrap();
        let sampled: Vec<_> = strategy.sample(256, None).unwrap().collect();
        let all: Vec<_> = strategy.enumerate().collect();
        assert_eq!(sampled, all);
    }

    #[test]
    fn oversized_sample_is_rejected() {
        let strategy = RandomizationStrategy::nmer(2, abcd_map()).unwrap();
        assert!(matches!(
            strategy.sample(97, Some(1)),
            Err(EngineError::InvalidArgument(_))
        ));
    }
}
