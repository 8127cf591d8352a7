use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MutationError {
    #[error("Position-residue map is empty")]
    EmptyMap,
    #[error("Position {position} has no allowed residues")]
    EmptyResidues { position: usize },
    #[error("Position {position} appears more than once")]
    DuplicatePosition { position: usize },
}

/// A single substitution: the residue to place at a codon position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mutation {
    pub position: usize,
    pub residue: char,
}

impl Mutation {
    pub fn new(position: usize, residue: char) -> Self {
        Self { position, residue }
    }
}

impl From<(usize, char)> for Mutation {
    fn from((position, residue): (usize, char)) -> Self {
        Self { position, residue }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.position, self.residue)
    }
}

/// Mutations applied together to one template. No two target the same position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MutationSet {
    mutations: Vec<Mutation>,
}

impl MutationSet {
    pub fn new(mutations: Vec<Mutation>) -> Result<Self, MutationError> {
        let mut seen = HashSet::with_capacity(mutations.len());
        for mutation in &mutations {
            if !seen.insert(mutation.position) {
                return Err(MutationError::DuplicatePosition {
                    position: mutation.position,
                });
            }
        }
        Ok(Self { mutations })
    }

    /// Strategies construct sets over strictly increasing position indices, which cannot
    /// repeat a position.
    pub(crate) fn from_distinct(mutations: Vec<Mutation>) -> Self {
        debug_assert!(
            mutations
                .iter()
                .map(|m| m.position)
                .collect::<HashSet<_>>()
                .len()
                == mutations.len()
        );
        Self { mutations }
    }

    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mutation> {
        self.mutations.iter()
    }

    pub fn as_slice(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.mutations.iter().map(|m| m.position)
    }
}

impl<'a> IntoIterator for &'a MutationSet {
    type Item = &'a Mutation;
    type IntoIter = std::slice::Iter<'a, Mutation>;

    fn into_iter(self) -> Self::IntoIter {
        self.mutations.iter()
    }
}

impl fmt::Display for MutationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mutation) in self.mutations.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            write!(f, "{mutation}")?;
        }
        Ok(())
    }
}

/// Insertion-ordered mapping from codon position to the residues allowed there.
///
/// Enumeration order of every strategy is defined by this insertion order and by the
/// order of each residue list, so both are preserved exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PositionResidueMap {
    entries: Vec<(usize, Vec<char>)>,
}

impl PositionResidueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, R>(entries: I) -> Result<Self, MutationError>
    where
        I: IntoIterator<Item = (usize, R)>,
        R: IntoIterator<Item = char>,
    {
        let mut map = Self::new();
        for (position, residues) in entries {
            map.insert(position, residues)?;
        }
        Ok(map)
    }

    /// Allows the same residue list at every given position.
    pub fn uniform(
        positions: impl IntoIterator<Item = usize>,
        residues: &[char],
    ) -> Result<Self, MutationError> {
        Self::from_entries(positions.into_iter().map(|p| (p, residues.iter().copied())))
    }

    pub fn insert(
        &mut self,
        position: usize,
        residues: impl IntoIterator<Item = char>,
    ) -> Result<(), MutationError> {
        if self.entries.iter().any(|(p, _)| *p == position) {
            return Err(MutationError::DuplicatePosition { position });
        }
        self.entries.push((position, residues.into_iter().collect()));
        Ok(())
    }

    /// Checks the invariants every randomization strategy relies on.
    pub fn validate(&self) -> Result<(), MutationError> {
        if self.entries.is_empty() {
            return Err(MutationError::EmptyMap);
        }
        if let Some((position, _)) = self.entries.iter().find(|(_, r)| r.is_empty()) {
            return Err(MutationError::EmptyResidues {
                position: *position,
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|(p, _)| *p)
    }

    pub fn residues_at(&self, position: usize) -> Option<&[char]> {
        self.entries
            .iter()
            .find(|(p, _)| *p == position)
            .map(|(_, r)| r.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[char])> + '_ {
        self.entries.iter().map(|(p, r)| (*p, r.as_slice()))
    }

    /// Residue-set sizes in insertion order.
    pub fn cardinalities(&self) -> Vec<usize> {
        self.entries.iter().map(|(_, r)| r.len()).collect()
    }

    pub(crate) fn entry(&self, index: usize) -> (usize, &[char]) {
        let (position, residues) = &self.entries[index];
        (*position, residues)
    }

    /// Every residue mentioned anywhere in the map.
    pub fn residues(&self) -> impl Iterator<Item = char> + '_ {
        self.entries.iter().flat_map(|(_, r)| r.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_set_rejects_repeated_positions() {
        let result = MutationSet::new(vec![Mutation::new(1, 'A'), Mutation::new(1, 'D')]);
        assert_eq!(
            result.unwrap_err(),
            MutationError::DuplicatePosition { position: 1 }
        );
    }

    #[test]
    fn mutation_set_display_joins_mutations() {
        let set = MutationSet::new(vec![(1, 'A').into(), (3, 'W').into()]).unwrap();
        assert_eq!(set.to_string(), "1A+3W");
        assert_eq!(set.positions().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn map_preserves_insertion_order() {
        let map =
            PositionResidueMap::from_entries([(6, "AB".chars()), (1, "C".chars()), (3, "DEF".chars())])
                .unwrap();
        assert_eq!(map.positions().collect::<Vec<_>>(), vec![6, 1, 3]);
        assert_eq!(map.cardinalities(), vec![2, 1, 3]);
        assert_eq!(map.residues_at(3), Some(&['D', 'E', 'F'][..]));
        assert_eq!(map.residues_at(2), None);
    }

    #[test]
    fn map_rejects_duplicate_positions() {
        let mut map = PositionResidueMap::new();
        map.insert(2, ['A']).unwrap();
        assert_eq!(
            map.insert(2, ['C']).unwrap_err(),
            MutationError::DuplicatePosition { position: 2 }
        );
    }

    #[test]
    fn validate_reports_empty_map_and_empty_residue_sets() {
        assert_eq!(
            PositionResidueMap::new().validate().unwrap_err(),
            MutationError::EmptyMap
        );
        let map = PositionResidueMap::from_entries([(0, vec!['A']), (4, vec![])]).unwrap();
        assert_eq!(
            map.validate().unwrap_err(),
            MutationError::EmptyResidues { position: 4 }
        );
    }

    #[test]
    fn uniform_assigns_same_residues_everywhere() {
        let map = PositionResidueMap::uniform((0..16).step_by(2), &['A', 'G']).unwrap();
        assert_eq!(map.len(), 8);
        assert!(map.iter().all(|(_, r)| r == ['A', 'G']));
    }
}
