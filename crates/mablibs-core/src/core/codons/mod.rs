//! Genetic code lookups and species codon usage.
//!
//! The tables are compile-time constants loaded once for the lifetime of the process.
//! Translation is a total function over the 64 DNA triplets, with stop codons mapped to
//! [`STOP`]. Anything outside those triplets is reported as an error rather than guessed.

mod tables;
pub mod usage;

pub use usage::{CodonUsage, PreferredCodons, Species};

use tables::{AMINO_ACID_CODONS, CODON_TO_AMINO_ACID};
use thiserror::Error;

/// Single-letter code used for translation stops.
pub const STOP: char = '*';

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodonError {
    #[error("Unknown amino acid residue '{0}'")]
    UnknownResidue(char),

    #[error("Unknown codon '{0}'")]
    UnknownCodon(String),

    #[error("Unknown species '{0}'. Expected one of: human, e_coli, yeast, hamster")]
    UnknownSpecies(String),

    #[error("Codon usage table has no frequency for codon '{0}'")]
    MissingFrequency(&'static str),

    #[error("Invalid codon frequency for '{codon}': {value}")]
    InvalidFrequency { codon: String, value: f64 },

    #[error("Failed to parse codon usage table: {0}")]
    Parse(String),
}

/// Translates a single DNA triplet.
pub fn translate_codon(codon: &str) -> Option<char> {
    CODON_TO_AMINO_ACID.get(codon).copied()
}

/// Returns the statically allocated spelling of a codon, if it is a valid triplet.
pub(crate) fn canonical_codon(codon: &str) -> Option<&'static str> {
    CODON_TO_AMINO_ACID.get_entry(codon).map(|(key, _)| *key)
}

/// Synonymous codons for an amino acid, in canonical order.
pub fn synonymous_codons(amino_acid: char) -> Option<&'static [&'static str]> {
    AMINO_ACID_CODONS
        .iter()
        .find(|(aa, _)| *aa == amino_acid)
        .map(|(_, codons)| *codons)
}

/// The synonym group a codon belongs to (including the codon itself).
pub fn synonym_group(codon: &str) -> Option<&'static [&'static str]> {
    translate_codon(codon).and_then(synonymous_codons)
}

/// All amino acid codes known to the genetic code, stop included, in canonical order.
pub fn amino_acids() -> impl Iterator<Item = char> {
    AMINO_ACID_CODONS.iter().map(|(aa, _)| *aa)
}

pub fn is_amino_acid(residue: char) -> bool {
    synonymous_codons(residue).is_some()
}

/// Naive back-translation using the first canonical codon of each residue.
///
/// Useful for building a starting template from an amino-acid sequence; the result is
/// not codon optimized for any species.
pub fn back_translate(amino_acids: &str) -> Result<String, CodonError> {
    amino_acids
        .chars()
        .map(|aa| {
            synonymous_codons(aa)
                .map(|codons| codons[0])
                .ok_or(CodonError::UnknownResidue(aa))
        })
        .collect()
}
