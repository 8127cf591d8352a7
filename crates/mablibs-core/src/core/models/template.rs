use crate::core::codons::{self, CodonError};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const CODON_LENGTH: usize = 3;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Nucleotide sequence length {length} is not a multiple of three")]
    InvalidLength { length: usize },

    #[error("Invalid nucleotide character '{base}' at position {position}")]
    InvalidBase { base: char, position: usize },

    #[error("Unknown codon '{codon}' at codon index {index}")]
    UnknownCodon { codon: String, index: usize },

    #[error("Codon index {index} is out of range for a template of {len} codons")]
    CodonOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Codon(#[from] CodonError),
}

/// An immutable in-frame nucleotide sequence.
///
/// Codons and the translated amino-acid sequence are derived on demand. Edits never
/// modify a template in place; they return a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequenceTemplate {
    nucleotides: String,
}

impl SequenceTemplate {
    /// Creates a template from DNA text. Whitespace is dropped and bases are uppercased.
    pub fn new(nucleotides: &str) -> Result<Self, TemplateError> {
        let mut cleaned = String::with_capacity(nucleotides.len());
        for (position, base) in nucleotides
            .chars()
            .filter(|c| !c.is_whitespace())
            .enumerate()
        {
            if !base.is_ascii_alphabetic() {
                return Err(TemplateError::InvalidBase { base, position });
            }
            cleaned.push(base.to_ascii_uppercase());
        }
        if cleaned.len() % CODON_LENGTH != 0 {
            return Err(TemplateError::InvalidLength {
                length: cleaned.len(),
            });
        }
        Ok(Self {
            nucleotides: cleaned,
        })
    }

    /// Back-translates a protein with the first canonical codon for each residue.
    pub fn from_amino_acids(amino_acids: &str) -> Result<Self, TemplateError> {
        let nucleotides = codons::back_translate(amino_acids.trim())?;
        Ok(Self { nucleotides })
    }

    /// Joins codons that are already known to be valid uppercase triplets.
    pub(crate) fn from_codons<'a>(codons: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            nucleotides: codons.into_iter().collect(),
        }
    }

    pub fn nucleotides(&self) -> &str {
        &self.nucleotides
    }

    pub fn into_nucleotides(self) -> String {
        self.nucleotides
    }

    pub fn len_codons(&self) -> usize {
        self.nucleotides.len() / CODON_LENGTH
    }

    pub fn is_empty(&self) -> bool {
        self.nucleotides.is_empty()
    }

    pub fn codon(&self, index: usize) -> Option<&str> {
        let start = index.checked_mul(CODON_LENGTH)?;
        self.nucleotides.get(start..start + CODON_LENGTH)
    }

    pub fn codons(&self) -> Vec<&str> {
        self.iter_codons().collect()
    }

    pub fn iter_codons(&self) -> impl Iterator<Item = &str> + '_ {
        // Construction guarantees ASCII content, so byte chunks are valid `str`s.
        self.nucleotides
            .as_bytes()
            .chunks(CODON_LENGTH)
            .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
    }

    pub fn amino_acids(&self) -> Result<String, TemplateError> {
        self.iter_codons()
            .enumerate()
            .map(|(index, codon)| {
                codons::translate_codon(codon).ok_or_else(|| TemplateError::UnknownCodon {
                    codon: codon.to_string(),
                    index,
                })
            })
            .collect()
    }

    /// Returns a copy with the codons at the given indices replaced.
    pub fn with_codons<'a>(
        &self,
        replacements: impl IntoIterator<Item = (usize, &'a str)>,
    ) -> Result<Self, TemplateError> {
        let mut codons = self.codons();
        let len = codons.len();
        for (index, codon) in replacements {
            let slot = codons
                .get_mut(index)
                .ok_or(TemplateError::CodonOutOfRange { index, len })?;
            if codons::translate_codon(codon).is_none() {
                return Err(TemplateError::UnknownCodon {
                    codon: codon.to_string(),
                    index,
                });
            }
            *slot = codon;
        }
        Ok(Self::from_codons(codons))
    }

    pub fn with_codon(&self, index: usize, codon: &str) -> Result<Self, TemplateError> {
        self.with_codons([(index, codon)])
    }
}

impl FromStr for SequenceTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for SequenceTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nucleotides)
    }
}
