//! Restriction-enzyme recognition sites and forbidden nucleotide patterns.

use itertools::iproduct;
use phf::{Map, phf_map};
use regex::Regex;
use thiserror::Error;

/// Recognition sites as regular expressions over `ACGT`. Type IIS enzymes list both
/// strands since their sites are not palindromic.
pub static ENZYMES: Map<&'static str, &'static str> = phf_map! {
    "AgeI" => "ACCGGT",
    "ApaI" => "GGGCCC",
    "AscI" => "GGCGCGCC",
    "AvrII" => "CCTAGG",
    "BamHI" => "GGATCC",
    "BglII" => "AGATCT",
    "BsaI" => "GGTCTC|GAGACC",
    "BsiWI" => "CGTACG",
    "BsmBI" => "CGTCTC|GAGACG",
    "BstEII" => "GGT[ACGT]ACC",
    "DraI" => "TTTAAA",
    "EcoRI" => "GAATTC",
    "EcoRV" => "GATATC",
    "HindIII" => "AAGCTT",
    "HpaI" => "GTTAAC",
    "KpnI" => "GGTACC",
    "MluI" => "ACGCGT",
    "NcoI" => "CCATGG",
    "NdeI" => "CATATG",
    "NheI" => "GCTAGC",
    "NotI" => "GCGGCCGC",
    "NsiI" => "ATGCAT",
    "PacI" => "TTAATTAA",
    "PstI" => "CTGCAG",
    "SacI" => "GAGCTC",
    "SalI" => "GTCGAC",
    "SapI" => "GCTCTTC|GAAGAGC",
    "SfiI" => "GGCC[ACGT]{5}GGCC",
    "SmaI" => "CCCGGG",
    "SpeI" => "ACTAGT",
    "XbaI" => "TCTAGA",
    "XhoI" => "CTCGAG",
};

const BASES: [char; 4] = ['A', 'T', 'C', 'G'];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnzymeError {
    #[error("Unknown restriction enzyme '{0}'")]
    UnknownEnzyme(String),
    #[error("At least one restriction enzyme must be given")]
    NoEnzymes,
    #[error("Invalid pattern: {0}")]
    Pattern(String),
}

/// Looks an enzyme up by name, falling back to a case-insensitive match.
pub fn recognition_site(name: &str) -> Option<(&'static str, &'static str)> {
    ENZYMES
        .get_entry(name)
        .or_else(|| {
            ENZYMES
                .entries()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
        })
        .map(|(key, pattern)| (*key, *pattern))
}

/// Compiles one union regex with a named group per enzyme.
pub fn compile_restriction_site_regex<S: AsRef<str>>(names: &[S]) -> Result<Regex, EnzymeError> {
    if names.is_empty() {
        return Err(EnzymeError::NoEnzymes);
    }
    let mut seen = Vec::with_capacity(names.len());
    for name in names {
        let (key, pattern) = recognition_site(name.as_ref())
            .ok_or_else(|| EnzymeError::UnknownEnzyme(name.as_ref().to_string()))?;
        if !seen.iter().any(|(k, _)| *k == key) {
            seen.push((key, pattern));
        }
    }
    let union = seen
        .iter()
        .map(|(name, pattern)| format!("(?P<{name}>{pattern})"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&union).map_err(|e| EnzymeError::Pattern(e.to_string()))
}

/// Homopolymer runs of four or more bases, and any dinucleotide repeated four or more times.
pub fn compile_nucleotide_repeat_regex() -> Regex {
    let single = BASES
        .iter()
        .map(|base| format!("{base}{{4,}}"))
        .collect::<Vec<_>>()
        .join("|");
    let double = iproduct!(BASES, BASES)
        .map(|(a, b)| format!("(?:{a}{b}){{4,}}"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("{single}|{double}")).expect("repeat pattern is statically valid")
}
