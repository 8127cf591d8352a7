use super::error::EngineError;
use crate::core::enzymes;
use regex::Regex;
use std::fmt;

/// GC ceiling applied when none is configured.
pub const DEFAULT_GC_CONTENT_THRESHOLD: f64 = 0.65;

/// A manufacturability requirement over a nucleotide string.
pub trait Constraint: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn is_satisfied(&self, nucleotides: &str) -> bool;
}

pub fn all_satisfied(constraints: &[Box<dyn Constraint>], nucleotides: &str) -> bool {
    constraints.iter().all(|c| c.is_satisfied(nucleotides))
}

/// Name of the first constraint that rejects `nucleotides`, if any.
pub fn first_violation<'a>(
    constraints: &'a [Box<dyn Constraint>],
    nucleotides: &str,
) -> Option<&'a str> {
    constraints
        .iter()
        .find(|c| !c.is_satisfied(nucleotides))
        .map(|c| c.name())
}

/// Fails iff the pattern matches anywhere in the sequence.
#[derive(Debug, Clone)]
pub struct PatternAbsent {
    name: String,
    regex: Regex,
}

impl PatternAbsent {
    pub fn new(name: impl Into<String>, regex: Regex) -> Self {
        Self {
            name: name.into(),
            regex,
        }
    }

    /// Forbids the recognition site of every named enzyme.
    pub fn restriction_sites<S: AsRef<str>>(enzymes: &[S]) -> Result<Self, EngineError> {
        let regex = enzymes::compile_restriction_site_regex(enzymes)?;
        let names = enzymes
            .iter()
            .map(|e| e.as_ref())
            .collect::<Vec<_>>()
            .join(",");
        Ok(Self::new(format!("restriction-sites[{names}]"), regex))
    }

    pub fn nucleotide_repeats() -> Self {
        Self::new(
            "nucleotide-repeats",
            enzymes::compile_nucleotide_repeat_regex(),
        )
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl Constraint for PatternAbsent {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_satisfied(&self, nucleotides: &str) -> bool {
        !self.regex.is_match(nucleotides)
    }
}

/// Passes iff the G+C fraction does not exceed the threshold. Empty sequences pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GcContentCeiling {
    threshold: f64,
}

impl GcContentCeiling {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for GcContentCeiling {
    fn default() -> Self {
        Self::new(DEFAULT_GC_CONTENT_THRESHOLD)
    }
}

impl Constraint for GcContentCeiling {
    fn name(&self) -> &str {
        "gc-content"
    }

    fn is_satisfied(&self, nucleotides: &str) -> bool {
        gc_content(nucleotides).is_none_or(|gc| gc <= self.threshold)
    }
}

/// Rejects sequences whose first half is the reverse complement of their second half.
///
/// The middle base of odd-length sequences belongs to neither half. Sequences shorter
/// than two bases have no halves to pair and always pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotSelfComplementary;

impl Constraint for NotSelfComplementary {
    fn name(&self) -> &str {
        "self-complementary"
    }

    fn is_satisfied(&self, nucleotides: &str) -> bool {
        let bytes = nucleotides.as_bytes();
        let half = bytes.len() / 2;
        if half == 0 {
            return true;
        }
        let front = &bytes[..half];
        let back = &bytes[bytes.len() - half..];
        !front
            .iter()
            .zip(back.iter().rev())
            .all(|(&a, &b)| complement(b) == a)
    }
}

/// Fraction of G and C bases, or `None` for an empty sequence.
pub fn gc_content(nucleotides: &str) -> Option<f64> {
    if nucleotides.is_empty() {
        return None;
    }
    let gc = nucleotides
        .bytes()
        .filter(|b| matches!(b.to_ascii_uppercase(), b'G' | b'C'))
        .count();
    Some(gc as f64 / nucleotides.len() as f64)
}

fn complement(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'T' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        _ => b'N',
    }
}

pub fn reverse_complement(nucleotides: &str) -> String {
    nucleotides
        .bytes()
        .rev()
        .map(|b| complement(b) as char)
        .collect()
}
