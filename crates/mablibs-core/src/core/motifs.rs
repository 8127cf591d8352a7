//! Detection of post-translational modification and manufacturing liability motifs.
//!
//! All requested motif patterns are joined into a single alternation with one named group
//! per kind, so scanning is one leftmost-first pass over the sequence and reported matches
//! never overlap each other.

use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static DEFAULT_SCANNER: LazyLock<MotifScanner> = LazyLock::new(|| {
    MotifScanner::with_kinds(&MotifKind::ALL.into_iter().collect())
        .expect("built-in motif patterns are valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotifKind {
    Glycosylation,
    Deamidation,
    Isomerization,
    Cleavage,
    Oxidation,
}

impl MotifKind {
    /// Every kind, in the priority order used by the scanner's alternation.
    pub const ALL: [MotifKind; 5] = [
        MotifKind::Glycosylation,
        MotifKind::Deamidation,
        MotifKind::Isomerization,
        MotifKind::Cleavage,
        MotifKind::Oxidation,
    ];

    pub fn pattern(&self) -> &'static str {
        match self {
            MotifKind::Glycosylation => "N[^P][ST]",
            MotifKind::Deamidation => "N[GSA]",
            MotifKind::Isomerization => "D[GS]",
            MotifKind::Cleavage => "DP",
            MotifKind::Oxidation => "M",
        }
    }

    pub fn group_name(&self) -> &'static str {
        match self {
            MotifKind::Glycosylation => "GLYCOSYLATION_MOTIF",
            MotifKind::Deamidation => "DEAMIDATION_MOTIF",
            MotifKind::Isomerization => "ISOMERIZATION_MOTIF",
            MotifKind::Cleavage => "CLEAVAGE_MOTIF",
            MotifKind::Oxidation => "OXIDATION_MOTIF",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MotifKind::Glycosylation => "glycosylation",
            MotifKind::Deamidation => "deamidation",
            MotifKind::Isomerization => "isomerization",
            MotifKind::Cleavage => "cleavage",
            MotifKind::Oxidation => "oxidation",
        }
    }
}

#[derive(Debug, Error)]
#[error("Failed to compile motif scanner: {0}")]
pub struct MotifPatternError(#[from] regex::Error);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown motif kind '{0}'. Expected one of: glycosylation, deamidation, isomerization, cleavage, oxidation")]
pub struct UnknownMotifKind(pub String);

impl FromStr for MotifKind {
    type Err = UnknownMotifKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        MotifKind::ALL
            .into_iter()
            .find(|kind| {
                kind.name().eq_ignore_ascii_case(normalized)
                    || kind.group_name().eq_ignore_ascii_case(normalized)
            })
            .ok_or_else(|| UnknownMotifKind(s.to_string()))
    }
}

impl fmt::Display for MotifKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One motif occurrence. `start..end` is a half-open range of residue indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotifMatch {
    pub kind: MotifKind,
    pub matched: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct MotifScanner {
    regex: Option<Regex>,
    kinds: Vec<MotifKind>,
}

impl MotifScanner {
    /// Builds a scanner restricted to `kinds`. Order follows [`MotifKind::ALL`] regardless
    /// of the order given, so overlapping patterns resolve the same way for every scanner.
    pub fn with_kinds(kinds: &HashSet<MotifKind>) -> Result<Self, MotifPatternError> {
        let kinds: Vec<MotifKind> = MotifKind::ALL
            .into_iter()
            .filter(|kind| kinds.contains(kind))
            .collect();
        let regex = if kinds.is_empty() {
            None
        } else {
            let union = kinds
                .iter()
                .map(|kind| format!("(?P<{}>{})", kind.group_name(), kind.pattern()))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&union)?)
        };
        Ok(Self { regex, kinds })
    }

    pub fn kinds(&self) -> &[MotifKind] {
        &self.kinds
    }

    pub fn scan(&self, amino_acids: &str) -> Vec<MotifMatch> {
        let Some(regex) = &self.regex else {
            return Vec::new();
        };
        regex
            .captures_iter(amino_acids)
            .filter_map(|caps| {
                self.kinds.iter().find_map(|kind| {
                    caps.name(kind.group_name()).map(|m| MotifMatch {
                        kind: *kind,
                        matched: m.as_str().to_string(),
                        start: m.start(),
                        end: m.end(),
                    })
                })
            })
            .collect()
    }

    pub fn has_motifs(&self, amino_acids: &str) -> bool {
        self.regex
            .as_ref()
            .is_some_and(|regex| regex.is_match(amino_acids))
    }

    /// True if any motif of one of `kinds` occurs in the sequence.
    pub fn contains_any(&self, amino_acids: &str, kinds: &HashSet<MotifKind>) -> bool {
        let Some(regex) = &self.regex else {
            return false;
        };
        regex.captures_iter(amino_acids).any(|caps| {
            self.kinds
                .iter()
                .any(|kind| kinds.contains(kind) && caps.name(kind.group_name()).is_some())
        })
    }
}

impl Default for MotifScanner {
    /// A scanner for every kind, sharing the process-wide compiled pattern.
    fn default() -> Self {
        DEFAULT_SCANNER.clone()
    }
}

/// Scans with the process-wide scanner covering every motif kind.
pub fn find_motifs(amino_acids: &str) -> Vec<MotifMatch> {
    DEFAULT_SCANNER.scan(amino_acids)
}

pub fn default_scanner() -> &'static MotifScanner {
    &DEFAULT_SCANNER
}
