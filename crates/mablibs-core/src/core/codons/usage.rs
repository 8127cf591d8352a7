use super::tables::{self, AMINO_ACID_CODONS, CODON_TO_AMINO_ACID};
use super::{CodonError, canonical_codon};
use phf::Map;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Matches one `codon frequency` cell of a Kazusa codon usage table, e.g. `UUU 19.6`.
static KAZUSA_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([ACGTU]{3})\s+(\d+(?:\.\d+)?)").expect("valid Kazusa entry pattern")
});

/// Expression hosts with a bundled codon usage table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Human,
    EColi,
    Yeast,
    Hamster,
}

impl Species {
    pub const ALL: [Species; 4] = [
        Species::Human,
        Species::EColi,
        Species::Yeast,
        Species::Hamster,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Species::Human => "human",
            Species::EColi => "e_coli",
            Species::Yeast => "yeast",
            Species::Hamster => "hamster",
        }
    }

    fn table(&self) -> &'static Map<&'static str, f64> {
        match self {
            Species::Human => &tables::HUMAN,
            Species::EColi => &tables::E_COLI,
            Species::Yeast => &tables::YEAST,
            Species::Hamster => &tables::HAMSTER,
        }
    }
}

impl FromStr for Species {
    type Err = CodonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "human" | "homo_sapiens" => Ok(Species::Human),
            "e_coli" | "ecoli" | "escherichia_coli" => Ok(Species::EColi),
            "yeast" | "saccharomyces_cerevisiae" => Ok(Species::Yeast),
            "hamster" | "cho" | "cricetulus_griseus" => Ok(Species::Hamster),
            _ => Err(CodonError::UnknownSpecies(s.to_string())),
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Codon usage frequencies for one organism, keyed by DNA codon.
///
/// Frequencies are relative weights (the bundled tables use occurrences per thousand
/// codons) and only need to be comparable within a synonym group.
#[derive(Debug, Clone, PartialEq)]
pub struct CodonUsage {
    frequencies: HashMap<&'static str, f64>,
}

impl CodonUsage {
    pub fn for_species(species: Species) -> Self {
        let frequencies = species
            .table()
            .entries()
            .map(|(codon, frequency)| (*codon, *frequency))
            .collect();
        Self { frequencies }
    }

    /// Builds a usage table from arbitrary `(codon, frequency)` pairs.
    ///
    /// Every one of the 64 triplets must be present exactly once and frequencies must be
    /// finite and non-negative.
    pub fn from_frequencies<'a, I>(entries: I) -> Result<Self, CodonError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut frequencies = HashMap::with_capacity(64);
        for (codon, value) in entries {
            let upper = codon.trim().to_ascii_uppercase().replace('U', "T");
            let key =
                canonical_codon(&upper).ok_or_else(|| CodonError::UnknownCodon(codon.to_string()))?;
            if !value.is_finite() || value < 0.0 {
                return Err(CodonError::InvalidFrequency {
                    codon: codon.to_string(),
                    value,
                });
            }
            frequencies.insert(key, value);
        }

        if let Some(missing) = CODON_TO_AMINO_ACID
            .keys()
            .find(|codon| !frequencies.contains_key(*codon))
        {
            return Err(CodonError::MissingFrequency(*missing));
        }

        Ok(Self { frequencies })
    }

    /// Parses the plain-text layout served by the Kazusa codon usage database.
    ///
    /// ```text
    /// UUU 19.6(  3005)  UCU 16.0(  2450)  UAU 13.1(  2017)  UGU  9.1(  1397)
    /// ```
    ///
    /// RNA codons are converted to DNA. The counts in parentheses are ignored.
    pub fn parse_kazusa(text: &str) -> Result<Self, CodonError> {
        let mut entries = Vec::with_capacity(64);
        for caps in KAZUSA_ENTRY.captures_iter(text) {
            let value: f64 = caps[2]
                .parse()
                .map_err(|e| CodonError::Parse(format!("'{}': {}", &caps[0], e)))?;
            entries.push((caps[1].replace('U', "T"), value));
        }
        if entries.is_empty() {
            return Err(CodonError::Parse(
                "no 'codon frequency' entries found".to_string(),
            ));
        }
        Self::from_frequencies(entries.iter().map(|(codon, value)| (codon.as_str(), *value)))
    }

    pub fn frequency(&self, codon: &str) -> Option<f64> {
        self.frequencies.get(codon).copied()
    }

    /// Selects the most frequent codon for every amino acid.
    ///
    /// Ties resolve to the codon that comes first in the canonical synonym order.
    pub fn preferred_codons(&self) -> PreferredCodons {
        let codons = AMINO_ACID_CODONS
            .iter()
            .map(|(amino_acid, synonyms)| {
                let best = synonyms
                    .iter()
                    .copied()
                    .reduce(|best, candidate| {
                        if self.weight(candidate) > self.weight(best) {
                            candidate
                        } else {
                            best
                        }
                    })
                    .unwrap_or(synonyms[0]);
                (*amino_acid, best)
            })
            .collect();
        PreferredCodons { codons }
    }

    fn weight(&self, codon: &str) -> f64 {
        self.frequency(codon).unwrap_or(0.0)
    }
}

/// The single best codon per amino acid for a given organism.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferredCodons {
    codons: HashMap<char, &'static str>,
}

impl PreferredCodons {
    pub fn get(&self, amino_acid: char) -> Option<&'static str> {
        self.codons.get(&amino_acid).copied()
    }

    pub fn codon_for(&self, amino_acid: char) -> Result<&'static str, CodonError> {
        self.get(amino_acid)
            .ok_or(CodonError::UnknownResidue(amino_acid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HAMSTER_KAZUSA: &str = "
    UUU 19.6(  3005)  UCU 16.0(  2450)  UAU 13.1(  2017)  UGU  9.1(  1397)
    UUC 22.0(  3381)  UCC 16.5(  2529)  UAC 16.4(  2519)  UGC 10.3(  1589)
    UUA  6.4(   978)  UCA 10.3(  1577)  UAA  0.6(    93)  UGA  1.2(   177)
    UUG 14.1(  2169)  UCG  3.4(   529)  UAG  0.5(    84)  UGG 13.1(  2012)

    CUU 13.2(  2023)  CCU 16.7(  2563)  CAU 10.2(  1563)  CGU  5.6(   863)
    CUC 18.4(  2818)  CCC 17.0(  2608)  CAC 12.9(  1980)  CGC  9.3(  1429)
    CUA  7.6(  1174)  CCA 15.6(  2388)  CAA 10.3(  1587)  CGA  7.2(  1102)
    CUG 38.8(  5955)  CCG  4.3(   657)  CAG 33.4(  5122)  CGG 10.1(  1558)

    AUU 17.4(  2673)  ACU 14.1(  2172)  AAU 17.4(  2671)  AGU 11.4(  1756)
    AUC 24.8(  3808)  ACC 20.3(  3118)  AAC 21.2(  3248)  AGC 16.4(  2521)
    AUA  6.9(  1053)  ACA 15.7(  2418)  AAA 24.6(  3782)  AGA 10.1(  1557)
    AUG 23.0(  3538)  ACG  4.5(   685)  AAG 38.4(  5895)  AGG 10.2(  1570)

    GUU 11.6(  1780)  GCU 22.4(  3432)  GAU 24.6(  3781)  GGU 12.8(  1968)
    GUC 15.7(  2408)  GCC 25.9(  3973)  GAC 28.1(  4310)  GGC 21.3(  3268)
    GUA  7.8(  1202)  GCA 16.3(  2497)  GAA 28.4(  4355)  GGA 15.8(  2425)
    GUG 30.1(  4628)  GCG  5.0(   765)  GAG 41.1(  6311)  GGG 13.4(  2063)
    ";

    #[test]
    fn species_parse_is_case_insensitive() {
        assert_eq!("E_COLI".parse::<Species>().unwrap(), Species::EColi);
        assert_eq!("Human".parse::<Species>().unwrap(), Species::Human);
        assert_eq!("e-coli".parse::<Species>().unwrap(), Species::EColi);
        assert!(matches!(
            "mouse".parse::<Species>(),
            Err(CodonError::UnknownSpecies(_))
        ));
    }

    #[test]
    fn preferred_phenylalanine_codon_depends_on_species() {
        let expected = [
            (Species::Human, "TTC"),
            (Species::Yeast, "TTT"),
            (Species::EColi, "TTT"),
            (Species::Hamster, "TTC"),
        ];
        for (species, codon) in expected {
            let preferred = CodonUsage::for_species(species).preferred_codons();
            assert_eq!(preferred.get('F'), Some(codon), "species {species}");
        }
    }

    #[test]
    fn preferred_codons_cover_every_amino_acid() {
        let preferred = CodonUsage::for_species(Species::Human).preferred_codons();
        for (amino_acid, synonyms) in AMINO_ACID_CODONS.iter() {
            let codon = preferred.codon_for(*amino_acid).unwrap();
            assert!(synonyms.contains(&codon));
        }
        assert_eq!(preferred.get('L'), Some("CTG"));
        assert_eq!(
            preferred.codon_for('B'),
            Err(CodonError::UnknownResidue('B'))
        );
    }

    #[test]
    fn preferred_codon_ties_resolve_to_canonical_order() {
        let flat = CODON_TO_AMINO_ACID.keys().map(|codon| (*codon, 1.0));
        let usage = CodonUsage::from_frequencies(flat).unwrap();
        let preferred = usage.preferred_codons();
        assert_eq!(preferred.get('L'), Some("TTA"));
        assert_eq!(preferred.get('R'), Some("CGT"));
        assert_eq!(preferred.get('G'), Some("GGT"));
    }

    #[test]
    fn parse_kazusa_matches_bundled_hamster_table() {
        let parsed = CodonUsage::parse_kazusa(HAMSTER_KAZUSA).unwrap();
        assert_eq!(parsed, CodonUsage::for_species(Species::Hamster));
        assert_eq!(parsed.frequency("CTG"), Some(38.8));
        assert_eq!(parsed.frequency("CUG"), None);
    }

    #[test]
    fn parse_kazusa_reports_incomplete_tables() {
        let result = CodonUsage::parse_kazusa("UUU 19.6(  3005)  UCU 16.0(  2450)");
        assert!(matches!(result, Err(CodonError::MissingFrequency(_))));
        assert!(matches!(
            CodonUsage::parse_kazusa("no codons here"),
            Err(CodonError::Parse(_))
        ));
    }

    #[test]
    fn from_frequencies_rejects_invalid_entries() {
        assert!(matches!(
            CodonUsage::from_frequencies([("XYZ", 1.0)]),
            Err(CodonError::UnknownCodon(_))
        ));
        assert!(matches!(
            CodonUsage::from_frequencies([("TTT", -1.0)]),
            Err(CodonError::InvalidFrequency { .. })
        ));
    }
}
