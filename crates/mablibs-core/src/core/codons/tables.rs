use phf::{Map, phf_map};

/// The standard genetic code, including the three stop codons (`*`).
pub(crate) static CODON_TO_AMINO_ACID: Map<&'static str, char> = phf_map! {
    "TTT" => 'F', "TTC" => 'F', "TTA" => 'L', "TTG" => 'L',
    "CTT" => 'L', "CTC" => 'L', "CTA" => 'L', "CTG" => 'L',
    "ATT" => 'I', "ATC" => 'I', "ATA" => 'I', "ATG" => 'M',
    "GTT" => 'V', "GTC" => 'V', "GTA" => 'V', "GTG" => 'V',
    "TCT" => 'S', "TCC" => 'S', "TCA" => 'S', "TCG" => 'S',
    "CCT" => 'P', "CCC" => 'P', "CCA" => 'P', "CCG" => 'P',
    "ACT" => 'T', "ACC" => 'T', "ACA" => 'T', "ACG" => 'T',
    "GCT" => 'A', "GCC" => 'A', "GCA" => 'A', "GCG" => 'A',
    "TAT" => 'Y', "TAC" => 'Y', "TAA" => '*', "TAG" => '*',
    "CAT" => 'H', "CAC" => 'H', "CAA" => 'Q', "CAG" => 'Q',
    "AAT" => 'N', "AAC" => 'N', "AAA" => 'K', "AAG" => 'K',
    "GAT" => 'D', "GAC" => 'D', "GAA" => 'E', "GAG" => 'E',
    "TGT" => 'C', "TGC" => 'C', "TGA" => '*', "TGG" => 'W',
    "CGT" => 'R', "CGC" => 'R', "CGA" => 'R', "CGG" => 'R',
    "AGT" => 'S', "AGC" => 'S', "AGA" => 'R', "AGG" => 'R',
    "GGT" => 'G', "GGC" => 'G', "GGA" => 'G', "GGG" => 'G',
};

/// Synonymous codon groups in canonical order. The first codon of each group is the
/// representative used for back-translation, and the order breaks frequency ties.
pub(crate) static AMINO_ACID_CODONS: [(char, &[&str]); 21] = [
    ('A', &["GCT", "GCC", "GCA", "GCG"]),
    ('C', &["TGT", "TGC"]),
    ('D', &["GAT", "GAC"]),
    ('E', &["GAA", "GAG"]),
    ('F', &["TTT", "TTC"]),
    ('G', &["GGT", "GGC", "GGA", "GGG"]),
    ('H', &["CAT", "CAC"]),
    ('I', &["ATT", "ATC", "ATA"]),
    ('K', &["AAA", "AAG"]),
    ('L', &["TTA", "TTG", "CTT", "CTC", "CTA", "CTG"]),
    ('M', &["ATG"]),
    ('N', &["AAT", "AAC"]),
    ('P', &["CCT", "CCC", "CCA", "CCG"]),
    ('Q', &["CAA", "CAG"]),
    ('R', &["CGT", "CGC", "CGA", "CGG", "AGA", "AGG"]),
    ('S', &["TCT", "TCC", "TCA", "TCG", "AGT", "AGC"]),
    ('T', &["ACT", "ACC", "ACA", "ACG"]),
    ('V', &["GTT", "GTC", "GTA", "GTG"]),
    ('W', &["TGG"]),
    ('Y', &["TAT", "TAC"]),
    ('*', &["TAA", "TAG", "TGA"]),
];

// Codon usage frequencies per thousand codons, from the Kazusa codon usage database.

pub(crate) static HUMAN: Map<&'static str, f64> = phf_map! {
    "TTT" => 17.6, "TCT" => 15.2, "TAT" => 12.2, "TGT" => 10.6,
    "TTC" => 20.3, "TCC" => 17.7, "TAC" => 15.3, "TGC" => 12.6,
    "TTA" => 7.7, "TCA" => 12.2, "TAA" => 1.0, "TGA" => 1.6,
    "TTG" => 12.9, "TCG" => 4.4, "TAG" => 0.8, "TGG" => 13.2,
    "CTT" => 13.2, "CCT" => 17.5, "CAT" => 10.9, "CGT" => 4.5,
    "CTC" => 19.6, "CCC" => 19.8, "CAC" => 15.1, "CGC" => 10.4,
    "CTA" => 7.2, "CCA" => 16.9, "CAA" => 12.3, "CGA" => 6.2,
    "CTG" => 39.6, "CCG" => 6.9, "CAG" => 34.2, "CGG" => 11.4,
    "ATT" => 16.0, "ACT" => 13.1, "AAT" => 17.0, "AGT" => 12.1,
    "ATC" => 20.8, "ACC" => 18.9, "AAC" => 19.1, "AGC" => 19.5,
    "ATA" => 7.5, "ACA" => 15.1, "AAA" => 24.4, "AGA" => 12.2,
    "ATG" => 22.0, "ACG" => 6.1, "AAG" => 31.9, "AGG" => 12.0,
    "GTT" => 11.0, "GCT" => 18.4, "GAT" => 21.8, "GGT" => 10.8,
    "GTC" => 14.5, "GCC" => 27.7, "GAC" => 25.1, "GGC" => 22.2,
    "GTA" => 7.1, "GCA" => 15.8, "GAA" => 29.0, "GGA" => 16.5,
    "GTG" => 28.1, "GCG" => 7.4, "GAG" => 39.6, "GGG" => 16.5,
};

pub(crate) static E_COLI: Map<&'static str, f64> = phf_map! {
    "TTT" => 22.1, "TCT" => 10.4, "TAT" => 17.5, "TGT" => 5.2,
    "TTC" => 16.0, "TCC" => 9.1, "TAC" => 12.2, "TGC" => 6.1,
    "TTA" => 14.3, "TCA" => 8.9, "TAA" => 2.0, "TGA" => 1.0,
    "TTG" => 13.0, "TCG" => 8.5, "TAG" => 0.3, "TGG" => 13.9,
    "CTT" => 11.9, "CCT" => 7.5, "CAT" => 12.5, "CGT" => 19.7,
    "CTC" => 10.2, "CCC" => 5.4, "CAC" => 9.3, "CGC" => 20.9,
    "CTA" => 4.2, "CCA" => 8.6, "CAA" => 14.6, "CGA" => 3.8,
    "CTG" => 48.4, "CCG" => 20.9, "CAG" => 28.4, "CGG" => 6.3,
    "ATT" => 29.1, "ACT" => 10.3, "AAT" => 21.9, "AGT" => 9.9,
    "ATC" => 23.7, "ACC" => 22.0, "AAC" => 24.4, "AGC" => 15.2,
    "ATA" => 6.8, "ACA" => 9.3, "AAA" => 33.6, "AGA" => 3.6,
    "ATG" => 23.7, "ACG" => 13.7, "AAG" => 12.1, "AGG" => 2.1,
    "GTT" => 20.0, "GCT" => 18.9, "GAT" => 31.7, "GGT" => 25.5,
    "GTC" => 14.3, "GCC" => 24.3, "GAC" => 19.2, "GGC" => 27.1,
    "GTA" => 11.0, "GCA" => 21.1, "GAA" => 39.1, "GGA" => 9.5,
    "GTG" => 24.4, "GCG" => 30.1, "GAG" => 18.7, "GGG" => 11.3,
};

pub(crate) static YEAST: Map<&'static str, f64> = phf_map! {
    "TTT" => 26.1, "TCT" => 23.5, "TAT" => 18.8, "TGT" => 8.1,
    "TTC" => 18.4, "TCC" => 14.2, "TAC" => 14.8, "TGC" => 4.8,
    "TTA" => 26.2, "TCA" => 18.7, "TAA" => 1.1, "TGA" => 0.7,
    "TTG" => 27.2, "TCG" => 8.6, "TAG" => 0.5, "TGG" => 10.4,
    "CTT" => 12.3, "CCT" => 13.5, "CAT" => 13.6, "CGT" => 6.4,
    "CTC" => 5.4, "CCC" => 6.8, "CAC" => 7.8, "CGC" => 2.6,
    "CTA" => 13.4, "CCA" => 18.3, "CAA" => 27.3, "CGA" => 3.0,
    "CTG" => 10.5, "CCG" => 5.3, "CAG" => 12.1, "CGG" => 1.7,
    "ATT" => 30.1, "ACT" => 20.3, "AAT" => 35.7, "AGT" => 14.2,
    "ATC" => 17.2, "ACC" => 12.7, "AAC" => 24.8, "AGC" => 9.8,
    "ATA" => 17.8, "ACA" => 17.8, "AAA" => 41.9, "AGA" => 21.3,
    "ATG" => 20.9, "ACG" => 8.0, "AAG" => 30.8, "AGG" => 9.2,
    "GTT" => 22.1, "GCT" => 21.2, "GAT" => 37.6, "GGT" => 23.9,
    "GTC" => 11.8, "GCC" => 12.6, "GAC" => 20.2, "GGC" => 9.8,
    "GTA" => 11.8, "GCA" => 16.2, "GAA" => 45.6, "GGA" => 10.9,
    "GTG" => 10.8, "GCG" => 6.2, "GAG" => 19.2, "GGG" => 6.0,
};

pub(crate) static HAMSTER: Map<&'static str, f64> = phf_map! {
    "TTT" => 19.6, "TCT" => 16.0, "TAT" => 13.1, "TGT" => 9.1,
    "TTC" => 22.0, "TCC" => 16.5, "TAC" => 16.4, "TGC" => 10.3,
    "TTA" => 6.4, "TCA" => 10.3, "TAA" => 0.6, "TGA" => 1.2,
    "TTG" => 14.1, "TCG" => 3.4, "TAG" => 0.5, "TGG" => 13.1,
    "CTT" => 13.2, "CCT" => 16.7, "CAT" => 10.2, "CGT" => 5.6,
    "CTC" => 18.4, "CCC" => 17.0, "CAC" => 12.9, "CGC" => 9.3,
    "CTA" => 7.6, "CCA" => 15.6, "CAA" => 10.3, "CGA" => 7.2,
    "CTG" => 38.8, "CCG" => 4.3, "CAG" => 33.4, "CGG" => 10.1,
    "ATT" => 17.4, "ACT" => 14.1, "AAT" => 17.4, "AGT" => 11.4,
    "ATC" => 24.8, "ACC" => 20.3, "AAC" => 21.2, "AGC" => 16.4,
    "ATA" => 6.9, "ACA" => 15.7, "AAA" => 24.6, "AGA" => 10.1,
    "ATG" => 23.0, "ACG" => 4.5, "AAG" => 38.4, "AGG" => 10.2,
    "GTT" => 11.6, "GCT" => 22.4, "GAT" => 24.6, "GGT" => 12.8,
    "GTC" => 15.7, "GCC" => 25.9, "GAC" => 28.1, "GGC" => 21.3,
    "GTA" => 7.8, "GCA" => 16.3, "GAA" => 28.4, "GGA" => 15.8,
    "GTG" => 30.1, "GCG" => 5.0, "GAG" => 41.1, "GGG" => 13.4,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn genetic_code_covers_all_64_triplets() {
        assert_eq!(CODON_TO_AMINO_ACID.len(), 64);
        for a in "TCAG".chars() {
            for b in "TCAG".chars() {
                for c in "TCAG".chars() {
                    let codon: String = [a, b, c].iter().collect();
                    assert!(CODON_TO_AMINO_ACID.contains_key(codon.as_str()));
                }
            }
        }
    }

    #[test]
    fn synonym_groups_partition_the_genetic_code() {
        let mut seen = HashSet::new();
        for (amino_acid, codons) in AMINO_ACID_CODONS.iter() {
            for codon in codons.iter() {
                assert_eq!(CODON_TO_AMINO_ACID.get(*codon), Some(amino_acid));
                assert!(seen.insert(*codon), "codon {codon} listed twice");
            }
        }
        assert_eq!(seen.len(), 64);
    }

    #[test]
    fn every_species_table_is_complete() {
        for table in [&HUMAN, &E_COLI, &YEAST, &HAMSTER] {
            assert_eq!(table.len(), 64);
            for codon in CODON_TO_AMINO_ACID.keys() {
                assert!(table.get(*codon).is_some_and(|f| *f > 0.0));
            }
        }
    }
}
