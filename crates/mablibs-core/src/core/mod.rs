//! # Core Module
//!
//! Stateless building blocks shared by the engine and the workflows.
//!
//! - **Codon Reference Data** ([`codons`]) - Genetic code, synonymous codon groups and
//!   per-species codon usage frequencies
//! - **Restriction Enzymes** ([`enzymes`]) - Recognition sites and forbidden-pattern regexes
//! - **Liability Motifs** ([`motifs`]) - Post-translational modification and manufacturing
//!   liability detection over amino-acid sequences
//! - **Sequence Models** ([`models`]) - Nucleotide templates and mutation descriptions
//!
//! Everything in this module is either a pure function or an immutable value. The
//! reference tables are compile-time `phf` maps and live for the whole process.

pub mod codons;
pub mod enzymes;
pub mod models;
pub mod motifs;
