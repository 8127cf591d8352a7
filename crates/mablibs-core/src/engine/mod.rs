//! # Engine Module
//!
//! The generate → filter → repair machinery behind library design.
//!
//! ## Architecture
//!
//! - **Randomization** ([`strategy`]) - Lazy enumeration, random access and sampling over
//!   the combinatorial space of mutation sets
//! - **Mutagenesis** ([`mutagenesis`]) - Applies mutation sets to a template with the
//!   species' preferred codons, filters liability motifs and hands candidates to the optimizer
//! - **Constraints** ([`constraints`]) - Manufacturability predicates over nucleotide strings
//! - **Codon Repair** ([`optimizer`]) - Synonymous-codon local search that satisfies the
//!   constraints without changing the encoded protein
//! - **Configuration** ([`config`]) - Typed design settings and their builders
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - The engine error taxonomy
//!
//! Everything runs on the caller's thread and is pull-based: no mutation set is generated,
//! filtered or repaired until the consumer asks for the next library member.

pub mod config;
pub mod constraints;
pub mod error;
pub mod mutagenesis;
pub mod optimizer;
pub mod progress;
pub mod strategy;
