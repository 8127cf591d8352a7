//! # MabLibs Core Library
//!
//! In-silico generation of combinatorial antibody variable-region libraries, with
//! liability filtering and codon-level repair of the generated DNA.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout so each concern can be tested on its own.
//!
//! - **[`core`]: The Foundation.** Immutable value types (`SequenceTemplate`,
//!   `MutationSet`, `PositionResidueMap`), the static codon, enzyme and motif reference
//!   tables, and the liability motif scanner.
//!
//! - **[`engine`]: The Logic Core.** Randomization strategies that lazily enumerate or
//!   sample the combinatorial space, the mutagenesis pipeline that turns mutation sets into
//!   candidate sequences, the manufacturability constraints, and the codon-repair search.
//!
//! - **[`workflows`]: The Public API.** Builds a complete pipeline from a
//!   [`engine::config::DesignConfig`] and streams the accepted library members to a caller
//!   supplied sink while reporting progress.

pub mod core;
pub mod engine;
pub mod workflows;
