//! # Workflows Module
//!
//! High-level entry points that assemble a complete library design run from a
//! [`DesignConfig`](crate::engine::config::DesignConfig).
//!
//! ## Architecture
//!
//! - **Design Workflow** ([`design`]) - Builds the randomization strategy, mutagenesis
//!   pipeline and optional codon optimizer, then streams accepted library members into a
//!   caller-supplied sink while reporting progress.
//!
//! Library members are handed to the sink one at a time, so arbitrarily large libraries
//! can be written out without ever being held in memory.

pub mod design;
