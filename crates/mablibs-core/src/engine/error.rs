use super::config::ConfigError;
use crate::core::codons::CodonError;
use crate::core::enzymes::EnzymeError;
use crate::core::models::mutation::MutationError;
use crate::core::models::template::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Codon table error: {0}")]
    Codon(#[from] CodonError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weighted codon sampling failed: {source}")]
    Sampling {
        #[from]
        source: rand::distributions::WeightedError,
    },

    #[error(
        "Codon optimization gave up after {attempts} codon replacements without satisfying all constraints"
    )]
    OptimizationExhausted { attempts: u64 },
}

impl From<MutationError> for EngineError {
    fn from(e: MutationError) -> Self {
        EngineError::InvalidArgument(e.to_string())
    }
}

impl From<EnzymeError> for EngineError {
    fn from(e: EnzymeError) -> Self {
        EngineError::InvalidArgument(e.to_string())
    }
}
