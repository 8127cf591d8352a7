use super::constraints::{Constraint, GcContentCeiling, NotSelfComplementary, PatternAbsent};
use super::error::EngineError;
use super::optimizer::AttemptBudget;
use super::strategy::StrategyKind;
use crate::core::codons::{CodonUsage, Species};
use crate::core::models::mutation::PositionResidueMap;
use crate::core::models::template::SequenceTemplate;
use crate::core::motifs::MotifKind;
use std::collections::HashSet;
use thiserror::Error;

/// GC ceiling used by design runs unless configured otherwise.
pub const DESIGN_GC_CONTENT_THRESHOLD: f64 = 0.75;

/// Restriction sites kept out of designed libraries unless configured otherwise.
pub const DEFAULT_RESTRICTION_ENZYMES: [&str; 5] = ["NheI", "NotI", "XhoI", "NcoI", "DraI"];

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {parameter}: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyConfig {
    pub kind: StrategyKind,
    pub positions: PositionResidueMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingConfig {
    pub size: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationConfig {
    pub restriction_enzymes: Vec<String>,
    pub forbid_repeats: bool,
    pub gc_content_threshold: Option<f64>,
    pub forbid_self_complementary: bool,
    pub seed: Option<u64>,
    pub budget: AttemptBudget,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            restriction_enzymes: DEFAULT_RESTRICTION_ENZYMES
                .iter()
                .map(|e| e.to_string())
                .collect(),
            forbid_repeats: false,
            gc_content_threshold: Some(DESIGN_GC_CONTENT_THRESHOLD),
            forbid_self_complementary: true,
            seed: None,
            budget: AttemptBudget::Unbounded,
        }
    }
}

impl OptimizationConfig {
    /// Builds the constraint list in evaluation order: restriction sites, repeats, GC
    /// content, then self-complementarity.
    pub fn constraints(&self) -> Result<Vec<Box<dyn Constraint>>, EngineError> {
        let mut constraints: Vec<Box<dyn Constraint>> = Vec::new();
        if !self.restriction_enzymes.is_empty() {
            constraints.push(Box::new(PatternAbsent::restriction_sites(
                self.restriction_enzymes.as_slice(),
            )?));
        }
        if self.forbid_repeats {
            constraints.push(Box::new(PatternAbsent::nucleotide_repeats()));
        }
        if let Some(threshold) = self.gc_content_threshold {
            constraints.push(Box::new(GcContentCeiling::new(threshold)));
        }
        if self.forbid_self_complementary {
            constraints.push(Box::new(NotSelfComplementary));
        }
        Ok(constraints)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(threshold) = self.gc_content_threshold {
            if !(threshold > 0.0 && threshold <= 1.0) {
                return Err(ConfigError::InvalidParameter {
                    parameter: "gc_content_threshold",
                    reason: format!("{threshold} is not a fraction in (0, 1]"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignConfig {
    pub template: SequenceTemplate,
    pub strategy: StrategyConfig,
    pub codon_usage: CodonUsage,
    pub excluded_motifs: HashSet<MotifKind>,
    pub sampling: Option<SamplingConfig>,
    pub optimization: Option<OptimizationConfig>,
}

#[derive(Default)]
pub struct DesignConfigBuilder {
    template: Option<SequenceTemplate>,
    strategy_kind: Option<StrategyKind>,
    positions: Option<PositionResidueMap>,
    species: Option<Species>,
    codon_usage: Option<CodonUsage>,
    excluded_motifs: HashSet<MotifKind>,
    sampling: Option<SamplingConfig>,
    optimization: Option<OptimizationConfig>,
}

impl DesignConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(mut self, template: SequenceTemplate) -> Self {
        self.template = Some(template);
        self
    }
    pub fn strategy(mut self, kind: StrategyKind) -> Self {
        self.strategy_kind = Some(kind);
        self
    }
    pub fn positions(mut self, positions: PositionResidueMap) -> Self {
        self.positions = Some(positions);
        self
    }
    pub fn species(mut self, species: Species) -> Self {
        self.species = Some(species);
        self
    }
    /// Takes precedence over [`species`](Self::species).
    pub fn codon_usage(mut self, usage: CodonUsage) -> Self {
        self.codon_usage = Some(usage);
        self
    }
    pub fn exclude_motifs(mut self, kinds: impl IntoIterator<Item = MotifKind>) -> Self {
        self.excluded_motifs.extend(kinds);
        self
    }
    pub fn sample(mut self, size: usize, seed: Option<u64>) -> Self {
        self.sampling = Some(SamplingConfig { size, seed });
        self
    }
    pub fn optimization(mut self, optimization: OptimizationConfig) -> Self {
        self.optimization = Some(optimization);
        self
    }

    pub fn build(self) -> Result<DesignConfig, ConfigError> {
        let strategy = StrategyConfig {
            kind: self
                .strategy_kind
                .ok_or(ConfigError::MissingParameter("strategy"))?,
            positions: self
                .positions
                .ok_or(ConfigError::MissingParameter("positions"))?,
        };
        let codon_usage = self
            .codon_usage
            .or_else(|| self.species.map(CodonUsage::for_species))
            .ok_or(ConfigError::MissingParameter("species"))?;
        if let Some(optimization) = &self.optimization {
            optimization.validate()?;
        }
        Ok(DesignConfig {
            template: self
                .template
                .ok_or(ConfigError::MissingParameter("template"))?,
            strategy,
            codon_usage,
            excluded_motifs: self.excluded_motifs,
            sampling: self.sampling,
            optimization: self.optimization,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions() -> PositionResidueMap {
        PositionResidueMap::uniform([1, 2], &['A', 'G']).unwrap()
    }

    fn template() -> SequenceTemplate {
        SequenceTemplate::new("ATGGCTGCT").unwrap()
    }

    #[test]
    fn builder_reports_first_missing_parameter() {
        let err = DesignConfigBuilder::new().build().unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("strategy"));

        let err = DesignConfigBuilder::new()
            .strategy(StrategyKind::Simultaneous)
            .positions(positions())
            .template(template())
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("species"));

        let err = DesignConfigBuilder::new()
            .strategy(StrategyKind::Simultaneous)
            .positions(positions())
            .species(Species::Human)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("template"));
    }

    #[test]
    fn builder_assembles_complete_config() {
        let config = DesignConfigBuilder::new()
            .template(template())
            .strategy(StrategyKind::Nmer { n: 1 })
            .positions(positions())
            .species(Species::Hamster)
            .exclude_motifs([MotifKind::Glycosylation, MotifKind::Deamidation])
            .sample(2, Some(4))
            .optimization(OptimizationConfig::default())
            .build()
            .unwrap();
        assert_eq!(config.codon_usage, CodonUsage::for_species(Species::Hamster));
        assert_eq!(config.excluded_motifs.len(), 2);
        assert_eq!(
            config.sampling,
            Some(SamplingConfig {
                size: 2,
                seed: Some(4)
            })
        );
    }

    #[test]
    fn explicit_codon_usage_overrides_species() {
        let config = DesignConfigBuilder::new()
            .template(template())
            .strategy(StrategyKind::Simultaneous)
            .positions(positions())
            .species(Species::Human)
            .codon_usage(CodonUsage::for_species(Species::Yeast))
            .build()
            .unwrap();
        assert_eq!(config.codon_usage, CodonUsage::for_species(Species::Yeast));
    }

    #[test]
    fn gc_threshold_must_be_a_fraction() {
        let err = DesignConfigBuilder::new()
            .template(template())
            .strategy(StrategyKind::Simultaneous)
            .positions(positions())
            .species(Species::Human)
            .optimization(OptimizationConfig {
                gc_content_threshold: Some(1.5),
                ..OptimizationConfig::default()
            })
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                parameter: "gc_content_threshold",
                ..
            }
        ));
    }

    #[test]
    fn default_optimization_builds_design_constraints() {
        let constraints = OptimizationConfig::default().constraints().unwrap();
        let names: Vec<_> = constraints.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                "restriction-sites[NheI,NotI,XhoI,NcoI,DraI]",
                "gc-content",
                "self-complementary"
            ]
        );
    }

    #[test]
    fn repeats_and_empty_enzyme_lists_are_respected() {
        let config = OptimizationConfig {
            restriction_enzymes: Vec::new(),
            forbid_repeats: true,
            gc_content_threshold: None,
            forbid_self_complementary: false,
            ..OptimizationConfig::default()
        };
        let constraints = config.constraints().unwrap();
        assert_eq!(constraints.len(), 1);
        assert_eq!(constraints[0].name(), "nucleotide-repeats");
    }
}
