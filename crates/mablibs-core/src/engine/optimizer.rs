use super::constraints::{self, Constraint};
use super::error::EngineError;
use crate::core::codons::{self, CodonUsage, Species};
use crate::core::models::template::{SequenceTemplate, TemplateError};
use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use std::collections::HashMap;
use tracing::{debug, instrument, trace, warn};

/// How many codon replacements the repair search may try before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttemptBudget {
    /// Search until the constraints are met. Never returns for unsatisfiable constraints.
    #[default]
    Unbounded,
    Bounded(u64),
}

impl AttemptBudget {
    fn exhausted(&self, attempts: u64) -> bool {
        match self {
            AttemptBudget::Unbounded => false,
            AttemptBudget::Bounded(max) => attempts >= *max,
        }
    }
}

#[derive(Debug, Clone)]
struct SynonymDraw {
    codons: &'static [&'static str],
    weights: WeightedIndex<f64>,
}

/// Repairs templates by swapping codons for synonymous ones until every constraint passes.
///
/// The encoded protein never changes: each step replaces one codon with a codon drawn from
/// the same synonym group, weighted by the organism's codon usage. Codon indices are visited
/// cyclically from the start of the template.
#[derive(Debug)]
pub struct DnaOptimizer {
    constraints: Vec<Box<dyn Constraint>>,
    draws: HashMap<char, SynonymDraw>,
    seed: Option<u64>,
    budget: AttemptBudget,
}

impl DnaOptimizer {
    pub fn new(
        constraints: Vec<Box<dyn Constraint>>,
        usage: &CodonUsage,
    ) -> Result<Self, EngineError> {
        let mut draws = HashMap::new();
        for amino_acid in codons::amino_acids() {
            let Some(group) = codons::synonymous_codons(amino_acid) else {
                continue;
            };
            let mut weights: Vec<f64> = group
                .iter()
                .map(|codon| usage.frequency(codon).unwrap_or(0.0))
                .collect();
            if weights.iter().all(|w| *w <= 0.0) {
                debug!(%amino_acid, "No usage recorded for any synonym; drawing uniformly.");
                weights.fill(1.0);
            }
            draws.insert(
                amino_acid,
                SynonymDraw {
                    codons: group,
                    weights: WeightedIndex::new(weights)?,
                },
            );
        }

        Ok(Self {
            constraints,
            draws,
            seed: None,
            budget: AttemptBudget::default(),
        })
    }

    pub fn for_species(
        constraints: Vec<Box<dyn Constraint>>,
        species: Species,
    ) -> Result<Self, EngineError> {
        Self::new(constraints, &CodonUsage::for_species(species))
    }

    /// Makes every replacement reproducible: the generator is reseeded from the seed and the
    /// step number before each draw.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_budget(mut self, budget: AttemptBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn constraints(&self) -> &[Box<dyn Constraint>] {
        &self.constraints
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn budget(&self) -> AttemptBudget {
        self.budget
    }

    pub fn satisfies_all(&self, nucleotides: &str) -> bool {
        constraints::all_satisfied(&self.constraints, nucleotides)
    }

    #[instrument(level = "debug", skip_all, fields(codons = template.len_codons()))]
    pub fn optimize_template(
        &self,
        template: SequenceTemplate,
    ) -> Result<SequenceTemplate, EngineError> {
        if self.satisfies_all(template.nucleotides()) {
            return Ok(template);
        }

        let mut current = Vec::with_capacity(template.len_codons());
        let mut draws = Vec::with_capacity(template.len_codons());
        for (index, codon) in template.iter_codons().enumerate() {
            let unknown = || TemplateError::UnknownCodon {
                codon: codon.to_string(),
                index,
            };
            let canonical = codons::canonical_codon(codon).ok_or_else(unknown)?;
            let amino_acid = codons::translate_codon(canonical).ok_or_else(unknown)?;
            let draw = self.draws.get(&amino_acid).ok_or_else(unknown)?;
            current.push(canonical);
            draws.push(draw);
        }
        if current.is_empty() {
            warn!("Constraints reject an empty template; nothing to repair.");
            return Err(EngineError::OptimizationExhausted { attempts: 0 });
        }

        trace!(
            violated = constraints::first_violation(&self.constraints, template.nucleotides()),
            "Starting synonymous codon search."
        );

        let n = current.len() as u64;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut attempts: u64 = 0;
        loop {
            if self.budget.exhausted(attempts) {
                warn!(attempts, "Codon repair budget spent without satisfying all constraints.");
                return Err(EngineError::OptimizationExhausted { attempts });
            }

            let index = (attempts % n) as usize;
            if let Some(seed) = self.seed {
                rng = StdRng::seed_from_u64(seed.wrapping_add(attempts));
            }
            let draw = draws[index];
            current[index] = draw.codons[draw.weights.sample(&mut rng)];
            attempts += 1;

            let candidate = current.concat();
            if self.satisfies_all(&candidate) {
                debug!(attempts, "Template satisfies all constraints.");
                return Ok(SequenceTemplate::from_codons(current.iter().copied()));
            }
            if attempts % n == 0 {
                trace!(
                    pass = attempts / n,
                    "Completed a pass over every codon without satisfying all constraints."
                );
            }
        }
    }
}
