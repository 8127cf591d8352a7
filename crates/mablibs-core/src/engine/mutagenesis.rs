use super::error::EngineError;
use super::optimizer::DnaOptimizer;
use super::strategy::{Enumeration, RandomizationStrategy, Sample};
use crate::core::codons::{CodonUsage, PreferredCodons, Species};
use crate::core::models::mutation::MutationSet;
use crate::core::models::template::SequenceTemplate;
use crate::core::motifs::{self, MotifKind};
use std::collections::HashSet;
use tracing::{debug, info, trace};

/// A generated sequence together with the mutations that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryMember {
    pub mutations: MutationSet,
    pub template: SequenceTemplate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SampleSpec {
    size: usize,
    seed: Option<u64>,
}

/// Turns a randomization strategy and a base template into a stream of library sequences.
///
/// Each mutation set is written into the template using the organism's preferred codon for
/// every substituted residue. Candidates whose translation carries an excluded liability
/// motif are dropped, and the rest are passed through the optimizer when one is attached.
#[derive(Debug)]
pub struct Mutagenesis {
    strategy: RandomizationStrategy,
    template: SequenceTemplate,
    preferred: PreferredCodons,
    excluded: HashSet<MotifKind>,
    excluded_order: Vec<MotifKind>,
    optimizer: Option<DnaOptimizer>,
    sample: Option<SampleSpec>,
}

impl Mutagenesis {
    pub fn new(
        strategy: RandomizationStrategy,
        template: SequenceTemplate,
        species: Species,
    ) -> Result<Self, EngineError> {
        Self::with_codon_usage(strategy, template, &CodonUsage::for_species(species))
    }

    pub fn with_codon_usage(
        strategy: RandomizationStrategy,
        template: SequenceTemplate,
        usage: &CodonUsage,
    ) -> Result<Self, EngineError> {
        let preferred = usage.preferred_codons();
        for residue in strategy.map().residues() {
            preferred.codon_for(residue)?;
        }
        let len = template.len_codons();
        if let Some(position) = strategy.map().positions().find(|p| *p >= len) {
            return Err(EngineError::InvalidArgument(format!(
                "position {position} is outside the template's {len} codons"
            )));
        }
        template.amino_acids()?;

        Ok(Self {
            strategy,
            template,
            preferred,
            excluded: HashSet::new(),
            excluded_order: Vec::new(),
            optimizer: None,
            sample: None,
        })
    }

    /// Drops candidates whose protein scan reports any of `kinds`. An empty set disables
    /// filtering.
    ///
    /// The candidate is scanned for every motif kind and only the reported matches are
    /// checked, so a residue run claimed by a higher-priority kind (`NST` read as
    /// glycosylation) does not count as the lower-priority kind it also spells (`NS`).
    pub fn exclude_motifs(mut self, kinds: &HashSet<MotifKind>) -> Self {
        self.excluded_order = MotifKind::ALL
            .into_iter()
            .filter(|kind| kinds.contains(kind))
            .collect();
        self.excluded = kinds.clone();
        self
    }

    pub fn optimizer(mut self, optimizer: DnaOptimizer) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    /// Generates a uniform random subset of `size` mutation sets instead of the whole library.
    pub fn sample(mut self, size: usize, seed: Option<u64>) -> Result<Self, EngineError> {
        if size as u128 > self.strategy.library_size() {
            return Err(EngineError::InvalidArgument(format!(
                "sample size {size} exceeds library size {}",
                self.strategy.library_size()
            )));
        }
        self.sample = Some(SampleSpec { size, seed });
        Ok(self)
    }

    pub fn strategy(&self) -> &RandomizationStrategy {
        &self.strategy
    }

    pub fn template(&self) -> &SequenceTemplate {
        &self.template
    }

    pub fn excluded_motifs(&self) -> &[MotifKind] {
        &self.excluded_order
    }

    /// Number of mutation sets the library stream will draw, before motif filtering.
    pub fn planned_size(&self) -> u128 {
        self.sample
            .map_or(self.strategy.library_size(), |s| s.size as u128)
    }

    /// Writes each mutation's preferred codon into a copy of the base template.
    pub fn mutate(&self, mutations: &MutationSet) -> Result<SequenceTemplate, EngineError> {
        let replacements = mutations
            .iter()
            .map(|m| -> Result<_, EngineError> {
                Ok((m.position, self.preferred.codon_for(m.residue)?))
            })
            .collect::<Result<Vec<_>, EngineError>>()?;
        Ok(self.template.with_codons(replacements)?)
    }

    pub fn generate_members(&self) -> Result<LibraryStream<'_>, EngineError> {
        let source = match self.sample {
            Some(SampleSpec { size, seed }) => {
                MutationSource::Sample(self.strategy.sample(size, seed)?)
            }
            None => MutationSource::Enumerate(self.strategy.enumerate()),
        };
        info!(
            kind = %self.strategy.kind(),
            planned = self.planned_size(),
            excluded_motifs = self.excluded_motifs().len(),
            optimizing = self.optimizer.is_some(),
            "Generating mutagenesis library."
        );
        Ok(LibraryStream {
            mutagenesis: self,
            source,
            processed: 0,
            filtered: 0,
        })
    }

    pub fn generate_library(
        &self,
    ) -> Result<impl Iterator<Item = Result<SequenceTemplate, EngineError>> + '_, EngineError> {
        Ok(self
            .generate_members()?
            .map(|member| member.map(|m| m.template)))
    }

    fn has_excluded_motif(&self, candidate: &SequenceTemplate) -> Result<bool, EngineError> {
        if self.excluded.is_empty() {
            return Ok(false);
        }
        Ok(motifs::default_scanner().contains_any(&candidate.amino_acids()?, &self.excluded))
    }
}

enum MutationSource<'a> {
    Enumerate(Enumeration<'a>),
    Sample(Sample<'a>),
}

impl Iterator for MutationSource<'_> {
    type Item = MutationSet;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            MutationSource::Enumerate(it) => it.next(),
            MutationSource::Sample(it) => it.next(),
        }
    }
}

/// Lazy stream of library members. Nothing is generated until the next member is requested.
pub struct LibraryStream<'a> {
    mutagenesis: &'a Mutagenesis,
    source: MutationSource<'a>,
    processed: u64,
    filtered: u64,
}

impl LibraryStream<'_> {
    /// Mutation sets drawn so far, including filtered ones.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Candidates dropped so far for carrying an excluded motif.
    pub fn filtered(&self) -> u64 {
        self.filtered
    }
}

impl Iterator for LibraryStream<'_> {
    type Item = Result<LibraryMember, EngineError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mutations = self.source.next()?;
            self.processed += 1;

            let candidate = match self.mutagenesis.mutate(&mutations) {
                Ok(candidate) => candidate,
                Err(e) => return Some(Err(e)),
            };
            match self.mutagenesis.has_excluded_motif(&candidate) {
                Ok(true) => {
                    self.filtered += 1;
                    trace!(%mutations, "Skipping candidate with an excluded motif.");
                    continue;
                }
                Ok(false) => {}
                Err(e) => return Some(Err(e)),
            }

            let template = match &self.mutagenesis.optimizer {
                Some(optimizer) => match optimizer.optimize_template(candidate) {
                    Ok(optimized) => optimized,
                    Err(e) => return Some(Err(e)),
                },
                None => candidate,
            };
            debug!(%mutations, "Generated library member.");
            return Some(Ok(LibraryMember {
                mutations,
                template,
            }));
        }
    }
}
