use crate::engine::config::DesignConfig;
use crate::engine::error::EngineError;
use crate::engine::mutagenesis::{LibraryMember, Mutagenesis};
use crate::engine::optimizer::DnaOptimizer;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::strategy::RandomizationStrategy;
use tracing::{info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DesignSummary {
    /// Size of the full combinatorial library, whether or not it was sampled.
    pub library_size: u128,
    /// Mutation sets drawn from the strategy.
    pub processed: u64,
    /// Members handed to the sink.
    pub accepted: u64,
    /// Candidates dropped for carrying an excluded motif.
    pub filtered: u64,
}

/// Assembles the mutagenesis pipeline described by `config` without generating anything.
pub fn prepare(config: &DesignConfig) -> Result<Mutagenesis, EngineError> {
    let strategy =
        RandomizationStrategy::new(config.strategy.kind, config.strategy.positions.clone())?;
    let mut mutagenesis =
        Mutagenesis::with_codon_usage(strategy, config.template.clone(), &config.codon_usage)?
            .exclude_motifs(&config.excluded_motifs);

    if let Some(optimization) = &config.optimization {
        let optimizer = DnaOptimizer::new(optimization.constraints()?, &config.codon_usage)?
            .with_seed(optimization.seed)
            .with_budget(optimization.budget);
        mutagenesis = mutagenesis.optimizer(optimizer);
    }
    if let Some(sampling) = config.sampling {
        mutagenesis = mutagenesis.sample(sampling.size, sampling.seed)?;
    }
    Ok(mutagenesis)
}

/// Runs a full design and passes every accepted member to `sink` in library order.
///
/// The first error from the pipeline or the sink stops the run.
#[instrument(skip_all, name = "design_workflow")]
pub fn run<F, E>(
    config: &DesignConfig,
    reporter: &ProgressReporter,
    mut sink: F,
) -> Result<DesignSummary, E>
where
    F: FnMut(LibraryMember) -> Result<(), E>,
    E: From<EngineError>,
{
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    info!("Assembling randomization strategy and mutagenesis pipeline.");
    let mutagenesis = prepare(config)?;
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Library Generation",
    });
    // Progress counts are u64.
    reporter.report(Progress::TaskStart {
        total_steps: u64::try_from(mutagenesis.planned_size()).unwrap_or(u64::MAX),
    });

    let mut stream = mutagenesis.generate_members()?;
    let mut accepted = 0u64;
    let mut reported = 0u64;
    while let Some(member) = stream.next() {
        sink(member?)?;
        accepted += 1;
        let processed = stream.processed();
        reporter.report(Progress::TaskAdvance {
            steps: processed - reported,
        });
        reported = processed;
    }
    if stream.processed() > reported {
        reporter.report(Progress::TaskAdvance {
            steps: stream.processed() - reported,
        });
    }
    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let summary = DesignSummary {
        library_size: mutagenesis.strategy().library_size(),
        processed: stream.processed(),
        accepted,
        filtered: stream.filtered(),
    };
    info!(
        accepted = summary.accepted,
        filtered = summary.filtered,
        "Design workflow complete."
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::codons::Species;
    use crate::core::models::mutation::PositionResidueMap;
    use crate::core::models::template::SequenceTemplate;
    use crate::core::motifs::MotifKind;
    use crate::engine::config::{DesignConfigBuilder, OptimizationConfig};
    use crate::engine::optimizer::AttemptBudget;
    use crate::engine::strategy::StrategyKind;
    use std::sync::Mutex;

    // Q V Q L V E S G
    const TEMPLATE: &str = "CAGGTGCAGCTGGTGGAGTCTGGG";

    fn builder() -> DesignConfigBuilder {
        DesignConfigBuilder::new()
            .template(SequenceTemplate::new(TEMPLATE).unwrap())
            .strategy(StrategyKind::Nmer { n: 1 })
            .positions(
                PositionResidueMap::from_entries([(1, "AN".chars()), (4, "DY".chars())]).unwrap(),
            )
            .species(Species::Human)
    }

    #[test]
    fn run_streams_every_member_to_the_sink() {
        let config = builder().build().unwrap();
        let mut proteins = Vec::new();
        let summary = run(&config, &ProgressReporter::new(), |member: LibraryMember| {
            proteins.push(member.template.amino_acids()?);
            Ok::<_, EngineError>(())
        })
        .unwrap();

        assert_eq!(proteins, vec!["QAQLVESG", "QNQLVESG", "QVQLDESG", "QVQLYESG"]);
        assert_eq!(
            summary,
            DesignSummary {
                library_size: 4,
                processed: 4,
                accepted: 4,
                filtered: 0,
            }
        );
    }

    #[test]
    fn filtered_members_are_counted_and_progress_covers_them() {
        // Methionine at position 1 is an oxidation liability.
        let config = builder()
            .positions(
                PositionResidueMap::from_entries([(1, "AM".chars()), (4, "DY".chars())]).unwrap(),
            )
            .exclude_motifs([MotifKind::Oxidation])
            .build()
            .unwrap();

        let advanced = Mutex::new(0u64);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::TaskAdvance { steps } = event {
                *advanced.lock().unwrap() += steps;
            }
        }));
        let mut accepted = Vec::new();
        let summary = run(&config, &reporter, |member: LibraryMember| {
            accepted.push(member.mutations.to_string());
            Ok::<_, EngineError>(())
        })
        .unwrap();
        drop(reporter);

        assert_eq!(accepted, vec!["1A", "4D", "4Y"]);
        assert_eq!(summary.filtered, 1);
        assert_eq!(summary.processed, 4);
        assert_eq!(advanced.into_inner().unwrap(), 4);
    }

    #[test]
    fn sampled_optimized_run_is_reproducible() {
        let config = builder()
            .sample(3, Some(21))
            .optimization(OptimizationConfig {
                seed: Some(8),
                budget: AttemptBudget::Bounded(50_000),
                ..OptimizationConfig::default()
            })
            .build()
            .unwrap();

        let collect = || {
            let mut members = Vec::new();
            run(&config, &ProgressReporter::new(), |member: LibraryMember| {
                members.push(member);
                Ok::<_, EngineError>(())
            })
            .unwrap();
            members
        };
        let first = collect();
        assert_eq!(first.len(), 3);
        assert_eq!(first, collect());
    }

    #[test]
    fn sink_errors_stop_the_run() {
        let config = builder().build().unwrap();
        let mut calls = 0;
        let result = run(&config, &ProgressReporter::new(), |_member: LibraryMember| {
            calls += 1;
            Err(EngineError::InvalidArgument("sink full".to_string()))
        });
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn prepare_rejects_oversized_samples() {
        let config = builder().sample(5, None).build().unwrap();
        assert!(matches!(
            prepare(&config),
            Err(EngineError::InvalidArgument(_))
        ));
    }
}
