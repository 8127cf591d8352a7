use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileOptimizationConfig, FileStrategyConfig, FileStrategyType};
use super::models::AppConfig;
use crate::cli::GenerateArgs;
use crate::error::{CliError, Result};
use mablibs::core::codons::{CodonUsage, Species};
use mablibs::core::models::mutation::PositionResidueMap;
use mablibs::core::models::template::SequenceTemplate;
use mablibs::engine::config as core_config;
use mablibs::engine::optimizer::AttemptBudget;
use mablibs::engine::strategy::StrategyKind;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Command-line values that take precedence over both the design file and `--set`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesignOverrides {
    pub sample_size: Option<usize>,
    pub seed: Option<u64>,
    pub max_attempts: Option<u64>,
    pub no_optimization: bool,
}

impl From<&GenerateArgs> for DesignOverrides {
    fn from(args: &GenerateArgs) -> Self {
        Self {
            sample_size: args.sample_size,
            seed: args.seed,
            max_attempts: args.max_attempts,
            no_optimization: args.no_optimization,
        }
    }
}

pub fn build_app_config(args: &GenerateArgs) -> Result<AppConfig> {
    let core_config =
        build_design_config(&args.config, &args.set_values, &DesignOverrides::from(args))?;
    Ok(AppConfig {
        output_path: args.output.clone(),
        format: args.format,
        core_config,
    })
}

/// Resolves a design from, in decreasing precedence: CLI overrides, `--set` values, the
/// design file, and built-in defaults.
pub fn build_design_config(
    config_path: &Path,
    set_values: &[String],
    overrides: &DesignOverrides,
) -> Result<core_config::DesignConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = FileConfig::from_file(config_path)?;
    let mut file_config = apply_set_values(file_config, set_values)?;

    let template = resolve_template(&file_config)?;
    let codon_usage = resolve_codon_usage(&file_config, &defaults)?;
    let (kind, positions) = resolve_strategy(file_config.strategy.take(), &defaults)?;

    let mut builder = core_config::DesignConfigBuilder::new()
        .template(template)
        .strategy(kind)
        .positions(positions)
        .codon_usage(codon_usage)
        .exclude_motifs(file_config.exclude_motifs.iter().copied());

    if let Some(size) = overrides.sample_size.or(file_config.sample_size) {
        builder = builder.sample(size, overrides.seed.or(file_config.seed));
    } else if overrides.seed.is_some() || file_config.seed.is_some() {
        warn!("A sampling seed was given without a sample size; the whole library is enumerated.");
    }

    if let Some(optimization) =
        merge_optimization(file_config.optimization.take(), overrides, &defaults)
    {
        builder = builder.optimization(optimization);
    }

    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

fn resolve_template(file_config: &FileConfig) -> Result<SequenceTemplate> {
    let template = match (
        &file_config.template,
        &file_config.template_amino_acids,
    ) {
        (Some(_), Some(_)) => {
            return Err(CliError::Config(
                "Specify only one of `template` and `template-amino-acids`.".to_string(),
            ));
        }
        (Some(dna), None) => SequenceTemplate::new(dna),
        (None, Some(protein)) => {
            debug!("Back-translating protein template.");
            SequenceTemplate::from_amino_acids(protein)
        }
        (None, None) => {
            return Err(CliError::Config(
                "A `template` or `template-amino-acids` value is required.".to_string(),
            ));
        }
    };
    template.map_err(|e| CliError::Config(format!("Invalid template: {}", e)))
}

fn resolve_codon_usage(file_config: &FileConfig, defaults: &DefaultsConfig) -> Result<CodonUsage> {
    if let Some(path) = &file_config.codon_usage_path {
        if file_config.species.is_some() {
            warn!("`codon-usage-path` overrides `species`.");
        }
        debug!("Loading codon usage table from {:?}", path);
        let text = std::fs::read_to_string(path)?;
        return CodonUsage::parse_kazusa(&text).map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        });
    }
    let species = match &file_config.species {
        Some(name) => Species::from_str(name).map_err(|e| CliError::Config(e.to_string()))?,
        None => defaults.species,
    };
    Ok(CodonUsage::for_species(species))
}

fn resolve_strategy(
    file_strategy: Option<FileStrategyConfig>,
    defaults: &DefaultsConfig,
) -> Result<(StrategyKind, PositionResidueMap)> {
    let strategy = file_strategy
        .ok_or_else(|| CliError::Config("A `[strategy]` section is required.".to_string()))?;
    if strategy.positions.is_empty() {
        return Err(CliError::Config(
            "At least one `[[strategy.positions]]` entry is required.".to_string(),
        ));
    }

    let kind = match strategy.kind.unwrap_or(FileStrategyType::Nmer) {
        FileStrategyType::Nmer => StrategyKind::Nmer {
            n: strategy.n.unwrap_or(defaults.nmer_size),
        },
        FileStrategyType::Simultaneous => {
            if strategy.n.is_some() {
                warn!("`strategy.n` is ignored by the simultaneous strategy.");
            }
            StrategyKind::Simultaneous
        }
    };

    let positions = PositionResidueMap::from_entries(strategy.positions.iter().map(|p| {
        (
            p.position,
            p.residues
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| c.to_ascii_uppercase()),
        )
    }))
    .map_err(|e| CliError::Config(e.to_string()))?;

    Ok((kind, positions))
}

fn merge_optimization(
    file_val: Option<FileOptimizationConfig>,
    overrides: &DesignOverrides,
    defaults: &DefaultsConfig,
) -> Option<core_config::OptimizationConfig> {
    let file_val = file_val.unwrap_or_default();
    if overrides.no_optimization || !file_val.enabled.unwrap_or(defaults.optimization_enabled) {
        return None;
    }
    Some(core_config::OptimizationConfig {
        restriction_enzymes: file_val
            .restriction_enzymes
            .unwrap_or_else(|| defaults.restriction_enzymes.clone()),
        forbid_repeats: file_val.forbid_repeats.unwrap_or(defaults.forbid_repeats),
        gc_content_threshold: Some(
            file_val
                .gc_content_threshold
                .unwrap_or(defaults.gc_content_threshold),
        ),
        forbid_self_complementary: file_val
            .forbid_self_complementary
            .unwrap_or(defaults.forbid_self_complementary),
        seed: file_val.seed,
        budget: overrides
            .max_attempts
            .or(file_val.max_attempts)
            .map_or(AttemptBudget::Unbounded, AttemptBudget::Bounded),
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, expected: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", expected, key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "template" => config.template = Some(value_str.to_string()),
            "species" => config.species = Some(value_str.to_string()),
            "sample-size" => config.sample_size = Some(parse_value(key, value_str, "integer")?),
            "seed" => config.seed = Some(parse_value(key, value_str, "integer")?),
            "strategy.type" => {
                let kind = match value_str.trim() {
                    "nmer" => FileStrategyType::Nmer,
                    "simultaneous" => FileStrategyType::Simultaneous,
                    other => {
                        return Err(CliError::Config(format!(
                            "Invalid strategy type for {}: {}. Expected 'nmer' or 'simultaneous'.",
                            key, other
                        )));
                    }
                };
                config.strategy.get_or_insert_with(Default::default).kind = Some(kind);
            }
            "strategy.n" => {
                config.strategy.get_or_insert_with(Default::default).n =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "optimization.enabled" => {
                config.optimization.get_or_insert_with(Default::default).enabled =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "optimization.forbid-repeats" => {
                config
                    .optimization
                    .get_or_insert_with(Default::default)
                    .forbid_repeats = Some(parse_value(key, value_str, "boolean")?);
            }
            "optimization.forbid-self-complementary" => {
                config
                    .optimization
                    .get_or_insert_with(Default::default)
                    .forbid_self_complementary = Some(parse_value(key, value_str, "boolean")?);
            }
            "optimization.gc-content-threshold" => {
                config
                    .optimization
                    .get_or_insert_with(Default::default)
                    .gc_content_threshold = Some(parse_value(key, value_str, "float")?);
            }
            "optimization.max-attempts" => {
                config
                    .optimization
                    .get_or_insert_with(Default::default)
                    .max_attempts = Some(parse_value(key, value_str, "integer")?);
            }
            "optimization.seed" => {
                config.optimization.get_or_insert_with(Default::default).seed =
                    Some(parse_value(key, value_str, "integer")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
