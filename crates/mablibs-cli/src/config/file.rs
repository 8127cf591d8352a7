use crate::error::{CliError, Result};
use mablibs::core::motifs::MotifKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileStrategyType {
    Nmer,
    Simultaneous,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FilePosition {
    pub position: usize,
    /// One-letter residue codes, e.g. "ADEGS".
    pub residues: String,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileStrategyConfig {
    #[serde(rename = "type")]
    pub kind: Option<FileStrategyType>,
    pub n: Option<usize>,
    #[serde(default)]
    pub positions: Vec<FilePosition>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileOptimizationConfig {
    pub enabled: Option<bool>,
    #[serde(rename = "restriction-enzymes")]
    pub restriction_enzymes: Option<Vec<String>>,
    #[serde(rename = "forbid-repeats")]
    pub forbid_repeats: Option<bool>,
    #[serde(rename = "gc-content-threshold")]
    pub gc_content_threshold: Option<f64>,
    #[serde(rename = "forbid-self-complementary")]
    pub forbid_self_complementary: Option<bool>,
    #[serde(rename = "max-attempts")]
    pub max_attempts: Option<u64>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// In-frame DNA of the variable region.
    pub template: Option<String>,
    /// Protein sequence, back-translated when no DNA template is given.
    #[serde(rename = "template-amino-acids")]
    pub template_amino_acids: Option<String>,
    pub species: Option<String>,
    /// Kazusa-format codon usage table; replaces the species table.
    #[serde(rename = "codon-usage-path")]
    pub codon_usage_path: Option<PathBuf>,
    #[serde(rename = "exclude-motifs", default)]
    pub exclude_motifs: Vec<MotifKind>,
    #[serde(rename = "sample-size")]
    pub sample_size: Option<usize>,
    pub seed: Option<u64>,
    pub strategy: Option<FileStrategyConfig>,
    pub optimization: Option<FileOptimizationConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading design configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        if let (Some(usage_path), Some(parent)) = (&config.codon_usage_path, path.parent()) {
            if usage_path.is_relative() {
                config.codon_usage_path = Some(parent.join(usage_path));
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_full_design_file() {
        let toml = r#"
            template = "CAGGTGCAGCTG"
            species = "hamster"
            exclude-motifs = ["glycosylation", "oxidation"]
            sample-size = 10
            seed = 4

            [strategy]
            type = "nmer"
            n = 2

            [[strategy.positions]]
            position = 1
            residues = "ADE"

            [[strategy.positions]]
            position = 3
            residues = "GS"

            [optimization]
            restriction-enzymes = ["NheI", "XhoI"]
            gc-content-threshold = 0.6
            max-attempts = 500
            "#;
        let config: FileConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.species.as_deref(), Some("hamster"));
        assert_eq!(
            config.exclude_motifs,
            vec![MotifKind::Glycosylation, MotifKind::Oxidation]
        );
        let strategy = config.strategy.unwrap();
        assert_eq!(strategy.kind, Some(FileStrategyType::Nmer));
        assert_eq!(strategy.n, Some(2));
        assert_eq!(strategy.positions.len(), 2);
        assert_eq!(strategy.positions[1].residues, "GS");
        let optimization = config.optimization.unwrap();
        assert_eq!(optimization.max_attempts, Some(500));
        assert_eq!(optimization.enabled, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: std::result::Result<FileConfig, _> = toml::from_str("temperature = 300");
        assert!(result.is_err());
    }

    #[test]
    fn relative_codon_usage_path_is_resolved_against_config_dir() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("design.toml");
        fs::write(&path, "codon-usage-path = \"tables/cho.txt\"\n").unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(
            config.codon_usage_path,
            Some(dir.path().join("tables/cho.txt"))
        );
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[strategy\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }
}
