use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "William Steele",
    version,
    about = "MabLibs CLI - Design combinatorial antibody mutagenesis libraries with liability filtering and codon-level DNA repair.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a mutagenesis library and write it to a file.
    Generate(GenerateArgs),
    /// Report the size of the library described by a configuration file.
    Size(SizeArgs),
    /// Scan a protein (or DNA) sequence for liability motifs.
    Scan(ScanArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One row per member: index, mutations, DNA and protein.
    #[default]
    Csv,
    /// One record per member, headed by its mutations.
    Fasta,
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    // --- Core Arguments ---
    /// Path to the library design file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Path for the generated library.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Output file format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    // --- Sampling Overrides ---
    /// Draw this many random members instead of enumerating the whole library.
    #[arg(short = 'n', long, value_name = "INT")]
    pub sample_size: Option<usize>,

    /// Seed for the random sample, making it reproducible.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    // --- Optimization Overrides ---
    /// Give up on a member after this many codon replacements.
    #[arg(long, value_name = "INT")]
    pub max_attempts: Option<u64>,

    /// Skip codon optimization, even if it is configured in the design file.
    #[arg(long)]
    pub no_optimization: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S strategy.n=2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `size` subcommand.
#[derive(Args, Debug)]
pub struct SizeArgs {
    /// Path to the library design file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Also print the first mutation sets of the library, in order.
    #[arg(long, value_name = "INT")]
    pub preview: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Sequence to scan. One-letter amino acids unless --dna is given.
    #[arg(required = true)]
    pub sequence: String,

    /// Treat the sequence as in-frame DNA and translate it before scanning.
    #[arg(long)]
    pub dna: bool,

    /// Restrict the scan to these motif kinds. Defaults to every kind.
    #[arg(short, long = "motif", value_name = "KIND")]
    pub motifs: Vec<String>,
}
