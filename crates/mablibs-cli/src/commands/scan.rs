use crate::cli::ScanArgs;
use crate::error::{CliError, Result};
use mablibs::core::models::template::SequenceTemplate;
use mablibs::core::motifs::{self, MotifKind, MotifScanner};
use mablibs::engine::error::EngineError;
use std::collections::HashSet;
use std::str::FromStr;
use tracing::info;

pub fn run(args: ScanArgs) -> Result<()> {
    let amino_acids = if args.dna {
        info!("Translating DNA sequence before scanning.");
        SequenceTemplate::new(&args.sequence)
            .and_then(|template| template.amino_acids())
            .map_err(EngineError::from)?
    } else {
        args.sequence.trim().to_ascii_uppercase()
    };

    let matches = if args.motifs.is_empty() {
        motifs::default_scanner().scan(&amino_acids)
    } else {
        let kinds = args
            .motifs
            .iter()
            .map(|name| MotifKind::from_str(name))
            .collect::<std::result::Result<HashSet<_>, _>>()
            .map_err(|e| CliError::Argument(e.to_string()))?;
        MotifScanner::with_kinds(&kinds)
            .map_err(|e| CliError::Other(e.into()))?
            .scan(&amino_acids)
    };

    if args.dna {
        println!("Translation: {}", amino_acids);
    }
    if matches.is_empty() {
        println!("No liability motifs found.");
        return Ok(());
    }

    println!("{:<14} {:>6} {:>6}  {}", "Motif", "Start", "End", "Match");
    for found in &matches {
        println!(
            "{:<14} {:>6} {:>6}  {}",
            found.kind.name(),
            found.start,
            found.end,
            found.matched
        );
    }
    info!("Found {} liability motif(s).", matches.len());
    Ok(())
}
