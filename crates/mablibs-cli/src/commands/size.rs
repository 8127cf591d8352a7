use crate::cli::SizeArgs;
use crate::config::{DesignOverrides, build_design_config};
use crate::error::Result;
use mablibs::workflows;
use tracing::{info, warn};

pub fn run(args: SizeArgs) -> Result<()> {
    let design = build_design_config(&args.config, &args.set_values, &DesignOverrides::default())?;
    let mutagenesis = workflows::design::prepare(&design)?;
    let strategy = mutagenesis.strategy();

    info!(
        "Library uses the {} strategy over {} position(s).",
        strategy.kind(),
        strategy.map().len()
    );
    println!("Strategy:      {}", strategy.kind());
    println!("Positions:     {}", strategy.map().len());
    println!("Library size:  {}", strategy.library_size());
    if mutagenesis.planned_size() != strategy.library_size() {
        println!("Sampled:       {}", mutagenesis.planned_size());
    }
    let excluded = mutagenesis.excluded_motifs();
    if !excluded.is_empty() {
        let names: Vec<&str> = excluded.iter().map(|kind| kind.name()).collect();
        println!("Filtered out:  {}", names.join(", "));
    }

    if let Some(count) = args.preview {
        let preview = strategy.enumerate_all_bounded(count);
        println!("\nFirst {} mutation set(s):", preview.mutation_sets.len());
        for (i, mutation_set) in preview.mutation_sets.iter().enumerate() {
            println!("  {:>6}  {}", i + 1, mutation_set);
        }
        if let Some(warning) = preview.warning {
            warn!("Preview truncated.");
            println!("Warning: {}", warning);
        }
    }

    Ok(())
}
