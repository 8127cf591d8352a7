use crate::cli::GenerateArgs;
use crate::config::build_app_config;
use crate::error::Result;
use crate::utils::output::LibraryWriter;
use crate::utils::progress::CliProgressHandler;
use mablibs::engine::progress::ProgressReporter;
use mablibs::workflows;
use tracing::{info, warn};

pub fn run(args: GenerateArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_app_config(&args)?;
    let design = &app_config.core_config;

    info!(
        "Designing {} library over {} position(s).",
        design.strategy.kind,
        design.strategy.positions.len()
    );
    let mut writer = LibraryWriter::create(&app_config.output_path, app_config.format)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting library generation...");
    info!("Invoking the core design workflow...");
    let summary = workflows::design::run(design, &reporter, |member| {
        writer.write_member(&member)
    })?;
    writer.finish()?;

    info!(
        "Workflow finished: {} of {} candidate(s) accepted.",
        summary.accepted, summary.processed
    );
    if summary.accepted == 0 {
        warn!("Every candidate was filtered out; the output holds no members.");
        println!("Warning: every candidate was filtered out by the motif scanner.");
    }
    if summary.filtered > 0 {
        println!(
            "  {} candidate(s) removed for introducing liability motifs.",
            summary.filtered
        );
    }
    println!(
        "✓ {} member(s) from a library of {} written to: {}",
        summary.accepted,
        summary.library_size,
        app_config.output_path.display()
    );

    Ok(())
}
