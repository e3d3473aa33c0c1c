//! Placement Insights: Filtered analytics CLI
//!
//! Loads a dataset of student placement predictions, applies the selected
//! filters and prints KPIs, distributions, grouped rates and correlations.

use anyhow::{Context, Result};
use clap::Parser;

use placement_insights::cli::{
    confirm_another_filter, filter_spec, select_gender, select_placement, Cli,
};
use placement_insights::pipeline::{apply, Dataset, FilterSpec, InsightSnapshot, SnapshotOptions};
use placement_insights::report::{
    display_records, display_snapshot, export_records, export_snapshot,
};
use placement_insights::utils::{
    create_spinner, finish_with_failure, finish_with_success, print_banner, print_filter_card,
    print_saved, print_success,
};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    print_banner(env!("CARGO_PKG_VERSION"));

    let loader = cli.loader().context("Invalid input options")?;
    let source = loader.describe();

    let spinner = create_spinner("Loading dataset...");
    let dataset = match loader.load() {
        Ok(dataset) => {
            finish_with_success(&spinner, &format!("Loaded {} record(s)", dataset.len()));
            dataset
        }
        Err(e) => {
            finish_with_failure(&spinner, "Failed to load dataset");
            return Err(e).with_context(|| format!("Could not load {}", source));
        }
    };

    let options = cli.snapshot_options();

    if cli.interactive {
        let mut gender = cli.gender;
        let mut placement = cli.placement;
        loop {
            gender = select_gender(gender)?;
            placement = select_placement(placement)?;
            run_once(&cli, &dataset, &filter_spec(gender, placement), &options, &source)?;

            if !confirm_another_filter()? {
                break;
            }
        }
    } else {
        run_once(&cli, &dataset, &cli.filter_spec(), &options, &source)?;
    }

    print_success("Done");
    Ok(())
}

/// Recompute every panel for one filter selection
fn run_once(
    cli: &Cli,
    dataset: &Dataset,
    spec: &FilterSpec,
    options: &SnapshotOptions,
    source: &str,
) -> Result<()> {
    println!();
    print_filter_card(&cli.input, spec);

    let snapshot = InsightSnapshot::compute(dataset, spec, options)
        .context("Failed to compute insights")?;
    display_snapshot(&snapshot);

    if let Some(path) = &cli.export {
        export_snapshot(&snapshot, source, dataset.len(), path)?;
        print_saved(path);
    }

    if cli.show_records || cli.export_records.is_some() {
        let view = apply(dataset, spec).context("Failed to filter records")?;
        if cli.show_records {
            display_records(&view)?;
        }
        if let Some(path) = &cli.export_records {
            export_records(&view, path)?;
            print_saved(path);
        }
    }

    Ok(())
}
