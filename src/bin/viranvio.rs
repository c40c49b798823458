use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use viranvio::affi::parse_affi_contigs;
use viranvio::classify::FilterOptions;
use viranvio::cli;
use viranvio::global_signal::merge_predictions;
use viranvio::input::open_table;
use viranvio::report::write_reports;
use viranvio::splits::{parse_splits_table, total_parent_lengths};

/// Projects VirSorter phage predictions onto Anvi'o splits.
///
/// Produces an additional-info file for `anvi-import-misc-data` and a
/// collection file that groups the splits of each predicted phage into its
/// own bin.
#[derive(Parser)]
#[command(name = "viranvio", about = "Parses VirSorter predictions for Anvi'o")]
struct Cli {
    /// VIRSorter_affi-contigs.tab file
    #[arg(short = 'a', long = "affi-file")]
    affi_file: PathBuf,

    /// VIRSorter_global_signal.csv file
    #[arg(short = 'g', long = "global-file")]
    global_file: PathBuf,

    /// splits_basic_info.txt file
    #[arg(short = 's', long = "splits-info")]
    splits_info: PathBuf,

    /// Minimum phage length to report, in base pairs
    #[arg(short = 'l', long = "min-phage-length", default_value_t = 1000)]
    min_phage_length: i64,

    /// Exclude all category 3 predictions from both output files
    #[arg(long = "exclude-cat3")]
    exclude_cat3: bool,

    /// Exclude all prophage predictions
    #[arg(long = "exclude-prophages")]
    exclude_prophages: bool,

    /// Additional info output file, importable as split-level additional data
    #[arg(
        short = 'A',
        long = "addl-info",
        default_value = "virsorter_additional_info.txt"
    )]
    addl_info: PathBuf,

    /// Collection output file grouping each phage's splits into a bin
    #[arg(
        short = 'C',
        long = "phage-collection",
        default_value = "virsorter_collection.txt"
    )]
    phage_collection: PathBuf,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let args = Cli::parse();

    cli::banner("VirSorter predictions for Anvi'o");

    // ── Parsing ──────────────────────────────────────────
    cli::section("Parsing");

    let affi_reader = open_table(&args.affi_file)
        .with_context(|| format!("failed to open affi file: {}", args.affi_file.display()))?;
    let genes = parse_affi_contigs(affi_reader)
        .with_context(|| format!("failed to parse affi file: {}", args.affi_file.display()))?;
    cli::kv(
        "Affi contigs",
        &format!(
            "{} ({} contigs, {} genes)",
            args.affi_file.display(),
            genes.contig_count(),
            genes.gene_count()
        ),
    );

    let global_reader = open_table(&args.global_file)
        .with_context(|| format!("failed to open global file: {}", args.global_file.display()))?;
    let predictions = merge_predictions(global_reader, &genes)
        .with_context(|| format!("failed to parse global file: {}", args.global_file.display()))?;

    let phages = predictions.values().filter(|p| p.is_whole_contig()).count();
    let prophages = predictions.len() - phages;
    let circular = predictions.values().filter(|p| p.is_circular).count();
    cli::kv(
        "Predictions",
        &format!(
            "{} ({phages} phages, {prophages} prophages, {circular} circular)",
            args.global_file.display()
        ),
    );

    let splits_reader = open_table(&args.splits_info)
        .with_context(|| format!("failed to open splits file: {}", args.splits_info.display()))?;
    let splits = parse_splits_table(splits_reader)
        .with_context(|| format!("failed to parse splits file: {}", args.splits_info.display()))?;
    let parent_lengths = total_parent_lengths(&splits);
    cli::kv(
        "Splits",
        &format!(
            "{} ({} splits, {} parents)",
            args.splits_info.display(),
            splits.len(),
            parent_lengths.len()
        ),
    );

    if predictions.is_empty() {
        cli::warning("no predictions found; outputs will be empty");
    }

    eprintln!();

    // ── Writing ──────────────────────────────────────────
    cli::section("Writing");

    let opts = FilterOptions {
        min_phage_length: args.min_phage_length,
        exclude_cat3: args.exclude_cat3,
        exclude_prophages: args.exclude_prophages,
    };

    let annotation_file = File::create(&args.addl_info)
        .with_context(|| format!("failed to create output file: {}", args.addl_info.display()))?;
    let mut annotation_out = BufWriter::new(annotation_file);

    let collection_file = File::create(&args.phage_collection).with_context(|| {
        format!(
            "failed to create output file: {}",
            args.phage_collection.display()
        )
    })?;
    let mut collection_out = BufWriter::new(collection_file);

    let counts = write_reports(
        &splits,
        &predictions,
        &parent_lengths,
        &opts,
        &mut annotation_out,
        &mut collection_out,
    )?;
    annotation_out.flush()?;
    collection_out.flush()?;

    cli::kv("Additional info", &args.addl_info.display().to_string());
    cli::kv("Collection", &args.phage_collection.display().to_string());
    cli::success(&format!(
        "{} splits annotated ({} filtered out, {} without prediction)",
        counts.emitted, counts.filtered, counts.unclassified
    ));

    // ── Summary ──────────────────────────────────────────
    cli::print_summary(start);
    Ok(())
}
