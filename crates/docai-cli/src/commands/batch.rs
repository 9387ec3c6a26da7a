//! Batch processing command for every pending document in the bucket.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use docai_core::models::record::ExtractionRecord;
use docai_core::{DocumentProcessor, ProcessOutcome};

use super::config::load_config;
use super::process::format_csv;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Process at most this many documents
    #[arg(short, long)]
    limit: Option<usize>,

    /// Write the records produced by this run to a CSV file
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single key.
struct ItemResult {
    key: String,
    outcome: Option<ProcessOutcome>,
    error: Option<(&'static str, String)>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let continue_on_error = args.continue_on_error;
    let limit = args.limit;

    let results = tokio::task::spawn_blocking(move || -> anyhow::Result<Vec<ItemResult>> {
        let processor = DocumentProcessor::from_config(&config)?;

        let mut keys = processor.pending_items()?;
        if let Some(limit) = limit {
            keys.truncate(limit);
        }
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        eprintln!(
            "{} Found {} documents to process",
            style("ℹ").blue(),
            keys.len()
        );

        let pb = ProgressBar::new(keys.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("=>-"),
        );

        let mut results = Vec::with_capacity(keys.len());
        for key in keys {
            pb.set_message(key.clone());

            match processor.process_item(&key) {
                Ok(outcome) => results.push(ItemResult {
                    key,
                    outcome: Some(outcome),
                    error: None,
                }),
                Err(e) => {
                    if !continue_on_error {
                        pb.abandon();
                        error!("Failed to process {} [{}]: {}", key, e.kind(), e);
                        anyhow::bail!("Processing failed for {} [{}]: {}", key, e.kind(), e);
                    }
                    warn!("Failed to process {} [{}]: {}", key, e.kind(), e);
                    results.push(ItemResult {
                        key,
                        outcome: None,
                        error: Some((e.kind(), e.to_string())),
                    });
                }
            }
            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(results)
    })
    .await??;

    if results.is_empty() {
        println!("{} No pending documents", style("ℹ").blue());
        return Ok(());
    }

    let records: Vec<ExtractionRecord> = results
        .iter()
        .filter_map(|r| match &r.outcome {
            Some(ProcessOutcome::Processed { record, .. }) => Some(record.clone()),
            _ => None,
        })
        .collect();
    let skipped = results
        .iter()
        .filter(|r| matches!(r.outcome, Some(ProcessOutcome::AlreadyProcessed { .. })))
        .count();
    let failed: Vec<&ItemResult> = results.iter().filter(|r| r.error.is_some()).collect();

    for item in &failed {
        if let Some((kind, message)) = &item.error {
            eprintln!("{} {} [{}]: {}", style("✗").red(), item.key, kind, message);
        }
    }

    if let Some(summary_path) = &args.summary {
        if let Some(parent) = summary_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut content = format_csv(&records)?;
        content.push('\n');
        fs::write(summary_path, content)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!("{}", style("Batch processing complete").bold());
    println!("  Processed: {}", style(records.len()).green());
    println!("  Skipped:   {}", style(skipped).yellow());
    println!("  Failed:    {}", style(failed.len()).red());
    println!("  Time:      {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
