//! Process command - run one document from the bucket end to end.

use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, error, info};

use docai_core::models::record::ExtractionRecord;
use docai_core::{DocumentProcessor, ProcessOutcome};

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Object key of the document (e.g. test-docai/invoice.pdf)
    #[arg(required = true)]
    key: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Processing {}", args.key);

    let key = args.key.clone();
    let result = tokio::task::spawn_blocking(move || {
        let processor = DocumentProcessor::from_config(&config)?;
        processor.process_item(&key)
    })
    .await?;

    debug!("Total processing time: {:?}", start.elapsed());

    match result {
        Ok(ProcessOutcome::Processed { record, archive_key }) => {
            println!("{}", format_record(&record, args.format)?);
            eprintln!(
                "{} {} archived to {}",
                style("✓").green(),
                args.key,
                archive_key
            );
            Ok(())
        }
        Ok(ProcessOutcome::AlreadyProcessed { filename }) => {
            eprintln!(
                "{} {} already processed, skipping",
                style("ℹ").blue(),
                filename
            );
            Ok(())
        }
        Err(e) => {
            error!("Failed to process {} [{}]: {}", args.key, e.kind(), e);
            anyhow::bail!("{} failed [{}]: {}", args.key, e.kind(), e)
        }
    }
}

pub fn format_record(record: &ExtractionRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(std::slice::from_ref(record)),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

pub fn format_csv(records: &[ExtractionRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    wtr.write_record(ExtractionRecord::COLUMNS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data.trim_end().to_string())
}

fn format_text(record: &ExtractionRecord) -> String {
    let date = if record.date.is_empty() { "-" } else { record.date.as_str() };
    format!(
        "File:   {}\nID:     {}\nDate:   {}\nLoaded: {}",
        record.filename, record.id, date, record.loaded_date
    )
}
