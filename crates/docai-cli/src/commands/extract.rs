//! Extract command - run field extraction on a saved provider response.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::Args;
use console::style;
use tracing::{debug, error};

use docai_core::extract::{rank_form_fields, FieldClassifier, KeywordFilter, LabeledValue};
use docai_core::models::record::ExtractionRecord;
use docai_core::{DocaiError, Document};

use super::config::load_config;
use super::process::{format_record, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Document JSON file (a bare document or a `{"document": ...}` response)
    #[arg(required = true)]
    input: PathBuf,

    /// Override the keyword vocabulary (comma separated)
    #[arg(short, long, value_delimiter = ',')]
    keywords: Option<Vec<String>>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also list the fields that passed the keyword filter
    #[arg(long)]
    show_fields: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let document = read_document(&args.input)?;
    debug!(
        "Loaded document with {} chars and {} form fields",
        document.text.len(),
        document.form_field_count()
    );

    let keywords = args.keywords.unwrap_or(config.extraction.keywords);
    let filter = KeywordFilter::new(&keywords)?;

    let ranked = rank_form_fields(&document);
    let pairs = match filter
        .filter(&ranked, &document)
        .collect::<Result<Vec<LabeledValue>, _>>()
    {
        Ok(pairs) => pairs,
        Err(e) => return Err(report(DocaiError::from(e))),
    };

    if args.show_fields {
        for pair in &pairs {
            eprintln!(
                "{} [{}] {:?} = {:?}",
                style("•").dim(),
                pair.offset,
                pair.name,
                pair.value
            );
        }
    }

    let fields = FieldClassifier::new()
        .classify(pairs)
        .map_err(|e| report(DocaiError::from(e)))?;

    let filename = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let record = ExtractionRecord::new(&fields, filename, Local::now().date_naive());

    println!("{}", format_record(&record, args.format)?);
    Ok(())
}

fn read_document(path: &Path) -> anyhow::Result<Document> {
    let content = fs::read_to_string(path)?;
    let mut value: serde_json::Value = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("{} is not valid JSON: {}", path.display(), e))?;

    if value.get("document").is_some() {
        value = value["document"].take();
    }
    Ok(serde_json::from_value(value)?)
}

fn report(e: DocaiError) -> anyhow::Error {
    error!("Extraction failed [{}]: {}", e.kind(), e);
    anyhow::anyhow!("extraction failed [{}]: {}", e.kind(), e)
}
