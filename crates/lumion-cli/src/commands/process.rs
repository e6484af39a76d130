//! Process command - extract data from a single bill.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use lumion_core::models::config::LumionConfig;
use lumion_core::{ExtractionResult, InvoicePipeline, InvoiceStore};

use super::output::{format_fields, OutputFormat};
use super::{load_config, open_store};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or plain text already extracted from a bill)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Save the extracted record (and the PDF) to the store
    #[arg(long)]
    store: bool,

    /// List fields whose label was not found
    #[arg(long)]
    show_missing: bool,
}

/// Supported input kinds.
pub enum InputKind {
    Pdf,
    Text,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Some(InputKind::Pdf),
            "txt" => Some(InputKind::Text),
            _ => None,
        }
    }
}

/// Bill extracted from one input file, with the PDF bytes when it was a PDF.
pub struct ProcessedFile {
    pub result: ExtractionResult,
    pub pdf: Option<Vec<u8>>,
}

/// Read and extract one file.
pub fn process_file(pipeline: &InvoicePipeline, path: &Path) -> anyhow::Result<ProcessedFile> {
    match InputKind::from_path(path) {
        Some(InputKind::Pdf) => {
            let data = fs::read(path)?;
            let result = pipeline.process_pdf(&data)?;
            Ok(ProcessedFile { result, pdf: Some(data) })
        }
        Some(InputKind::Text) => {
            let text = fs::read_to_string(path)?;
            Ok(ProcessedFile {
                result: pipeline.process_text(&text),
                pdf: None,
            })
        }
        None => anyhow::bail!("Unsupported file format: {}", path.display()),
    }
}

/// Save a processed file to the store, returning the new record id.
pub fn store_file(config: &LumionConfig, path: &Path, processed: &ProcessedFile) -> anyhow::Result<u64> {
    let store = open_store(config)?;
    let pdf = if config.store.keep_pdf { processed.pdf.as_deref() } else { None };
    let source_name = path.file_name().and_then(|n| n.to_str());

    let record = store.save(&processed.result.fields, pdf, source_name)?;
    debug!("Saved record {} under {}", record.id, store.root().display());
    Ok(record.id)
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message("Extracting bill fields...");

    let pipeline = InvoicePipeline::new(&config);
    let processed = process_file(&pipeline, &args.input)?;

    pb.finish_and_clear();

    let result = &processed.result;
    if !result.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    if args.show_missing && !result.missing_fields.is_empty() {
        eprintln!("{}", style("Missing fields (fallback used):").yellow());
        for field in &result.missing_fields {
            eprintln!("  - {}", field);
        }
    }

    if args.store {
        let id = store_file(&config, &args.input, &processed)?;
        eprintln!("{} Stored as invoice #{}", style("✓").green(), id);
    }

    let output = format_fields(&result.fields, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
