//! Batch processing command for a set of card images.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use cardscan_core::{
    CardStore, ContactExtractor, ContactFields, ContactParser, NewContact, OcrEngine,
    SqliteCardStore,
};

use super::{
    CSV_HEADER, OutputFormat, format_fields, is_image_path, load_config, load_engine, open_store,
};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching card images
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each card
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Store every extracted card in the database
    #[arg(long)]
    save: bool,

    /// OCR language (overrides config)
    #[arg(short, long)]
    lang: Option<String>,

    /// Model directory (overrides config)
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Result of processing a single card.
struct ProcessResult {
    path: PathBuf,
    fields: Option<ContactFields>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(lang) = &args.lang {
        config.ocr.language = lang.clone();
    }
    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_image_path(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching images found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} cards to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(output_dir) = &args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let engine = load_engine(&config)?;
    let parser = ContactParser::new();
    let store = if args.save {
        Some(open_store(&config)?)
    } else {
        None
    };

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cards")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let result = process_single_card(
            &path,
            &engine,
            &parser,
            store.as_ref(),
            &config.ocr.language,
        );
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok(fields) => results.push(ProcessResult {
                path,
                fields: Some(fields),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if !args.continue_on_error {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed: {}", error_msg);
                }

                warn!("Failed to process {}: {}", path.display(), error_msg);
                results.push(ProcessResult {
                    path,
                    fields: None,
                    error: Some(error_msg),
                    processing_time_ms,
                });
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.fields.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            let Some(fields) = &result.fields else {
                continue;
            };
            let stem = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("card");
            let output_path = output_dir.join(format!("{}.{}", stem, args.format.extension()));

            fs::write(&output_path, format_fields(fields, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} cards in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed cards:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_card(
    path: &Path,
    engine: &dyn OcrEngine,
    parser: &ContactParser,
    store: Option<&SqliteCardStore>,
    language: &str,
) -> anyhow::Result<ContactFields> {
    let ocr_result = engine
        .recognize(path, language)
        .map_err(|e| anyhow::anyhow!("OCR failed: {}", e))?;

    debug!(
        "{}: {} text boxes in {}ms",
        path.display(),
        ocr_result.boxes.len(),
        ocr_result.processing_time_ms
    );

    let fields = parser.extract(&ocr_result);

    if let Some(store) = store {
        store.insert(NewContact::new(fields.clone(), path.display().to_string()))?;
    }

    Ok(fields)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec!["filename", "status"];
    header.extend(CSV_HEADER);
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time = result.processing_time_ms.to_string();

        match &result.fields {
            Some(fields) => wtr.write_record([
                filename,
                "success",
                &fields.name,
                &fields.job_title,
                &fields.company_name,
                &fields.email,
                &fields.phone_number,
                &fields.address,
                &time,
                "",
            ])?,
            None => wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                &time,
                result.error.as_deref().unwrap_or(""),
            ])?,
        }
    }

    wtr.flush()?;
    Ok(())
}
