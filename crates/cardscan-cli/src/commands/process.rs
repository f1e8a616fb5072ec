//! Process command - extract contact details from a single card image.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use cardscan_core::{CardStore, ContactParser, NewContact, OcrEngine};

use super::{OutputFormat, format_fields, is_image_path, load_config, load_engine, open_store};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Card image (PNG, JPEG, WebP, TIFF, BMP)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// OCR language (overrides config)
    #[arg(short, long)]
    lang: Option<String>,

    /// Model directory (overrides config)
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Store the extracted card in the database
    #[arg(long)]
    save: bool,

    /// Show which line each field came from
    #[arg(long)]
    show_sources: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(lang) = &args.lang {
        config.ocr.language = lang.clone();
    }
    if let Some(model_dir) = &args.model_dir {
        config.ocr.model_dir = model_dir.clone();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if !is_image_path(&args.input) {
        anyhow::bail!("Unsupported file format: {}", args.input.display());
    }

    info!("Processing card: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Loading OCR models...");
    pb.set_position(10);
    let engine = load_engine(&config)?;

    pb.set_message("Running OCR...");
    pb.set_position(30);
    let ocr_result = engine
        .recognize(&args.input, &config.ocr.language)
        .map_err(|e| anyhow::anyhow!("OCR failed: {}", e))?;

    debug!(
        "OCR detected {} text boxes in {}ms",
        ocr_result.boxes.len(),
        ocr_result.processing_time_ms
    );

    pb.set_message("Extracting contact details...");
    pb.set_position(70);
    let result = ContactParser::new().parse(&ocr_result.text);

    if args.save {
        pb.set_message("Saving card...");
        pb.set_position(90);
        let store = open_store(&config)?;
        let record = store.insert(NewContact::new(
            result.fields.clone(),
            args.input.display().to_string(),
        ))?;
        info!("Stored card {}", record.id);
    }

    pb.finish_and_clear();

    for warning in &result.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
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

    if args.show_sources {
        eprintln!();
        for source in &result.sources {
            eprintln!(
                "{} {} from line {}: {}",
                style("ℹ").blue(),
                source.field.label(),
                source.line + 1,
                source.text
            );
        }
        eprintln!(
            "{} OCR time: {}ms",
            style("ℹ").blue(),
            ocr_result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
