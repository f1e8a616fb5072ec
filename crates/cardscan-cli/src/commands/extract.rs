//! Extract command - run field extraction on already recognized text.

use std::io::Read;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::debug;

use cardscan_core::ContactParser;

use super::{OutputFormat, format_fields};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Text file to read (default: stdin)
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show which line each field came from
    #[arg(long)]
    show_sources: bool,
}

pub async fn run(args: ExtractArgs) -> anyhow::Result<()> {
    let text = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let result = ContactParser::new().parse(&text);
    debug!(
        "Extracted {} of 6 fields in {}ms",
        result.sources.len(),
        result.processing_time_ms
    );

    println!("{}", format_fields(&result.fields, args.format)?);

    if args.show_sources {
        for source in &result.sources {
            eprintln!(
                "{} {} from line {}: {}",
                style("ℹ").blue(),
                source.field.label(),
                source.line + 1,
                source.text
            );
        }
        for warning in &result.warnings {
            eprintln!("{} {}", style("!").yellow(), warning);
        }
    }

    Ok(())
}
