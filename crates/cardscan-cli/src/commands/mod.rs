//! CLI subcommands and the helpers they share.

pub mod batch;
pub mod cards;
pub mod config;
pub mod extract;
pub mod process;
pub mod serve;

use std::path::{Path, PathBuf};

use tracing::debug;

use cardscan_core::{CardscanConfig, ContactFields, PureOcrEngine, SqliteCardStore};

/// Output format for extracted contacts.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub const CSV_HEADER: [&str; 6] = [
    "name",
    "jobTitle",
    "companyName",
    "email",
    "phoneNumber",
    "address",
];

/// Image extensions accepted for scanning.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "tiff", "tif", "bmp"];

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cardscan")
        .join("config.json")
}

/// Load configuration from `--config`, else the default file if present,
/// else defaults; then apply environment overrides.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CardscanConfig> {
    let mut config = match config_path {
        Some(path) => CardscanConfig::from_file(Path::new(path))?,
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                debug!("Loading config from {}", default_path.display());
                CardscanConfig::from_file(&default_path)?
            } else {
                CardscanConfig::default()
            }
        }
    };

    config.apply_env();
    Ok(config)
}

/// Load the OCR engine, failing with a hint when models are missing.
pub fn load_engine(config: &CardscanConfig) -> anyhow::Result<PureOcrEngine> {
    if !config.ocr.models_available() {
        anyhow::bail!(
            "OCR models not found at {}.\n\n\
             Place {}, {} and {} there, or set ocr.model_dir / CARDSCAN_MODEL_DIR.",
            config.ocr.model_dir.display(),
            config.ocr.detection_model,
            config.ocr.recognition_model,
            config.ocr.dictionary
        );
    }

    debug!("Using models from {}", config.ocr.model_dir.display());
    PureOcrEngine::from_config(config.ocr.clone())
        .map_err(|e| anyhow::anyhow!("Failed to load OCR models: {}", e))
}

/// Open the card database named in the configuration.
pub fn open_store(config: &CardscanConfig) -> anyhow::Result<SqliteCardStore> {
    Ok(SqliteCardStore::open(&config.storage.database_path)?)
}

/// Whether a path has a supported image extension.
pub fn is_image_path(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str())
}

pub fn format_fields(fields: &ContactFields, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(fields)?),
        OutputFormat::Csv => format_csv(fields),
        OutputFormat::Text => Ok(format_text(fields)),
    }
}

fn csv_row(fields: &ContactFields) -> [&str; 6] {
    [
        &fields.name,
        &fields.job_title,
        &fields.company_name,
        &fields.email,
        &fields.phone_number,
        &fields.address,
    ]
}

fn format_csv(fields: &ContactFields) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(CSV_HEADER)?;
    wtr.write_record(csv_row(fields))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(fields: &ContactFields) -> String {
    let mut output = String::new();

    output.push_str(&format!("Name:    {}\n", fields.name));
    output.push_str(&format!("Title:   {}\n", fields.job_title));
    output.push_str(&format!("Company: {}\n", fields.company_name));
    output.push_str(&format!("Email:   {}\n", fields.email));
    output.push_str(&format!("Phone:   {}\n", fields.phone_number));
    output.push_str(&format!("Address: {}\n", fields.address));

    output
}
