//! Configuration structures for the cardscan pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CardscanError, Result};

/// Main configuration for cardscan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardscanConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Card and upload storage configuration.
    pub storage: StorageConfig,

    /// HTTP server configuration.
    pub server: ServerConfig,

    /// Card listing configuration.
    pub listing: ListingConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Language hint passed to the engine (ISO 639-2, e.g. "eng").
    pub language: String,

    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text instead of blanking them.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }

    /// Whether the detection and recognition models are present on disk.
    pub fn models_available(&self) -> bool {
        self.model_path(&self.detection_model).exists()
            && self.model_path(&self.recognition_model).exists()
    }
}

/// Card and upload storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// Directory uploaded card images are written to and served from.
    pub upload_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("cardscan.db"),
            upload_dir: PathBuf::from("uploads"),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: String,

    /// Port to bind.
    pub port: u16,

    /// Maximum request body size for uploads.
    pub max_upload_bytes: usize,

    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            max_upload_bytes: 10 * 1024 * 1024,
            cors_origins: Vec::new(),
        }
    }
}

/// Card listing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Page size used when a request gives none.
    pub default_limit: u32,

    /// Largest page size a request may ask for.
    pub max_limit: u32,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl CardscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| CardscanError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CardscanError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply overrides from process environment variables.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Recognized keys: `PORT`, `CARDSCAN_HOST`, `CARDSCAN_DATABASE`,
    /// `CARDSCAN_UPLOAD_DIR`, `CARDSCAN_MODEL_DIR`, `CARDSCAN_OCR_LANGUAGE`.
    /// Unparseable values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => debug!("Ignoring invalid PORT value '{}'", port),
            }
        }
        if let Some(host) = lookup("CARDSCAN_HOST") {
            self.server.host = host;
        }
        if let Some(path) = lookup("CARDSCAN_DATABASE") {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("CARDSCAN_UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(path);
        }
        if let Some(path) = lookup("CARDSCAN_MODEL_DIR") {
            self.ocr.model_dir = PathBuf::from(path);
        }
        if let Some(language) = lookup("CARDSCAN_OCR_LANGUAGE") {
            self.ocr.language = language;
        }
    }
}
