//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use image::GenericImageView;
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{is_latin_language, load_image, OcrEngine, OcrResult, TextBox};

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
///
/// Only the Latin recognition model is loaded, so language hints outside
/// [`super::LATIN_LANGUAGES`] are rejected.
pub struct PureOcrEngine {
    engine: Mutex<pure_onnx_ocr::engine::OcrEngine>,
    config: OcrConfig,
}

impl PureOcrEngine {
    /// Create an engine from the model files named in the configuration.
    pub fn from_config(config: OcrConfig) -> Result<Self, OcrError> {
        let det_path = config.model_path(&config.detection_model);
        let rec_path = config.model_path(&config.recognition_model);
        let dict_path = config.model_path(&config.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", config.model_dir.display());

        Ok(Self {
            engine: Mutex::new(engine),
            config,
        })
    }

    /// Create an engine from model files in a directory, using default file names.
    pub fn from_dir(model_dir: &Path) -> Result<Self, OcrError> {
        Self::from_config(OcrConfig {
            model_dir: model_dir.to_path_buf(),
            ..OcrConfig::default()
        })
    }
}

impl OcrEngine for PureOcrEngine {
    fn recognize(&self, image_path: &Path, language: &str) -> Result<OcrResult, OcrError> {
        if !is_latin_language(language) {
            return Err(OcrError::UnsupportedLanguage(language.to_string()));
        }

        let start = Instant::now();
        let image = load_image(image_path)?;
        let (width, height) = image.dimensions();

        info!(
            "Processing {} ({}x{}, language {})",
            image_path.display(),
            width,
            height,
            language
        );

        let results = {
            let engine = self.engine.lock().map_err(|_| {
                OcrError::Recognition("OCR engine lock poisoned".to_string())
            })?;
            engine
                .run_from_image(&image)
                .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?
        };

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let boxes: Vec<TextBox> = results
            .iter()
            .map(|r| {
                let text = if self.config.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                TextBox {
                    bbox: polygon_to_bbox(&r.bounding_box),
                    text,
                    score: r.confidence,
                }
            })
            .collect();

        let mut result = OcrResult {
            boxes,
            text: String::new(),
            processing_time_ms: 0,
            image_size: (width, height),
        };
        result.sort_by_reading_order();
        result.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            "OCR complete: {} text boxes in {}ms",
            result.boxes.len(),
            result.processing_time_ms
        );

        Ok(result)
    }

    fn name(&self) -> &str {
        "pure-onnx-ocr"
    }
}

/// Convert a `Polygon<f64>` to our `[f32; 8]` bbox format.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_models() {
        let dir = tempfile::tempdir().unwrap();
        let result = PureOcrEngine::from_dir(dir.path());
        assert!(matches!(result, Err(OcrError::ModelLoad(_))));
    }
}
