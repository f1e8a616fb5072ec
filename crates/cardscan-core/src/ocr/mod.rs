//! OCR engine seam and result types.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use std::path::Path;

use image::{DynamicImage, ImageReader};
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Language hints the Latin recognition model can read.
pub const LATIN_LANGUAGES: &[&str] = &[
    "eng", "deu", "fra", "spa", "ita", "por", "nld", "pol", "ces", "dan", "fin", "swe", "nor",
];

/// Whether a language hint is served by the Latin recognition model.
pub fn is_latin_language(language: &str) -> bool {
    LATIN_LANGUAGES
        .iter()
        .any(|l| l.eq_ignore_ascii_case(language.trim()))
}

/// Recognizes text in a card image.
pub trait OcrEngine: Send + Sync {
    /// Run OCR on the image at `image_path` with a language hint such as `"eng"`.
    fn recognize(&self, image_path: &Path, language: &str) -> Result<OcrResult, OcrError>;

    /// Engine name for logs.
    fn name(&self) -> &str;
}

/// Open and decode an image, sniffing the format from its content.
///
/// Uploaded files are stored without a trusted extension, so the format
/// cannot be taken from the path.
pub fn load_image(path: &Path) -> Result<DynamicImage, OcrError> {
    ImageReader::open(path)
        .map_err(|e| OcrError::InvalidImage(format!("{}: {}", path.display(), e)))?
        .with_guessed_format()
        .map_err(|e| OcrError::InvalidImage(format!("{}: {}", path.display(), e)))?
        .decode()
        .map_err(|e| OcrError::InvalidImage(format!("{}: {}", path.display(), e)))
}

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence reported by the engine (0.0 - 1.0).
    pub score: f32,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrResult {
    /// Detected and recognized text boxes.
    pub boxes: Vec<TextBox>,

    /// Full text (boxes joined with newlines).
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Create an empty result.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            image_size: (width, height),
            ..Default::default()
        }
    }

    /// Wrap already recognized text with no box geometry.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Sort boxes by reading order (top-to-bottom, left-to-right).
    pub fn sort_by_reading_order(&mut self) {
        self.boxes.sort_by(|a, b| {
            let (ax, ay, _, _) = a.rect();
            let (bx, by, _, _) = b.rect();

            // Group by approximate vertical position (within 20 pixels)
            let row_a = (ay / 20.0) as i32;
            let row_b = (by / 20.0) as i32;

            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        self.text = self
            .boxes
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_box(text: &str, x: f32, y: f32) -> TextBox {
        TextBox {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 10.0, x, y + 10.0],
            text: text.to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn test_reading_order() {
        let mut result = OcrResult {
            boxes: vec![
                text_box("john@acme.com", 10.0, 100.0),
                text_box("Manager", 80.0, 42.0),
                text_box("John Smith", 10.0, 5.0),
                text_box("Senior", 10.0, 45.0),
            ],
            ..OcrResult::empty(200, 200)
        };

        result.sort_by_reading_order();
        assert_eq!(result.text, "John Smith\nSenior\nManager\njohn@acme.com");
    }

    #[test]
    fn test_latin_languages() {
        assert!(is_latin_language("eng"));
        assert!(is_latin_language(" ENG "));
        assert!(is_latin_language("pol"));
        assert!(!is_latin_language("jpn"));
        assert!(!is_latin_language(""));
    }

    #[test]
    fn test_load_image_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload");
        std::fs::write(&path, b"definitely not an image").unwrap();

        assert!(matches!(load_image(&path), Err(OcrError::InvalidImage(_))));
        assert!(matches!(
            load_image(&dir.path().join("missing")),
            Err(OcrError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_load_image_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("card.png");
        image::RgbImage::new(4, 3).save(&png).unwrap();

        let bare = dir.path().join("0f3a9c");
        std::fs::rename(&png, &bare).unwrap();

        let image = load_image(&bare).unwrap();
        assert_eq!((image.width(), image.height()), (4, 3));
    }
}
