//! Contact field extraction.

mod parser;
pub mod rules;

pub use parser::{candidate_lines, ContactParser, ExtractionResult, FieldSource};

use crate::models::contact::ContactFields;
use crate::ocr::OcrResult;

/// Trait for contact field extractors.
///
/// Extraction never fails: text without recognizable fields gives empty values.
pub trait ContactExtractor {
    /// Extract contact fields from an OCR result.
    fn extract(&self, ocr_result: &OcrResult) -> ContactFields;

    /// Extract contact fields from plain text.
    fn extract_from_text(&self, text: &str) -> ContactFields;
}
