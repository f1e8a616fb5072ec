//! Core library for business card OCR processing.
//!
//! This crate provides:
//! - Contact field extraction from OCR text (name, job title, company, email, phone, address)
//! - OCR pipeline seam with a pure Rust engine backed by PaddleOCR models
//! - Card storage with paginated listing (SQLite or in-memory)
//! - An HTTP API for uploading cards and listing them (feature `api`)

pub mod error;
pub mod models;
pub mod ocr;
pub mod extract;
pub mod store;

#[cfg(feature = "api")]
pub mod api;

pub use error::{CardscanError, Result};
pub use models::contact::{ContactFields, ContactRecord, NewContact};
pub use models::config::CardscanConfig;
pub use ocr::{OcrEngine, OcrResult, TextBox};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use extract::{ContactExtractor, ContactParser, ExtractionResult};
pub use store::{CardStore, MemoryCardStore, Page, SqliteCardStore};
