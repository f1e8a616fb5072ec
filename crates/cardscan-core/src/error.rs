//! Error types for the cardscan-core library.
//!
//! Field extraction is total and has no error type; every failure comes from
//! the collaborators around it.

use thiserror::Error;

/// Main error type for the cardscan library.
#[derive(Error, Debug)]
pub enum CardscanError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Card storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The engine has no recognition model for the requested language.
    #[error("unsupported OCR language: {0}")]
    UnsupportedLanguage(String),

    /// The image could not be read or decoded.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Text detection or recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),
}

/// Errors related to card storage.
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite error.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Failed to create the database directory.
    #[error("failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    /// A store lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Result type for the cardscan library.
pub type Result<T> = std::result::Result<T, CardscanError>;
