//! HTTP API for uploading business cards and listing stored cards.
//!
//! # Endpoints
//!
//! - `POST /upload` - OCR an uploaded card image (multipart field `file`), store
//!   it and return the extracted fields
//! - `GET /cards?page=&limit=` - List stored cards in insertion order
//! - `GET /uploads/{file}` - Uploaded images
//! - `GET /health` - Health check
//!
//! # cURL Examples
//!
//! ```bash
//! curl -F "file=@card.jpg" http://localhost:5000/upload
//! curl "http://localhost:5000/cards?page=2&limit=10"
//! ```

mod error;
mod handlers;
mod server;
mod types;

pub use error::ApiError;
pub use server::{create_router, serve};
pub use types::{ApiState, HealthResponse, ListQuery};
