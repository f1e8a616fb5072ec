//! Card storage with paginated listing.

mod memory;
mod sqlite;

pub use memory::MemoryCardStore;
pub use sqlite::SqliteCardStore;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::contact::{ContactRecord, NewContact};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Persists scanned cards and lists them in insertion order.
pub trait CardStore: Send + Sync {
    /// Store a card, assigning its id and creation time.
    fn insert(&self, card: NewContact) -> Result<ContactRecord>;

    /// List one page of cards in insertion order.
    fn list(&self, page: Page) -> Result<Vec<ContactRecord>>;

    /// Number of stored cards.
    fn count(&self) -> Result<u64>;
}

/// A 1-based page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page number, starting at 1.
    pub page: u32,
    /// Records per page.
    pub limit: u32,
}

impl Page {
    /// Create a page. Page and limit below 1 are raised to 1.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    /// Cap the page size.
    pub fn clamp_limit(self, max_limit: u32) -> Self {
        Self {
            limit: self.limit.min(max_limit.max(1)),
            ..self
        }
    }

    /// Number of records before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, 10)
    }
}
