//! In-memory card store.

use std::sync::Mutex;

use chrono::Utc;
use tracing::debug;

use crate::error::StoreError;
use crate::models::contact::{ContactRecord, NewContact};

use super::{CardStore, Page, Result};

/// Card store keeping records in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryCardStore {
    records: Mutex<Vec<ContactRecord>>,
}

impl MemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CardStore for MemoryCardStore {
    fn insert(&self, card: NewContact) -> Result<ContactRecord> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;

        let record = ContactRecord {
            id: records.len() as i64 + 1,
            fields: card.fields,
            image: card.image,
            created_at: Utc::now(),
        };
        records.push(record.clone());

        debug!("Stored card {} in memory", record.id);
        Ok(record)
    }

    fn list(&self, page: Page) -> Result<Vec<ContactRecord>> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;

        Ok(records
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    fn count(&self) -> Result<u64> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.len() as u64)
    }
}
