//! SQLite card store.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::models::contact::{ContactFields, ContactRecord, NewContact};

use super::{CardStore, Page, Result};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cards (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    name         TEXT NOT NULL DEFAULT '',
    job_title    TEXT NOT NULL DEFAULT '',
    company_name TEXT NOT NULL DEFAULT '',
    email        TEXT NOT NULL DEFAULT '',
    phone_number TEXT NOT NULL DEFAULT '',
    address      TEXT NOT NULL DEFAULT '',
    image        TEXT NOT NULL DEFAULT '',
    created_at   TEXT NOT NULL
);
";

/// Card store backed by a single SQLite connection.
pub struct SqliteCardStore {
    conn: Mutex<Connection>,
}

impl SqliteCardStore {
    /// Open (or create) a database file.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StoreError::CreateDir)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        info!("Opened card database at {}", path.display());
        Self::with_connection(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<ContactRecord> {
        let created_at: String = row.get(8)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?
            .with_timezone(&Utc);

        Ok(ContactRecord {
            id: row.get(0)?,
            fields: ContactFields {
                name: row.get(1)?,
                job_title: row.get(2)?,
                company_name: row.get(3)?,
                email: row.get(4)?,
                phone_number: row.get(5)?,
                address: row.get(6)?,
            },
            image: row.get(7)?,
            created_at,
        })
    }
}

impl CardStore for SqliteCardStore {
    fn insert(&self, card: NewContact) -> Result<ContactRecord> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let created_at = Utc::now();
        let fields = &card.fields;

        conn.execute(
            "INSERT INTO cards (name, job_title, company_name, email, phone_number, address, image, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                fields.name,
                fields.job_title,
                fields.company_name,
                fields.email,
                fields.phone_number,
                fields.address,
                card.image,
                created_at.to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        debug!("Stored card {}", id);

        Ok(ContactRecord {
            id,
            fields: card.fields,
            image: card.image,
            created_at,
        })
    }

    fn list(&self, page: Page) -> Result<Vec<ContactRecord>> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let mut stmt = conn.prepare(
            "SELECT id, name, job_title, company_name, email, phone_number, address, image, created_at
             FROM cards ORDER BY id LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt.query_map(params![i64::from(page.limit), offset], Self::map_row)?;

        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;

        debug!(
            "Listed {} cards (page {}, limit {})",
            records.len(),
            page.page,
            page.limit
        );
        Ok(records)
    }

    fn count(&self) -> Result<u64> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn card(n: usize) -> NewContact {
        NewContact::new(
            ContactFields {
                name: format!("Person {}", n),
                email: format!("p{}@example.com", n),
                ..Default::default()
            },
            format!("/uploads/{}", n),
        )
    }

    #[test]
    fn test_insert_and_list() {
        let store = SqliteCardStore::open_in_memory().unwrap();
        let stored = store.insert(card(1)).unwrap();

        assert_eq!(stored.id, 1);

        let listed = store.list(Page::default()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].fields, stored.fields);
        assert_eq!(listed[0].image, "/uploads/1");
        assert_eq!(listed[0].fields.job_title, "");
        assert_eq!(
            listed[0].created_at.timestamp_micros(),
            stored.created_at.timestamp_micros()
        );
    }

    #[test]
    fn test_second_page() {
        let store = SqliteCardStore::open_in_memory().unwrap();
        for n in 1..=20 {
            store.insert(card(n)).unwrap();
        }

        let page = store.list(Page::new(2, 10)).unwrap();
        let names: Vec<_> = page.iter().map(|r| r.fields.name.clone()).collect();
        let expected: Vec<_> = (11..=20).map(|n| format!("Person {}", n)).collect();

        assert_eq!(names, expected);
        assert_eq!(store.count().unwrap(), 20);
    }

    #[test]
    fn test_reopen_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("cards.db");

        {
            let store = SqliteCardStore::open(&path).unwrap();
            store.insert(card(1)).unwrap();
            store.insert(card(2)).unwrap();
        }

        let store = SqliteCardStore::open(&path).unwrap();
        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.insert(card(3)).unwrap().id, 3);
    }
}
