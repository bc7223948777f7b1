//! Bulk loading of result records into a document store.
//!
//! Each record becomes one JSON document. The SQLite backend keeps all
//! collections in a single `documents` table.

use std::path::Path;

use rusqlite::{params, Connection};
use serde_json::Value;

use crate::error::FigcapError;
use crate::model::ResultTable;

/// Collection name used when none is configured.
pub const DEFAULT_COLLECTION: &str = "figures";

pub trait DocumentStore {
    /// Insert all documents into `collection`, returning how many were written.
    fn insert_many(&mut self, collection: &str, docs: &[Value]) -> Result<usize, FigcapError>;
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, FigcapError> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, FigcapError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, FigcapError> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                collection TEXT NOT NULL,
                body TEXT NOT NULL,          -- one JSON document
                inserted_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
            ",
        )?;
        Ok(SqliteStore { conn })
    }

    pub fn count(&self, collection: &str) -> Result<usize, FigcapError> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    /// Documents of a collection in insertion order.
    pub fn documents(&self, collection: &str) -> Result<Vec<Value>, FigcapError> {
        let mut stmt = self
            .conn
            .prepare("SELECT body FROM documents WHERE collection = ?1 ORDER BY id")?;
        let bodies = stmt
            .query_map(params![collection], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        bodies
            .iter()
            .map(|b| serde_json::from_str(b).map_err(FigcapError::from))
            .collect()
    }
}

impl DocumentStore for SqliteStore {
    fn insert_many(&mut self, collection: &str, docs: &[Value]) -> Result<usize, FigcapError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO documents (collection, body) VALUES (?1, ?2)")?;
            for doc in docs {
                stmt.execute(params![collection, serde_json::to_string(doc)?])?;
            }
        }
        tx.commit()?;
        Ok(docs.len())
    }
}

/// Insert every record of `table` into `collection` as a key-value document.
pub fn load_table(
    store: &mut dyn DocumentStore,
    collection: &str,
    table: &ResultTable,
) -> Result<usize, FigcapError> {
    let docs = table
        .records()
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    store.insert_many(collection, &docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FigureRecord;

    fn table() -> ResultTable {
        vec![
            FigureRecord::new("PMC1", "F1", ["a".to_string()].into_iter().collect(), None),
            FigureRecord::new("PMC2", "F1", Default::default(), Some("g.jpg".into())),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn loads_records_as_documents() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(load_table(&mut store, DEFAULT_COLLECTION, &table()).unwrap(), 2);
        assert_eq!(store.count(DEFAULT_COLLECTION).unwrap(), 2);
        assert_eq!(store.count("other").unwrap(), 0);

        let docs = store.documents(DEFAULT_COLLECTION).unwrap();
        assert_eq!(docs[0]["pmcid"], "PMC1");
        assert_eq!(docs[1]["url_ref"], "g.jpg");
    }

    #[test]
    fn empty_table_inserts_nothing() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(load_table(&mut store, "c", &ResultTable::new()).unwrap(), 0);
        assert_eq!(store.count("c").unwrap(), 0);
    }

    #[test]
    fn persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            load_table(&mut store, "c", &table()).unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(store.count("c").unwrap(), 2);
    }
}
