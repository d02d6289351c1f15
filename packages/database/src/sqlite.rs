//! `SQLite`-backed document store.
//!
//! All collections share a single `documents` table. Bodies are stored
//! as JSON text and field lookups go through `json_extract`.

use std::path::Path;

use async_trait::async_trait;
use moosicbox_json_utils::database::ToValue as _;
use serde_json::Value;
use switchy_database::{Database, DatabaseValue};
use switchy_database_connection::init_sqlite_rusqlite;

use crate::{Document, DocumentStore, StoreError, new_document_id};

/// A [`DocumentStore`] persisted in a local `SQLite` file.
pub struct SqliteStore {
    db: Box<dyn Database>,
}

impl SqliteStore {
    /// Opens (or creates) the store at `path` and ensures the schema
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the parent directory cannot be created,
    /// the database cannot be opened, or schema creation fails.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let db = init_sqlite_rusqlite(Some(path)).map_err(|e| StoreError::Connection {
            message: e.to_string(),
        })?;

        ensure_schema(db.as_ref()).await?;

        log::debug!("Opened document store at {}", path.display());

        Ok(Self { db })
    }
}

async fn ensure_schema(db: &dyn Database) -> Result<(), StoreError> {
    db.exec_raw(
        "CREATE TABLE IF NOT EXISTS documents (
            collection  TEXT NOT NULL,
            id          TEXT NOT NULL,
            body        TEXT NOT NULL,
            PRIMARY KEY (collection, id)
        )",
    )
    .await?;

    db.exec_raw("CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents (collection)")
        .await?;

    Ok(())
}

fn parse_documents(rows: &[switchy_database::Row]) -> Result<Vec<Document>, StoreError> {
    let mut documents = Vec::with_capacity(rows.len());
    for row in rows {
        let id: String = row.to_value("id").map_err(|e| StoreError::Conversion {
            message: format!("Failed to parse document id: {e}"),
        })?;
        let body: String = row.to_value("body").map_err(|e| StoreError::Conversion {
            message: format!("Failed to parse body of document {id}: {e}"),
        })?;
        documents.push(Document {
            id,
            data: serde_json::from_str(&body)?,
        });
    }
    Ok(documents)
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn find(
        &self,
        collection: &str,
        field_path: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let rows = self
            .db
            .query_raw_params(
                "SELECT id, body FROM documents
                 WHERE collection = $1 AND json_extract(body, $2) = $3
                 ORDER BY rowid",
                &[
                    DatabaseValue::String(collection.to_string()),
                    DatabaseValue::String(format!("$.{field_path}")),
                    DatabaseValue::String(value.to_string()),
                ],
            )
            .await?;

        parse_documents(&rows)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let rows = self
            .db
            .query_raw_params(
                "SELECT id, body FROM documents WHERE collection = $1 AND id = $2",
                &[
                    DatabaseValue::String(collection.to_string()),
                    DatabaseValue::String(id.to_string()),
                ],
            )
            .await?;

        Ok(parse_documents(&rows)?.into_iter().next())
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<(), StoreError> {
        self.db
            .exec_raw_params(
                "INSERT INTO documents (collection, id, body)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (collection, id) DO UPDATE SET body = excluded.body",
                &[
                    DatabaseValue::String(collection.to_string()),
                    DatabaseValue::String(id.to_string()),
                    DatabaseValue::String(serde_json::to_string(&data)?),
                ],
            )
            .await?;

        Ok(())
    }

    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let id = new_document_id();

        self.db
            .exec_raw_params(
                "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)",
                &[
                    DatabaseValue::String(collection.to_string()),
                    DatabaseValue::String(id.clone()),
                    DatabaseValue::String(serde_json::to_string(&data)?),
                ],
            )
            .await?;

        Ok(id)
    }

    async fn all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows = self
            .db
            .query_raw_params(
                "SELECT id, body FROM documents WHERE collection = $1 ORDER BY rowid",
                &[DatabaseValue::String(collection.to_string())],
            )
            .await?;

        parse_documents(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn persists_and_queries_documents() {
        let tmp =
            std::env::temp_dir().join(format!("tally_sqlite_store_test_{}", new_document_id()));
        let _ = std::fs::remove_dir_all(&tmp);

        let store = SqliteStore::open(&tmp.join("store.db")).await.unwrap();

        let id = store
            .add(
                "surveys",
                json!({ "locality": { "state": "texas", "city": "austin" } }),
            )
            .await
            .unwrap();
        store
            .add(
                "surveys",
                json!({ "locality": { "state": "ohio", "city": "dayton" } }),
            )
            .await
            .unwrap();

        let found = store
            .find("surveys", "locality.state", "texas")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);

        store
            .set("localities_states", "texas", json!({ "value": "texas" }))
            .await
            .unwrap();
        store
            .set("localities_states", "texas", json!({ "value": "texas" }))
            .await
            .unwrap();
        assert_eq!(store.all("localities_states").await.unwrap().len(), 1);

        let doc = store.get("localities_states", "texas").await.unwrap();
        assert_eq!(doc.unwrap().data, json!({ "value": "texas" }));
        assert!(store.get("localities_states", "ohio").await.unwrap().is_none());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn undecodable_id_is_an_error() {
        let tmp =
            std::env::temp_dir().join(format!("tally_sqlite_store_test_{}", new_document_id()));
        let store = SqliteStore::open(&tmp.join("store.db")).await.unwrap();

        let rows = store
            .db
            .query_raw_params("SELECT NULL AS id, '{}' AS body", &[])
            .await
            .unwrap();
        let err = parse_documents(&rows).unwrap_err();
        assert!(matches!(err, StoreError::Conversion { .. }), "{err}");

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
