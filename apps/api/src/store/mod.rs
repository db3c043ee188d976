//! Document store — the persistence boundary.
//!
//! The hosted document database is an external collaborator; this module
//! exposes it as an injectable `DocumentStore` trait over generic
//! string-keyed documents, with a Postgres/JSONB implementation as the
//! production backend. Tests substitute the in-memory fake.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;

pub mod document;
#[cfg(test)]
pub mod memory;

pub use document::Document;

/// Top-level collection names.
pub const USERS: &str = "users";
pub const ROADMAPS: &str = "careerRoadmaps";
pub const ADMINS: &str = "admins";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("store backend error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Key-value/document operations against the store.
///
/// Write semantics follow the store's idioms: `set` is a full-document
/// replace, `merge` is merge-on-write (used for roadmap updates).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError>;

    async fn merge(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError>;

    /// First document whose top-level `field` equals `value` (limit 1).
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError>;

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// Postgres-backed document store. Documents live in a single `documents`
/// table keyed by (collection, id) with a JSONB payload.
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row: Option<Value> = sqlx::query_scalar(
            "SELECT doc FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_document).transpose()
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, doc)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE SET doc = EXCLUDED.doc
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(doc))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, doc)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE SET doc = documents.doc || EXCLUDED.doc
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(Value::Object(doc))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError> {
        let row: Option<Value> = sqlx::query_scalar(
            "SELECT doc FROM documents WHERE collection = $1 AND doc->>$2 = $3 LIMIT 1",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_document).transpose()
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn into_document(value: Value) -> Result<Document, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Malformed(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}
