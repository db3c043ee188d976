//! In-memory `DocumentStore` used by service-level tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::store::{Document, DocumentStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<(String, String), Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let map = self.inner.lock().await;
        Ok(map.get(&(collection.to_string(), id.to_string())).cloned())
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        let mut map = self.inner.lock().await;
        map.insert((collection.to_string(), id.to_string()), doc);
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        let mut map = self.inner.lock().await;
        let entry = map
            .entry((collection.to_string(), id.to_string()))
            .or_default();
        for (key, value) in doc {
            entry.insert(key, value);
        }
        Ok(())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Document>, StoreError> {
        let map = self.inner.lock().await;
        Ok(map
            .iter()
            .find(|((coll, _), doc)| {
                coll == collection && doc.get(field).and_then(Value::as_str) == Some(value)
            })
            .map(|(_, doc)| doc.clone()))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut map = self.inner.lock().await;
        map.remove(&(collection.to_string(), id.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let store = MemoryStore::new();
        store
            .set("users", "u1", doc(json!({"email": "a@b.c"})))
            .await
            .unwrap();
        let loaded = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(loaded.get("email"), Some(&json!("a@b.c")));
    }

    #[tokio::test]
    async fn test_merge_overlays_keys() {
        let store = MemoryStore::new();
        store
            .set("users", "u1", doc(json!({"a": 1, "b": 2})))
            .await
            .unwrap();
        store
            .merge("users", "u1", doc(json!({"b": 3, "c": 4})))
            .await
            .unwrap();
        let loaded = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(loaded.get("a"), Some(&json!(1)));
        assert_eq!(loaded.get("b"), Some(&json!(3)));
        assert_eq!(loaded.get("c"), Some(&json!(4)));
    }

    #[tokio::test]
    async fn test_find_by_field() {
        let store = MemoryStore::new();
        store
            .set("careerRoadmaps", "r1", doc(json!({"userId": "u1"})))
            .await
            .unwrap();
        let found = store
            .find_by_field("careerRoadmaps", "userId", "u1")
            .await
            .unwrap();
        assert!(found.is_some());
        let missing = store
            .find_by_field("careerRoadmaps", "userId", "u2")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        store.set("users", "u1", doc(json!({}))).await.unwrap();
        store.delete("users", "u1").await.unwrap();
        store.delete("users", "u1").await.unwrap();
        assert!(store.get("users", "u1").await.unwrap().is_none());
    }
}
