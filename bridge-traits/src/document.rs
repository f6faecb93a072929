//! Document Store Abstraction
//!
//! A minimal collection/document interface for the album metadata. Records are
//! schemaless JSON objects grouped into named collections; ids are assigned by
//! the store on [`DocumentStore::add`] or chosen by the caller on
//! [`DocumentStore::set`].
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_traits::document::DocumentStore;
//! use serde_json::json;
//!
//! let id = store.add("albums", json!({ "name": "Ceremonia" })).await?;
//! let doc = store.get("albums", &id).await?.expect("just inserted");
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A stored record with its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// String field of the document body, if present
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }
}

/// Document collection store trait
///
/// Failures are returned to the caller as-is; implementations must not retry
/// silently.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return the id the store assigned
    async fn add(&self, collection: &str, data: Value) -> Result<String>;

    /// Create or replace the document with the given id
    async fn set(&self, collection: &str, id: &str, data: Value) -> Result<()>;

    /// Fetch a single document
    ///
    /// Returns `Ok(None)` if the document does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// List every document in a collection, in insertion order
    async fn list(&self, collection: &str) -> Result<Vec<Document>>;

    /// Delete a document
    ///
    /// Returns `Ok(false)` if there was nothing to delete.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_str_field() {
        let doc = Document::new("p1", json!({ "albumId": "a1", "size": 3 }));
        assert_eq!(doc.str_field("albumId"), Some("a1"));
        assert_eq!(doc.str_field("size"), None);
        assert_eq!(doc.str_field("url"), None);
    }
}
