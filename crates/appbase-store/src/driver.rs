//! Storage driver and session traits.
//!
//! A [`StorageDriver`] manages namespaces (one per logical Database) and
//! hands out scoped [`NamespaceSession`]s. A session is opened for exactly
//! one operation and released when dropped; it is never pooled or reused
//! across requests. Containers hold free-form JSON documents keyed by
//! record id; the schema is enforced above this layer, never here.

use appbase_commons::{Document, NamespaceId, RecordId, Result};

/// One short-lived, exclusive-use session scoped to a single namespace.
///
/// Dropping the session releases it. Implementations must release on every
/// exit path, success or error.
pub trait NamespaceSession {
    /// The namespace this session is scoped to.
    fn namespace(&self) -> &NamespaceId;

    /// Creates a container. Idempotent: an existing container is not an
    /// error.
    fn create_container(&self, name: &str) -> Result<()>;

    /// Drops a container and all of its documents. Idempotent: dropping an
    /// absent container is not an error.
    fn drop_container(&self, name: &str) -> Result<()>;

    /// True if the container exists.
    fn container_exists(&self, name: &str) -> bool;

    /// Inserts or replaces one document.
    fn put(&self, container: &str, id: &RecordId, doc: &Document) -> Result<()>;

    /// Fetches one document, `None` if absent.
    fn get(&self, container: &str, id: &RecordId) -> Result<Option<Document>>;

    /// Deletes one document. Returns true iff it was present.
    fn delete(&self, container: &str, id: &RecordId) -> Result<bool>;

    /// All documents in the container, in stable id order. No pagination.
    fn scan(&self, container: &str) -> Result<Vec<(RecordId, Document)>>;

    /// Removes one field from every document in the container. Used by
    /// column removal; callers treat failures as non-fatal.
    fn strip_field(&self, container: &str, field: &str) -> Result<()>;
}

/// Pluggable storage engine, namespace-shaped.
///
/// Implementations must be thread-safe. Namespace creation and removal are
/// idempotent; dropping an absent namespace is not an error.
pub trait StorageDriver: Send + Sync {
    /// Allocates a namespace. Idempotent.
    fn create_namespace(&self, namespace: &NamespaceId) -> Result<()>;

    /// Drops a namespace and everything in it. Idempotent.
    fn drop_namespace(&self, namespace: &NamespaceId) -> Result<()>;

    /// True if the namespace exists.
    fn namespace_exists(&self, namespace: &NamespaceId) -> bool;

    /// Opens a session for exactly one operation. Fails with
    /// `StorageUnavailable` when the namespace cannot be opened.
    fn open<'a>(&'a self, namespace: &NamespaceId) -> Result<Box<dyn NamespaceSession + 'a>>;
}
