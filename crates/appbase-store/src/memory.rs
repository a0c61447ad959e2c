//! In-memory storage driver.
//!
//! The reference implementation of [`StorageDriver`]: namespaces are maps of
//! containers, containers are ordered maps of documents. Used as the test
//! double everywhere and as the shipped driver for single-process use.
//!
//! The driver counts open sessions per namespace so tests can assert the
//! scoped acquire/release discipline.

use crate::driver::{NamespaceSession, StorageDriver};
use appbase_commons::{AppBaseError, Document, NamespaceId, RecordId, Result};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type Container = BTreeMap<RecordId, Document>;

#[derive(Default)]
struct NamespaceState {
    containers: RwLock<HashMap<String, Container>>,
    open_sessions: AtomicUsize,
}

/// In-memory, thread-safe storage driver.
#[derive(Default)]
pub struct MemoryDriver {
    namespaces: RwLock<HashMap<NamespaceId, Arc<NamespaceState>>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently open against a namespace. Test hook for
    /// the acquire/release discipline; 0 for unknown namespaces.
    pub fn open_sessions(&self, namespace: &NamespaceId) -> usize {
        self.namespaces
            .read()
            .get(namespace)
            .map(|s| s.open_sessions.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

impl StorageDriver for MemoryDriver {
    fn create_namespace(&self, namespace: &NamespaceId) -> Result<()> {
        let mut namespaces = self.namespaces.write();
        namespaces
            .entry(namespace.clone())
            .or_insert_with(|| Arc::new(NamespaceState::default()));
        log::debug!("created namespace {}", namespace);
        Ok(())
    }

    fn drop_namespace(&self, namespace: &NamespaceId) -> Result<()> {
        let removed = self.namespaces.write().remove(namespace);
        if removed.is_some() {
            log::debug!("dropped namespace {}", namespace);
        }
        Ok(())
    }

    fn namespace_exists(&self, namespace: &NamespaceId) -> bool {
        self.namespaces.read().contains_key(namespace)
    }

    fn open<'a>(&'a self, namespace: &NamespaceId) -> Result<Box<dyn NamespaceSession + 'a>> {
        let state = self
            .namespaces
            .read()
            .get(namespace)
            .cloned()
            .ok_or_else(|| {
                AppBaseError::storage_unavailable(format!("unknown namespace {}", namespace))
            })?;
        state.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            namespace: namespace.clone(),
            state,
        }))
    }
}

/// Session over one in-memory namespace. Releases itself on drop.
struct MemorySession {
    namespace: NamespaceId,
    state: Arc<NamespaceState>,
}

impl MemorySession {
    fn with_container<T>(
        &self,
        container: &str,
        f: impl FnOnce(&Container) -> T,
    ) -> Result<T> {
        let containers = self.state.containers.read();
        let c = containers.get(container).ok_or_else(|| {
            AppBaseError::not_found(format!(
                "container {} in namespace {}",
                container, self.namespace
            ))
        })?;
        Ok(f(c))
    }

    fn with_container_mut<T>(
        &self,
        container: &str,
        f: impl FnOnce(&mut Container) -> T,
    ) -> Result<T> {
        let mut containers = self.state.containers.write();
        let c = containers.get_mut(container).ok_or_else(|| {
            AppBaseError::not_found(format!(
                "container {} in namespace {}",
                container, self.namespace
            ))
        })?;
        Ok(f(c))
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.state.open_sessions.fetch_sub(1, Ordering::SeqCst);
        log::debug!("released session on namespace {}", self.namespace);
    }
}

impl NamespaceSession for MemorySession {
    fn namespace(&self) -> &NamespaceId {
        &self.namespace
    }

    fn create_container(&self, name: &str) -> Result<()> {
        self.state
            .containers
            .write()
            .entry(name.to_string())
            .or_default();
        Ok(())
    }

    fn drop_container(&self, name: &str) -> Result<()> {
        self.state.containers.write().remove(name);
        Ok(())
    }

    fn container_exists(&self, name: &str) -> bool {
        self.state.containers.read().contains_key(name)
    }

    fn put(&self, container: &str, id: &RecordId, doc: &Document) -> Result<()> {
        self.with_container_mut(container, |c| {
            c.insert(id.clone(), doc.clone());
        })
    }

    fn get(&self, container: &str, id: &RecordId) -> Result<Option<Document>> {
        self.with_container(container, |c| c.get(id).cloned())
    }

    fn delete(&self, container: &str, id: &RecordId) -> Result<bool> {
        self.with_container_mut(container, |c| c.remove(id).is_some())
    }

    fn scan(&self, container: &str) -> Result<Vec<(RecordId, Document)>> {
        self.with_container(container, |c| {
            c.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        })
    }

    fn strip_field(&self, container: &str, field: &str) -> Result<()> {
        self.with_container_mut(container, |c| {
            for doc in c.values_mut() {
                doc.remove(field);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(pairs: &[(&str, serde_json::Value)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn ns(s: &str) -> NamespaceId {
        NamespaceId::new(s)
    }

    #[test]
    fn test_namespace_lifecycle_idempotent() {
        let driver = MemoryDriver::new();
        let n = ns("udb_a_x_000001");

        driver.create_namespace(&n).unwrap();
        driver.create_namespace(&n).unwrap();
        assert!(driver.namespace_exists(&n));

        driver.drop_namespace(&n).unwrap();
        // Dropping an absent namespace is not an error.
        driver.drop_namespace(&n).unwrap();
        assert!(!driver.namespace_exists(&n));
    }

    #[test]
    fn test_open_unknown_namespace_fails() {
        let driver = MemoryDriver::new();
        let err = driver.open(&ns("missing")).err().unwrap();
        assert!(matches!(err, AppBaseError::StorageUnavailable(_)));
    }

    #[test]
    fn test_session_released_on_drop() {
        let driver = MemoryDriver::new();
        let n = ns("udb_a_x_000001");
        driver.create_namespace(&n).unwrap();

        {
            let _session = driver.open(&n).unwrap();
            assert_eq!(driver.open_sessions(&n), 1);
        }
        assert_eq!(driver.open_sessions(&n), 0);
    }

    #[test]
    fn test_session_released_on_error_path() {
        let driver = MemoryDriver::new();
        let n = ns("udb_a_x_000001");
        driver.create_namespace(&n).unwrap();

        let result: Result<()> = (|| {
            let session = driver.open(&n)?;
            session.get("no_such_container", &RecordId::new("r1"))?;
            Ok(())
        })();
        assert!(result.is_err());
        assert_eq!(driver.open_sessions(&n), 0);
    }

    #[test]
    fn test_document_crud() {
        let driver = MemoryDriver::new();
        let n = ns("udb_a_x_000001");
        driver.create_namespace(&n).unwrap();

        let session = driver.open(&n).unwrap();
        session.create_container("leads").unwrap();

        let id = RecordId::new("r1");
        session
            .put("leads", &id, &doc(&[("name", json!("Ada"))]))
            .unwrap();
        let fetched = session.get("leads", &id).unwrap().unwrap();
        assert_eq!(fetched["name"], json!("Ada"));

        assert!(session.delete("leads", &id).unwrap());
        assert!(!session.delete("leads", &id).unwrap());
        assert!(session.get("leads", &id).unwrap().is_none());
    }

    #[test]
    fn test_scan_returns_all_documents() {
        let driver = MemoryDriver::new();
        let n = ns("udb_a_x_000001");
        driver.create_namespace(&n).unwrap();

        let session = driver.open(&n).unwrap();
        session.create_container("leads").unwrap();
        for i in 0..3 {
            session
                .put(
                    "leads",
                    &RecordId::new(format!("r{}", i)),
                    &doc(&[("n", json!(i))]),
                )
                .unwrap();
        }
        assert_eq!(session.scan("leads").unwrap().len(), 3);
    }

    #[test]
    fn test_strip_field() {
        let driver = MemoryDriver::new();
        let n = ns("udb_a_x_000001");
        driver.create_namespace(&n).unwrap();

        let session = driver.open(&n).unwrap();
        session.create_container("leads").unwrap();
        session
            .put(
                "leads",
                &RecordId::new("r1"),
                &doc(&[("name", json!("Ada")), ("age", json!(36))]),
            )
            .unwrap();

        session.strip_field("leads", "age").unwrap();
        let fetched = session.get("leads", &RecordId::new("r1")).unwrap().unwrap();
        assert!(fetched.get("age").is_none());
        assert_eq!(fetched["name"], json!("Ada"));
    }

    #[test]
    fn test_container_drop_idempotent() {
        let driver = MemoryDriver::new();
        let n = ns("udb_a_x_000001");
        driver.create_namespace(&n).unwrap();

        let session = driver.open(&n).unwrap();
        session.create_container("leads").unwrap();
        session.drop_container("leads").unwrap();
        session.drop_container("leads").unwrap();
        assert!(!session.container_exists("leads"));
    }
}
