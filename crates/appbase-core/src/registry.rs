//! Tenant store registry.
//!
//! Allocates and destroys the isolated physical namespace behind each
//! logical Database. Creation probes the fresh namespace by creating and
//! immediately dropping a throwaway container, forcing real allocation in
//! storage engines that defer it until first write.

use crate::catalog::DatabaseCatalog;
use appbase_commons::{AppBaseError, Database, DatabaseId, OwnerId, Result};
use appbase_store::{derive_namespace_id, StorageDriver};
use std::sync::Arc;

const PROBE_CONTAINER: &str = "__probe";

/// Registry of logical Databases and their physical namespaces.
pub struct DatabaseRegistry {
    driver: Arc<dyn StorageDriver>,
    catalog: Arc<DatabaseCatalog>,
}

impl DatabaseRegistry {
    pub fn new(driver: Arc<dyn StorageDriver>, catalog: Arc<DatabaseCatalog>) -> Self {
        Self { driver, catalog }
    }

    /// Creates a Database for an owner.
    ///
    /// Fails with `Conflict` when the owner already has an active Database
    /// with this exact name. On success the namespace exists, has been
    /// probed, and the metadata document is persisted.
    pub fn create(&self, owner: &OwnerId, name: &str) -> Result<Database> {
        if name.trim().is_empty() {
            return Err(AppBaseError::validation("database name must not be empty"));
        }
        if self.catalog.find_active_by_name(owner, name).is_some() {
            return Err(AppBaseError::conflict(format!(
                "owner already has an active database named {}",
                name
            )));
        }

        let namespace_id = derive_namespace_id(owner, name);
        self.driver.create_namespace(&namespace_id)?;

        if let Err(e) = self.probe(&namespace_id) {
            // The namespace never held data; undo the allocation.
            let _ = self.driver.drop_namespace(&namespace_id);
            return Err(e);
        }

        let db = Database::new(owner.clone(), name, namespace_id);
        self.catalog.save(&db)?;
        log::debug!("created database {} ({})", db.name, db.namespace_id);
        Ok(db)
    }

    fn probe(&self, namespace: &appbase_commons::NamespaceId) -> Result<()> {
        let session = self.driver.open(namespace)?;
        session.create_container(PROBE_CONTAINER)?;
        session.drop_container(PROBE_CONTAINER)
    }

    /// Destroys a Database after verifying ownership.
    ///
    /// Drops the whole namespace (idempotent: absence is not an error),
    /// then deletes the metadata document.
    pub fn destroy(&self, id: &DatabaseId, owner: &OwnerId) -> Result<()> {
        let db = self.catalog.get(id)?;
        if &db.owner != owner {
            // Do not reveal other owners' databases.
            return Err(AppBaseError::not_found(format!("database {}", id)));
        }

        self.driver.drop_namespace(&db.namespace_id)?;
        self.catalog.delete(id)?;
        log::debug!("destroyed database {} ({})", db.name, db.namespace_id);
        Ok(())
    }

    /// Fetches one Database.
    pub fn get(&self, id: &DatabaseId) -> Result<Database> {
        self.catalog.get(id)
    }

    /// All Databases of an owner.
    pub fn list(&self, owner: &OwnerId) -> Vec<Database> {
        self.catalog.list_owner(owner)
    }
}
