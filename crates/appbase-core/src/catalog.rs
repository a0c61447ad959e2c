//! Persistence of Database metadata documents.
//!
//! One JSON document per logical Database, stored in a reserved system
//! namespace alongside the tenant namespaces, with a write-through in-memory
//! cache. Row data never lives here.

use appbase_commons::{AppBaseError, Database, DatabaseId, OwnerId, RecordId, Result};
use appbase_store::StorageDriver;
use dashmap::DashMap;
use std::sync::Arc;

/// Namespace holding system metadata, never handed to a tenant.
const SYSTEM_NAMESPACE: &str = "udb_system";
const DATABASES_CONTAINER: &str = "databases";

/// Catalog of Database metadata documents.
pub struct DatabaseCatalog {
    driver: Arc<dyn StorageDriver>,
    cache: DashMap<DatabaseId, Database>,
}

impl DatabaseCatalog {
    /// Opens the catalog, allocating the system namespace if needed and
    /// warming the cache from any persisted documents.
    pub fn new(driver: Arc<dyn StorageDriver>) -> Result<Self> {
        let system = SYSTEM_NAMESPACE.into();
        driver.create_namespace(&system)?;

        let cache = DashMap::new();
        {
            let session = driver.open(&system)?;
            session.create_container(DATABASES_CONTAINER)?;
            for (_, doc) in session.scan(DATABASES_CONTAINER)? {
                let db: Database = serde_json::from_value(serde_json::Value::Object(doc))?;
                cache.insert(db.id.clone(), db);
            }
        }

        Ok(Self { driver, cache })
    }

    /// Writes a Database document through to storage and the cache.
    pub fn save(&self, db: &Database) -> Result<()> {
        let doc = match serde_json::to_value(db)? {
            serde_json::Value::Object(map) => map,
            _ => return Err(AppBaseError::internal("database did not serialize to an object")),
        };
        let session = self.driver.open(&SYSTEM_NAMESPACE.into())?;
        session.put(
            DATABASES_CONTAINER,
            &RecordId::new(db.id.as_str()),
            &doc,
        )?;
        self.cache.insert(db.id.clone(), db.clone());
        Ok(())
    }

    /// Deletes a Database document. Absence is not an error.
    pub fn delete(&self, id: &DatabaseId) -> Result<()> {
        let session = self.driver.open(&SYSTEM_NAMESPACE.into())?;
        session.delete(DATABASES_CONTAINER, &RecordId::new(id.as_str()))?;
        self.cache.remove(id);
        Ok(())
    }

    /// Fetches one Database, `NotFound` if unknown.
    pub fn get(&self, id: &DatabaseId) -> Result<Database> {
        self.cache
            .get(id)
            .map(|e| e.value().clone())
            .ok_or_else(|| AppBaseError::not_found(format!("database {}", id)))
    }

    /// All Databases belonging to one owner.
    pub fn list_owner(&self, owner: &OwnerId) -> Vec<Database> {
        let mut dbs: Vec<Database> = self
            .cache
            .iter()
            .filter(|e| &e.value().owner == owner)
            .map(|e| e.value().clone())
            .collect();
        dbs.sort_by(|a, b| a.name.cmp(&b.name));
        dbs
    }

    /// The owner's *active* Database with this exact name, if any.
    pub fn find_active_by_name(&self, owner: &OwnerId, name: &str) -> Option<Database> {
        use appbase_commons::DatabaseStatus;
        self.cache
            .iter()
            .find(|e| {
                let db = e.value();
                &db.owner == owner && db.name == name && db.status == DatabaseStatus::Active
            })
            .map(|e| e.value().clone())
    }
}
