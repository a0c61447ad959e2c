//! The logical Database metadata entity.

use crate::ids::{DatabaseId, NamespaceId, OwnerId, TableId};
use crate::models::schema::TableDef;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a logical Database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseStatus {
    Active,
    Deleted,
    Error,
}

/// Owner-scoped metadata entity describing tables.
///
/// Maps 1:1 to an isolated physical namespace. The namespace id is globally
/// unique and immutable once assigned. One metadata document per Database is
/// persisted; row data lives only in the namespace's containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub id: DatabaseId,
    pub owner: OwnerId,
    pub name: String,
    pub status: DatabaseStatus,
    pub namespace_id: NamespaceId,
    pub tables: Vec<TableDef>,
}

impl Database {
    pub fn new(owner: OwnerId, name: impl Into<String>, namespace_id: NamespaceId) -> Self {
        Self {
            id: DatabaseId::generate(),
            owner,
            name: name.into(),
            status: DatabaseStatus::Active,
            namespace_id,
            tables: Vec::new(),
        }
    }

    /// Looks up a table by name (case-sensitive).
    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Looks up a table by id.
    pub fn table_by_id(&self, id: &TableId) -> Option<&TableDef> {
        self.tables.iter().find(|t| &t.id == id)
    }

    /// Mutable lookup by id.
    pub fn table_by_id_mut(&mut self, id: &TableId) -> Option<&mut TableDef> {
        self.tables.iter_mut().find(|t| &t.id == id)
    }

    /// True if a table with this exact name exists. Name uniqueness is
    /// enforced by callers of the metadata store, not by the store itself.
    pub fn has_table_named(&self, name: &str) -> bool {
        self.table(name).is_some()
    }
}
