//! Metadata store: table and column definitions.
//!
//! Every mutation pairs with a physical-storage side effect. The two halves
//! are not transactional together; when the physical half fails right after
//! the metadata write, the metadata change is rolled back and the storage
//! error propagates. Destructive physical operations are idempotent, so a
//! crash between the halves is repaired by retrying the destroy.
//!
//! Uniqueness of table and column names is the caller's responsibility;
//! this store performs no such validation itself.

use crate::catalog::DatabaseCatalog;
use appbase_commons::{
    AppBaseError, ColumnDef, ColumnId, ColumnType, DatabaseId, Result, TableDef, TableId,
};
use appbase_store::StorageDriver;
use std::sync::Arc;

/// Table/Column definition store with paired physical effects.
pub struct MetadataStore {
    driver: Arc<dyn StorageDriver>,
    catalog: Arc<DatabaseCatalog>,
}

impl MetadataStore {
    pub fn new(driver: Arc<dyn StorageDriver>, catalog: Arc<DatabaseCatalog>) -> Self {
        Self { driver, catalog }
    }

    /// Appends a table definition and creates its physical container.
    ///
    /// A failed container creation pops the just-added entry and propagates
    /// the storage error.
    pub fn add_table(&self, database_id: &DatabaseId, name: &str) -> Result<TableDef> {
        let mut db = self.catalog.get(database_id)?;
        let table = TableDef::new(name);
        db.tables.push(table.clone());
        self.catalog.save(&db)?;

        let physical = self
            .driver
            .open(&db.namespace_id)
            .and_then(|session| session.create_container(name));
        if let Err(e) = physical {
            db.tables.pop();
            self.catalog.save(&db)?;
            return Err(e);
        }
        Ok(table)
    }

    /// Removes a table definition and drops its container.
    ///
    /// Dropping an absent container is not an error.
    pub fn remove_table(&self, database_id: &DatabaseId, table_id: &TableId) -> Result<()> {
        let mut db = self.catalog.get(database_id)?;
        let idx = db
            .tables
            .iter()
            .position(|t| &t.id == table_id)
            .ok_or_else(|| AppBaseError::not_found(format!("table {}", table_id)))?;
        let removed = db.tables.remove(idx);
        self.catalog.save(&db)?;

        let session = self.driver.open(&db.namespace_id)?;
        session.drop_container(&removed.name)
    }

    /// Appends a column with the next insertion order.
    ///
    /// No physical effect: containers hold free-form documents, existing
    /// records simply lack the new field until written again.
    pub fn add_column(
        &self,
        database_id: &DatabaseId,
        table_id: &TableId,
        name: &str,
        ctype: ColumnType,
    ) -> Result<ColumnDef> {
        let mut db = self.catalog.get(database_id)?;
        let table = db
            .table_by_id_mut(table_id)
            .ok_or_else(|| AppBaseError::not_found(format!("table {}", table_id)))?;

        let column = ColumnDef::new(name, ctype, table.next_order());
        table.columns.push(column.clone());
        self.catalog.save(&db)?;
        Ok(column)
    }

    /// Removes a column definition, then strips the field from stored
    /// documents best-effort.
    ///
    /// The metadata removal has already committed when the strip runs, so a
    /// strip failure is logged and swallowed: metadata consistency wins over
    /// perfect physical cleanup.
    pub fn remove_column(
        &self,
        database_id: &DatabaseId,
        table_id: &TableId,
        column_id: &ColumnId,
    ) -> Result<()> {
        let mut db = self.catalog.get(database_id)?;
        let table = db
            .table_by_id_mut(table_id)
            .ok_or_else(|| AppBaseError::not_found(format!("table {}", table_id)))?;
        let idx = table
            .columns
            .iter()
            .position(|c| &c.id == column_id)
            .ok_or_else(|| AppBaseError::not_found(format!("column {}", column_id)))?;

        let removed = table.columns.remove(idx);
        let table_name = table.name.clone();
        let namespace_id = db.namespace_id.clone();
        self.catalog.save(&db)?;

        let strip = self
            .driver
            .open(&namespace_id)
            .and_then(|session| session.strip_field(&table_name, &removed.name));
        if let Err(e) = strip {
            log::warn!(
                "field strip for dropped column {}.{} failed: {}",
                table_name,
                removed.name,
                e
            );
        }
        Ok(())
    }
}
