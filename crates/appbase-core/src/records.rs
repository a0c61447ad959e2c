//! Record repository: typed CRUD over a table's container.
//!
//! Storage holds free-form documents; the schema is enforced here, on the
//! write path only. Every caller value is coerced to its column's type,
//! missing columns receive type defaults, unknown fields are dropped.

use crate::catalog::DatabaseCatalog;
use appbase_commons::coerce::{coerce, default_value};
use appbase_commons::{
    AppBaseError, Database, DatabaseId, Document, RecordId, Result, TableDef,
};
use appbase_store::StorageDriver;
use chrono::Utc;
use std::sync::Arc;

/// One stored row with its identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub fields: Document,
}

/// Typed CRUD against a table's physical container.
pub struct RecordRepository {
    driver: Arc<dyn StorageDriver>,
    catalog: Arc<DatabaseCatalog>,
}

impl RecordRepository {
    pub fn new(driver: Arc<dyn StorageDriver>, catalog: Arc<DatabaseCatalog>) -> Self {
        Self { driver, catalog }
    }

    fn table(&self, database_id: &DatabaseId, table_name: &str) -> Result<(Database, TableDef)> {
        let db = self.catalog.get(database_id)?;
        let table = db
            .table(table_name)
            .ok_or_else(|| AppBaseError::not_found(format!("table {}", table_name)))?
            .clone();
        Ok((db, table))
    }

    /// All records in the table. No pagination.
    pub fn list(&self, database_id: &DatabaseId, table_name: &str) -> Result<Vec<Record>> {
        let (db, table) = self.table(database_id, table_name)?;
        let session = self.driver.open(&db.namespace_id)?;
        let rows = session.scan(&table.name)?;
        Ok(rows
            .into_iter()
            .map(|(id, fields)| Record { id, fields })
            .collect())
    }

    /// Inserts one record.
    ///
    /// For every column: the caller value if present, else the type default
    /// (string `""`, number 0, boolean false, date now), coerced to the
    /// column type. Fields not matching a known column are dropped.
    pub fn insert(
        &self,
        database_id: &DatabaseId,
        table_name: &str,
        fields: &Document,
    ) -> Result<Record> {
        let (db, table) = self.table(database_id, table_name)?;
        let now = Utc::now();

        let mut doc = Document::new();
        for column in &table.columns {
            let value = match fields.get(&column.name) {
                Some(v) => coerce(v, column.ctype, now),
                None => default_value(column.ctype, now),
            };
            doc.insert(column.name.clone(), value);
        }

        let id = RecordId::generate();
        let session = self.driver.open(&db.namespace_id)?;
        session.put(&table.name, &id, &doc)?;
        Ok(Record { id, fields: doc })
    }

    /// Applies a partial update to one record.
    ///
    /// Only keys matching known columns are applied, coerced per type.
    /// `NotFound` if no record has that identity.
    pub fn update(
        &self,
        database_id: &DatabaseId,
        table_name: &str,
        record_id: &RecordId,
        partial: &Document,
    ) -> Result<Record> {
        let (db, table) = self.table(database_id, table_name)?;
        let session = self.driver.open(&db.namespace_id)?;

        let mut doc = session
            .get(&table.name, record_id)?
            .ok_or_else(|| AppBaseError::not_found(format!("record {}", record_id)))?;

        let now = Utc::now();
        for column in &table.columns {
            if let Some(value) = partial.get(&column.name) {
                doc.insert(column.name.clone(), coerce(value, column.ctype, now));
            }
        }

        session.put(&table.name, record_id, &doc)?;
        Ok(Record {
            id: record_id.clone(),
            fields: doc,
        })
    }

    /// Bulk delete by identity set. Returns the count actually deleted;
    /// unknown ids are silently excluded, not an error.
    pub fn delete_many(
        &self,
        database_id: &DatabaseId,
        table_name: &str,
        record_ids: &[RecordId],
    ) -> Result<usize> {
        let (db, table) = self.table(database_id, table_name)?;
        let session = self.driver.open(&db.namespace_id)?;

        let mut deleted = 0;
        for id in record_ids {
            if session.delete(&table.name, id)? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}
