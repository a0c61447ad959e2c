//! Record access for database-sourced steps.
//!
//! The evaluator reads records through [`RecordSource`] rather than the query
//! service directly, so calculations can be exercised against canned data.
//! [`LiveRecordSource`] is the production implementation; it pins a database
//! id so a step can only ever read its own tenant's tables.

use appbase_commons::{AppBaseError, ColumnDef, DatabaseId, Document, Filter, Result};
use appbase_core::{compile, QueryAction, QueryRequest, QueryResponse, TableQueryService};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only record access, shaped after the query actions.
pub trait RecordSource {
    fn count(&self, table: &str, filters: &[Filter]) -> Result<usize>;
    fn value(&self, table: &str, filters: &[Filter], column: &str) -> Result<Value>;
    fn values(&self, table: &str, filters: &[Filter], column: &str) -> Result<Vec<Value>>;
}

/// [`RecordSource`] over the live query service, scoped to one database.
pub struct LiveRecordSource {
    queries: Arc<TableQueryService>,
    database_id: DatabaseId,
}

impl LiveRecordSource {
    pub fn new(queries: Arc<TableQueryService>, database_id: DatabaseId) -> Self {
        Self {
            queries,
            database_id,
        }
    }

    fn run(&self, table: &str, request: &QueryRequest) -> Result<QueryResponse> {
        self.queries.query(&self.database_id, table, request)
    }
}

impl RecordSource for LiveRecordSource {
    fn count(&self, table: &str, filters: &[Filter]) -> Result<usize> {
        match self.run(
            table,
            &QueryRequest {
                filters: filters.to_vec(),
                action: QueryAction::Count,
                column: None,
            },
        )? {
            QueryResponse::Count { count } => Ok(count),
            other => Err(AppBaseError::internal(format!(
                "count query returned {:?}",
                other
            ))),
        }
    }

    fn value(&self, table: &str, filters: &[Filter], column: &str) -> Result<Value> {
        match self.run(
            table,
            &QueryRequest {
                filters: filters.to_vec(),
                action: QueryAction::Value,
                column: Some(column.to_string()),
            },
        )? {
            QueryResponse::Value(mut doc) => {
                Ok(doc.remove(column).unwrap_or(Value::Null))
            }
            other => Err(AppBaseError::internal(format!(
                "value query returned {:?}",
                other
            ))),
        }
    }

    fn values(&self, table: &str, filters: &[Filter], column: &str) -> Result<Vec<Value>> {
        match self.run(
            table,
            &QueryRequest {
                filters: filters.to_vec(),
                action: QueryAction::Values,
                column: Some(column.to_string()),
            },
        )? {
            QueryResponse::Values(docs) => Ok(docs
                .into_iter()
                .map(|mut doc| doc.remove(column).unwrap_or(Value::Null))
                .collect()),
            other => Err(AppBaseError::internal(format!(
                "values query returned {:?}",
                other
            ))),
        }
    }
}

/// In-memory [`RecordSource`] for tests: fixed tables, same filter
/// semantics as the live path.
#[derive(Default)]
pub struct StaticRecordSource {
    tables: HashMap<String, (Vec<ColumnDef>, Vec<Document>)>,
}

impl StaticRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(
        mut self,
        name: impl Into<String>,
        columns: Vec<ColumnDef>,
        rows: Vec<Document>,
    ) -> Self {
        self.tables.insert(name.into(), (columns, rows));
        self
    }

    fn table(&self, name: &str) -> Result<&(Vec<ColumnDef>, Vec<Document>)> {
        self.tables
            .get(name)
            .ok_or_else(|| AppBaseError::not_found(format!("table {}", name)))
    }

    fn matching<'a>(
        &'a self,
        table: &str,
        filters: &[Filter],
    ) -> Result<Vec<&'a Document>> {
        let (columns, rows) = self.table(table)?;
        let predicate = compile(filters, columns);
        Ok(rows.iter().filter(|r| predicate.matches(r)).collect())
    }
}

impl RecordSource for StaticRecordSource {
    fn count(&self, table: &str, filters: &[Filter]) -> Result<usize> {
        Ok(self.matching(table, filters)?.len())
    }

    fn value(&self, table: &str, filters: &[Filter], column: &str) -> Result<Value> {
        Ok(self
            .matching(table, filters)?
            .first()
            .and_then(|r| r.get(column).cloned())
            .unwrap_or(Value::Null))
    }

    fn values(&self, table: &str, filters: &[Filter], column: &str) -> Result<Vec<Value>> {
        Ok(self
            .matching(table, filters)?
            .iter()
            .map(|r| r.get(column).cloned().unwrap_or(Value::Null))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appbase_commons::ColumnType;
    use serde_json::json;

    fn source() -> StaticRecordSource {
        let columns = vec![
            ColumnDef::new("name", ColumnType::String, 0),
            ColumnDef::new("age", ColumnType::Number, 1),
        ];
        let rows = vec![
            [("name".to_string(), json!("Ada")), ("age".to_string(), json!(36))]
                .into_iter()
                .collect(),
            [("name".to_string(), json!("Alan")), ("age".to_string(), json!(17))]
                .into_iter()
                .collect(),
        ];
        StaticRecordSource::new().with_table("Leads", columns, rows)
    }

    #[test]
    fn test_count_and_value() {
        let src = source();
        assert_eq!(src.count("Leads", &[]).unwrap(), 2);
        let adults = [Filter::new("age", "greater_equal", json!(18))];
        assert_eq!(src.count("Leads", &adults).unwrap(), 1);
        assert_eq!(src.value("Leads", &adults, "name").unwrap(), json!("Ada"));
    }

    #[test]
    fn test_value_without_match_is_null() {
        let src = source();
        let none = [Filter::new("age", "greater_than", json!(100))];
        assert_eq!(src.value("Leads", &none, "name").unwrap(), Value::Null);
    }

    #[test]
    fn test_unknown_table_is_not_found() {
        let err = source().count("Ghost", &[]).unwrap_err();
        assert!(matches!(err, AppBaseError::NotFound(_)));
    }
}
