//! Table query surface.
//!
//! The one read endpoint the UI layer talks to: a filter list plus an
//! action. `count` returns the number of matching records, `value` the named
//! column of the first match, `values` that column across all matches.
//! Request-shape validation happens before any storage call.

use crate::catalog::DatabaseCatalog;
use crate::filters::compile;
use crate::records::RecordRepository;
use appbase_commons::{AppBaseError, DatabaseId, Document, Filter, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// What a query should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryAction {
    Count,
    Value,
    Values,
}

/// `{filters, action, column?}` against one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub filters: Vec<Filter>,
    pub action: QueryAction,
    #[serde(default)]
    pub column: Option<String>,
}

/// Query result, shaped per action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    /// `{"count": n}`
    Count { count: usize },
    /// `{"<column>": value}`; value is null when nothing matched.
    Value(Document),
    /// `[{"<column>": value}, ...]`
    Values(Vec<Document>),
}

/// Read surface over the record repository and filter compiler.
pub struct TableQueryService {
    catalog: Arc<DatabaseCatalog>,
    records: Arc<RecordRepository>,
}

impl TableQueryService {
    pub fn new(catalog: Arc<DatabaseCatalog>, records: Arc<RecordRepository>) -> Self {
        Self { catalog, records }
    }

    /// Runs one query against `(database, table)`.
    pub fn query(
        &self,
        database_id: &DatabaseId,
        table_name: &str,
        request: &QueryRequest,
    ) -> Result<QueryResponse> {
        let db = self.catalog.get(database_id)?;
        let table = db
            .table(table_name)
            .ok_or_else(|| AppBaseError::not_found(format!("table {}", table_name)))?;

        // Validate the request shape before touching record storage.
        let column = match request.action {
            QueryAction::Count => None,
            QueryAction::Value | QueryAction::Values => {
                let column = request
                    .column
                    .as_deref()
                    .ok_or_else(|| AppBaseError::validation("column is required for this action"))?;
                if table.column(column).is_none() {
                    return Err(AppBaseError::validation(format!(
                        "unknown column {}",
                        column
                    )));
                }
                Some(column.to_string())
            }
        };

        let predicate = compile(&request.filters, &table.columns);
        let matches = self
            .records
            .list(database_id, table_name)?
            .into_iter()
            .filter(|r| predicate.matches(&r.fields));

        Ok(match request.action {
            QueryAction::Count => QueryResponse::Count {
                count: matches.count(),
            },
            QueryAction::Value => {
                let column = column.unwrap_or_default();
                let value = matches
                    .into_iter()
                    .next()
                    .and_then(|r| r.fields.get(&column).cloned())
                    .unwrap_or(Value::Null);
                QueryResponse::Value(single(column, value))
            }
            QueryAction::Values => {
                let column = column.unwrap_or_default();
                QueryResponse::Values(
                    matches
                        .map(|r| {
                            let value =
                                r.fields.get(&column).cloned().unwrap_or(Value::Null);
                            single(column.clone(), value)
                        })
                        .collect(),
                )
            }
        })
    }
}

fn single(column: String, value: Value) -> Document {
    let mut doc = Document::new();
    doc.insert(column, value);
    doc
}
