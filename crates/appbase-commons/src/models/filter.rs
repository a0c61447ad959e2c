//! The declarative filter model.
//!
//! Filters are transient request shapes, never persisted beyond a request.
//! All fields are lenient: a filter missing its column, operator or value is
//! skipped by the filter compiler rather than rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a filter combines with its neighbors.
///
/// Accepted structurally for wire compatibility but not honored: the filter
/// compiler always combines with AND. See DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterLogic {
    And,
    Or,
}

impl Default for FilterLogic {
    fn default() -> Self {
        FilterLogic::And
    }
}

/// One declarative filter: `{column, operator, value, logic}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub column: Option<String>,

    #[serde(default)]
    pub operator: Option<String>,

    #[serde(default)]
    pub value: Option<Value>,

    #[serde(default)]
    pub logic: FilterLogic,
}

impl Filter {
    /// Convenience constructor for the common fully-specified case.
    pub fn new(column: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            column: Some(column.into()),
            operator: Some(operator.into()),
            value: Some(value),
            logic: FilterLogic::And,
        }
    }
}
