//! Filter compiler.
//!
//! Turns a declarative filter list plus the table's column types into one
//! composite predicate over stored documents. Filter values are coerced with
//! the same write-path rules, so `"18"` compares numerically against a
//! number column. Incomplete filters and unrecognized operators are skipped,
//! never an error. Combination is always AND; each filter's `logic` field is
//! accepted structurally but not honored.

use appbase_commons::coerce::{coerce, coerce_boolean, coerce_date, coerce_number, coerce_string};
use appbase_commons::{ColumnDef, ColumnType, Document, Filter};
use chrono::Utc;
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterOp {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Contains,
}

impl FilterOp {
    fn parse(op: &str) -> Option<Self> {
        match op {
            "equals" => Some(Self::Equals),
            "not_equals" => Some(Self::NotEquals),
            "greater_than" => Some(Self::GreaterThan),
            "less_than" => Some(Self::LessThan),
            "greater_equal" => Some(Self::GreaterEqual),
            "less_equal" => Some(Self::LessEqual),
            "contains" => Some(Self::Contains),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledFilter {
    column: String,
    op: FilterOp,
    value: Value,
    ctype: ColumnType,
}

impl CompiledFilter {
    fn matches(&self, doc: &Document) -> bool {
        let field = doc.get(&self.column).unwrap_or(&Value::Null);

        if self.op == FilterOp::Contains {
            // Case-insensitive substring over the stringified values.
            let haystack = coerce_string(field).to_lowercase();
            let needle = coerce_string(&self.value).to_lowercase();
            return haystack.contains(&needle);
        }

        let ordering = match self.ctype {
            ColumnType::Number => coerce_number(field).partial_cmp(&coerce_number(&self.value)),
            ColumnType::Boolean => {
                Some(coerce_boolean(field).cmp(&coerce_boolean(&self.value)))
            }
            ColumnType::Date => {
                let now = Utc::now();
                Some(coerce_date(field, now).cmp(&coerce_date(&self.value, now)))
            }
            ColumnType::String => Some(coerce_string(field).cmp(&coerce_string(&self.value))),
        };
        let Some(ordering) = ordering else {
            return false;
        };

        match self.op {
            FilterOp::Equals => ordering == Ordering::Equal,
            FilterOp::NotEquals => ordering != Ordering::Equal,
            FilterOp::GreaterThan => ordering == Ordering::Greater,
            FilterOp::LessThan => ordering == Ordering::Less,
            FilterOp::GreaterEqual => ordering != Ordering::Less,
            FilterOp::LessEqual => ordering != Ordering::Greater,
            FilterOp::Contains => unreachable!("handled above"),
        }
    }
}

/// Composite predicate over stored documents. Empty means match-all.
#[derive(Debug, Clone, Default)]
pub struct RecordPredicate {
    filters: Vec<CompiledFilter>,
}

impl RecordPredicate {
    /// True when the document satisfies every compiled filter (AND).
    pub fn matches(&self, doc: &Document) -> bool {
        self.filters.iter().all(|f| f.matches(doc))
    }

    /// True when no filter survived compilation.
    pub fn is_match_all(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Compiles a filter list against a column set.
///
/// Filters missing their column, operator or value are skipped; so are
/// filters with an operator nobody recognizes (with a warning). A column
/// absent from `columns` is treated as a string column.
pub fn compile(filters: &[Filter], columns: &[ColumnDef]) -> RecordPredicate {
    let mut compiled = Vec::new();
    for filter in filters {
        let (Some(column), Some(operator)) = (&filter.column, &filter.operator) else {
            continue;
        };
        let Some(value) = &filter.value else {
            continue;
        };
        let Some(op) = FilterOp::parse(operator) else {
            log::warn!("skipping filter on {}: unrecognized operator {}", column, operator);
            continue;
        };

        let ctype = columns
            .iter()
            .find(|c| &c.name == column)
            .map(|c| c.ctype)
            .unwrap_or_default();
        compiled.push(CompiledFilter {
            column: column.clone(),
            op,
            value: coerce(value, ctype, Utc::now()),
            ctype,
        });
    }
    RecordPredicate { filters: compiled }
}
