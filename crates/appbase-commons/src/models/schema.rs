//! Table and column definitions.
//!
//! These describe the logical schema of a Database. They carry no row data;
//! the physical containers hold free-form documents constrained only by the
//! record repository's write path.

use crate::ids::{ColumnId, TableId};
use serde::{Deserialize, Serialize};

/// Data type of a column. Drives write-time coercion and filter compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Boolean,
    Date,
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::String
    }
}

/// Typed field declaration with an insertion-derived display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub id: ColumnId,

    /// Column name, unique within its table.
    pub name: String,

    #[serde(rename = "type")]
    pub ctype: ColumnType,

    /// Assigned at creation as (max existing order, or -1) + 1.
    /// Never reused after a column is deleted.
    pub order: i64,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ctype: ColumnType, order: i64) -> Self {
        Self {
            id: ColumnId::generate(),
            name: name.into(),
            ctype,
            order,
        }
    }
}

/// Named set of typed columns. Maps 1:1 to one physical container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    pub id: TableId,

    /// Table name, unique within its Database, case-sensitive.
    pub name: String,

    /// Ordered by insertion; display order lives on each column.
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TableId::generate(),
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Looks up a column by id.
    pub fn column_by_id(&self, id: &ColumnId) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| &c.id == id)
    }

    /// The order the next added column receives: (max existing, or -1) + 1.
    ///
    /// Orders of deleted columns are never handed out again.
    pub fn next_order(&self) -> i64 {
        self.columns.iter().map(|c| c.order).max().unwrap_or(-1) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_order_monotonic() {
        let mut table = TableDef::new("leads");
        assert_eq!(table.next_order(), 0);

        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            let order = table.next_order();
            assert_eq!(order, i as i64);
            table
                .columns
                .push(ColumnDef::new(*name, ColumnType::String, order));
        }

        // Removing b frees order 1, but it is never reused.
        table.columns.retain(|c| c.name != "b");
        assert_eq!(table.next_order(), 3);
    }

    #[test]
    fn test_column_lookup() {
        let mut table = TableDef::new("leads");
        table
            .columns
            .push(ColumnDef::new("age", ColumnType::Number, 0));

        assert!(table.column("age").is_some());
        assert!(table.column("Age").is_none()); // case-sensitive
        let id = table.columns[0].id.clone();
        assert!(table.column_by_id(&id).is_some());
    }

    #[test]
    fn test_column_type_wire_format() {
        let json = serde_json::to_string(&ColumnType::Number).unwrap();
        assert_eq!(json, "\"number\"");
        let back: ColumnType = serde_json::from_str("\"date\"").unwrap();
        assert_eq!(back, ColumnType::Date);
    }
}
