//! Evaluation context.
//!
//! Everything a step may read from, gathered behind one borrow: the element
//! tree, current UI state, repeating-row bindings, screen parameters, the
//! clock, and record access. Contexts are cheap to clone; `for_row` hands
//! each repeating-container row its own copy so no state leaks between rows.

use crate::element::Element;
use crate::source::RecordSource;
use appbase_commons::{AppBaseError, ContainerId, Document, ElementId, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Clone)]
pub struct EvalContext<'a> {
    root: Option<&'a Element>,
    owner: Option<&'a Element>,
    element_state: HashMap<ElementId, HashMap<String, Value>>,
    rows: HashMap<ContainerId, Document>,
    params: HashMap<String, Value>,
    now: DateTime<Utc>,
    records: Option<&'a dyn RecordSource>,
}

impl<'a> EvalContext<'a> {
    pub fn new() -> Self {
        Self {
            root: None,
            owner: None,
            element_state: HashMap::new(),
            rows: HashMap::new(),
            params: HashMap::new(),
            now: Utc::now(),
            records: None,
        }
    }

    /// The screen's element tree, used to resolve element-sourced steps.
    pub fn with_root(mut self, root: &'a Element) -> Self {
        self.root = Some(root);
        self
    }

    /// The element whose calculation is being evaluated.
    pub fn with_owner(mut self, owner: &'a Element) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_records(mut self, records: &'a dyn RecordSource) -> Self {
        self.records = Some(records);
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: Value) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Overrides a static element property with live UI state (e.g. what the
    /// user typed into an input).
    pub fn with_state(
        mut self,
        element_id: impl Into<ElementId>,
        property: impl Into<String>,
        value: Value,
    ) -> Self {
        self.element_state
            .entry(element_id.into())
            .or_default()
            .insert(property.into(), value);
        self
    }

    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// A copy of this context bound to one row of a repeating container.
    pub fn for_row(&self, container_id: impl Into<ContainerId>, row: Document) -> Self {
        let mut ctx = self.clone();
        ctx.rows.insert(container_id.into(), row);
        ctx
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Resolves an element property: live state wins, then the static tree.
    /// `None` when the element or the property is unknown.
    pub fn element_property(&self, element_id: &ElementId, property: &str) -> Option<Value> {
        if let Some(state) = self.element_state.get(element_id) {
            if let Some(value) = state.get(property) {
                return Some(value.clone());
            }
        }
        self.find_element(element_id)
            .and_then(|el| el.property(property))
    }

    /// The named column of the row bound to `container_id`, if any.
    pub fn row_value(&self, container_id: &ContainerId, column: &str) -> Option<Value> {
        self.rows
            .get(container_id)
            .map(|row| row.get(column).cloned().unwrap_or(Value::Null))
    }

    pub fn param(&self, name: &str) -> Option<Value> {
        self.params.get(name).cloned()
    }

    pub fn records(&self) -> Result<&'a dyn RecordSource> {
        self.records
            .ok_or_else(|| AppBaseError::internal("no record source attached to context"))
    }

    fn find_element(&self, id: &ElementId) -> Option<&'a Element> {
        if let Some(owner) = self.owner {
            if &owner.id == id {
                return Some(owner);
            }
        }
        self.root.and_then(|root| root.find(id))
    }
}

impl<'a> Default for EvalContext<'a> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use serde_json::json;

    #[test]
    fn test_state_wins_over_static_tree() {
        let tree = Element::new(
            "name-input",
            ElementKind::Input {
                placeholder: "Your name".into(),
                default_value: None,
            },
        );
        let ctx = EvalContext::new()
            .with_root(&tree)
            .with_state("name-input", "placeholder", json!("typed"));
        assert_eq!(
            ctx.element_property(&"name-input".into(), "placeholder"),
            Some(json!("typed"))
        );
    }

    #[test]
    fn test_falls_back_to_static_property() {
        let tree = Element::new(
            "greeting",
            ElementKind::Text {
                text: "hello".into(),
            },
        );
        let ctx = EvalContext::new().with_root(&tree);
        assert_eq!(
            ctx.element_property(&"greeting".into(), "text"),
            Some(json!("hello"))
        );
        assert_eq!(ctx.element_property(&"greeting".into(), "label"), None);
    }

    #[test]
    fn test_for_row_isolates_rows() {
        let base = EvalContext::new();
        let row_a: Document = [("name".to_string(), json!("Ada"))].into_iter().collect();
        let row_b: Document = [("name".to_string(), json!("Grace"))].into_iter().collect();
        let a = base.for_row("list", row_a);
        let b = base.for_row("list", row_b);

        assert_eq!(a.row_value(&"list".into(), "name"), Some(json!("Ada")));
        assert_eq!(b.row_value(&"list".into(), "name"), Some(json!("Grace")));
        assert_eq!(base.row_value(&"list".into(), "name"), None);
    }

    #[test]
    fn test_missing_record_source_is_internal() {
        let err = EvalContext::new().records().err().unwrap();
        assert!(matches!(err, AppBaseError::Internal(_)));
    }
}
