//! Calculation, step and condition models.
//!
//! A Calculation is an ordered list of Steps producing one value per
//! evaluation; a Condition resolves two operands with the same step
//! vocabulary and applies an operator to produce a boolean. Neither has a
//! lifecycle of its own: both live inside their owning element's document.

use appbase_commons::{ContainerId, ElementId, Filter};
use appbase_core::QueryAction;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Step kind. `Operation` is carried for document compatibility but is not
/// evaluated; see DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Value,
    Operation,
}

impl Default for StepKind {
    fn default() -> Self {
        StepKind::Value
    }
}

/// Where a step's value comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum StepSource {
    /// Literal constant.
    Custom { value: Value },

    /// A named property of a referenced element, current UI state winning
    /// over the static tree.
    Element {
        element_id: ElementId,
        property: String,
    },

    /// A filtered read against a table, mirroring the record repository's
    /// read contract.
    Database {
        table: String,
        #[serde(default)]
        filters: Vec<Filter>,
        action: QueryAction,
        #[serde(default)]
        column: Option<String>,
    },

    /// A named column of the row currently bound to a repeating container.
    RepeatingContainer {
        container_id: ContainerId,
        column: String,
    },

    /// A named value from the screen-transition parameter set.
    PassedParameter { name: String },

    /// The current time.
    Timestamp,
}

/// One value-resolution unit, tagged by its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    #[serde(default)]
    pub kind: StepKind,
    #[serde(flatten)]
    pub source: StepSource,
}

impl Step {
    pub fn value(id: impl Into<String>, source: StepSource) -> Self {
        Self {
            id: id.into(),
            kind: StepKind::Value,
            source,
        }
    }
}

/// Named computation producing one value per evaluation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub id: String,
    pub steps: Vec<Step>,
}

impl Calculation {
    /// A single-step calculation, the only shape this version evaluates.
    pub fn single(id: impl Into<String>, source: StepSource) -> Self {
        let id = id.into();
        let step_id = format!("{}-0", id);
        Self {
            id,
            steps: vec![Step::value(step_id, source)],
        }
    }
}

/// Comparison or logical operator applied to a condition's two operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOp {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    And,
    Or,
}

/// Boolean-producing counterpart to a calculation; gates visibility or a
/// conditional-render branch choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
    pub steps: Vec<Step>,
    pub operator: ConditionOp,
}
