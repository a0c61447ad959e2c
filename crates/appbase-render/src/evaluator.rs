//! Calculation and condition evaluation.
//!
//! Evaluation is a pure read: resolve each operand from its source through
//! the context, then (for conditions) apply the operator. Repeating the same
//! evaluation against the same context always yields the same value, except
//! for timestamp steps which read the context clock.
//!
//! This version evaluates single-step calculations only. Multi-step chains
//! and `operation` steps are stored but rejected at evaluation time with
//! `ValidationFailed`, so documents carrying them fail loudly instead of
//! producing a silently wrong value.

use crate::calc::{Calculation, Condition, ConditionOp, Step, StepKind, StepSource};
use crate::context::EvalContext;
use crate::element::{Element, RenderMode};
use appbase_commons::coerce::coerce_string;
use appbase_commons::{AppBaseError, Result};
use appbase_core::QueryAction;
use serde_json::Value;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluates a calculation to one value. Empty calculations are null.
    pub fn evaluate(&self, calc: &Calculation, ctx: &EvalContext<'_>) -> Result<Value> {
        match calc.steps.as_slice() {
            [] => Ok(Value::Null),
            [step] => self.resolve(step, ctx),
            _ => Err(AppBaseError::validation(format!(
                "calculation {} has {} steps; only single-step calculations are supported",
                calc.id,
                calc.steps.len()
            ))),
        }
    }

    /// Tests a condition: the first two steps are the operands.
    pub fn test(&self, cond: &Condition, ctx: &EvalContext<'_>) -> Result<bool> {
        let [left, right, ..] = cond.steps.as_slice() else {
            return Err(AppBaseError::validation(format!(
                "condition {} needs two operand steps, has {}",
                cond.id,
                cond.steps.len()
            )));
        };
        let left = self.resolve(left, ctx)?;
        let right = self.resolve(right, ctx)?;

        Ok(match cond.operator {
            ConditionOp::Equals => compare(&left, &right) == Ordering::Equal,
            ConditionOp::NotEquals => compare(&left, &right) != Ordering::Equal,
            ConditionOp::GreaterThan => compare(&left, &right) == Ordering::Greater,
            ConditionOp::LessThan => compare(&left, &right) == Ordering::Less,
            ConditionOp::GreaterEqual => compare(&left, &right) != Ordering::Less,
            ConditionOp::LessEqual => compare(&left, &right) != Ordering::Greater,
            ConditionOp::And => truthy(&left) && truthy(&right),
            ConditionOp::Or => truthy(&left) || truthy(&right),
        })
    }

    /// Whether an element should render under the current context. Fixed
    /// elements always do; conditional ones when every condition holds.
    pub fn is_visible(&self, element: &Element, ctx: &EvalContext<'_>) -> Result<bool> {
        match &element.render {
            RenderMode::Fixed => Ok(true),
            RenderMode::Conditional { conditions } => {
                for cond in conditions {
                    if !self.test(cond, ctx)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    fn resolve(&self, step: &Step, ctx: &EvalContext<'_>) -> Result<Value> {
        if step.kind == StepKind::Operation {
            return Err(AppBaseError::validation(format!(
                "step {} is an operation; operations are not evaluated",
                step.id
            )));
        }

        match &step.source {
            StepSource::Custom { value } => Ok(value.clone()),

            StepSource::Element {
                element_id,
                property,
            } => {
                let value = ctx.element_property(element_id, property);
                if value.is_none() {
                    log::warn!(
                        "step {}: element {} has no property {}",
                        step.id,
                        element_id,
                        property
                    );
                }
                Ok(value.unwrap_or(Value::Null))
            }

            StepSource::Database {
                table,
                filters,
                action,
                column,
            } => {
                let records = ctx.records()?;
                match action {
                    QueryAction::Count => {
                        Ok(Value::from(records.count(table, filters)? as u64))
                    }
                    QueryAction::Value => {
                        let column = required_column(column, step)?;
                        records.value(table, filters, column)
                    }
                    QueryAction::Values => {
                        let column = required_column(column, step)?;
                        Ok(Value::Array(records.values(table, filters, column)?))
                    }
                }
            }

            StepSource::RepeatingContainer {
                container_id,
                column,
            } => Ok(ctx
                .row_value(container_id, column)
                .unwrap_or(Value::Null)),

            StepSource::PassedParameter { name } => {
                Ok(ctx.param(name).unwrap_or(Value::Null))
            }

            StepSource::Timestamp => Ok(Value::String(ctx.now().to_rfc3339())),
        }
    }
}

fn required_column<'a>(column: &'a Option<String>, step: &Step) -> Result<&'a str> {
    column.as_deref().ok_or_else(|| {
        AppBaseError::validation(format!("step {} needs a column for this action", step.id))
    })
}

/// Orders two values: numerically when both sides read as numbers,
/// lexically over their string forms otherwise.
fn compare(a: &Value, b: &Value) -> Ordering {
    if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    coerce_string(a).cmp(&coerce_string(b))
}

fn numeric(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}
