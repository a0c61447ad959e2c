//! # appbase-render
//!
//! The UI-facing half of AppBase: the element tree end users design, and
//! the calculation/condition evaluator that turns multi-source expressions
//! (constants, UI state, stored records, repeating-row bindings,
//! cross-screen parameters, timestamps) into the values and booleans the
//! renderer needs.
//!
//! Evaluation is a pure read over current state: no side effects, no shared
//! mutable state across repeating rows, always safe to repeat. Each
//! repeating-container row gets its own isolated [`EvalContext`]; evaluating
//! the same calculation against different rows is how per-row rendering
//! works.

pub mod calc;
pub mod context;
pub mod element;
pub mod evaluator;
pub mod source;

pub use calc::{Calculation, Condition, ConditionOp, Step, StepKind, StepSource};
pub use context::EvalContext;
pub use element::{Element, ElementKind, RenderMode, RepeatingBinding};
pub use evaluator::Evaluator;
pub use source::{LiveRecordSource, RecordSource, StaticRecordSource};
