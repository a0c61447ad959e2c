//! # appbase-commons
//!
//! Shared models, typed identifiers and error types for AppBase.
//!
//! This crate has no storage or evaluation logic of its own. It exists so
//! that appbase-store, appbase-core and appbase-render can exchange the same
//! vocabulary without depending on each other:
//!
//! - typed id newtypes ([`OwnerId`], [`DatabaseId`], [`NamespaceId`], ...)
//! - the metadata model ([`Database`], [`TableDef`], [`ColumnDef`])
//! - the declarative [`Filter`] model
//! - write-time value coercion ([`coerce`])
//! - the [`AppBaseError`] taxonomy shared by every crate

pub mod coerce;
pub mod errors;
pub mod ids;
pub mod models;

pub use errors::{AppBaseError, Result};
pub use ids::{ColumnId, ContainerId, DatabaseId, ElementId, NamespaceId, OwnerId, RecordId, TableId};
pub use models::database::{Database, DatabaseStatus};
pub use models::filter::{Filter, FilterLogic};
pub use models::schema::{ColumnDef, ColumnType, TableDef};

/// A stored row: one free-form JSON object document.
///
/// Storage does not enforce the table schema; only the record repository's
/// write path does.
pub type Document = serde_json::Map<String, serde_json::Value>;
