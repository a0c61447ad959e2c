//! # appbase-core
//!
//! The per-tenant data layer of AppBase: logical Databases of typed tables
//! mapped onto isolated physical namespaces, with typed coercion on every
//! write and filter-driven queries on every read.
//!
//! ## Architecture
//!
//! ```text
//! TableQueryService (count / value / values)
//!     ↓
//! RecordRepository ── compile() ── filter predicates
//!     ↓
//! MetadataStore / DatabaseRegistry ── DatabaseCatalog (metadata documents)
//!     ↓
//! appbase-store (StorageDriver)
//! ```
//!
//! Every record or filter operation opens one short-lived namespace session
//! and releases it on all exit paths. Metadata mutations pair with a
//! physical side effect; when the physical half fails, the metadata half is
//! rolled back best-effort and the storage error propagates.

pub mod catalog;
pub mod filters;
pub mod metadata;
pub mod query;
pub mod records;
pub mod registry;

pub use catalog::DatabaseCatalog;
pub use filters::{compile, RecordPredicate};
pub use metadata::MetadataStore;
pub use query::{QueryAction, QueryRequest, QueryResponse, TableQueryService};
pub use records::{Record, RecordRepository};
pub use registry::DatabaseRegistry;
