//! # appbase-store
//!
//! Storage-driver abstraction for AppBase. This crate isolates all physical
//! storage interaction behind a trait, so appbase-core stays free of any
//! concrete engine and can be tested against the in-memory driver.
//!
//! ## Architecture
//!
//! ```text
//! appbase-core (registry, metadata, records, filters)
//!     ↓
//! appbase-store (StorageDriver / NamespaceSession)
//!     ↓
//! storage engine (MemoryDriver here; anything namespace-shaped elsewhere)
//! ```
//!
//! ## Namespace model
//!
//! Each logical Database owns exactly one namespace; each table maps to one
//! container of free-form JSON documents inside it. Sessions are short-lived
//! and scoped to a single operation: acquire with [`StorageDriver::open`],
//! release happens on drop, on every exit path.

pub mod driver;
pub mod memory;
pub mod namespace;

pub use driver::{NamespaceSession, StorageDriver};
pub use memory::MemoryDriver;
pub use namespace::{derive_namespace_id, derive_namespace_id_at};
