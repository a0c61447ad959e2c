//! Data models shared across the workspace.

pub mod database;
pub mod filter;
pub mod schema;
