//! Database schema, migrations, and query builders.
//!
//! Used by: `sitework-store`, which executes the built statements against
//! SQLite and layers referential checks and cascades on top.

pub mod blueprints;
pub mod companies;
pub mod migrations;
pub mod projects;
pub mod reports;
pub mod tables;
pub mod tasks;
pub mod users;

// Re-export tables for convenience
pub use tables::*;

/// A built statement: SQL text plus its bound values.
pub type Built = (String, sea_query::Values);
