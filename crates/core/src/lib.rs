//! schemaforge-core fetches table metadata from a metadata server and keeps
//! it in a time-bounded cache for the code generators.
//!
//! # Overview
//!
//! A [`schema::TableSchema`] describes one table: its ordered columns, their
//! declared types and constraints, and the row-level-security flag-set for the
//! current access context. Schemas reach the process through a
//! [`injector::SchemaSource`] and are handed out by a
//! [`injector::SchemaInjector`], which validates the wire shape once and then
//! serves repeated requests from memory until the entry expires.
//!
//! # Key Features
//!
//! - Shape validation of metadata server responses
//! - TTL cache with explicit lifecycle (no process-wide singleton)
//! - Deduplication of concurrent fetches for the same table
//! - HTTP and snapshot-directory sources
//! - Optional UI metadata (labels, order, visibility) from a second server
//!
//! # Quick Start
//!
//! ```no_run
//! use schemaforge_core::prelude::*;
//!
//! # async fn run() -> Result<(), SchemaError> {
//! let source = HttpSchemaSource::new("http://localhost:8000")?;
//! let injector = SchemaInjector::new(source);
//!
//! let schema = injector.get_schema("invoices").await?;
//! println!("{} has {} columns", schema.table, schema.columns.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod injector;
pub mod prelude;
pub mod schema;
pub mod ui;
