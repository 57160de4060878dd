//! Declarative table schema reconciliation.
//!
//! This crate converges the *actual* schema of a relational table with a
//! *declared target* schema: it computes the minimal set of structural
//! changes (create, alter, drop) needed, and applies them through a DDL
//! backend - under an explicit destructive-operation policy and a dry-run
//! mode that logs everything and executes nothing.
//!
//! The live database never appears here directly. Introspection, the
//! declarative registry, and DDL execution are collaborator traits
//! ([`SchemaExplorer`], [`SchemaRegistry`], [`DdlBackend`]) implemented
//! elsewhere; the engine orchestrates them one table at a time.
//!
//! # Example
//!
//! ```ignore
//! use converge::{Migrator, Options, SchemaCache};
//!
//! // `explorer`, `registry`, and `backend` are your implementations of
//! // the collaborator traits.
//! let cache = SchemaCache::new();
//! let mut migrator = Migrator::new(
//!     &explorer,
//!     &registry,
//!     &mut backend,
//!     &cache,
//!     Options { dry_run: true, ..Options::default() },
//! );
//! migrator.run("user")?;
//! ```
//!
//! Every planned and executed action is reported as one audit line; see
//! [`Reporter`] for the line format. A destructive
//! operation that the policy denies is not an error - it is a logged
//! skip, so scheduled non-destructive runs stay safe.

mod cache;
mod diff;
mod error;
mod migrate;
mod policy;
mod report;

pub use cache::SchemaCache;
pub use diff::{ColumnChange, IndexChange, SchemaDiff, diff};
pub use error::{BackendError, Error, Result};
pub use migrate::{
    DdlBackend, Migrator, Options, SchemaExplorer, SchemaRegistry, StaticRegistry,
};
pub use policy::{Category, Destructive};
pub use report::{BufferReporter, Reporter, TracingReporter};

// Re-export the schema model so collaborator implementations can name
// these types through one crate.
pub use converge_schema::{ColumnDef, ColumnType, IndexDef, Params, TableSchema, Value};
