//! The per-table migrator.
//!
//! [`Migrator`] reconciles one table at a time: it resolves the table's
//! actual schema (through the [`SchemaCache`]) and its declared target
//! schema (from the [`SchemaRegistry`]), classifies the transition, and
//! issues change operations through the [`DdlBackend`] - every mutating
//! call gated by the destructive policy and the dry-run flag.
//!
//! Classification is driven purely by which sides exist:
//!
//! | actual  | target  | action                          |
//! |---------|---------|---------------------------------|
//! | absent  | absent  | configuration error             |
//! | present | absent  | drop table (policy-gated)       |
//! | present | present | diff, then alter (or no-op)     |
//! | absent  | present | create table, pk first          |

use converge_schema::{ColumnDef, IndexDef, TableSchema};
use indexmap::IndexMap;

use crate::cache::SchemaCache;
use crate::diff::diff;
use crate::error::{BackendError, Error, Result};
use crate::policy::{Category, Destructive};
use crate::report::{Reporter, TracingReporter};

/// Produces a table's actual schema from the live database.
pub trait SchemaExplorer {
    /// The schema of `table` as it currently exists, or `None` if the
    /// table does not exist - absence is not an error.
    fn discover_schema(&self, table: &str) -> Result<Option<TableSchema>, BackendError>;
}

/// Read-only snapshot of the declared target schemas.
pub trait SchemaRegistry {
    /// All declared table schemas, keyed by table name.
    fn schema_definitions(&self) -> IndexMap<String, TableSchema>;
}

/// Executes individual DDL statements.
///
/// One call per statement; each call either succeeds or raises. The
/// engine issues calls one at a time and never wraps them in a
/// transaction - whether the backend does is its own concern.
pub trait DdlBackend {
    /// Create `table` carrying only its primary-key column, so the
    /// backend can establish the key at creation time.
    fn create_table(
        &mut self,
        table: &str,
        primary_key: Option<&ColumnDef>,
    ) -> Result<(), BackendError>;

    fn drop_table(&mut self, table: &str) -> Result<(), BackendError>;

    fn add_column(&mut self, table: &str, column: &ColumnDef) -> Result<(), BackendError>;

    /// Change an existing column to `column`'s type and params.
    fn change_column(&mut self, table: &str, column: &ColumnDef) -> Result<(), BackendError>;

    fn drop_column(&mut self, table: &str, column: &str) -> Result<(), BackendError>;

    fn add_index(&mut self, table: &str, index: &IndexDef) -> Result<(), BackendError>;

    /// Drop the index covering `index.columns` - identified by its column
    /// list, not its name.
    fn drop_index(&mut self, table: &str, index: &IndexDef) -> Result<(), BackendError>;
}

/// A registry backed by a fixed set of schema definitions.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    definitions: IndexMap<String, TableSchema>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(mut self, schema: TableSchema) -> Self {
        self.definitions.insert(schema.name.clone(), schema);
        self
    }
}

impl SchemaRegistry for StaticRegistry {
    fn schema_definitions(&self) -> IndexMap<String, TableSchema> {
        self.definitions.clone()
    }
}

/// Options for one reconciliation session.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Which destructive categories may execute. Defaults to none.
    pub destructive: Destructive,
    /// Log every action without issuing any backend call. Classification
    /// and diffing still run in full, so dry-run output is identical to
    /// what a live run would log.
    pub dry_run: bool,
}

static DEFAULT_REPORTER: TracingReporter = TracingReporter;

/// Per-table reconciliation orchestrator.
///
/// All collaborators are explicit dependencies, borrowed for the
/// session's lifetime; there is no global state beyond whatever the
/// caller chooses to share (typically the [`SchemaCache`]).
pub struct Migrator<'a> {
    explorer: &'a dyn SchemaExplorer,
    registry: &'a dyn SchemaRegistry,
    backend: &'a mut dyn DdlBackend,
    cache: &'a SchemaCache,
    reporter: &'a dyn Reporter,
    destructive: Destructive,
    dry_run: bool,
}

impl<'a> Migrator<'a> {
    pub fn new(
        explorer: &'a dyn SchemaExplorer,
        registry: &'a dyn SchemaRegistry,
        backend: &'a mut dyn DdlBackend,
        cache: &'a SchemaCache,
        options: Options,
    ) -> Self {
        Self {
            explorer,
            registry,
            backend,
            cache,
            reporter: &DEFAULT_REPORTER,
            destructive: options.destructive,
            dry_run: options.dry_run,
        }
    }

    /// Replace the default tracing-backed reporter.
    pub fn with_reporter(mut self, reporter: &'a dyn Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Reconcile one table.
    ///
    /// The table's cache entry is invalidated when this returns -
    /// success, error, or dry-run alike - so the next resolve
    /// re-introspects.
    pub fn run(&mut self, table: &str) -> Result<()> {
        let outcome = self.reconcile(table);
        self.cache.invalidate(table);
        outcome
    }

    /// Reconcile every table named in the registry, sequentially,
    /// stopping at the first error.
    pub fn run_all(&mut self) -> Result<()> {
        let tables: Vec<String> = self.registry.schema_definitions().keys().cloned().collect();
        for table in &tables {
            self.run(table)?;
        }
        Ok(())
    }

    fn reconcile(&mut self, table: &str) -> Result<()> {
        let from = self
            .cache
            .resolve_with(table, || self.explorer.discover_schema(table))?;
        let to = self.registry.schema_definitions().shift_remove(table);

        match (from, to) {
            (None, None) => Err(Error::Configuration {
                table: table.to_string(),
            }),
            (Some(_), None) => self.drop_table(table),
            (Some(from), Some(to)) => self.alter_table(&from, &to),
            (None, Some(to)) => self.create_table(&to),
        }
    }

    fn drop_table(&mut self, table: &str) -> Result<()> {
        self.apply(
            format!("- DROP TABLE: {table}"),
            Some(Category::Tables),
            |backend| backend.drop_table(table),
        )
    }

    /// Create the table carrying only the primary-key column, then add
    /// every other column, then every index. The primary key goes first
    /// because it frequently affects physical layout and creation-time
    /// options.
    fn create_table(&mut self, schema: &TableSchema) -> Result<()> {
        let table = schema.name.as_str();
        let primary_key = schema.primary_key_def().cloned();

        self.apply(format!("- CREATE TABLE: {table}"), None, |backend| {
            backend.create_table(table, primary_key.as_ref())
        })?;

        for column in schema.columns.values() {
            if Some(column.name.as_str()) == schema.primary_key.as_deref() {
                continue;
            }
            self.apply(column_line("add", table, column), None, |backend| {
                backend.add_column(table, column)
            })?;
        }

        for index in schema.indexes.values() {
            self.apply(index_line("add", table, index), None, |backend| {
                backend.add_index(table, index)
            })?;
        }
        Ok(())
    }

    fn alter_table(&mut self, from: &TableSchema, to: &TableSchema) -> Result<()> {
        let table = to.name.as_str();
        let changes = diff(from, to);
        if changes.is_empty() {
            self.reporter.line(&format!("- no changes: {table}"));
            return Ok(());
        }

        self.reporter.line(&format!("- ALTER TABLE: {table}"));

        for (name, change) in &changes.columns {
            match (&change.from, &change.to) {
                (Some(from_col), None) => self.apply(
                    column_line("drop", table, from_col),
                    Some(Category::Columns),
                    |backend| backend.drop_column(table, name),
                )?,
                (Some(_), Some(to_col)) => self.apply(
                    column_line("change", table, to_col),
                    None,
                    |backend| backend.change_column(table, to_col),
                )?,
                (None, Some(to_col)) => {
                    self.apply(column_line("add", table, to_col), None, |backend| {
                        backend.add_column(table, to_col)
                    })?
                }
                (None, None) => unreachable!("diff never emits an entry with neither side"),
            }
        }

        for change in changes.indexes.values() {
            match (&change.from, &change.to) {
                // Index drops are deliberately not policy-gated: unlike
                // table and column drops they lose no data, only
                // structure. Dry-run still skips them.
                (Some(from_idx), None) => {
                    self.apply(index_line("drop", table, from_idx), None, |backend| {
                        backend.drop_index(table, from_idx)
                    })?
                }
                (None, Some(to_idx)) => {
                    self.apply(index_line("add", table, to_idx), None, |backend| {
                        backend.add_index(table, to_idx)
                    })?
                }
                _ => unreachable!("index diff only emits additions and removals"),
            }
        }
        Ok(())
    }

    /// Report the action line, then run `op` unless dry-run is on or the
    /// gate category is not permitted. The line is emitted in every case
    /// so dry-run output matches live output byte for byte.
    fn apply<F>(&mut self, line: String, gate: Option<Category>, op: F) -> Result<()>
    where
        F: FnOnce(&mut dyn DdlBackend) -> Result<(), BackendError>,
    {
        self.reporter.line(&line);
        if self.dry_run {
            return Ok(());
        }
        if let Some(category) = gate
            && !self.destructive.permits(category)
        {
            tracing::debug!(target: "converge", %line, "destructive operation not permitted, skipping");
            return Ok(());
        }
        op(&mut *self.backend)?;
        Ok(())
    }
}

fn column_line(action: &str, table: &str, column: &ColumnDef) -> String {
    let mut line = format!("-- {action} column: {table}.{} {}", column.name, column.ty);
    if !column.params.is_empty() {
        line.push_str(&format!(" ({})", column.params));
    }
    line
}

fn index_line(action: &str, table: &str, index: &IndexDef) -> String {
    let mut line = format!(
        "-- {action} index: index on {table}({})",
        index.columns.join(", ")
    );
    if !index.params.is_empty() {
        line.push_str(&format!(" ({})", index.params));
    }
    line
}
