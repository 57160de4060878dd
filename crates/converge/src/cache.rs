//! Memoization of introspected schemas.

use std::collections::HashMap;
use std::sync::Mutex;

use converge_schema::TableSchema;

use crate::error::BackendError;

/// Cache of introspected ("from") schemas, keyed by table name.
///
/// An entry of `None` records a table that was introspected and found
/// absent - distinct from a table that was never looked up, which has no
/// entry at all.
///
/// The cache is an explicitly owned object: create one per reconciliation
/// session, or share one by reference across sessions. All mutation is
/// behind a mutex, and the lock is held across the fill call so concurrent
/// resolves of the same table cannot race.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: Mutex<HashMap<String, Option<TableSchema>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the entry for `table`, introspecting via `fill` on a miss.
    ///
    /// A cached absence is returned as-is; `fill` runs only when the table
    /// has no entry at all. A `fill` error is propagated and nothing is
    /// cached for the table.
    pub fn resolve_with<F>(&self, table: &str, fill: F) -> Result<Option<TableSchema>, BackendError>
    where
        F: FnOnce() -> Result<Option<TableSchema>, BackendError>,
    {
        let mut entries = self.entries.lock().unwrap();
        if let Some(cached) = entries.get(table) {
            return Ok(cached.clone());
        }
        let discovered = fill()?;
        entries.insert(table.to_string(), discovered.clone());
        Ok(discovered)
    }

    /// Drop the entry for `table`, forcing re-introspection on the next
    /// resolve.
    pub fn invalidate(&self, table: &str) {
        self.entries.lock().unwrap().remove(table);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
