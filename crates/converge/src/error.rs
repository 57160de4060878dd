use thiserror::Error;

/// Errors surfaced by a table reconciliation.
#[derive(Debug, Error)]
pub enum Error {
    /// Neither the database nor the registry knows the table. Fatal for
    /// that table's reconciliation; never retried.
    #[error("no schema found for table '{table}' in either the database or the registry")]
    Configuration { table: String },

    /// A collaborator rejected an operation. Propagated unmodified; the
    /// engine performs no retry and no rollback of earlier statements.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Result type for converge operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error raised by a collaborator (schema introspection or DDL
/// execution).
#[derive(Debug, Error)]
#[error("{context}")]
pub struct BackendError {
    context: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl BackendError {
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: None,
        }
    }

    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}
