//! Table schema types for converge.
//!
//! This crate contains the value types that describe one table's structure:
//! its columns, primary key, and indexes. They carry no behavior beyond
//! construction, equality, and rendering - the diff engine and migrator live
//! in the `converge` crate, and collaborator implementations (schema
//! introspection, DDL execution) depend on these types without pulling in
//! the engine.
//!
//! ## Parameter semantics
//!
//! Column and index options live in a [`Params`] map. A key that is absent
//! is *not specified* and takes no part in comparison; there is no nil
//! value. That makes `{nullable: false}` and `{}` different parameter sets:
//! the first pins the option down, the second leaves it to the backend.

use indexmap::IndexMap;
use std::fmt;

/// Backend-agnostic column types.
///
/// These are semantic types, not raw SQL type strings: a backend decides
/// what `BigInt` or `Timestamp` is called in its dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 2-byte integer
    SmallInt,
    /// 4-byte integer
    Integer,
    /// 8-byte integer
    BigInt,
    /// 4-byte floating point
    Float,
    /// 8-byte floating point
    Double,
    /// arbitrary-precision numeric
    Decimal,
    /// true/false
    Boolean,
    /// variable-length text
    Text,
    /// raw bytes
    Binary,
    /// point in time
    Timestamp,
    /// calendar date
    Date,
    /// time of day
    Time,
    /// universally unique identifier
    Uuid,
    /// structured document
    Json,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::SmallInt => write!(f, "smallint"),
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::BigInt => write!(f, "bigint"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Double => write!(f, "double"),
            ColumnType::Decimal => write!(f, "decimal"),
            ColumnType::Boolean => write!(f, "boolean"),
            ColumnType::Text => write!(f, "text"),
            ColumnType::Binary => write!(f, "binary"),
            ColumnType::Timestamp => write!(f, "timestamp"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::Time => write!(f, "time"),
            ColumnType::Uuid => write!(f, "uuid"),
            ColumnType::Json => write!(f, "json"),
        }
    }
}

/// A column or index parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
        }
    }
}

/// Named options attached to a column or index definition.
///
/// Insertion order is preserved for display; equality ignores order.
/// An absent key means "not specified" - it never matches an explicit
/// value, and an explicit value never matches absence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(IndexMap<String, Value>);

impl Params {
    /// Whether the column accepts NULL.
    pub const NULLABLE: &'static str = "nullable";
    /// Default value expression.
    pub const DEFAULT: &'static str = "default";
    /// Length limit for text/binary columns.
    pub const LIMIT: &'static str = "limit";
    /// Total digits for decimal columns.
    pub const PRECISION: &'static str = "precision";
    /// Fractional digits for decimal columns.
    pub const SCALE: &'static str = "scale";
    /// Uniqueness (columns and indexes).
    pub const UNIQUE: &'static str = "unique";

    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter. The key may be one of the recognized options or
    /// any backend-specific name.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn nullable(self, nullable: bool) -> Self {
        self.set(Self::NULLABLE, nullable)
    }

    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.set(Self::DEFAULT, value)
    }

    pub fn limit(self, limit: u32) -> Self {
        self.set(Self::LIMIT, limit)
    }

    pub fn precision(self, precision: u32) -> Self {
        self.set(Self::PRECISION, precision)
    }

    pub fn scale(self, scale: u32) -> Self {
        self.set(Self::SCALE, scale)
    }

    pub fn unique(self, unique: bool) -> Self {
        self.set(Self::UNIQUE, unique)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        Ok(())
    }
}

/// A single column definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    /// Column name, unique within a table.
    pub name: String,
    /// Semantic column type.
    pub ty: ColumnType,
    /// Specified options.
    pub params: Params,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
            params: Params::new(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Structural equality: same type and same specified params.
    ///
    /// The name is excluded - columns are matched by name before this is
    /// consulted. An option specified on one side and absent on the other
    /// is a difference, even if the specified value is the backend default.
    pub fn same_structure(&self, other: &Self) -> bool {
        self.ty == other.ty && self.params == other.params
    }
}

/// An index definition.
///
/// Indexes are identified by their ordered column sequence, not their
/// name: an index renamed but still covering the same columns is the same
/// index, and a differently-named index over the same columns matches it
/// rather than counting as new. Column order matters - `(a, b)` and
/// `(b, a)` are different indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    /// Index name, unique within a table.
    pub name: String,
    /// Ordered column names the index covers.
    pub columns: Vec<String>,
    /// Specified options, `unique` among them.
    pub params: Params,
}

impl IndexDef {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            params: Params::new(),
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// The ordered column sequence - this index's identity key.
    pub fn key(&self) -> &[String] {
        &self.columns
    }
}

/// The declared or introspected structure of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name.
    pub name: String,
    /// Columns by name, in declaration/introspection order.
    pub columns: IndexMap<String, ColumnDef>,
    /// Name of the primary-key column, if one is declared. Always present
    /// in `columns` - the builder inserts it there.
    pub primary_key: Option<String>,
    /// Indexes keyed by their ordered column sequence.
    pub indexes: IndexMap<Vec<String>, IndexDef>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a column. Declaration order is preserved.
    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.insert(column.name.clone(), column);
        self
    }

    /// Add the primary-key column. It is inserted into `columns` like any
    /// other column, so the primary key always appears there.
    pub fn primary_key(mut self, column: ColumnDef) -> Self {
        self.primary_key = Some(column.name.clone());
        self.columns.insert(column.name.clone(), column);
        self
    }

    /// Add an index, keyed by its ordered column sequence.
    pub fn index(mut self, index: IndexDef) -> Self {
        self.indexes.insert(index.columns.clone(), index);
        self
    }

    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.get(name)
    }

    /// The primary-key column definition, if one is declared.
    pub fn primary_key_def(&self) -> Option<&ColumnDef> {
        self.primary_key.as_deref().and_then(|name| self.columns.get(name))
    }
}

#[cfg(test)]
mod tests;
