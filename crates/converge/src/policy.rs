//! Destructive-operation policy.
//!
//! Destructive DDL - anything that can lose data or structure - is opt-in
//! per category. Additions and in-place column changes are never consulted
//! against this policy; only drops are.

/// Categories of destructive DDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Tables,
    Columns,
    Indexes,
}

/// Which destructive categories a reconciliation may execute.
///
/// Resolved at construction into concrete booleans - there is no dynamic
/// lookup at check time. The default denies everything, so repeated
/// non-destructive runs are safe to schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destructive {
    /// One switch for every category.
    All(bool),
    /// Per-category switches. A category left `false` is denied.
    PerCategory {
        tables: bool,
        columns: bool,
        indexes: bool,
    },
}

impl Default for Destructive {
    fn default() -> Self {
        Destructive::All(false)
    }
}

impl Destructive {
    /// Is this category of destructive operation permitted?
    pub fn permits(&self, category: Category) -> bool {
        match *self {
            Destructive::All(allowed) => allowed,
            Destructive::PerCategory {
                tables,
                columns,
                indexes,
            } => match category {
                Category::Tables => tables,
                Category::Columns => columns,
                Category::Indexes => indexes,
            },
        }
    }
}
