//! Schema diffing - compare a table's actual schema against its declared
//! target.
//!
//! This module compares two [`TableSchema`] instances and produces the
//! per-column and per-index changes needed to transform one into the
//! other.
//!
//! ## Index identity
//!
//! Indexes are matched by their ordered column sequence, never by name.
//! An index present on both sides is unchanged even when its params
//! differ - index *changes* are not a category; only additions and
//! removals exist.

use converge_schema::{ColumnDef, IndexDef, TableSchema};
use indexmap::IndexMap;

/// A diff between two table schemas.
#[derive(Debug, Clone, Default)]
pub struct SchemaDiff {
    /// Column changes keyed by column name.
    pub columns: IndexMap<String, ColumnChange>,
    /// Index changes keyed by ordered column sequence.
    pub indexes: IndexMap<Vec<String>, IndexChange>,
}

/// One column's before/after pair.
///
/// Only `from`: removal. Only `to`: addition. Both: structural change.
/// A column with no structural difference never appears in the diff, so
/// both sides present always means they differ.
#[derive(Debug, Clone)]
pub struct ColumnChange {
    pub from: Option<ColumnDef>,
    pub to: Option<ColumnDef>,
}

/// One index's before/after pair. Always an addition or a removal -
/// never both sides present.
#[derive(Debug, Clone)]
pub struct IndexChange {
    pub from: Option<IndexDef>,
    pub to: Option<IndexDef>,
}

impl SchemaDiff {
    /// Returns true if there are no differences.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.indexes.is_empty()
    }

    /// Count total number of changes.
    pub fn change_count(&self) -> usize {
        self.columns.len() + self.indexes.len()
    }
}

impl std::fmt::Display for SchemaDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No changes detected.");
        }
        writeln!(f, "Changes detected:")?;
        if !self.columns.is_empty() {
            writeln!(f, "  columns:")?;
            for (name, change) in &self.columns {
                match (&change.from, &change.to) {
                    (None, Some(to)) => writeln!(f, "    + {name}: {}", to.ty)?,
                    (Some(_), None) => writeln!(f, "    - {name}")?,
                    (Some(from), Some(to)) => {
                        writeln!(f, "    ~ {name}: {} -> {}", from.ty, to.ty)?
                    }
                    (None, None) => {}
                }
            }
        }
        if !self.indexes.is_empty() {
            writeln!(f, "  indexes:")?;
            for (key, change) in &self.indexes {
                let sign = if change.to.is_some() { '+' } else { '-' };
                writeln!(f, "    {sign} ({})", key.join(", "))?;
            }
        }
        Ok(())
    }
}

/// Compare `from` (actual) against `to` (target).
///
/// Pure and deterministic. The engine performs no identifier
/// normalization of its own - callers that want case-folded comparison
/// normalize before calling.
pub fn diff(from: &TableSchema, to: &TableSchema) -> SchemaDiff {
    let mut columns = IndexMap::new();

    // Union of column names, from-side order first. Structurally equal
    // columns are omitted entirely.
    for (name, from_col) in &from.columns {
        match to.columns.get(name) {
            Some(to_col) if from_col.same_structure(to_col) => {}
            Some(to_col) => {
                columns.insert(
                    name.clone(),
                    ColumnChange {
                        from: Some(from_col.clone()),
                        to: Some(to_col.clone()),
                    },
                );
            }
            None => {
                columns.insert(
                    name.clone(),
                    ColumnChange {
                        from: Some(from_col.clone()),
                        to: None,
                    },
                );
            }
        }
    }
    for (name, to_col) in &to.columns {
        if !from.columns.contains_key(name) {
            columns.insert(
                name.clone(),
                ColumnChange {
                    from: None,
                    to: Some(to_col.clone()),
                },
            );
        }
    }

    // Presence only: an index covering the same ordered columns on both
    // sides is the same index, whatever its name or params say.
    let mut indexes = IndexMap::new();
    for (key, from_idx) in &from.indexes {
        if !to.indexes.contains_key(key) {
            indexes.insert(
                key.clone(),
                IndexChange {
                    from: Some(from_idx.clone()),
                    to: None,
                },
            );
        }
    }
    for (key, to_idx) in &to.indexes {
        if !from.indexes.contains_key(key) {
            indexes.insert(
                key.clone(),
                IndexChange {
                    from: None,
                    to: Some(to_idx.clone()),
                },
            );
        }
    }

    SchemaDiff { columns, indexes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use converge_schema::{ColumnType, Params};

    fn make_column(name: &str, ty: ColumnType) -> ColumnDef {
        ColumnDef::new(name, ty)
    }

    fn user_table() -> TableSchema {
        TableSchema::new("user")
            .primary_key(make_column("id", ColumnType::BigInt))
            .column(make_column("email", ColumnType::Text))
            .index(IndexDef::new("idx_user_email", ["email"]))
    }

    #[test]
    fn test_diff_identical_schemas() {
        let schema = user_table();
        let d = diff(&schema, &schema);
        assert!(d.is_empty());
        assert_eq!(d.change_count(), 0);
    }

    #[test]
    fn test_diff_add_column() {
        let from = user_table();
        let to = user_table().column(make_column("age", ColumnType::Integer));

        let d = diff(&from, &to);
        assert_eq!(d.change_count(), 1);
        let change = &d.columns["age"];
        assert!(change.from.is_none());
        assert_eq!(change.to.as_ref().unwrap().ty, ColumnType::Integer);
    }

    #[test]
    fn test_diff_drop_column() {
        let from = user_table().column(make_column("age", ColumnType::Integer));
        let to = user_table();

        let d = diff(&from, &to);
        assert_eq!(d.change_count(), 1);
        let change = &d.columns["age"];
        assert!(change.from.is_some());
        assert!(change.to.is_none());
    }

    #[test]
    fn test_diff_change_column_type() {
        let from = user_table().column(make_column("age", ColumnType::Integer));
        let to = user_table().column(make_column("age", ColumnType::BigInt));

        let d = diff(&from, &to);
        let change = &d.columns["age"];
        assert_eq!(change.from.as_ref().unwrap().ty, ColumnType::Integer);
        assert_eq!(change.to.as_ref().unwrap().ty, ColumnType::BigInt);
    }

    #[test]
    fn test_diff_change_column_params() {
        let from = user_table().column(
            make_column("bio", ColumnType::Text).with_params(Params::new().nullable(true)),
        );
        let to = user_table().column(
            make_column("bio", ColumnType::Text).with_params(Params::new().nullable(false)),
        );

        let d = diff(&from, &to);
        assert_eq!(d.change_count(), 1);
        assert!(d.columns.contains_key("bio"));
    }

    #[test]
    fn test_diff_unspecified_param_differs_from_explicit() {
        // `nullable` left open is not the same as `nullable: true`.
        let from = user_table().column(make_column("bio", ColumnType::Text));
        let to = user_table().column(
            make_column("bio", ColumnType::Text).with_params(Params::new().nullable(true)),
        );

        let d = diff(&from, &to);
        assert_eq!(d.change_count(), 1);
    }

    #[test]
    fn test_diff_add_and_drop_index() {
        let from = TableSchema::new("user")
            .primary_key(make_column("id", ColumnType::BigInt))
            .index(IndexDef::new("idx_user_old", ["old"]));
        let to = TableSchema::new("user")
            .primary_key(make_column("id", ColumnType::BigInt))
            .index(IndexDef::new("idx_user_new", ["new"]));

        let d = diff(&from, &to);
        assert_eq!(d.indexes.len(), 2);
        assert!(d.indexes[["old".to_string()].as_slice()].to.is_none());
        assert!(d.indexes[["new".to_string()].as_slice()].from.is_none());
    }

    #[test]
    fn test_index_matched_by_columns_not_name() {
        let from = user_table();
        let mut to = user_table();
        // Same column sequence under a different name: still the same index.
        to.indexes[["email".to_string()].as_slice()].name = "idx_renamed".to_string();

        let d = diff(&from, &to);
        assert!(d.is_empty());
    }

    #[test]
    fn test_index_param_difference_is_not_a_change() {
        let from = TableSchema::new("user")
            .primary_key(make_column("id", ColumnType::BigInt))
            .index(IndexDef::new("idx_user_email", ["email"]));
        let to = TableSchema::new("user")
            .primary_key(make_column("id", ColumnType::BigInt))
            .index(
                IndexDef::new("idx_user_email", ["email"])
                    .with_params(Params::new().unique(true)),
            );

        let d = diff(&from, &to);
        assert!(d.is_empty());
    }

    #[test]
    fn test_composite_index_order_matters() {
        let from = TableSchema::new("user")
            .primary_key(make_column("id", ColumnType::BigInt))
            .index(IndexDef::new("idx_a", ["email", "name"]));
        let to = TableSchema::new("user")
            .primary_key(make_column("id", ColumnType::BigInt))
            .index(IndexDef::new("idx_a", ["name", "email"]));

        let d = diff(&from, &to);
        // Different ordered sequences: one removal plus one addition.
        assert_eq!(d.indexes.len(), 2);
    }

    #[test]
    fn test_diff_display() {
        let from = user_table().column(make_column("age", ColumnType::Integer));
        let to = user_table()
            .column(make_column("age", ColumnType::BigInt))
            .column(make_column("bio", ColumnType::Text));

        insta::assert_snapshot!(diff(&from, &to).to_string(), @r"
        Changes detected:
          columns:
            ~ age: integer -> bigint
            + bio: text
        ");
    }

    // ===== Algebraic laws =====

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_column() -> impl Strategy<Value = ColumnDef> {
            (
                prop::sample::select(vec!["id", "email", "name", "age", "bio", "created_at"]),
                prop::sample::select(vec![
                    ColumnType::BigInt,
                    ColumnType::Integer,
                    ColumnType::Text,
                    ColumnType::Boolean,
                    ColumnType::Timestamp,
                ]),
                proptest::option::of(any::<bool>()),
                proptest::option::of(0u32..512),
            )
                .prop_map(|(name, ty, nullable, limit)| {
                    let mut params = Params::new();
                    if let Some(nullable) = nullable {
                        params = params.nullable(nullable);
                    }
                    if let Some(limit) = limit {
                        params = params.limit(limit);
                    }
                    ColumnDef::new(name, ty).with_params(params)
                })
        }

        fn arb_index() -> impl Strategy<Value = IndexDef> {
            (
                prop::sample::subsequence(
                    vec!["id", "email", "name", "age"],
                    1..=3,
                ),
                proptest::option::of(any::<bool>()),
            )
                .prop_map(|(columns, unique)| {
                    let name = format!("idx_{}", columns.join("_"));
                    let mut params = Params::new();
                    if let Some(unique) = unique {
                        params = params.unique(unique);
                    }
                    IndexDef::new(name, columns).with_params(params)
                })
        }

        fn arb_schema() -> impl Strategy<Value = TableSchema> {
            (
                prop::collection::vec(arb_column(), 0..6),
                prop::collection::vec(arb_index(), 0..3),
            )
                .prop_map(|(columns, indexes)| {
                    let mut schema = TableSchema::new("user");
                    for column in columns {
                        schema = schema.column(column);
                    }
                    for index in indexes {
                        schema = schema.index(index);
                    }
                    schema
                })
        }

        proptest! {
            #[test]
            fn diff_with_self_is_empty(schema in arb_schema()) {
                prop_assert!(diff(&schema, &schema).is_empty());
            }

            #[test]
            fn diff_never_reports_noop_columns(a in arb_schema(), b in arb_schema()) {
                for change in diff(&a, &b).columns.values() {
                    match (&change.from, &change.to) {
                        (Some(from), Some(to)) => prop_assert!(!from.same_structure(to)),
                        (None, None) => prop_assert!(false, "entry with neither side"),
                        _ => {}
                    }
                }
            }

            #[test]
            fn index_diff_only_adds_and_drops(a in arb_schema(), b in arb_schema()) {
                for change in diff(&a, &b).indexes.values() {
                    prop_assert!(change.from.is_some() != change.to.is_some());
                }
            }
        }
    }
}
