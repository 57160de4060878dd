use super::*;

#[test]
fn test_params_absence_is_not_false() {
    let specified = Params::new().nullable(false);
    let unspecified = Params::new();
    assert_ne!(specified, unspecified);

    let explicit_zero = Params::new().limit(0);
    assert_ne!(explicit_zero, Params::new());
}

#[test]
fn test_params_equality_ignores_order() {
    let a = Params::new().nullable(false).limit(255);
    let b = Params::new().limit(255).nullable(false);
    assert_eq!(a, b);
}

#[test]
fn test_params_display_in_insertion_order() {
    let params = Params::new().limit(255).nullable(false);
    assert_eq!(params.to_string(), "limit: 255, nullable: false");
}

#[test]
fn test_params_backend_specific_keys() {
    let params = Params::new().set("collation", "C").set("fillfactor", 70);
    assert_eq!(params.get("collation"), Some(&Value::Text("C".to_string())));
    assert_eq!(params.get("fillfactor"), Some(&Value::Int(70)));
    assert_eq!(params.get("storage"), None);
}

#[test]
fn test_column_same_structure() {
    let a = ColumnDef::new("email", ColumnType::Text).with_params(Params::new().limit(255));
    let b = ColumnDef::new("contact", ColumnType::Text).with_params(Params::new().limit(255));
    // Name is not part of structure.
    assert!(a.same_structure(&b));

    let wider = ColumnDef::new("email", ColumnType::Text).with_params(Params::new().limit(512));
    assert!(!a.same_structure(&wider));

    let retyped = ColumnDef::new("email", ColumnType::Binary).with_params(Params::new().limit(255));
    assert!(!a.same_structure(&retyped));
}

#[test]
fn test_column_structure_absence_vs_explicit() {
    let explicit = ColumnDef::new("active", ColumnType::Boolean)
        .with_params(Params::new().nullable(false));
    let silent = ColumnDef::new("active", ColumnType::Boolean);
    assert!(!explicit.same_structure(&silent));
}

#[test]
fn test_index_key_is_ordered() {
    let ab = IndexDef::new("idx_a_b", ["a", "b"]);
    let ba = IndexDef::new("idx_b_a", ["b", "a"]);
    assert_eq!(ab.key(), ["a".to_string(), "b".to_string()].as_slice());
    assert_ne!(ab.key(), ba.key());
}

#[test]
fn test_primary_key_appears_in_columns() {
    let schema = TableSchema::new("user")
        .primary_key(ColumnDef::new("id", ColumnType::BigInt))
        .column(ColumnDef::new("email", ColumnType::Text));

    assert_eq!(schema.primary_key.as_deref(), Some("id"));
    assert!(schema.get_column("id").is_some());

    let pk = schema.primary_key_def().unwrap();
    assert_eq!(pk.name, "id");
    assert_eq!(pk.ty, ColumnType::BigInt);
}

#[test]
fn test_table_preserves_declaration_order() {
    let schema = TableSchema::new("user")
        .primary_key(ColumnDef::new("id", ColumnType::BigInt))
        .column(ColumnDef::new("email", ColumnType::Text))
        .column(ColumnDef::new("age", ColumnType::Integer));

    let names: Vec<&str> = schema.columns.keys().map(String::as_str).collect();
    assert_eq!(names, ["id", "email", "age"]);
}

#[test]
fn test_indexes_keyed_by_column_sequence() {
    let schema = TableSchema::new("user")
        .index(IndexDef::new("idx_user_email", ["email"]))
        .index(IndexDef::new("idx_user_email_name", ["email", "name"]));

    assert!(schema.indexes.contains_key(["email".to_string()].as_slice()));
    assert!(
        schema
            .indexes
            .contains_key(["email".to_string(), "name".to_string()].as_slice())
    );
}

#[test]
fn test_column_type_display() {
    assert_eq!(ColumnType::BigInt.to_string(), "bigint");
    assert_eq!(ColumnType::Timestamp.to_string(), "timestamp");
    assert_eq!(ColumnType::Decimal.to_string(), "decimal");
}
