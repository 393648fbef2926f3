use campus_core::error::DbError;
use campus_core::fields::FieldMap;
use campus_core::statement::{build_delete, build_insert, build_update};
use campus_core::translation::{PlaceholderStyle, translate_placeholders};
use campus_core::types::SqlValue;

#[test]
fn insert_lists_columns_in_map_order() -> Result<(), Box<dyn std::error::Error>> {
    let fields = FieldMap::new()
        .set("name", SqlValue::Text("Math".into()))
        .set("code", SqlValue::Text("MTH1".into()))
        .set("school_id", SqlValue::Int(3));

    let built = build_insert("subjects", &fields)?;
    assert_eq!(
        built.sql,
        "INSERT INTO subjects (name, code, school_id) VALUES (?, ?, ?)"
    );
    assert_eq!(
        built.params,
        vec![
            SqlValue::Text("Math".into()),
            SqlValue::Text("MTH1".into()),
            SqlValue::Int(3),
        ]
    );
    Ok(())
}

#[test]
fn update_binds_field_values_before_where_params() -> Result<(), Box<dyn std::error::Error>> {
    let fields = FieldMap::new()
        .set("x", SqlValue::Int(1))
        .set("y", SqlValue::Int(2));

    let built = build_update("grades", &fields, "id = ?", &[SqlValue::Int(5)])?;
    assert_eq!(built.sql, "UPDATE grades SET x = ?, y = ? WHERE id = ?");
    assert_eq!(
        built.params,
        vec![SqlValue::Int(1), SqlValue::Int(2), SqlValue::Int(5)]
    );
    Ok(())
}

#[test]
fn delete_keeps_where_params_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let built = build_delete(
        "messages",
        "sender_id = ? AND read = ?",
        &[SqlValue::Int(9), SqlValue::Bool(true)],
    )?;
    assert_eq!(
        built.sql,
        "DELETE FROM messages WHERE sender_id = ? AND read = ?"
    );
    assert_eq!(built.params, vec![SqlValue::Int(9), SqlValue::Bool(true)]);
    Ok(())
}

#[test]
fn rejects_identifiers_that_are_not_bare_names() {
    let fields = FieldMap::new().set("name", SqlValue::Text("x".into()));
    assert!(matches!(
        build_insert("subjects; DROP TABLE users", &fields),
        Err(DbError::Identifier(_))
    ));

    let sneaky = FieldMap::new().set("name = 'x', role", SqlValue::Text("admin".into()));
    assert!(matches!(
        build_insert("users", &sneaky),
        Err(DbError::Identifier(_))
    ));
}

#[test]
fn rejects_empty_field_maps_and_mismatched_where_params() {
    assert!(matches!(
        build_insert("subjects", &FieldMap::new()),
        Err(DbError::Parameter(_))
    ));

    let fields = FieldMap::new().set("status", SqlValue::Text("graded".into()));
    assert!(matches!(
        build_update("submissions", &fields, "id = ? AND school_id = ?", &[SqlValue::Int(1)]),
        Err(DbError::Parameter(_))
    ));
    assert!(matches!(
        build_delete("submissions", "id = ?", &[]),
        Err(DbError::Parameter(_))
    ));
}

#[test]
fn built_statements_translate_for_postgres() -> Result<(), Box<dyn std::error::Error>> {
    let fields = FieldMap::new()
        .set("x", SqlValue::Int(1))
        .set("y", SqlValue::Int(2));
    let built = build_update("grades", &fields, "id = ?", &[SqlValue::Int(5)])?;

    let translated = translate_placeholders(&built.sql, PlaceholderStyle::Postgres);
    assert_eq!(translated, "UPDATE grades SET x = $1, y = $2 WHERE id = $3");
    Ok(())
}
