#![cfg(feature = "sqlite")]

use campus_core::error::DbError;
use campus_core::prelude::*;
use tokio::runtime::Runtime;

const SUBJECTS: EntityDef = EntityDef::new("subjects", &["name", "code", "school_id"]);

const DDL: &str = "
    CREATE TABLE IF NOT EXISTS subjects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        code TEXT UNIQUE,
        school_id INTEGER
    );
";

async fn setup(db_name: &str) -> Result<(Database, DbConnection), DbError> {
    let db = Database::connect(&DbConfig::sqlite_in_memory(db_name)).await?;
    let mut conn = db.acquire().await?;
    conn.execute_batch(DDL).await?;
    Ok((db, conn))
}

#[test]
fn create_then_find_round_trips_fillable_fields() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let (_db, mut conn) = setup("crud_round_trip").await?;
        let mut subjects = Repository::new(&mut conn, &SUBJECTS);

        let fields = FieldMap::new()
            .set("name", SqlValue::Text("Math".into()))
            .set("code", SqlValue::Text("MTH1".into()))
            .set("school_id", SqlValue::Int(3))
            // Not on the allow-list; silently dropped.
            .set("headmaster", SqlValue::Text("Dumbledore".into()));

        let outcome = subjects.create(&fields).await?;
        let id = outcome.id().expect("insert should create a row");
        assert!(id > 0);

        let row = subjects.find(id).await?.expect("row should exist");
        assert_eq!(row.get("name"), Some(&SqlValue::Text("Math".into())));
        assert_eq!(row.get("code"), Some(&SqlValue::Text("MTH1".into())));
        assert_eq!(row.get("school_id"), Some(&SqlValue::Int(3)));
        assert!(row.get("headmaster").is_none());

        assert!(subjects.find(id + 999).await?.is_none());
        Ok(())
    })
}

#[test]
fn find_by_looks_up_allow_listed_columns_only() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let (_db, mut conn) = setup("crud_find_by").await?;
        let mut subjects = Repository::new(&mut conn, &SUBJECTS);

        subjects
            .create(
                &FieldMap::new()
                    .set("name", SqlValue::Text("History".into()))
                    .set("code", SqlValue::Text("HIS1".into())),
            )
            .await?;

        let row = subjects
            .find_by("code", SqlValue::Text("HIS1".into()))
            .await?
            .expect("lookup by code should hit");
        assert_eq!(row.get("name"), Some(&SqlValue::Text("History".into())));

        assert!(
            subjects
                .find_by("code", SqlValue::Text("NOPE".into()))
                .await?
                .is_none()
        );

        let err = subjects
            .find_by("headmaster", SqlValue::Text("x".into()))
            .await
            .expect_err("non-fillable column must be rejected");
        assert!(matches!(err, DbError::Identifier(_)));
        Ok(())
    })
}

#[test]
fn duplicate_key_inserts_come_back_as_conflicts() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let (_db, mut conn) = setup("crud_conflict").await?;
        let mut subjects = Repository::new(&mut conn, &SUBJECTS);

        let fields = FieldMap::new()
            .set("name", SqlValue::Text("Physics".into()))
            .set("code", SqlValue::Text("PHY1".into()));
        assert!(!subjects.create(&fields).await?.is_conflict());

        let outcome = subjects.create(&fields).await?;
        assert_eq!(outcome, InsertOutcome::Conflict(ConstraintKind::Unique));
        Ok(())
    })
}

#[test]
fn update_reports_whether_a_row_changed() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let (_db, mut conn) = setup("crud_update").await?;
        let mut subjects = Repository::new(&mut conn, &SUBJECTS);

        let id = subjects
            .create(&FieldMap::new().set("name", SqlValue::Text("Art".into())))
            .await?
            .id()
            .expect("created");

        let changed = subjects
            .update(id, &FieldMap::new().set("name", SqlValue::Text("Fine Art".into())))
            .await?;
        assert!(changed);

        let row = subjects.find(id).await?.expect("row should exist");
        assert_eq!(row.get("name"), Some(&SqlValue::Text("Fine Art".into())));

        // Unknown id: nothing to update.
        assert!(
            !subjects
                .update(id + 999, &FieldMap::new().set("name", SqlValue::Text("x".into())))
                .await?
        );

        // Nothing fillable survives filtering: no statement is issued.
        assert!(
            !subjects
                .update(id, &FieldMap::new().set("headmaster", SqlValue::Text("x".into())))
                .await?
        );
        Ok(())
    })
}

#[test]
fn delete_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let (_db, mut conn) = setup("crud_delete").await?;
        let mut subjects = Repository::new(&mut conn, &SUBJECTS);

        let id = subjects
            .create(&FieldMap::new().set("name", SqlValue::Text("Chemistry".into())))
            .await?
            .id()
            .expect("created");

        assert_eq!(subjects.delete(id).await?, 1);
        assert_eq!(subjects.delete(id).await?, 0);
        assert!(subjects.find(id).await?.is_none());
        Ok(())
    })
}

#[test]
fn fetch_all_returns_an_empty_set_not_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let (_db, mut conn) = setup("crud_empty").await?;
        let result_set = conn
            .fetch_all("SELECT * FROM subjects WHERE school_id = ?", &[SqlValue::Int(42)])
            .await?;
        assert!(result_set.is_empty());
        assert_eq!(result_set.len(), 0);
        Ok(())
    })
}

#[test]
fn parameter_count_mismatches_fail_before_the_driver() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let (_db, mut conn) = setup("crud_param_count").await?;
        let err = conn
            .fetch_all("SELECT * FROM subjects WHERE id = ? AND code = ?", &[SqlValue::Int(1)])
            .await
            .expect_err("mismatched parameter count must be rejected");
        assert!(matches!(err, DbError::Parameter(_)));
        Ok(())
    })
}
