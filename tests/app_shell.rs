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

async fn build_app(db_name: &str) -> Result<App, Box<dyn std::error::Error>> {
    let db = Database::connect(&DbConfig::sqlite_in_memory(db_name)).await?;
    let mut conn = db.acquire().await?;
    conn.execute_batch(DDL).await?;
    drop(conn);

    let mut router = Router::new();
    router.get(
        "/subjects/{id}",
        handler(|ctx: Context| async move {
            let id: i64 = ctx
                .params
                .get("id")
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(0);
            let mut conn = ctx.acquire().await?;
            let row = Repository::new(&mut conn, &SUBJECTS).find(id).await?;
            Ok(match row {
                Some(row) => {
                    let name = row.get("name").and_then(SqlValue::as_text).unwrap_or("");
                    Response::ok(name.to_string())
                }
                None => Response::not_found(),
            })
        }),
    )?;
    router.post(
        "/subjects",
        handler(|ctx: Context| async move {
            let name = ctx.request.body.clone().unwrap_or_default();
            let mut conn = ctx.acquire().await?;
            let outcome = Repository::new(&mut conn, &SUBJECTS)
                .create(&FieldMap::new().set("name", SqlValue::Text(name)))
                .await?;
            Ok(match outcome {
                InsertOutcome::Created(id) => Response::new(201, id.to_string()),
                InsertOutcome::Conflict(_) => Response::new(422, "duplicate subject"),
            })
        }),
    )?;
    router.get(
        "/boom",
        handler(|_ctx: Context| async move {
            Err(DbError::Execution("forced failure".to_string()))
        }),
    )?;

    Ok(App::new(router, db))
}

#[test]
fn routes_a_request_through_handler_and_database() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let app = build_app("app_round_trip").await?;

        let created = app
            .handle(Request::new("POST", "/subjects").with_body("Biology"))
            .await;
        assert_eq!(created.status, 201);
        let id: i64 = created.body.parse()?;

        let fetched = app.handle(Request::new("GET", format!("/subjects/{id}"))).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body, "Biology");

        let missing = app.handle(Request::new("GET", "/subjects/999999")).await;
        assert_eq!(missing.status, 404);
        Ok(())
    })
}

#[test]
fn unmatched_requests_fall_through_to_the_404_policy() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let app = build_app("app_not_found").await?;

        // Default policy.
        let response = app.handle(Request::new("GET", "/no/such/route")).await;
        assert_eq!(response, Response::not_found());

        // Unknown method text never reaches a handler.
        let response = app.handle(Request::new("PATCH", "/subjects/1")).await;
        assert_eq!(response.status, 404);
        Ok(())
    })
}

#[test]
fn a_registered_not_found_handler_owns_the_fallback() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let app = build_app("app_custom_404").await?.with_not_found(handler(
            |ctx: Context| async move {
                Ok(Response::new(404, format!("no route for {}", ctx.request.path)))
            },
        ));

        let response = app.handle(Request::new("GET", "/missing")).await;
        assert_eq!(response.status, 404);
        assert_eq!(response.body, "no route for /missing");
        Ok(())
    })
}

#[test]
fn handler_errors_become_500s() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let app = build_app("app_handler_error").await?;
        let response = app.handle(Request::new("GET", "/boom")).await;
        assert_eq!(response, Response::server_error());
        Ok(())
    })
}
