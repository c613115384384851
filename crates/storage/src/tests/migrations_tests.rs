use std::str::FromStr as _;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};

use crate::migrations;

async fn raw_pool() -> Pool<Sqlite> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("options")
        .create_if_missing(true);
    SqlitePoolOptions::new()
        // A single connection keeps the in-memory database alive and shared.
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("pool")
}

async fn table_names(pool: &Pool<Sqlite>) -> Vec<String> {
    sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .fetch_all(pool)
        .await
        .expect("tables")
        .into_iter()
        .map(|r| r.get::<String, _>(0))
        .collect()
}

async fn index_names(pool: &Pool<Sqlite>) -> Vec<String> {
    sqlx::query(
        "SELECT name FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%' ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .expect("indexes")
    .into_iter()
    .map(|r| r.get::<String, _>(0))
    .collect()
}

#[tokio::test]
async fn fresh_database_reaches_target_version() {
    let pool = raw_pool().await;
    migrations::run(&pool).await.expect("migrate");

    assert_eq!(
        migrations::user_version(&pool).await.expect("version"),
        migrations::TARGET_VERSION
    );
    let tables = table_names(&pool).await;
    assert!(tables.iter().any(|t| t == "exercises"));
    assert!(tables.iter().any(|t| t == "workouts"));
    assert_eq!(index_names(&pool).await.len(), 5);
}

#[tokio::test]
async fn rerunning_pipeline_is_a_noop() {
    let pool = raw_pool().await;
    migrations::run(&pool).await.expect("first run");

    sqlx::query("INSERT INTO exercises (name, category, sort_order) VALUES ('Bench', 'push', 0)")
        .execute(&pool)
        .await
        .expect("seed");

    let tables_before = table_names(&pool).await;
    let indexes_before = index_names(&pool).await;

    migrations::run(&pool).await.expect("second run");

    assert_eq!(table_names(&pool).await, tables_before);
    assert_eq!(index_names(&pool).await, indexes_before);
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(count, 1, "rerun must not touch existing rows");
}

#[tokio::test]
async fn legacy_schema_is_repaired_without_data_loss() {
    let pool = raw_pool().await;

    // A pre-versioning generation: no sort_order column, plus the abandoned
    // standalone sets table.
    sqlx::query(
        "CREATE TABLE exercises (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, category TEXT NOT NULL)",
    )
    .execute(&pool)
    .await
    .expect("legacy exercises");
    sqlx::query(
        "CREATE TABLE workouts (id INTEGER PRIMARY KEY AUTOINCREMENT, exercise_id INTEGER NOT NULL, date TEXT NOT NULL, sets TEXT NOT NULL)",
    )
    .execute(&pool)
    .await
    .expect("legacy workouts");
    sqlx::query("CREATE TABLE sets (id INTEGER PRIMARY KEY AUTOINCREMENT, reps INTEGER)")
        .execute(&pool)
        .await
        .expect("deprecated sets");

    for name in ["Bench", "Row", "Squat"] {
        sqlx::query("INSERT INTO exercises (name, category) VALUES (?, 'push')")
            .bind(name)
            .execute(&pool)
            .await
            .expect("seed");
    }

    migrations::run(&pool).await.expect("migrate");

    let rows = sqlx::query("SELECT name, sort_order FROM exercises ORDER BY id")
        .fetch_all(&pool)
        .await
        .expect("rows");
    let ordered: Vec<(String, i64)> = rows
        .into_iter()
        .map(|r| (r.get::<String, _>(0), r.get::<i64, _>(1)))
        .collect();
    assert_eq!(
        ordered,
        vec![
            ("Bench".to_string(), 0),
            ("Row".to_string(), 1),
            ("Squat".to_string(), 2),
        ],
        "backfill must assign sequential orders in id order"
    );

    assert!(
        !table_names(&pool).await.iter().any(|t| t == "sets"),
        "deprecated sets table must be dropped"
    );
}

#[tokio::test]
async fn newer_on_disk_version_is_a_fatal_open_error() {
    let pool = raw_pool().await;
    sqlx::query(&format!(
        "PRAGMA user_version = {}",
        migrations::TARGET_VERSION + 1
    ))
    .execute(&pool)
    .await
    .expect("bump version");

    assert!(migrations::run(&pool).await.is_err());
}
