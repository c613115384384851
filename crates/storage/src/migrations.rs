//! Schema evolution as an explicit version state machine: the schema version
//! lives in `PRAGMA user_version`, and each step moves it forward by one.
//! Every step is additive and idempotent, so replaying the pipeline against an
//! already-migrated database is a no-op.

use anyhow::{bail, Context, Result};
use sqlx::{Pool, Row, Sqlite};

/// Version the pipeline converges on.
pub const TARGET_VERSION: i64 = 2;

pub async fn run(pool: &Pool<Sqlite>) -> Result<()> {
    let mut version = user_version(pool).await?;
    if version > TARGET_VERSION {
        bail!(
            "database schema version {version} is newer than this build supports ({TARGET_VERSION})"
        );
    }

    while version < TARGET_VERSION {
        let next = version + 1;
        match next {
            1 => create_base_schema(pool).await?,
            2 => repair_legacy_schema(pool).await?,
            other => bail!("no migration step registered for version {other}"),
        }
        set_user_version(pool, next).await?;
        tracing::info!(from = version, to = next, "applied schema migration");
        version = next;
    }

    Ok(())
}

pub async fn user_version(pool: &Pool<Sqlite>) -> Result<i64> {
    sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await
        .context("failed to read schema version")
}

async fn set_user_version(pool: &Pool<Sqlite>, version: i64) -> Result<()> {
    // PRAGMA does not accept bound parameters; version is an internal constant.
    sqlx::query(&format!("PRAGMA user_version = {version}"))
        .execute(pool)
        .await
        .with_context(|| format!("failed to set schema version {version}"))?;
    Ok(())
}

/// v1: the two record collections and their secondary indexes.
async fn create_base_schema(pool: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS exercises (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL,
            category   TEXT NOT NULL,
            sort_order INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create exercises table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workouts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            exercise_id INTEGER NOT NULL,
            date        TEXT NOT NULL,
            sets        TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("failed to create workouts table")?;

    for (name, stmt) in [
        (
            "idx_exercises_category",
            "CREATE INDEX IF NOT EXISTS idx_exercises_category ON exercises (category)",
        ),
        (
            "idx_exercises_sort_order",
            "CREATE INDEX IF NOT EXISTS idx_exercises_sort_order ON exercises (sort_order)",
        ),
        (
            "idx_exercises_name",
            "CREATE INDEX IF NOT EXISTS idx_exercises_name ON exercises (name)",
        ),
        (
            "idx_workouts_exercise_id",
            "CREATE INDEX IF NOT EXISTS idx_workouts_exercise_id ON workouts (exercise_id)",
        ),
        (
            "idx_workouts_date",
            "CREATE INDEX IF NOT EXISTS idx_workouts_date ON workouts (date)",
        ),
    ] {
        sqlx::query(stmt)
            .execute(pool)
            .await
            .with_context(|| format!("failed to create index {name}"))?;
    }

    Ok(())
}

/// v2: bring databases written by earlier app generations in line. Adds the
/// `sort_order` column where missing, backfills it sequentially in id order,
/// and drops the long-deprecated standalone `sets` table.
async fn repair_legacy_schema(pool: &Pool<Sqlite>) -> Result<()> {
    if !table_has_column(pool, "exercises", "sort_order").await? {
        sqlx::query("ALTER TABLE exercises ADD COLUMN sort_order INTEGER")
            .execute(pool)
            .await
            .context("failed adding sort_order column to exercises")?;
    }

    let unordered = sqlx::query("SELECT id FROM exercises WHERE sort_order IS NULL ORDER BY id")
        .fetch_all(pool)
        .await
        .context("failed to scan exercises missing sort_order")?;

    if !unordered.is_empty() {
        let base: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(sort_order), -1) FROM exercises WHERE sort_order IS NOT NULL",
        )
        .fetch_one(pool)
        .await?;

        let mut tx = pool.begin().await?;
        for (offset, row) in unordered.iter().enumerate() {
            let id: i64 = row.try_get(0)?;
            sqlx::query("UPDATE exercises SET sort_order = ? WHERE id = ?")
                .bind(base + 1 + offset as i64)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit()
            .await
            .context("failed to backfill exercise sort_order")?;
    }

    sqlx::query("DROP TABLE IF EXISTS sets")
        .execute(pool)
        .await
        .context("failed to drop deprecated sets table")?;

    Ok(())
}

async fn table_has_column(pool: &Pool<Sqlite>, table: &str, column: &str) -> Result<bool> {
    let rows = sqlx::query(&format!("PRAGMA table_info({table})"))
        .fetch_all(pool)
        .await
        .with_context(|| format!("failed to inspect {table} schema"))?;

    for row in rows {
        let name: String = row.try_get("name")?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
