use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{Category, Exercise, ExerciseId, Workout, WorkoutId, WorkoutSet, MAX_SETS};

pub mod migrations;

/// Durable CRUD over the two record collections (exercises, workouts).
/// All multi-row mutations (cascade delete, order swap, bulk clear) run as a
/// single transaction so a crash never leaves a partial state behind.
#[derive(Clone)]
pub struct Store {
    pool: Pool<Sqlite>,
}

impl Store {
    /// Opens or creates the database and brings its schema to the current
    /// version. Failure here is fatal for the caller; there is no retry.
    pub async fn new(database_url: &str) -> Result<Self> {
        let database_url = normalize_database_url(database_url);
        ensure_sqlite_parent_dir_exists(&database_url)?;

        let connect_options =
            SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
        let mut pool_options = SqlitePoolOptions::new().max_connections(5);
        if database_url.starts_with("sqlite::memory:") {
            // Each in-memory connection is its own empty database, and the
            // pool reaping idle connections would drop the only live copy.
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None::<std::time::Duration>)
                .max_lifetime(None::<std::time::Duration>);
        }
        let pool = pool_options
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open database '{database_url}'"))?;
        migrations::run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Exercises, optionally filtered to one category, ordered by their
    /// display position (ties broken by insertion order).
    pub async fn list_exercises(&self, category: Option<Category>) -> Result<Vec<Exercise>> {
        let rows = if let Some(category) = category {
            sqlx::query(
                "SELECT id, name, category, sort_order FROM exercises
                 WHERE category = ?
                 ORDER BY sort_order ASC, id ASC",
            )
            .bind(category.as_str())
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query(
                "SELECT id, name, category, sort_order FROM exercises
                 ORDER BY sort_order ASC, id ASC",
            )
            .fetch_all(&self.pool)
            .await?
        };

        rows.into_iter().map(exercise_from_row).collect()
    }

    pub async fn get_exercise(&self, id: ExerciseId) -> Result<Option<Exercise>> {
        let row = sqlx::query("SELECT id, name, category, sort_order FROM exercises WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.map(exercise_from_row).transpose()
    }

    /// Inserts a new exercise at the end of the global ordering. The order
    /// computation and the insert share one transaction.
    pub async fn add_exercise(&self, name: &str, category: Category) -> Result<ExerciseId> {
        let mut tx = self.pool.begin().await?;
        let next_order: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(sort_order), -1) + 1 FROM exercises")
                .fetch_one(&mut *tx)
                .await?;
        let rec = sqlx::query(
            "INSERT INTO exercises (name, category, sort_order) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(name)
        .bind(category.as_str())
        .bind(next_order)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(ExerciseId(rec.get::<i64, _>(0)))
    }

    /// Returns false when the id does not exist. `sort_order: None` keeps the
    /// stored position.
    pub async fn update_exercise(
        &self,
        id: ExerciseId,
        name: &str,
        category: Category,
        sort_order: Option<i64>,
    ) -> Result<bool> {
        let updated = sqlx::query(
            "UPDATE exercises
             SET name = ?, category = ?, sort_order = COALESCE(?, sort_order)
             WHERE id = ?",
        )
        .bind(name)
        .bind(category.as_str())
        .bind(sort_order)
        .bind(id.0)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(updated > 0)
    }

    /// Cascade delete: the exercise and every workout referencing it go in
    /// the same transaction, so both deletions are durable or neither is.
    pub async fn delete_exercise(&self, id: ExerciseId) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM workouts WHERE exercise_id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM exercises WHERE id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await?;
        tx.commit()
            .await
            .context("failed to commit cascade delete")?;
        Ok(())
    }

    /// Swaps the display positions of two exercises in one transaction.
    pub async fn swap_order(&self, a: ExerciseId, b: ExerciseId) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let order_a: Option<i64> = sqlx::query_scalar("SELECT sort_order FROM exercises WHERE id = ?")
            .bind(a.0)
            .fetch_optional(&mut *tx)
            .await?;
        let order_b: Option<i64> = sqlx::query_scalar("SELECT sort_order FROM exercises WHERE id = ?")
            .bind(b.0)
            .fetch_optional(&mut *tx)
            .await?;
        let (Some(order_a), Some(order_b)) = (order_a, order_b) else {
            bail!("cannot swap order: one of the exercises no longer exists");
        };

        sqlx::query("UPDATE exercises SET sort_order = ? WHERE id = ?")
            .bind(order_b)
            .bind(a.0)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE exercises SET sort_order = ? WHERE id = ?")
            .bind(order_a)
            .bind(b.0)
            .execute(&mut *tx)
            .await?;
        tx.commit().await.context("failed to commit order swap")?;
        Ok(())
    }

    pub async fn list_workouts(&self, exercise: Option<ExerciseId>) -> Result<Vec<Workout>> {
        let rows = if let Some(exercise) = exercise {
            sqlx::query(
                "SELECT id, exercise_id, date, sets FROM workouts
                 WHERE exercise_id = ?
                 ORDER BY id ASC",
            )
            .bind(exercise.0)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query("SELECT id, exercise_id, date, sets FROM workouts ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?
        };

        rows.into_iter().map(workout_from_row).collect()
    }

    pub async fn get_workout(&self, id: WorkoutId) -> Result<Option<Workout>> {
        let row = sqlx::query("SELECT id, exercise_id, date, sets FROM workouts WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        row.map(workout_from_row).transpose()
    }

    /// The exercise must exist at write time; there is no database-level
    /// foreign key, so the check happens inside the insert transaction.
    pub async fn add_workout(
        &self,
        exercise_id: ExerciseId,
        sets: &[WorkoutSet],
        date: NaiveDate,
    ) -> Result<WorkoutId> {
        if sets.is_empty() || sets.len() > MAX_SETS {
            bail!(
                "a workout needs between 1 and {MAX_SETS} sets, got {}",
                sets.len()
            );
        }
        let mut tx = self.pool.begin().await?;
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM exercises WHERE id = ?")
            .bind(exercise_id.0)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            bail!("cannot record workout: exercise {} does not exist", exercise_id.0);
        }

        let rec = sqlx::query(
            "INSERT INTO workouts (exercise_id, date, sets) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(exercise_id.0)
        .bind(date)
        .bind(serde_json::to_string(sets)?)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(WorkoutId(rec.get::<i64, _>(0)))
    }

    pub async fn update_workout(
        &self,
        id: WorkoutId,
        exercise_id: ExerciseId,
        sets: &[WorkoutSet],
        date: NaiveDate,
    ) -> Result<bool> {
        let updated =
            sqlx::query("UPDATE workouts SET exercise_id = ?, date = ?, sets = ? WHERE id = ?")
                .bind(exercise_id.0)
                .bind(date)
                .bind(serde_json::to_string(sets)?)
                .bind(id.0)
                .execute(&self.pool)
                .await?
                .rows_affected();
        Ok(updated > 0)
    }

    pub async fn delete_workout(&self, id: WorkoutId) -> Result<()> {
        sqlx::query("DELETE FROM workouts WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Empties both collections atomically.
    pub async fn clear_all(&self) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM workouts").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM exercises")
            .execute(&mut *tx)
            .await?;
        tx.commit().await.context("failed to commit clear-all")?;
        Ok(())
    }
}

fn exercise_from_row(row: sqlx::sqlite::SqliteRow) -> Result<Exercise> {
    let category_raw: String = row.get(2);
    let category = Category::from_str(&category_raw)
        .with_context(|| format!("corrupt exercise row {}", row.get::<i64, _>(0)))?;
    Ok(Exercise {
        id: ExerciseId(row.get::<i64, _>(0)),
        name: row.get::<String, _>(1),
        category,
        // Legacy rows can carry NULL until the v2 backfill runs; read as 0.
        sort_order: row.get::<Option<i64>, _>(3).unwrap_or(0),
    })
}

fn workout_from_row(row: sqlx::sqlite::SqliteRow) -> Result<Workout> {
    let sets_raw: String = row.get(3);
    let sets: Vec<WorkoutSet> = serde_json::from_str(&sets_raw)
        .with_context(|| format!("corrupt workout row {}", row.get::<i64, _>(0)))?;
    Ok(Workout {
        id: WorkoutId(row.get::<i64, _>(0)),
        exercise_id: ExerciseId(row.get::<i64, _>(1)),
        date: row.get::<NaiveDate, _>(2),
        sets,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn normalize_database_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "sqlite::memory:".to_string();
    }
    if raw.starts_with("sqlite::memory:") || raw.contains("://") {
        return raw.to_string();
    }
    if let Some(path) = raw.strip_prefix("sqlite:") {
        return format!("sqlite://{}", path.replace('\\', "/"));
    }
    format!("sqlite://{}", raw.replace('\\', "/"))
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/migrations_tests.rs"]
mod migrations_tests;
