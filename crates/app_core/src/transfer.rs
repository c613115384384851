//! CSV export and import. Export writes two sections (exercises, then
//! workouts) separated by a blank line. Import re-assigns fresh identities and
//! rebuilds the exercise→workout linkage through an old-id→new-id map, so an
//! exported file can be loaded into any database without id collisions.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use shared::domain::{Category, Exercise, ExerciseId, Workout, WorkoutSet};
use storage::Store;

pub const EXERCISE_HEADER: &str = "type,id,name,category,order";
pub const WORKOUT_HEADER: &str = "type,id,exerciseId,date,sets";

pub fn export_csv(exercises: &[Exercise], workouts: &[Workout]) -> String {
    let mut out = String::new();
    out.push_str(EXERCISE_HEADER);
    out.push('\n');
    for exercise in exercises {
        let row = [
            "exercise".to_string(),
            exercise.id.0.to_string(),
            exercise.name.clone(),
            exercise.category.as_str().to_string(),
            exercise.sort_order.to_string(),
        ];
        out.push_str(&join_row(&row));
        out.push('\n');
    }

    out.push('\n');
    out.push_str(WORKOUT_HEADER);
    out.push('\n');
    for workout in workouts {
        let sets = serde_json::to_string(&workout.sets).unwrap_or_else(|_| "[]".to_string());
        let row = [
            "workout".to_string(),
            workout.id.0.to_string(),
            workout.exercise_id.0.to_string(),
            workout.date.to_string(),
            sets,
        ];
        out.push_str(&join_row(&row));
        out.push('\n');
    }

    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub exercises_added: usize,
    pub workouts_added: usize,
    pub rows_skipped: usize,
}

/// Loads an exported file into the store. Exercise rows must precede the
/// workout rows that reference them, which is how `export_csv` lays the file
/// out. Malformed rows and workouts pointing at unknown exercise ids are
/// skipped, not fatal.
pub async fn import_csv(store: &Store, data: &str) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    let mut id_map: HashMap<i64, ExerciseId> = HashMap::new();

    for line in data.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() || line.starts_with("type,") {
            continue;
        }

        let fields = split_row(line);
        match fields.first().map(String::as_str) {
            Some("exercise") => match parse_exercise_row(&fields) {
                Ok((old_id, name, category)) => {
                    let new_id = store.add_exercise(&name, category).await?;
                    id_map.insert(old_id, new_id);
                    summary.exercises_added += 1;
                }
                Err(err) => {
                    tracing::warn!("skipping exercise row: {err}");
                    summary.rows_skipped += 1;
                }
            },
            Some("workout") => match parse_workout_row(&fields) {
                Ok((old_exercise_id, date, sets)) => {
                    let Some(&exercise_id) = id_map.get(&old_exercise_id) else {
                        tracing::warn!(
                            old_exercise_id,
                            "skipping workout row referencing unknown exercise"
                        );
                        summary.rows_skipped += 1;
                        continue;
                    };
                    store.add_workout(exercise_id, &sets, date).await?;
                    summary.workouts_added += 1;
                }
                Err(err) => {
                    tracing::warn!("skipping workout row: {err}");
                    summary.rows_skipped += 1;
                }
            },
            _ => {
                summary.rows_skipped += 1;
            }
        }
    }

    Ok(summary)
}

fn parse_exercise_row(fields: &[String]) -> Result<(i64, String, Category)> {
    if fields.len() < 5 {
        anyhow::bail!("expected 5 fields, got {}", fields.len());
    }
    let old_id: i64 = fields[1].parse().context("bad exercise id")?;
    let name = fields[2].clone();
    let category = Category::from_str(&fields[3])?;
    Ok((old_id, name, category))
}

fn parse_workout_row(fields: &[String]) -> Result<(i64, NaiveDate, Vec<WorkoutSet>)> {
    if fields.len() < 5 {
        anyhow::bail!("expected 5 fields, got {}", fields.len());
    }
    let old_exercise_id: i64 = fields[2].parse().context("bad exercise reference")?;
    let date: NaiveDate = fields[3].parse().context("bad date")?;
    let sets: Vec<WorkoutSet> = serde_json::from_str(&fields[4]).context("bad sets column")?;
    Ok((old_exercise_id, date, sets))
}

fn join_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Splits one CSV line, honoring double-quoted fields with `""` escapes.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            other => current.push(other),
        }
    }
    fields.push(current);
    fields
}
