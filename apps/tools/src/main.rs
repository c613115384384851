use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use shared::domain::Category;
use storage::Store;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/traintrack.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List exercises, optionally limited to one category.
    ListExercises {
        #[arg(long)]
        category: Option<String>,
    },
    /// Add an exercise at the end of the ordering.
    AddExercise { name: String, category: String },
    /// Write every exercise and workout to a CSV file.
    Export { path: PathBuf },
    /// Merge exercises and workouts from a CSV file.
    Import { path: PathBuf },
    /// Delete all exercises and workouts.
    ClearAll {
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let store = Store::new(&cli.database_url).await?;

    match cli.command {
        Command::ListExercises { category } => {
            let category = category.as_deref().map(Category::from_str).transpose()?;
            for exercise in store.list_exercises(category).await? {
                println!(
                    "{}\t{}\t{}\t{}",
                    exercise.id.0,
                    exercise.category.as_str(),
                    exercise.sort_order,
                    exercise.name
                );
            }
        }
        Command::AddExercise { name, category } => {
            let category = Category::from_str(&category)?;
            let name = shared::validate::exercise_name(&name)?;
            let id = store.add_exercise(&name, category).await?;
            println!("created exercise_id={}", id.0);
        }
        Command::Export { path } => {
            let exercises = store.list_exercises(None).await?;
            let workouts = store.list_workouts(None).await?;
            let csv = app_core::transfer::export_csv(&exercises, &workouts);
            std::fs::write(&path, csv)
                .with_context(|| format!("write {}", path.display()))?;
            println!(
                "exported {} exercises and {} workouts to {}",
                exercises.len(),
                workouts.len(),
                path.display()
            );
        }
        Command::Import { path } => {
            let data = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            let summary = app_core::transfer::import_csv(&store, &data).await?;
            println!(
                "imported {} exercises and {} workouts ({} rows skipped)",
                summary.exercises_added, summary.workouts_added, summary.rows_skipped
            );
        }
        Command::ClearAll { yes } => {
            if !yes {
                bail!("refusing to clear data without --yes");
            }
            store.clear_all().await?;
            println!("cleared all data");
        }
    }

    Ok(())
}
