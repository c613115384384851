//! Backend worker: a dedicated thread running a tokio runtime that owns the
//! `Store`. Commands arrive over the crossbeam queue one user action at a
//! time; each is fully processed (store operation plus the re-queries the
//! affected views need) before the next is taken, so renders never observe a
//! half-applied mutation.

use std::path::Path;
use std::thread;

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};

use app_core::{chart_data, exercise_stats, history_groups, transfer};
use shared::domain::Category;
use storage::Store;

use crate::backend_bridge::commands::{BackendCommand, MoveDirection};
use crate::controller::events::{
    ExerciseCard, ExerciseChart, HistoryEntry, HistoryGroupView, UiError, UiErrorContext, UiEvent,
};

pub fn launch(database_url: String, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let store = match Store::new(&database_url).await {
                Ok(store) => store,
                Err(err) => {
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("failed to open database '{database_url}': {err:#}"),
                    )));
                    tracing::error!("failed to open database '{database_url}': {err:#}");
                    return;
                }
            };
            tracing::info!(database_url, "backend worker ready");

            while let Ok(cmd) = cmd_rx.recv() {
                let cmd_name = cmd.name();
                if let Err(err) = handle_command(&store, &ui_tx, cmd).await {
                    tracing::warn!(command = cmd_name, "command failed: {err:#}");
                    let context = context_for(cmd_name);
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        context,
                        format!("{err:#}"),
                    )));
                }
            }
        });
    });
}

fn context_for(cmd_name: &str) -> UiErrorContext {
    match cmd_name {
        "save_exercise" | "move_exercise" => UiErrorContext::SaveExercise,
        "save_workout" => UiErrorContext::SaveWorkout,
        "delete_exercise" | "delete_workout" | "clear_all" => UiErrorContext::Delete,
        "export_csv" | "import_csv" => UiErrorContext::Transfer,
        name if name.starts_with("refresh") || name.starts_with("list") => {
            UiErrorContext::LoadView
        }
        _ => UiErrorContext::General,
    }
}

async fn handle_command(
    store: &Store,
    ui_tx: &Sender<UiEvent>,
    cmd: BackendCommand,
) -> Result<()> {
    match cmd {
        BackendCommand::RefreshRecordGrid { category } => {
            send_record_grid(store, ui_tx, category).await
        }
        BackendCommand::RefreshSettingsList { category } => {
            send_settings_list(store, ui_tx, category).await
        }
        BackendCommand::RefreshHistory => send_history(store, ui_tx).await,
        BackendCommand::RefreshAnalytics => send_analytics(store, ui_tx).await,
        BackendCommand::ListExerciseOptions => {
            let options = store.list_exercises(None).await?;
            let _ = ui_tx.try_send(UiEvent::ExerciseOptionsLoaded(options));
            Ok(())
        }
        BackendCommand::SaveExercise {
            editing,
            name,
            category,
            record_category,
        } => {
            match editing {
                Some(id) => {
                    let updated = store.update_exercise(id, &name, category, None).await?;
                    if !updated {
                        let _ = ui_tx.try_send(UiEvent::Info(
                            "That exercise no longer exists".to_string(),
                        ));
                    }
                }
                None => {
                    store.add_exercise(&name, category).await?;
                }
            }
            let _ = ui_tx.try_send(UiEvent::Info("Exercise saved".to_string()));
            send_settings_list(store, ui_tx, category).await?;
            send_record_grid(store, ui_tx, record_category).await
        }
        BackendCommand::MoveExercise {
            id,
            direction,
            category,
        } => {
            let listed = store.list_exercises(Some(category)).await?;
            let Some(index) = listed.iter().position(|e| e.id == id) else {
                return send_settings_list(store, ui_tx, category).await;
            };
            let neighbor = match direction {
                MoveDirection::Up => index.checked_sub(1),
                MoveDirection::Down => {
                    (index + 1 < listed.len()).then_some(index + 1)
                }
            };
            if let Some(neighbor) = neighbor {
                store.swap_order(id, listed[neighbor].id).await?;
            }
            send_settings_list(store, ui_tx, category).await
        }
        BackendCommand::DeleteExercise {
            id,
            category,
            record_category,
        } => {
            store.delete_exercise(id).await?;
            let _ = ui_tx.try_send(UiEvent::Info(
                "Exercise and its history deleted".to_string(),
            ));
            send_settings_list(store, ui_tx, category).await?;
            send_record_grid(store, ui_tx, record_category).await
        }
        BackendCommand::SaveWorkout {
            editing,
            exercise_id,
            sets,
            date,
            record_category,
        } => {
            match editing {
                Some(id) => {
                    let updated = store.update_workout(id, exercise_id, &sets, date).await?;
                    if !updated {
                        let _ = ui_tx.try_send(UiEvent::Info(
                            "That workout no longer exists".to_string(),
                        ));
                    }
                }
                None => {
                    store.add_workout(exercise_id, &sets, date).await?;
                }
            }
            let _ = ui_tx.try_send(UiEvent::Info("Workout saved".to_string()));
            send_record_grid(store, ui_tx, record_category).await?;
            send_history(store, ui_tx).await
        }
        BackendCommand::DeleteWorkout {
            id,
            record_category,
        } => {
            store.delete_workout(id).await?;
            send_history(store, ui_tx).await?;
            send_record_grid(store, ui_tx, record_category).await
        }
        BackendCommand::ExportCsv { path } => {
            let exercises = store.list_exercises(None).await?;
            let workouts = store.list_workouts(None).await?;
            let csv = transfer::export_csv(&exercises, &workouts);
            write_file(&path, &csv)?;
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Exported {} exercises and {} workouts to {}",
                exercises.len(),
                workouts.len(),
                path.display()
            )));
            Ok(())
        }
        BackendCommand::ImportCsv {
            path,
            record_category,
            settings_category,
        } => {
            let data = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read file '{}'", path.display()))?;
            let summary = transfer::import_csv(store, &data).await?;
            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Imported {} exercises and {} workouts ({} rows skipped)",
                summary.exercises_added, summary.workouts_added, summary.rows_skipped
            )));
            send_record_grid(store, ui_tx, record_category).await?;
            send_settings_list(store, ui_tx, settings_category).await
        }
        BackendCommand::ClearAll {
            record_category,
            settings_category,
        } => {
            store.clear_all().await?;
            let _ = ui_tx.try_send(UiEvent::Info("All data cleared".to_string()));
            send_record_grid(store, ui_tx, record_category).await?;
            send_settings_list(store, ui_tx, settings_category).await?;
            send_history(store, ui_tx).await?;
            send_analytics(store, ui_tx).await
        }
    }
}

async fn send_record_grid(
    store: &Store,
    ui_tx: &Sender<UiEvent>,
    category: Category,
) -> Result<()> {
    let exercises = store.list_exercises(Some(category)).await?;
    let mut cards = Vec::with_capacity(exercises.len());
    for exercise in exercises {
        let workouts = store.list_workouts(Some(exercise.id)).await?;
        cards.push(ExerciseCard {
            stats: exercise_stats(&exercise, &workouts),
            exercise,
        });
    }
    let _ = ui_tx.try_send(UiEvent::RecordGridLoaded(cards));
    Ok(())
}

async fn send_settings_list(
    store: &Store,
    ui_tx: &Sender<UiEvent>,
    category: Category,
) -> Result<()> {
    let listed = store.list_exercises(Some(category)).await?;
    let _ = ui_tx.try_send(UiEvent::SettingsListLoaded(listed));
    Ok(())
}

async fn send_history(store: &Store, ui_tx: &Sender<UiEvent>) -> Result<()> {
    let exercises = store.list_exercises(None).await?;
    let workouts = store.list_workouts(None).await?;

    let groups = history_groups(workouts)
        .into_iter()
        .map(|group| HistoryGroupView {
            date: group.date,
            entries: group
                .workouts
                .into_iter()
                .map(|workout| {
                    let exercise = exercises.iter().find(|e| e.id == workout.exercise_id);
                    HistoryEntry {
                        exercise_name: exercise
                            .map(|e| e.name.clone())
                            .unwrap_or_else(|| "(removed)".to_string()),
                        category: exercise.map(|e| e.category).unwrap_or(Category::Push),
                        workout,
                    }
                })
                .collect(),
        })
        .collect();

    let _ = ui_tx.try_send(UiEvent::HistoryLoaded(groups));
    Ok(())
}

async fn send_analytics(store: &Store, ui_tx: &Sender<UiEvent>) -> Result<()> {
    let exercises = store.list_exercises(None).await?;
    let mut charts = Vec::new();
    for exercise in exercises {
        let workouts = store.list_workouts(Some(exercise.id)).await?;
        if let Some(chart) = chart_data(&exercise, &workouts) {
            charts.push(ExerciseChart {
                exercise_id: exercise.id,
                name: exercise.name,
                chart,
            });
        }
    }
    let _ = ui_tx.try_send(UiEvent::AnalyticsLoaded(charts));
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write file '{}'", path.display()))
}
