//! Backend commands queued from UI to the backend worker. Each user action
//! maps to exactly one command; the worker answers with `UiEvent`s.

use std::path::PathBuf;

use chrono::NaiveDate;
use shared::domain::{Category, ExerciseId, WorkoutId, WorkoutSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

pub enum BackendCommand {
    RefreshRecordGrid {
        category: Category,
    },
    RefreshSettingsList {
        category: Category,
    },
    RefreshHistory,
    RefreshAnalytics,
    ListExerciseOptions,
    SaveExercise {
        editing: Option<ExerciseId>,
        name: String,
        category: Category,
        record_category: Category,
    },
    MoveExercise {
        id: ExerciseId,
        direction: MoveDirection,
        category: Category,
    },
    DeleteExercise {
        id: ExerciseId,
        category: Category,
        record_category: Category,
    },
    SaveWorkout {
        editing: Option<WorkoutId>,
        exercise_id: ExerciseId,
        sets: Vec<WorkoutSet>,
        date: NaiveDate,
        record_category: Category,
    },
    DeleteWorkout {
        id: WorkoutId,
        record_category: Category,
    },
    ExportCsv {
        path: PathBuf,
    },
    ImportCsv {
        path: PathBuf,
        record_category: Category,
        settings_category: Category,
    },
    ClearAll {
        record_category: Category,
        settings_category: Category,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::RefreshRecordGrid { .. } => "refresh_record_grid",
            BackendCommand::RefreshSettingsList { .. } => "refresh_settings_list",
            BackendCommand::RefreshHistory => "refresh_history",
            BackendCommand::RefreshAnalytics => "refresh_analytics",
            BackendCommand::ListExerciseOptions => "list_exercise_options",
            BackendCommand::SaveExercise { .. } => "save_exercise",
            BackendCommand::MoveExercise { .. } => "move_exercise",
            BackendCommand::DeleteExercise { .. } => "delete_exercise",
            BackendCommand::SaveWorkout { .. } => "save_workout",
            BackendCommand::DeleteWorkout { .. } => "delete_workout",
            BackendCommand::ExportCsv { .. } => "export_csv",
            BackendCommand::ImportCsv { .. } => "import_csv",
            BackendCommand::ClearAll { .. } => "clear_all",
        }
    }
}
