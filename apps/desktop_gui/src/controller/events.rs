//! UI/backend events and error modeling for the desktop controller.

use chrono::NaiveDate;

use app_core::{ChartData, ExerciseStats};
use shared::domain::{Category, Exercise, ExerciseId, Workout};

/// One card in the record grid: the exercise plus its on-demand stats.
#[derive(Debug, Clone)]
pub struct ExerciseCard {
    pub exercise: Exercise,
    pub stats: ExerciseStats,
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub workout: Workout,
    pub exercise_name: String,
    pub category: Category,
}

#[derive(Debug, Clone)]
pub struct HistoryGroupView {
    pub date: NaiveDate,
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Clone)]
pub struct ExerciseChart {
    pub exercise_id: ExerciseId,
    pub name: String,
    pub chart: ChartData,
}

pub enum UiEvent {
    RecordGridLoaded(Vec<ExerciseCard>),
    SettingsListLoaded(Vec<Exercise>),
    HistoryLoaded(Vec<HistoryGroupView>),
    AnalyticsLoaded(Vec<ExerciseChart>),
    ExerciseOptionsLoaded(Vec<Exercise>),
    Info(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Storage,
    Io,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    LoadView,
    SaveExercise,
    SaveWorkout,
    Delete,
    Transfer,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("database")
            || lower.contains("sqlite")
            || lower.contains("schema")
            || lower.contains("migration")
        {
            UiErrorCategory::Storage
        } else if lower.contains("file")
            || lower.contains("path")
            || lower.contains("permission")
            || lower.contains("directory")
        {
            UiErrorCategory::Io
        } else if lower.contains("must")
            || lower.contains("invalid")
            || lower.contains("does not exist")
        {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Storage => "Storage",
        UiErrorCategory::Io => "File",
        UiErrorCategory::Validation => "Input",
        UiErrorCategory::Unknown => "Unexpected",
    }
}
