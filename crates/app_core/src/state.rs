//! Session-lifetime view state. Reset only by restarting the app; nothing in
//! here is persisted.

use shared::domain::{Category, ExerciseId, WorkoutId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveView {
    Record,
    History,
    Analytics,
    Settings,
}

impl ActiveView {
    pub const ALL: [ActiveView; 4] = [
        ActiveView::Record,
        ActiveView::History,
        ActiveView::Analytics,
        ActiveView::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActiveView::Record => "Record",
            ActiveView::History => "History",
            ActiveView::Analytics => "Analytics",
            ActiveView::Settings => "Settings",
        }
    }
}

/// What a state transition requires re-rendering. Views other than the named
/// scope may keep stale content until re-entered; they are rebuilt on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    View(ActiveView),
    RecordGrid,
    SettingsList,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub active_view: ActiveView,
    pub active_category: Category,
    pub settings_category: Category,
    /// In-flight edit targets; None means "create new".
    pub editing_exercise: Option<ExerciseId>,
    pub editing_workout: Option<WorkoutId>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            active_view: ActiveView::Record,
            active_category: Category::Push,
            settings_category: Category::Push,
            editing_exercise: None,
            editing_workout: None,
        }
    }
}

impl ViewState {
    pub fn switch_view(&mut self, view: ActiveView) -> Refresh {
        self.active_view = view;
        Refresh::View(view)
    }

    pub fn switch_category(&mut self, category: Category) -> Refresh {
        self.active_category = category;
        Refresh::RecordGrid
    }

    pub fn switch_settings_category(&mut self, category: Category) -> Refresh {
        self.settings_category = category;
        Refresh::SettingsList
    }

    pub fn begin_exercise_edit(&mut self, target: Option<ExerciseId>) {
        self.editing_exercise = target;
    }

    pub fn begin_workout_edit(&mut self, target: Option<WorkoutId>) {
        self.editing_workout = target;
    }

    pub fn clear_edit_targets(&mut self) {
        self.editing_exercise = None;
        self.editing_workout = None;
    }
}
