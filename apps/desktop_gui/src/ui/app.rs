//! App shell: view navigation, the four screens, and the modal forms. All
//! data shown here arrives as `UiEvent`s from the backend worker; the UI never
//! touches the store directly.

use chrono::NaiveDate;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::{Align2, Color32, FontId, RichText, ScrollArea, Stroke};
use serde::{Deserialize, Serialize};

use app_core::{ActiveView, ChartData, LastValue, Refresh, ViewState};
use shared::domain::{
    walking_sets, Category, Exercise, ExerciseId, WorkoutId, WorkoutSet, MAX_SETS,
};
use shared::error::ValidationError;
use shared::validate;

use crate::backend_bridge::commands::{BackendCommand, MoveDirection};
use crate::controller::events::{
    err_label, ExerciseCard, ExerciseChart, HistoryEntry, HistoryGroupView, UiEvent,
};
use crate::controller::orchestration::dispatch_backend_command;

pub const SETTINGS_STORAGE_KEY: &str = "traintrack.settings";

const SERIES_COLORS: [Color32; 2] = [
    Color32::from_rgb(99, 102, 241),
    Color32::from_rgb(168, 85, 247),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedUiSettings {
    pub dark_mode: bool,
}

impl Default for PersistedUiSettings {
    fn default() -> Self {
        Self { dark_mode: true }
    }
}

struct ExerciseDraft {
    editing: Option<ExerciseId>,
    name: String,
    category: Category,
}

struct WorkoutDraft {
    editing: Option<WorkoutId>,
    exercise_id: Option<ExerciseId>,
    date_text: String,
    weights: [String; MAX_SETS],
    reps: [String; MAX_SETS],
    walk_minutes: String,
}

impl WorkoutDraft {
    fn blank(exercise_id: Option<ExerciseId>) -> Self {
        Self {
            editing: None,
            exercise_id,
            date_text: chrono::Local::now().date_naive().to_string(),
            weights: Default::default(),
            reps: Default::default(),
            walk_minutes: String::new(),
        }
    }

    fn from_entry(entry: &HistoryEntry) -> Self {
        let mut draft = Self {
            editing: Some(entry.workout.id),
            exercise_id: Some(entry.workout.exercise_id),
            date_text: entry.workout.date.to_string(),
            weights: Default::default(),
            reps: Default::default(),
            walk_minutes: String::new(),
        };
        for (i, set) in entry.workout.sets.iter().take(MAX_SETS).enumerate() {
            draft.weights[i] = trim_float(set.weight);
            draft.reps[i] = set.reps.to_string();
        }
        if entry.category == Category::Walking {
            draft.walk_minutes = entry
                .workout
                .duration_minutes()
                .map(|m| m.to_string())
                .unwrap_or_default();
        }
        draft
    }
}

enum PendingConfirm {
    DeleteExercise { id: ExerciseId, name: String },
    ClearAll,
}

pub struct TrainTrackApp {
    view: ViewState,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    record_cards: Vec<ExerciseCard>,
    settings_list: Vec<Exercise>,
    history: Vec<HistoryGroupView>,
    analytics: Vec<ExerciseChart>,
    exercise_options: Vec<Exercise>,

    exercise_modal: Option<ExerciseDraft>,
    workout_modal: Option<WorkoutDraft>,
    confirm: Option<PendingConfirm>,
    status: Option<String>,

    settings: PersistedUiSettings,
    theme_applied: bool,
}

impl TrainTrackApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        persisted: Option<PersistedUiSettings>,
    ) -> Self {
        let mut app = Self {
            view: ViewState::default(),
            cmd_tx,
            ui_rx,
            record_cards: Vec::new(),
            settings_list: Vec::new(),
            history: Vec::new(),
            analytics: Vec::new(),
            exercise_options: Vec::new(),
            exercise_modal: None,
            workout_modal: None,
            confirm: None,
            status: None,
            settings: persisted.unwrap_or_default(),
            theme_applied: false,
        };
        app.dispatch(BackendCommand::RefreshRecordGrid {
            category: app.view.active_category,
        });
        app.dispatch(BackendCommand::ListExerciseOptions);
        app
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::RecordGridLoaded(cards) => self.record_cards = cards,
                UiEvent::SettingsListLoaded(list) => self.settings_list = list,
                UiEvent::HistoryLoaded(groups) => self.history = groups,
                UiEvent::AnalyticsLoaded(charts) => self.analytics = charts,
                UiEvent::ExerciseOptionsLoaded(options) => self.exercise_options = options,
                UiEvent::Info(message) => self.status = Some(message),
                UiEvent::Error(err) => {
                    tracing::warn!(context = ?err.context(), "backend error: {}", err.message());
                    self.status =
                        Some(format!("{}: {}", err_label(err.category()), err.message()));
                }
            }
        }
    }

    fn refresh_for(&mut self, refresh: Refresh) {
        let cmd = match refresh {
            Refresh::View(ActiveView::Record) | Refresh::RecordGrid => {
                BackendCommand::RefreshRecordGrid {
                    category: self.view.active_category,
                }
            }
            Refresh::View(ActiveView::History) => BackendCommand::RefreshHistory,
            Refresh::View(ActiveView::Analytics) => BackendCommand::RefreshAnalytics,
            Refresh::View(ActiveView::Settings) | Refresh::SettingsList => {
                BackendCommand::RefreshSettingsList {
                    category: self.view.settings_category,
                }
            }
        };
        self.dispatch(cmd);
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("app_nav_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("TrainTrack");
                ui.separator();
                let mut switched = None;
                for view in ActiveView::ALL {
                    let selected = self.view.active_view == view;
                    if ui.selectable_label(selected, view.label()).clicked() && !selected {
                        switched = Some(view);
                    }
                }
                if let Some(view) = switched {
                    let refresh = self.view.switch_view(view);
                    self.refresh_for(refresh);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(chrono::Local::now().format("%Y-%m-%d (%a)").to_string())
                            .weak(),
                    );
                });
            });
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        let Some(status) = self.status.clone() else {
            return;
        };
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(&status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("dismiss").clicked() {
                        self.status = None;
                    }
                });
            });
        });
    }

    fn show_record_view(&mut self, ui: &mut egui::Ui) {
        self.category_selector(ui, false);
        ui.add_space(8.0);

        if ui.button("+ Record workout").clicked() {
            self.open_workout_modal(None);
        }
        ui.add_space(8.0);

        if self.record_cards.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(32.0);
                ui.label(RichText::new("No exercises in this category").weak());
                ui.label(RichText::new("Add some from Settings").weak());
            });
            return;
        }

        let cards = self.record_cards.clone();
        ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("record_grid")
                .num_columns(2)
                .spacing([12.0, 12.0])
                .show(ui, |ui| {
                    for (i, card) in cards.iter().enumerate() {
                        self.exercise_card(ui, card);
                        if i % 2 == 1 {
                            ui.end_row();
                        }
                    }
                });
        });
    }

    fn exercise_card(&mut self, ui: &mut egui::Ui, card: &ExerciseCard) {
        let response = egui::Frame::group(ui.style())
            .inner_margin(egui::Margin::symmetric(10, 10))
            .show(ui, |ui| {
                ui.set_min_width(180.0);
                ui.label(RichText::new(&card.exercise.name).strong());
                match card.stats.last {
                    Some(LastValue::Minutes(minutes)) => {
                        ui.label(format!("Last: {minutes} min"));
                    }
                    Some(LastValue::Weight { weight, final_reps }) => {
                        let weight = weight
                            .map(|w| format!("{} kg", trim_float(w)))
                            .unwrap_or_else(|| "-".to_string());
                        ui.label(format!("Last: {weight}"));
                        let reps = final_reps
                            .map(|r| r.to_string())
                            .unwrap_or_else(|| "-".to_string());
                        ui.label(format!("Final reps: {reps}"));
                    }
                    None => {
                        ui.label(RichText::new("No sessions yet").weak());
                    }
                }
                if card.exercise.category != Category::Walking {
                    if let Some(max) = card.stats.max_weight {
                        ui.label(
                            RichText::new(format!("Max: {} kg", trim_float(max))).weak(),
                        );
                    }
                }
            })
            .response;

        if response.interact(egui::Sense::click()).clicked() {
            self.open_workout_modal(Some(card.exercise.id));
        }
    }

    fn show_history_view(&mut self, ui: &mut egui::Ui) {
        if self.history.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(32.0);
                ui.label(RichText::new("No workouts recorded yet").weak());
            });
            return;
        }

        let history = self.history.clone();
        ScrollArea::vertical().show(ui, |ui| {
            for group in &history {
                ui.add_space(6.0);
                ui.label(
                    RichText::new(group.date.format("%Y-%m-%d (%a)").to_string()).strong(),
                );
                ui.separator();
                for entry in &group.entries {
                    ui.horizontal(|ui| {
                        ui.label(&entry.exercise_name);
                        ui.label(RichText::new(summarize_sets(entry)).weak());
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if ui.small_button("Delete").clicked() {
                                    self.dispatch(BackendCommand::DeleteWorkout {
                                        id: entry.workout.id,
                                        record_category: self.view.active_category,
                                    });
                                }
                                if ui.small_button("Edit").clicked() {
                                    self.view.begin_workout_edit(Some(entry.workout.id));
                                    self.workout_modal = Some(WorkoutDraft::from_entry(entry));
                                    self.dispatch(BackendCommand::ListExerciseOptions);
                                }
                            },
                        );
                    });
                }
            }
        });
    }

    fn show_analytics_view(&mut self, ui: &mut egui::Ui) {
        if self.analytics.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(32.0);
                ui.label(RichText::new("Not enough data to chart").weak());
                ui.label(RichText::new("Record at least two sessions per exercise").weak());
            });
            return;
        }

        ScrollArea::vertical().show(ui, |ui| {
            for chart in &self.analytics {
                ui.add_space(8.0);
                ui.label(RichText::new(&chart.name).strong());
                ui.push_id(chart.exercise_id.0, |ui| draw_chart(ui, &chart.chart));
                ui.horizontal(|ui| {
                    for (i, series) in chart.chart.series.iter().enumerate() {
                        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
                        ui.label(RichText::new(series.name).color(color).small());
                    }
                });
            }
        });
    }

    fn show_settings_view(&mut self, ui: &mut egui::Ui) {
        self.category_selector(ui, true);
        ui.add_space(8.0);

        if ui.button("+ Add exercise").clicked() {
            self.view.begin_exercise_edit(None);
            self.exercise_modal = Some(ExerciseDraft {
                editing: None,
                name: String::new(),
                category: self.view.settings_category,
            });
        }
        ui.add_space(8.0);

        let listed = self.settings_list.clone();
        let last_index = listed.len().saturating_sub(1);
        ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
            for (index, exercise) in listed.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label(&exercise.name);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("Delete").clicked() {
                            self.confirm = Some(PendingConfirm::DeleteExercise {
                                id: exercise.id,
                                name: exercise.name.clone(),
                            });
                        }
                        if ui.small_button("Edit").clicked() {
                            self.view.begin_exercise_edit(Some(exercise.id));
                            self.exercise_modal = Some(ExerciseDraft {
                                editing: Some(exercise.id),
                                name: exercise.name.clone(),
                                category: exercise.category,
                            });
                        }
                        if ui
                            .add_enabled(index < last_index, egui::Button::new("v").small())
                            .clicked()
                        {
                            self.dispatch(BackendCommand::MoveExercise {
                                id: exercise.id,
                                direction: MoveDirection::Down,
                                category: self.view.settings_category,
                            });
                        }
                        if ui
                            .add_enabled(index > 0, egui::Button::new("^").small())
                            .clicked()
                        {
                            self.dispatch(BackendCommand::MoveExercise {
                                id: exercise.id,
                                direction: MoveDirection::Up,
                                category: self.view.settings_category,
                            });
                        }
                    });
                });
            }
        });

        ui.add_space(16.0);
        ui.separator();
        ui.label(RichText::new("Data").strong());
        ui.horizontal(|ui| {
            if ui.button("Export CSV").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("CSV", &["csv"])
                    .set_file_name("traintrack_export.csv")
                    .save_file()
                {
                    self.dispatch(BackendCommand::ExportCsv { path });
                }
            }
            if ui.button("Import CSV").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("CSV", &["csv"])
                    .pick_file()
                {
                    self.dispatch(BackendCommand::ImportCsv {
                        path,
                        record_category: self.view.active_category,
                        settings_category: self.view.settings_category,
                    });
                }
            }
            if ui.button("Clear all data").clicked() {
                self.confirm = Some(PendingConfirm::ClearAll);
            }
        });

        ui.add_space(8.0);
        if ui
            .checkbox(&mut self.settings.dark_mode, "Dark theme")
            .changed()
        {
            self.theme_applied = false;
        }
    }

    fn category_selector(&mut self, ui: &mut egui::Ui, settings: bool) {
        ui.horizontal(|ui| {
            let current = if settings {
                self.view.settings_category
            } else {
                self.view.active_category
            };
            let mut switched = None;
            for category in Category::ALL {
                if ui
                    .selectable_label(current == category, category.label())
                    .clicked()
                    && current != category
                {
                    switched = Some(category);
                }
            }
            if let Some(category) = switched {
                let refresh = if settings {
                    self.view.switch_settings_category(category)
                } else {
                    self.view.switch_category(category)
                };
                self.refresh_for(refresh);
            }
        });
    }

    fn open_workout_modal(&mut self, exercise_id: Option<ExerciseId>) {
        // Walking has one obvious target: jump straight to the first walking
        // exercise the way the record shortcut does in the mobile layout.
        let exercise_id = exercise_id.or_else(|| {
            self.record_cards
                .first()
                .filter(|_| self.view.active_category == Category::Walking)
                .map(|card| card.exercise.id)
        });
        self.view.begin_workout_edit(None);
        self.workout_modal = Some(WorkoutDraft::blank(exercise_id));
        self.dispatch(BackendCommand::ListExerciseOptions);
    }

    fn show_exercise_modal(&mut self, ctx: &egui::Context) {
        let Some(mut draft) = self.exercise_modal.take() else {
            return;
        };
        let mut keep_open = true;
        let mut saved = false;

        let title = if draft.editing.is_some() {
            "Edit exercise"
        } else {
            "Add exercise"
        };
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Name");
                    ui.text_edit_singleline(&mut draft.name);
                });
                egui::ComboBox::from_label("Category")
                    .selected_text(draft.category.label())
                    .show_ui(ui, |ui| {
                        for category in Category::ALL {
                            ui.selectable_value(&mut draft.category, category, category.label());
                        }
                    });
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        saved = true;
                    }
                    if ui.button("Cancel").clicked() {
                        keep_open = false;
                    }
                });
            });

        if saved {
            match validate::exercise_name(&draft.name) {
                Ok(name) => {
                    self.dispatch(BackendCommand::SaveExercise {
                        editing: draft.editing,
                        name,
                        category: draft.category,
                        record_category: self.view.active_category,
                    });
                    self.view.clear_edit_targets();
                    return;
                }
                Err(err) => {
                    self.status = Some(err.to_string());
                }
            }
        }
        if keep_open {
            self.exercise_modal = Some(draft);
        } else {
            self.view.clear_edit_targets();
        }
    }

    fn show_workout_modal(&mut self, ctx: &egui::Context) {
        let Some(mut draft) = self.workout_modal.take() else {
            return;
        };
        let mut keep_open = true;
        let mut saved = false;

        let is_walking = draft
            .exercise_id
            .and_then(|id| self.exercise_options.iter().find(|e| e.id == id))
            .map(|e| e.category == Category::Walking)
            .unwrap_or(false);

        let title = if draft.editing.is_some() {
            "Edit workout"
        } else {
            "Record workout"
        };
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let selected_name = draft
                    .exercise_id
                    .and_then(|id| self.exercise_options.iter().find(|e| e.id == id))
                    .map(|e| e.name.clone())
                    .unwrap_or_else(|| "Select exercise".to_string());
                egui::ComboBox::from_id_salt("workout_exercise")
                    .selected_text(selected_name)
                    .show_ui(ui, |ui| {
                        for exercise in &self.exercise_options {
                            ui.selectable_value(
                                &mut draft.exercise_id,
                                Some(exercise.id),
                                format!("{} ({})", exercise.name, exercise.category.label()),
                            );
                        }
                    });

                ui.horizontal(|ui| {
                    ui.label("Date");
                    ui.add(
                        egui::TextEdit::singleline(&mut draft.date_text)
                            .hint_text("YYYY-MM-DD")
                            .desired_width(110.0),
                    );
                });
                ui.add_space(6.0);

                if is_walking {
                    ui.horizontal(|ui| {
                        ui.label("Minutes");
                        ui.add(
                            egui::TextEdit::singleline(&mut draft.walk_minutes)
                                .desired_width(60.0),
                        );
                    });
                } else {
                    for i in 0..MAX_SETS {
                        ui.horizontal(|ui| {
                            ui.label(format!("Set {}", i + 1));
                            ui.add(
                                egui::TextEdit::singleline(&mut draft.weights[i])
                                    .hint_text("kg")
                                    .desired_width(60.0),
                            );
                            ui.add(
                                egui::TextEdit::singleline(&mut draft.reps[i])
                                    .hint_text("reps")
                                    .desired_width(60.0),
                            );
                        });
                    }
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        saved = true;
                    }
                    if ui.button("Cancel").clicked() {
                        keep_open = false;
                    }
                });
            });

        if saved {
            match prepare_workout_save(&draft, is_walking) {
                Ok((exercise_id, sets, date)) => {
                    self.dispatch(BackendCommand::SaveWorkout {
                        editing: draft.editing,
                        exercise_id,
                        sets,
                        date,
                        record_category: self.view.active_category,
                    });
                    self.view.clear_edit_targets();
                    return;
                }
                Err(message) => self.status = Some(message),
            }
        }
        if keep_open {
            self.workout_modal = Some(draft);
        } else {
            self.view.clear_edit_targets();
        }
    }

    fn show_confirm_modal(&mut self, ctx: &egui::Context) {
        let Some(confirm) = self.confirm.take() else {
            return;
        };
        let (message, label) = match &confirm {
            PendingConfirm::DeleteExercise { name, .. } => (
                format!("Delete '{name}' and all of its workout history?"),
                "Delete",
            ),
            PendingConfirm::ClearAll => (
                "Delete every exercise and workout? This cannot be undone.".to_string(),
                "Clear all",
            ),
        };

        let mut decided = None;
        egui::Window::new("Confirm")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button(label).clicked() {
                        decided = Some(true);
                    }
                    if ui.button("Cancel").clicked() {
                        decided = Some(false);
                    }
                });
            });

        match decided {
            Some(true) => match confirm {
                PendingConfirm::DeleteExercise { id, .. } => {
                    self.dispatch(BackendCommand::DeleteExercise {
                        id,
                        category: self.view.settings_category,
                        record_category: self.view.active_category,
                    });
                }
                PendingConfirm::ClearAll => {
                    self.dispatch(BackendCommand::ClearAll {
                        record_category: self.view.active_category,
                        settings_category: self.view.settings_category,
                    });
                }
            },
            Some(false) => {}
            None => self.confirm = Some(confirm),
        }
    }
}

impl eframe::App for TrainTrackApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        if !self.theme_applied {
            ctx.set_visuals(if self.settings.dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            self.theme_applied = true;
        }

        self.show_top_bar(ctx);
        self.show_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| match self.view.active_view {
            ActiveView::Record => self.show_record_view(ui),
            ActiveView::History => self.show_history_view(ui),
            ActiveView::Analytics => self.show_analytics_view(ui),
            ActiveView::Settings => self.show_settings_view(ui),
        });

        self.show_exercise_modal(ctx);
        self.show_workout_modal(ctx);
        self.show_confirm_modal(ctx);

        // Backend replies arrive asynchronously; poll at a relaxed cadence.
        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(serialized) = serde_json::to_string(&self.settings) {
            storage.set_string(SETTINGS_STORAGE_KEY, serialized);
        }
    }
}

/// Builds the store-ready payload from a workout draft, or a user-facing
/// rejection message. Nothing is written when this fails.
fn prepare_workout_save(
    draft: &WorkoutDraft,
    is_walking: bool,
) -> Result<(ExerciseId, Vec<WorkoutSet>, NaiveDate), String> {
    let exercise_id = draft.exercise_id.ok_or("Select an exercise first")?;
    let date: NaiveDate = draft
        .date_text
        .trim()
        .parse()
        .map_err(|_| "Enter the date as YYYY-MM-DD".to_string())?;

    let sets = if is_walking {
        let minutes =
            validate::walking_minutes(&draft.walk_minutes).map_err(|e| e.to_string())?;
        walking_sets(minutes)
    } else {
        let sets = build_strength_sets(&draft.weights, &draft.reps);
        validate::strength_sets(&sets).map_err(|e: ValidationError| e.to_string())?;
        sets
    };

    Ok((exercise_id, sets, date))
}

/// Empty or unparseable numeric fields read as zero, matching how the entry
/// form treats blanks; validation still requires reps in the first set.
fn build_strength_sets(weights: &[String; MAX_SETS], reps: &[String; MAX_SETS]) -> Vec<WorkoutSet> {
    (0..MAX_SETS)
        .map(|i| WorkoutSet {
            weight: weights[i].trim().parse().unwrap_or(0.0),
            reps: reps[i].trim().parse().unwrap_or(0),
        })
        .collect()
}

fn summarize_sets(entry: &HistoryEntry) -> String {
    if entry.category == Category::Walking {
        return entry
            .workout
            .duration_minutes()
            .map(|m| format!("{m} min"))
            .unwrap_or_default();
    }
    entry
        .workout
        .sets
        .iter()
        .filter(|s| s.reps > 0)
        .map(|s| format!("{}x{}", trim_float(s.weight), s.reps))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Display formatting for weights, which are finite non-negative user
/// entries: whole values lose the trailing ".0", fractional values print
/// as entered.
fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn draw_chart(ui: &mut egui::Ui, chart: &ChartData) {
    let height = 140.0;
    let (response, painter) =
        ui.allocate_painter(egui::vec2(ui.available_width(), height), egui::Sense::hover());
    let rect = response.rect.shrink(10.0);

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for series in &chart.series {
        for &point in &series.points {
            min = min.min(point);
            max = max.max(point);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return;
    }
    if (max - min).abs() < f64::EPSILON {
        max = min + 1.0;
    }

    let count = chart.labels.len();
    for (i, series) in chart.series.iter().enumerate() {
        let color = SERIES_COLORS[i % SERIES_COLORS.len()];
        let stroke = Stroke::new(2.0, color);
        let points: Vec<egui::Pos2> = series
            .points
            .iter()
            .enumerate()
            .map(|(j, &value)| {
                let x = rect.left()
                    + rect.width() * j as f32 / (count.saturating_sub(1)).max(1) as f32;
                let t = ((value - min) / (max - min)) as f32;
                let y = rect.bottom() - rect.height() * t;
                egui::pos2(x, y)
            })
            .collect();

        if series.dashed {
            painter.extend(egui::Shape::dashed_line(&points, stroke, 6.0, 4.0));
        } else {
            painter.add(egui::Shape::line(points, stroke));
        }
    }

    let label_color = ui.style().visuals.weak_text_color();
    if let (Some(first), Some(last)) = (chart.labels.first(), chart.labels.last()) {
        painter.text(
            rect.left_bottom() + egui::vec2(0.0, 2.0),
            Align2::LEFT_TOP,
            first,
            FontId::proportional(10.0),
            label_color,
        );
        painter.text(
            rect.right_bottom() + egui::vec2(0.0, 2.0),
            Align2::RIGHT_TOP,
            last,
            FontId::proportional(10.0),
            label_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_with(weights: [&str; 4], reps: [&str; 4]) -> WorkoutDraft {
        WorkoutDraft {
            editing: None,
            exercise_id: Some(ExerciseId(1)),
            date_text: "2024-05-01".to_string(),
            weights: weights.map(str::to_string),
            reps: reps.map(str::to_string),
            walk_minutes: String::new(),
        }
    }

    #[test]
    fn strength_draft_builds_four_sets_with_blank_fields_as_zero() {
        let sets = build_strength_sets(
            &["60".to_string(), "62.5".to_string(), String::new(), String::new()],
            &["10".to_string(), "8".to_string(), String::new(), String::new()],
        );
        assert_eq!(sets.len(), 4);
        assert_eq!(sets[1].weight, 62.5);
        assert_eq!(sets[2].reps, 0);
    }

    #[test]
    fn save_is_rejected_without_first_set_reps() {
        let draft = draft_with(["60", "", "", ""], ["", "", "", ""]);
        assert!(prepare_workout_save(&draft, false).is_err());
    }

    #[test]
    fn save_is_rejected_for_malformed_dates() {
        let mut draft = draft_with(["60", "", "", ""], ["10", "", "", ""]);
        draft.date_text = "05/01/2024".to_string();
        assert!(prepare_workout_save(&draft, false).is_err());
    }

    #[test]
    fn walking_save_uses_single_zero_weight_set() {
        let mut draft = draft_with(["", "", "", ""], ["", "", "", ""]);
        draft.walk_minutes = "45".to_string();
        let (_, sets, date) = prepare_workout_save(&draft, true).expect("save");
        assert_eq!(sets, walking_sets(45));
        assert_eq!(date, "2024-05-01".parse::<NaiveDate>().expect("date"));
    }

    #[test]
    fn trims_whole_kilos_but_keeps_halves() {
        assert_eq!(trim_float(60.0), "60");
        assert_eq!(trim_float(62.5), "62.5");
    }
}
