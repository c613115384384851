use super::*;

use chrono::NaiveDate;
use shared::domain::{
    walking_sets, Category, Exercise, ExerciseId, Workout, WorkoutId, WorkoutSet,
};
use storage::Store;

fn date(s: &str) -> NaiveDate {
    s.parse().expect("date")
}

fn exercise(id: i64, category: Category) -> Exercise {
    Exercise {
        id: ExerciseId(id),
        name: format!("exercise-{id}"),
        category,
        sort_order: 0,
    }
}

fn workout(id: i64, exercise_id: i64, date_str: &str, sets: Vec<WorkoutSet>) -> Workout {
    Workout {
        id: WorkoutId(id),
        exercise_id: ExerciseId(exercise_id),
        date: date(date_str),
        sets,
    }
}

fn set(weight: f64, reps: i64) -> WorkoutSet {
    WorkoutSet { weight, reps }
}

mod view_state {
    use super::*;

    #[test]
    fn switching_view_refreshes_exactly_that_view() {
        let mut state = ViewState::default();
        assert_eq!(state.active_view, ActiveView::Record);

        let refresh = state.switch_view(ActiveView::Analytics);
        assert_eq!(refresh, Refresh::View(ActiveView::Analytics));
        assert_eq!(state.active_view, ActiveView::Analytics);
    }

    #[test]
    fn category_switches_scope_to_their_region() {
        let mut state = ViewState::default();

        assert_eq!(state.switch_category(Category::Legs), Refresh::RecordGrid);
        assert_eq!(state.active_category, Category::Legs);
        assert_eq!(
            state.settings_category,
            Category::Push,
            "record and settings categories are independent"
        );

        assert_eq!(
            state.switch_settings_category(Category::Pull),
            Refresh::SettingsList
        );
        assert_eq!(state.settings_category, Category::Pull);
        assert_eq!(state.active_category, Category::Legs);
    }

    #[test]
    fn edit_targets_default_to_create_new() {
        let mut state = ViewState::default();
        assert!(state.editing_exercise.is_none());

        state.begin_exercise_edit(Some(ExerciseId(3)));
        state.begin_workout_edit(Some(WorkoutId(9)));
        assert_eq!(state.editing_exercise, Some(ExerciseId(3)));
        assert_eq!(state.editing_workout, Some(WorkoutId(9)));

        state.clear_edit_targets();
        assert!(state.editing_exercise.is_none());
        assert!(state.editing_workout.is_none());
    }
}

mod derived {
    use super::*;

    #[test]
    fn stats_are_empty_without_workouts() {
        let bench = exercise(1, Category::Push);
        let stats = exercise_stats(&bench, &[]);
        assert_eq!(stats, ExerciseStats::default());
    }

    #[test]
    fn last_value_comes_from_latest_dated_workout() {
        let bench = exercise(1, Category::Push);
        let workouts = vec![
            workout(1, 1, "2024-05-08", vec![set(80.0, 5), set(80.0, 4)]),
            workout(2, 1, "2024-05-01", vec![set(60.0, 10)]),
        ];

        let stats = exercise_stats(&bench, &workouts);
        assert_eq!(
            stats.last,
            Some(LastValue::Weight {
                weight: Some(80.0),
                final_reps: Some(4),
            })
        );
        assert_eq!(stats.max_weight, Some(80.0));
    }

    #[test]
    fn last_weight_skips_trailing_zero_weight_sets() {
        let bench = exercise(1, Category::Push);
        let workouts = vec![workout(
            1,
            1,
            "2024-05-08",
            vec![set(60.0, 10), set(62.5, 8), set(0.0, 12)],
        )];

        let stats = exercise_stats(&bench, &workouts);
        assert_eq!(
            stats.last,
            Some(LastValue::Weight {
                weight: Some(62.5),
                final_reps: Some(12),
            })
        );
    }

    #[test]
    fn walking_stats_report_duration() {
        let walk = exercise(2, Category::Walking);
        let workouts = vec![
            workout(1, 2, "2024-05-01", walking_sets(30)),
            workout(2, 2, "2024-05-03", walking_sets(45)),
        ];

        let stats = exercise_stats(&walk, &workouts);
        assert_eq!(stats.last, Some(LastValue::Minutes(45)));
    }

    #[test]
    fn single_workout_produces_no_chart() {
        let bench = exercise(1, Category::Push);
        let workouts = vec![workout(1, 1, "2024-05-01", vec![set(60.0, 10)])];
        assert!(chart_data(&bench, &workouts).is_none());
    }

    #[test]
    fn strength_chart_has_solid_weight_and_dashed_reps_series() {
        let bench = exercise(1, Category::Push);
        let workouts = vec![
            workout(2, 1, "2024-05-08", vec![set(62.5, 8), set(65.0, 6)]),
            workout(1, 1, "2024-05-01", vec![set(60.0, 10), set(60.0, 8)]),
        ];

        let chart = chart_data(&bench, &workouts).expect("chart");
        assert_eq!(chart.labels, vec!["05/01", "05/08"]);
        assert_eq!(chart.series.len(), 2);

        let weight = &chart.series[0];
        assert!(!weight.dashed);
        assert_eq!(weight.points, vec![60.0, 65.0]);

        let reps = &chart.series[1];
        assert!(reps.dashed);
        assert_eq!(reps.points, vec![8.0, 6.0]);
    }

    #[test]
    fn walking_chart_is_a_single_minutes_series() {
        let walk = exercise(2, Category::Walking);
        let workouts = vec![
            workout(1, 2, "2024-05-01", walking_sets(30)),
            workout(2, 2, "2024-05-03", walking_sets(45)),
            workout(3, 2, "2024-05-05", walking_sets(40)),
        ];

        let chart = chart_data(&walk, &workouts).expect("chart");
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].points, vec![30.0, 45.0, 40.0]);
    }

    #[test]
    fn history_groups_newest_first_and_insertion_ordered_within() {
        let workouts = vec![
            workout(1, 1, "2024-05-01", vec![set(60.0, 10)]),
            workout(2, 2, "2024-05-03", vec![set(50.0, 12)]),
            workout(3, 1, "2024-05-03", vec![set(62.5, 8)]),
        ];

        let groups = history_groups(workouts);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, date("2024-05-03"));
        assert_eq!(
            groups[0]
                .workouts
                .iter()
                .map(|w| w.id.0)
                .collect::<Vec<_>>(),
            vec![2, 3]
        );
        assert_eq!(groups[1].date, date("2024-05-01"));
    }
}

mod csv_round_trip {
    use super::*;
    use crate::transfer::{export_csv, import_csv};

    #[tokio::test]
    async fn export_then_import_preserves_data_with_fresh_ids() {
        let source = Store::new("sqlite::memory:").await.expect("db");
        let bench = source
            .add_exercise("Bench, close grip", Category::Push)
            .await
            .expect("add");
        let walk = source
            .add_exercise("Morning walk", Category::Walking)
            .await
            .expect("add");
        source
            .add_workout(
                bench,
                &[set(60.0, 10), set(62.5, 8)],
                date("2024-05-01"),
            )
            .await
            .expect("workout");
        source
            .add_workout(walk, &walking_sets(30), date("2024-05-02"))
            .await
            .expect("workout");

        let exercises = source.list_exercises(None).await.expect("list");
        let workouts = source.list_workouts(None).await.expect("list");
        let csv = export_csv(&exercises, &workouts);

        let target = Store::new("sqlite::memory:").await.expect("db");
        // Pre-existing rows shift the id sequence, proving ids are re-assigned.
        let occupied = target
            .add_exercise("Existing", Category::Legs)
            .await
            .expect("add");

        let summary = import_csv(&target, &csv).await.expect("import");
        assert_eq!(summary.exercises_added, 2);
        assert_eq!(summary.workouts_added, 2);
        assert_eq!(summary.rows_skipped, 0);

        let imported: Vec<_> = target
            .list_exercises(None)
            .await
            .expect("list")
            .into_iter()
            .filter(|e| e.id != occupied)
            .collect();
        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].name, "Bench, close grip");
        assert_eq!(imported[0].category, Category::Push);
        assert_eq!(imported[1].name, "Morning walk");
        assert_eq!(imported[1].category, Category::Walking);
        assert!(
            imported[0].sort_order < imported[1].sort_order,
            "relative order must survive the round trip"
        );
        assert_ne!(imported[0].id, bench);
        assert_ne!(imported[1].id, walk);

        let imported_bench = target
            .list_workouts(Some(imported[0].id))
            .await
            .expect("list");
        assert_eq!(imported_bench.len(), 1);
        assert_eq!(imported_bench[0].date, date("2024-05-01"));
        assert_eq!(imported_bench[0].sets, vec![set(60.0, 10), set(62.5, 8)]);

        let imported_walk = target
            .list_workouts(Some(imported[1].id))
            .await
            .expect("list");
        assert_eq!(imported_walk.len(), 1);
        assert_eq!(imported_walk[0].duration_minutes(), Some(30));
    }

    #[tokio::test]
    async fn workouts_referencing_unknown_exercises_are_skipped() {
        let store = Store::new("sqlite::memory:").await.expect("db");
        let csv = format!(
            "{}\n\n{}\nworkout,1,99,2024-05-01,\"[{{\"\"weight\"\":60.0,\"\"reps\"\":10}}]\"\n",
            crate::transfer::EXERCISE_HEADER,
            crate::transfer::WORKOUT_HEADER,
        );

        let summary = import_csv(&store, &csv).await.expect("import");
        assert_eq!(summary.workouts_added, 0);
        assert_eq!(summary.rows_skipped, 1);
        assert!(store.list_workouts(None).await.expect("list").is_empty());
    }
}
