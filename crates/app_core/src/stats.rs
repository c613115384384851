//! Derived read models, computed on demand from store query results.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use shared::domain::{Category, Exercise, Workout};

/// The "last session" figure shown on an exercise card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LastValue {
    /// Walking: session duration in minutes.
    Minutes(i64),
    /// Strength: last non-zero weight of the latest session, plus the reps of
    /// that session's final set.
    Weight {
        weight: Option<f64>,
        final_reps: Option<i64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExerciseStats {
    pub last: Option<LastValue>,
    pub max_weight: Option<f64>,
}

/// Card stats for one exercise from its full workout list.
pub fn exercise_stats(exercise: &Exercise, workouts: &[Workout]) -> ExerciseStats {
    let latest = workouts.iter().max_by_key(|w| (w.date, w.id));
    let Some(latest) = latest else {
        return ExerciseStats::default();
    };

    let last = if exercise.category == Category::Walking {
        latest.duration_minutes().map(LastValue::Minutes)
    } else {
        let weight = latest
            .sets
            .iter()
            .rev()
            .find(|s| s.weight > 0.0)
            .map(|s| s.weight);
        let final_reps = latest
            .sets
            .last()
            .filter(|s| s.reps > 0)
            .map(|s| s.reps);
        Some(LastValue::Weight { weight, final_reps })
    };

    let max_weight = workouts
        .iter()
        .flat_map(|w| w.sets.iter())
        .map(|s| s.weight)
        .fold(None, |acc: Option<f64>, w| {
            Some(acc.map_or(w, |m| m.max(w)))
        });

    ExerciseStats { last, max_weight }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub name: &'static str,
    pub points: Vec<f64>,
    pub dashed: bool,
}

/// The whole contract with the chart renderer: ordered labels and parallel
/// numeric series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

/// One point per session, ascending by date. Returns None below two sessions;
/// a single point cannot show a trend.
pub fn chart_data(exercise: &Exercise, workouts: &[Workout]) -> Option<ChartData> {
    if workouts.len() < 2 {
        return None;
    }

    let mut sessions: Vec<&Workout> = workouts.iter().collect();
    sessions.sort_by_key(|w| (w.date, w.id));

    let labels = sessions
        .iter()
        .map(|w| w.date.format("%m/%d").to_string())
        .collect();

    let series = if exercise.category == Category::Walking {
        vec![ChartSeries {
            name: "Minutes",
            points: sessions
                .iter()
                .map(|w| w.duration_minutes().unwrap_or(0) as f64)
                .collect(),
            dashed: false,
        }]
    } else {
        vec![
            ChartSeries {
                name: "Max weight (kg)",
                points: sessions
                    .iter()
                    .map(|w| {
                        w.sets
                            .iter()
                            .map(|s| s.weight)
                            .fold(0.0_f64, f64::max)
                    })
                    .collect(),
                dashed: false,
            },
            ChartSeries {
                name: "Final reps",
                points: sessions
                    .iter()
                    .map(|w| w.sets.last().map(|s| s.reps).unwrap_or(0) as f64)
                    .collect(),
                dashed: true,
            },
        ]
    };

    Some(ChartData { labels, series })
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryGroup {
    pub date: NaiveDate,
    pub workouts: Vec<Workout>,
}

/// Workouts grouped by calendar date, newest group first; within a group the
/// records keep insertion order.
pub fn history_groups(workouts: Vec<Workout>) -> Vec<HistoryGroup> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Workout>> = BTreeMap::new();
    for workout in workouts {
        by_date.entry(workout.date).or_default().push(workout);
    }
    for group in by_date.values_mut() {
        group.sort_by_key(|w| w.id);
    }

    by_date
        .into_iter()
        .rev()
        .map(|(date, workouts)| HistoryGroup { date, workouts })
        .collect()
}
