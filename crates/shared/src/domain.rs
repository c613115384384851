use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);
    };
}

id_newtype!(ExerciseId);
id_newtype!(WorkoutId);

/// Strength sets hold at most this many entries; walking workouts hold exactly one.
pub const MAX_SETS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Push,
    Pull,
    Legs,
    Walking,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Push,
        Category::Pull,
        Category::Legs,
        Category::Walking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Push => "push",
            Category::Pull => "pull",
            Category::Legs => "legs",
            Category::Walking => "walking",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Push => "Push",
            Category::Pull => "Pull",
            Category::Legs => "Legs",
            Category::Walking => "Walking",
        }
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(Category::Push),
            "pull" => Ok(Category::Pull),
            "legs" => Ok(Category::Legs),
            "walking" => Ok(Category::Walking),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown category '{0}'")]
pub struct UnknownCategory(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub category: Category,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub weight: f64,
    pub reps: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: WorkoutId,
    pub exercise_id: ExerciseId,
    pub date: NaiveDate,
    pub sets: Vec<WorkoutSet>,
}

impl Workout {
    /// Walking workouts store their duration as the reps of a single
    /// zero-weight set. Returns that duration in minutes.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.sets.first().map(|s| s.reps)
    }
}

/// Builds the canonical walking representation: one set, weight 0, reps = minutes.
pub fn walking_sets(minutes: i64) -> Vec<WorkoutSet> {
    vec![WorkoutSet {
        weight: 0.0,
        reps: minutes,
    }]
}
