//! Headless view/controller logic: session view state, derived read models
//! for the four screens, and CSV transfer. Everything here is a pure
//! query-then-derive layer over the storage crate; nothing is cached.

pub mod state;
pub mod stats;
pub mod transfer;

pub use state::{ActiveView, Refresh, ViewState};
pub use stats::{chart_data, exercise_stats, history_groups};
pub use stats::{ChartData, ChartSeries, ExerciseStats, HistoryGroup, LastValue};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
