use thiserror::Error;

/// User-input problems caught before anything is written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("exercise name must not be empty")]
    EmptyName,
    #[error("enter at least one set with reps")]
    NoSets,
    #[error("a workout holds at most {max} sets, got {got}")]
    TooManySets { max: usize, got: usize },
    #[error("walking duration must be a positive number of minutes")]
    InvalidDuration,
}
