//! Pre-write validation for user input. Every save path runs these before
//! dispatching a store operation, so a rejected draft never causes a partial write.

use crate::domain::{WorkoutSet, MAX_SETS};
use crate::error::ValidationError;

pub fn exercise_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// A strength draft is saveable when at least the first set has non-zero reps.
pub fn strength_sets(sets: &[WorkoutSet]) -> Result<(), ValidationError> {
    if sets.len() > MAX_SETS {
        return Err(ValidationError::TooManySets {
            max: MAX_SETS,
            got: sets.len(),
        });
    }
    match sets.first() {
        Some(first) if first.reps > 0 => Ok(()),
        _ => Err(ValidationError::NoSets),
    }
}

pub fn walking_minutes(raw: &str) -> Result<i64, ValidationError> {
    let minutes: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidDuration)?;
    if minutes <= 0 {
        return Err(ValidationError::InvalidDuration);
    }
    Ok(minutes)
}
