//! Progress math for goal-tracking projects.
//!
//! Pure helpers shared by the progress engine: aggregate rollups over a
//! subtree, the increment-vs-absolute update semantics, and the bounds rules
//! that keep `0 <= current_points <= goal_points` after every accepted
//! mutation. Out-of-bounds updates are rejected outright, never clamped.

/// A rejected progress or goal value, with the specific rule that failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressViolation {
    #[error("Progress cannot exceed the goal ({goal} points)")]
    ExceedsGoal { goal: i32 },

    #[error("Progress cannot be negative")]
    Negative,

    #[error("Goal points must be a positive integer")]
    NonPositiveGoal,
}

/// Aggregate goal/current totals over a project and its live descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ProgressTotals {
    pub total_goal_points: i64,
    pub total_current_points: i64,
    /// `round(100 * current / goal)`, half-up; `0` when the goal total is zero.
    pub total_percentage: i32,
}

/// Sum `(goal_points, current_points)` pairs into a rollup.
pub fn aggregate_totals<I>(points: I) -> ProgressTotals
where
    I: IntoIterator<Item = (i32, i32)>,
{
    let mut total_goal: i64 = 0;
    let mut total_current: i64 = 0;
    for (goal, current) in points {
        total_goal += i64::from(goal);
        total_current += i64::from(current);
    }
    ProgressTotals {
        total_goal_points: total_goal,
        total_current_points: total_current,
        total_percentage: percentage(total_current, total_goal),
    }
}

/// Integer percentage of `current` against `goal`, rounded half-up.
///
/// Returns `0` when `goal` is zero (no meaningful percentage exists).
pub fn percentage(current: i64, goal: i64) -> i32 {
    if goal <= 0 {
        return 0;
    }
    (100.0 * current as f64 / goal as f64).round() as i32
}

/// Resolve the effective new point value of a progress update.
///
/// An increment adds to the stored value; an absolute update replaces it.
/// Widened to `i64` so an increment near `i32::MAX` cannot overflow; any
/// value outside `0..=goal_points` is caught by [`check_bounds`] before it
/// is narrowed back for storage.
pub fn effective_points(current: i32, new_points: i32, is_increment: bool) -> i64 {
    if is_increment {
        i64::from(current) + i64::from(new_points)
    } else {
        i64::from(new_points)
    }
}

/// Check an effective point value against the project's goal.
///
/// A value that passes is guaranteed to fit in `i32` (it is bounded by
/// `goal_points`).
pub fn check_bounds(points: i64, goal_points: i32) -> Result<(), ProgressViolation> {
    if points < 0 {
        return Err(ProgressViolation::Negative);
    }
    if points > i64::from(goal_points) {
        return Err(ProgressViolation::ExceedsGoal { goal: goal_points });
    }
    Ok(())
}

/// Validate a goal target. Goals must be strictly positive.
pub fn validate_goal_points(goal_points: i32) -> Result<(), ProgressViolation> {
    if goal_points <= 0 {
        return Err(ProgressViolation::NonPositiveGoal);
    }
    Ok(())
}
