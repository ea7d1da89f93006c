//! Streak engine.
//!
//! Everything here is a pure function of a habit value and the caller's
//! notion of "today" (a local calendar date). No I/O, no shared state.
//!
//! The current streak is always recomputed by walking backward from today.
//! Incremental arithmetic is wrong here: removing an older completion can
//! break the chain even when today's entry is untouched.

mod milestone;

pub use milestone::{detect_milestone, Milestone, DEFAULT_THRESHOLDS};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::habit::{CompletionSet, Habit};

/// Count consecutive completed days ending at and including `today`.
///
/// Returns 0 when `today` itself is not completed. There is no lower bound
/// on the walk besides the calendar's own minimum date.
pub fn recompute_streak(completions: &CompletionSet, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut cursor = Some(today);
    while let Some(day) = cursor {
        if !completions.is_completed(day) {
            break;
        }
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

/// Flip `today` in the habit's completion set and refresh both streaks.
///
/// Only `completion_dates`, `streak` and `longest_streak` change.
/// `longest_streak` never decreases.
pub fn toggle_completion(habit: &Habit, today: NaiveDate) -> Habit {
    let mut updated = habit.clone();
    updated.completion_dates.toggle(today);
    updated.streak = recompute_streak(&updated.completion_dates, today);
    updated.longest_streak = habit.longest_streak.max(updated.streak);
    updated
}

/// Result of a toggle, with the milestone (if any) it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    pub habit: Habit,
    /// Streak as of `today` before the toggle.
    pub previous_streak: u32,
    pub completed: bool,
    pub milestone: Option<Milestone>,
}

/// Toggle `today` and check the new streak against `thresholds`.
///
/// The previous streak is recomputed for `today` rather than read from the
/// stored field, which may date from an earlier day.
pub fn toggle(habit: &Habit, today: NaiveDate, thresholds: &[u32]) -> ToggleOutcome {
    let previous_streak = recompute_streak(&habit.completion_dates, today);
    let updated = toggle_completion(habit, today);
    let milestone = detect_milestone(previous_streak, updated.streak, thresholds);
    ToggleOutcome {
        completed: updated.is_completed_on(today),
        previous_streak,
        milestone,
        habit: updated,
    }
}
