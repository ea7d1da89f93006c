//! Habit records and their completion history.

mod icon;

pub use icon::{HabitIcon, PALETTE, PICKER_ICONS, SUGGESTION_ICONS};

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// Progress goal used when a habit has no explicit duration.
pub const DEFAULT_GOAL_DAYS: u32 = 30;

const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Format a calendar date as its `YYYY-MM-DD` key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` key.
pub fn parse_date_key(key: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(key.trim(), DATE_KEY_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(key.to_string()))
}

/// The set of calendar dates on which a habit was completed.
///
/// Serialized as a map from `YYYY-MM-DD` to `true`. Entries stored as
/// `false` mean "not completed" and are dropped on load, so membership is
/// the only state a date can carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionSet(BTreeSet<NaiveDate>);

impl CompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }

    pub fn mark(&mut self, date: NaiveDate) -> bool {
        self.0.insert(date)
    }

    pub fn unmark(&mut self, date: NaiveDate) -> bool {
        self.0.remove(&date)
    }

    /// Flip one date's membership. Returns whether the date is now completed.
    pub fn toggle(&mut self, date: NaiveDate) -> bool {
        !self.unmark(date) && self.mark(date)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Completed dates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<NaiveDate> for CompletionSet {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for CompletionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|date| (date_key(*date), true)))
    }
}

impl<'de> Deserialize<'de> for CompletionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, bool>::deserialize(deserializer)?;
        let mut set = BTreeSet::new();
        for (key, done) in raw {
            let date = parse_date_key(&key).map_err(serde::de::Error::custom)?;
            if done {
                set.insert(date);
            }
        }
        Ok(Self(set))
    }
}

/// A user-defined recurring task tracked by daily completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: HabitIcon,
    pub color: String,
    #[serde(default)]
    pub completion_dates: CompletionSet,
    /// Consecutive completed days ending on the day of the last toggle.
    #[serde(default)]
    pub streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    /// Target number of days, used only for the progress display.
    #[serde(default)]
    pub duration: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// A fresh habit with no history.
    pub fn from_input(id: String, input: HabitInput, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            icon: input.icon,
            color: input.color,
            completion_dates: CompletionSet::new(),
            streak: 0,
            longest_streak: 0,
            duration: input.duration,
            created_at,
        }
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completion_dates.is_completed(date)
    }

    /// The streak as of `today`.
    ///
    /// The stored `streak` is only refreshed by toggles, so it goes stale once
    /// a day passes untouched. Display code should prefer this.
    pub fn current_streak(&self, today: NaiveDate) -> u32 {
        crate::streak::recompute_streak(&self.completion_dates, today)
    }

    /// Progress towards `duration`, or towards `default_goal` days when the
    /// habit has none.
    pub fn progress(&self, default_goal: u32) -> HabitProgress {
        HabitProgress::new(self.completion_dates.len(), self.duration, default_goal)
    }
}

/// Fields supplied by the user when creating a habit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: HabitIcon,
    pub color: String,
    #[serde(default)]
    pub duration: Option<u32>,
}

impl HabitInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            icon: HabitIcon::default(),
            color: PALETTE[0].to_string(),
            duration: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn icon(mut self, icon: HabitIcon) -> Self {
        self.icon = icon;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn duration(mut self, days: u32) -> Self {
        self.duration = Some(days);
        self
    }

    /// Trim the name and reject blank names or zero-day goals.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(ValidationError::Empty("name".into()));
        }
        if self.duration == Some(0) {
            return Err(ValidationError::InvalidValue {
                field: "duration".into(),
                message: "must be at least 1 day".into(),
            });
        }
        Ok(self)
    }
}

/// Completion progress toward a habit's goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HabitProgress {
    pub total_completions: usize,
    pub goal: u32,
    /// Percentage of the goal reached, capped at 100.
    pub percent: f64,
}

impl HabitProgress {
    pub fn new(total_completions: usize, duration: Option<u32>, default_goal: u32) -> Self {
        let goal = duration.filter(|d| *d > 0).unwrap_or(default_goal.max(1));
        let percent = (total_completions as f64 / goal as f64 * 100.0).min(100.0);
        Self {
            total_completions,
            goal,
            percent,
        }
    }
}

/// Brag line for sharing a habit's streak.
pub fn share_text(habit: &Habit) -> String {
    format!(
        "I'm on a {}-day streak for my habit \"{}\" in Habit Quest! My longest streak is {} days. #HabitQuest",
        habit.streak, habit.name, habit.longest_streak
    )
}
