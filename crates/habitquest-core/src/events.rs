use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Every state change made through the tracker produces an Event.
/// Front-ends drain them to show notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    HabitCreated {
        habit_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    CompletionToggled {
        habit_id: String,
        date: NaiveDate,
        completed: bool,
        streak: u32,
        at: DateTime<Utc>,
    },
    /// Streak grew onto a milestone threshold.
    MilestoneReached {
        habit_id: String,
        name: String,
        streak: u32,
        at: DateTime<Utc>,
    },
    /// A store write failed and the local copy was restored.
    ToggleRolledBack {
        habit_id: String,
        date: NaiveDate,
        at: DateTime<Utc>,
    },
    HabitDeleted {
        habit_id: String,
        at: DateTime<Utc>,
    },
}
