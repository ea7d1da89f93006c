//! The persistence contract for habits.

use crate::error::Result;
use crate::habit::{Habit, HabitInput};
use crate::session::Session;

/// Persists habits per user.
///
/// A habit owned by another user must be indistinguishable from a missing
/// one: both report [`CoreError::NotFound`](crate::CoreError::NotFound).
pub trait HabitStore {
    /// All of the user's habits, newest first.
    fn list(&self, session: &Session) -> Result<Vec<Habit>>;

    /// Validate `input`, assign an id and persist a habit with no history.
    fn create(&self, session: &Session, input: HabitInput) -> Result<Habit>;

    fn get(&self, session: &Session, habit_id: &str) -> Result<Habit>;

    /// Persist the completion history and both streak counters.
    fn update(&self, session: &Session, habit: &Habit) -> Result<()>;

    fn delete(&self, session: &Session, habit_id: &str) -> Result<()>;
}
