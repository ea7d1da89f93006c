//! Presentation-side habit list with optimistic toggles.
//!
//! A toggle is a two-phase commit: the local copy is updated tentatively,
//! the store write is attempted, and on failure the local copy is restored
//! from the snapshot taken before the change.

use chrono::{NaiveDate, Utc};

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::habit::{Habit, HabitInput};
use crate::session::Session;
use crate::store::HabitStore;
use crate::streak::{self, ToggleOutcome};

/// A tentative change awaiting the store's verdict.
struct Pending {
    index: usize,
    snapshot: Habit,
}

/// The user's habits as shown by a front-end, kept in sync with a store.
pub struct Tracker<S: HabitStore> {
    store: S,
    session: Session,
    habits: Vec<Habit>,
    thresholds: Vec<u32>,
    events: Vec<Event>,
}

impl<S: HabitStore> Tracker<S> {
    /// Load the session's habits from `store`.
    ///
    /// # Errors
    /// Returns the store's error if listing fails.
    pub fn load(store: S, session: Session, thresholds: Vec<u32>) -> Result<Self> {
        let habits = store.list(&session)?;
        tracing::debug!(user_id = session.user_id(), count = habits.len(), "habits loaded");
        Ok(Self {
            store,
            session,
            habits,
            thresholds,
            events: Vec::new(),
        })
    }

    /// Habits, newest first.
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habit(&self, habit_id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == habit_id)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Take the events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Create a habit and put it at the top of the list.
    ///
    /// # Errors
    /// Validation or store failure; the list is untouched on error.
    pub fn add(&mut self, input: HabitInput) -> Result<Habit> {
        let habit = self.store.create(&self.session, input)?;
        self.events.push(Event::HabitCreated {
            habit_id: habit.id.clone(),
            name: habit.name.clone(),
            at: Utc::now(),
        });
        self.habits.insert(0, habit.clone());
        Ok(habit)
    }

    /// Toggle `today` for a habit.
    ///
    /// # Errors
    /// [`CoreError::NotFound`] if the habit is not in the list; the store's
    /// error if the write fails, in which case the habit is rolled back.
    pub fn toggle(&mut self, habit_id: &str, today: NaiveDate) -> Result<ToggleOutcome> {
        let index = self
            .habits
            .iter()
            .position(|h| h.id == habit_id)
            .ok_or_else(|| CoreError::not_found(habit_id))?;

        let pending = Pending {
            index,
            snapshot: self.habits[index].clone(),
        };
        let outcome = streak::toggle(&pending.snapshot, today, &self.thresholds);
        self.habits[index] = outcome.habit.clone();

        match self.store.update(&self.session, &outcome.habit) {
            Ok(()) => {
                self.confirm(&outcome, today);
                Ok(outcome)
            }
            Err(e) => {
                self.rollback(pending, today);
                tracing::warn!(habit_id, error = %e, "toggle rolled back");
                Err(e)
            }
        }
    }

    fn confirm(&mut self, outcome: &ToggleOutcome, today: NaiveDate) {
        let at = Utc::now();
        self.events.push(Event::CompletionToggled {
            habit_id: outcome.habit.id.clone(),
            date: today,
            completed: outcome.completed,
            streak: outcome.habit.streak,
            at,
        });
        if let Some(milestone) = outcome.milestone {
            tracing::info!(habit_id = %outcome.habit.id, streak = milestone.streak, "milestone reached");
            self.events.push(Event::MilestoneReached {
                habit_id: outcome.habit.id.clone(),
                name: outcome.habit.name.clone(),
                streak: milestone.streak,
                at,
            });
        }
    }

    fn rollback(&mut self, pending: Pending, today: NaiveDate) {
        let habit_id = pending.snapshot.id.clone();
        self.habits[pending.index] = pending.snapshot;
        self.events.push(Event::ToggleRolledBack {
            habit_id,
            date: today,
            at: Utc::now(),
        });
    }

    /// Delete a habit from the store and the list.
    ///
    /// # Errors
    /// The store's error; the list is untouched on error.
    pub fn delete(&mut self, habit_id: &str) -> Result<()> {
        self.store.delete(&self.session, habit_id)?;
        self.habits.retain(|h| h.id != habit_id);
        self.events.push(Event::HabitDeleted {
            habit_id: habit_id.to_string(),
            at: Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    /// In-memory store whose writes can be made to fail.
    #[derive(Default)]
    struct FlakyStore {
        habits: RefCell<Vec<Habit>>,
        fail_updates: Cell<bool>,
    }

    impl HabitStore for FlakyStore {
        fn list(&self, _session: &Session) -> Result<Vec<Habit>> {
            Ok(self.habits.borrow().clone())
        }

        fn create(&self, _session: &Session, input: HabitInput) -> Result<Habit> {
            let input = input.validate()?;
            let id = format!("h{}", self.habits.borrow().len() + 1);
            let habit = Habit::from_input(id, input, Utc::now());
            self.habits.borrow_mut().insert(0, habit.clone());
            Ok(habit)
        }

        fn get(&self, _session: &Session, habit_id: &str) -> Result<Habit> {
            self.habits
                .borrow()
                .iter()
                .find(|h| h.id == habit_id)
                .cloned()
                .ok_or_else(|| CoreError::not_found(habit_id))
        }

        fn update(&self, _session: &Session, habit: &Habit) -> Result<()> {
            if self.fail_updates.get() {
                return Err(CoreError::Io(std::io::Error::other("store unreachable")));
            }
            let mut habits = self.habits.borrow_mut();
            let slot = habits
                .iter_mut()
                .find(|h| h.id == habit.id)
                .ok_or_else(|| CoreError::not_found(&habit.id))?;
            *slot = habit.clone();
            Ok(())
        }

        fn delete(&self, _session: &Session, habit_id: &str) -> Result<()> {
            let mut habits = self.habits.borrow_mut();
            let before = habits.len();
            habits.retain(|h| h.id != habit_id);
            if habits.len() == before {
                return Err(CoreError::not_found(habit_id));
            }
            Ok(())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 21).unwrap()
    }

    fn tracker() -> Tracker<FlakyStore> {
        let session = Session::new("alice").unwrap();
        Tracker::load(FlakyStore::default(), session, vec![1, 3]).unwrap()
    }

    #[test]
    fn add_puts_newest_first() {
        let mut t = tracker();
        t.add(HabitInput::new("Run")).unwrap();
        t.add(HabitInput::new("Read")).unwrap();
        let names: Vec<_> = t.habits().iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Read", "Run"]);
    }

    #[test]
    fn confirmed_toggle_updates_list_and_store() {
        let mut t = tracker();
        let habit = t.add(HabitInput::new("Run")).unwrap();
        t.drain_events();

        let outcome = t.toggle(&habit.id, today()).unwrap();
        assert_eq!(outcome.habit.streak, 1);
        assert_eq!(t.habit(&habit.id).unwrap().streak, 1);
        let stored = t.store().get(t.session(), &habit.id).unwrap();
        assert!(stored.is_completed_on(today()));

        let events = t.drain_events();
        assert!(matches!(events[0], Event::CompletionToggled { completed: true, streak: 1, .. }));
        assert!(matches!(events[1], Event::MilestoneReached { streak: 1, .. }));
    }

    #[test]
    fn failed_write_restores_snapshot() {
        let mut t = tracker();
        let habit = t.add(HabitInput::new("Run")).unwrap();
        let before = t.habit(&habit.id).unwrap().clone();
        t.drain_events();

        t.store().fail_updates.set(true);
        let err = t.toggle(&habit.id, today()).unwrap_err();
        assert!(err.is_transient());
        assert_eq!(t.habit(&habit.id).unwrap(), &before);

        let events = t.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::ToggleRolledBack { .. }));
    }

    #[test]
    fn unknown_habit_is_not_found() {
        let mut t = tracker();
        assert!(matches!(
            t.toggle("missing", today()),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn delete_removes_from_list() {
        let mut t = tracker();
        let habit = t.add(HabitInput::new("Run")).unwrap();
        t.delete(&habit.id).unwrap();
        assert!(t.habits().is_empty());
        assert!(t.delete(&habit.id).is_err());
    }
}
