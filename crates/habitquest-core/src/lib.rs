//! # Habit Quest Core Library
//!
//! This library provides the core logic for Habit Quest, a daily habit
//! tracker. All operations are available through the `habitquest` CLI,
//! which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Streak Engine**: pure functions that toggle a day's completion,
//!   recompute the current streak by walking back from today, and detect
//!   milestones
//! - **Storage**: SQLite habit store scoped by an explicit [`Session`], and
//!   TOML-based configuration
//! - **Tracker**: optimistic toggles with rollback on store failure
//! - **Suggestions**: habit ideas from a hosted language model
//!
//! ## Key Components
//!
//! - [`toggle_completion`] / [`recompute_streak`]: the streak engine
//! - [`HabitStore`]: persistence contract, implemented by [`HabitDb`]
//! - [`Tracker`]: presentation boundary
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod habit;
pub mod session;
pub mod storage;
pub mod store;
pub mod streak;
pub mod suggest;
pub mod tracker;

pub use error::{ConfigError, CoreError, DatabaseError, SuggestionError, ValidationError};
pub use events::Event;
pub use habit::{
    date_key, parse_date_key, share_text, CompletionSet, Habit, HabitIcon, HabitInput,
    HabitProgress,
};
pub use session::Session;
pub use storage::{Config, HabitDb};
pub use store::HabitStore;
pub use streak::{
    detect_milestone, recompute_streak, toggle, toggle_completion, Milestone, ToggleOutcome,
    DEFAULT_THRESHOLDS,
};
pub use suggest::GeminiClient;
pub use tracker::Tracker;
