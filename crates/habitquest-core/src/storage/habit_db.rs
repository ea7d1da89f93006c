//! SQLite-based storage for habits and the active session.
//!
//! Provides persistent storage for:
//! - Habit records, scoped per user
//! - Key-value store for application state (the signed-in user)

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::data_dir;
use super::migrations;
use crate::error::{CoreError, DatabaseError, Result};
use crate::habit::{Habit, HabitIcon, HabitInput};
use crate::session::Session;
use crate::store::HabitStore;

const SESSION_KEY: &str = "session.user_id";

const HABIT_COLUMNS: &str = "id, name, description, icon, color, duration,
                             completion_dates, streak, longest_streak, created_at";

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

/// Decode failures in a habit row become [`DatabaseError::CorruptRow`].
fn habit_row_error(err: rusqlite::Error) -> CoreError {
    match err {
        rusqlite::Error::FromSqlConversionFailure(column, _, source) => {
            CoreError::Database(DatabaseError::CorruptRow {
                table: "habits".into(),
                message: format!("column {column}: {source}"),
            })
        }
        other => other.into(),
    }
}

fn row_to_habit(row: &rusqlite::Row) -> Result<Habit, rusqlite::Error> {
    let icon: String = row.get(3)?;

    let completion_json: String = row.get(6)?;
    let completion_dates =
        serde_json::from_str(&completion_json).map_err(|e| conversion_error(6, e))?;

    let created_at_str: String = row.get(9)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(9, e))?;

    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        icon: HabitIcon::from_name(&icon),
        color: row.get(4)?,
        duration: row.get(5)?,
        completion_dates,
        streak: row.get(7)?,
        longest_streak: row.get(8)?,
        created_at,
    })
}

/// SQLite database for habit storage.
pub struct HabitDb {
    conn: Connection,
}

impl HabitDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/habitquest.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("habitquest.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "opened habit database");
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS habits (
                id               TEXT PRIMARY KEY,
                user_id          TEXT NOT NULL,
                name             TEXT NOT NULL,
                description      TEXT NOT NULL DEFAULT '',
                icon             TEXT NOT NULL,
                color            TEXT NOT NULL,
                completion_dates TEXT NOT NULL DEFAULT '{}',
                streak           INTEGER NOT NULL DEFAULT 0,
                longest_streak   INTEGER NOT NULL DEFAULT 0,
                created_at       TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;

        migrations::migrate(&self.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_delete(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// The signed-in user, if any.
    pub fn active_session(&self) -> Result<Option<Session>> {
        match self.kv_get(SESSION_KEY)? {
            Some(user_id) => Ok(Some(Session::new(user_id)?)),
            None => Ok(None),
        }
    }

    /// The signed-in user.
    ///
    /// # Errors
    /// Returns [`CoreError::Unauthenticated`] when nobody is signed in.
    pub fn require_session(&self) -> Result<Session> {
        self.active_session()?.ok_or(CoreError::Unauthenticated)
    }

    pub fn set_active_session(&self, session: &Session) -> Result<()> {
        self.kv_set(SESSION_KEY, session.user_id())?;
        tracing::info!(user_id = session.user_id(), "signed in");
        Ok(())
    }

    pub fn clear_active_session(&self) -> Result<()> {
        self.kv_delete(SESSION_KEY)?;
        tracing::info!("signed out");
        Ok(())
    }
}

impl HabitStore for HabitDb {
    fn list(&self, session: &Session) -> Result<Vec<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits
             WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let habits = stmt
            .query_map(params![session.user_id()], row_to_habit)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(habit_row_error)?;
        Ok(habits)
    }

    fn create(&self, session: &Session, input: HabitInput) -> Result<Habit> {
        let input = input.validate()?;
        let habit = Habit::from_input(Uuid::new_v4().to_string(), input, Utc::now());
        let completion_json = serde_json::to_string(&habit.completion_dates)?;

        self.conn.execute(
            "INSERT INTO habits (
                id, user_id, name, description, icon, color, duration,
                completion_dates, streak, longest_streak, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                habit.id,
                session.user_id(),
                habit.name,
                habit.description,
                habit.icon.name(),
                habit.color,
                habit.duration,
                completion_json,
                habit.streak,
                habit.longest_streak,
                format_timestamp(habit.created_at),
            ],
        )?;
        tracing::debug!(habit_id = %habit.id, name = %habit.name, "habit created");
        Ok(habit)
    }

    fn get(&self, session: &Session, habit_id: &str) -> Result<Habit> {
        self.conn
            .query_row(
                &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1 AND user_id = ?2"),
                params![habit_id, session.user_id()],
                row_to_habit,
            )
            .optional()
            .map_err(habit_row_error)?
            .ok_or_else(|| CoreError::not_found(habit_id))
    }

    fn update(&self, session: &Session, habit: &Habit) -> Result<()> {
        let completion_json = serde_json::to_string(&habit.completion_dates)?;
        let changed = self.conn.execute(
            "UPDATE habits
             SET completion_dates = ?1, streak = ?2, longest_streak = ?3
             WHERE id = ?4 AND user_id = ?5",
            params![
                completion_json,
                habit.streak,
                habit.longest_streak,
                habit.id,
                session.user_id(),
            ],
        )?;
        if changed == 0 {
            return Err(CoreError::not_found(&habit.id));
        }
        tracing::debug!(habit_id = %habit.id, streak = habit.streak, "habit updated");
        Ok(())
    }

    fn delete(&self, session: &Session, habit_id: &str) -> Result<()> {
        let changed = self.conn.execute(
            "DELETE FROM habits WHERE id = ?1 AND user_id = ?2",
            params![habit_id, session.user_id()],
        )?;
        if changed == 0 {
            return Err(CoreError::not_found(habit_id));
        }
        tracing::debug!(habit_id, "habit deleted");
        Ok(())
    }
}
