//! Explicit user context for store calls.
//!
//! There is no ambient "current user": every store operation takes a
//! [`Session`], and callers obtain one from wherever they keep it (the
//! CLI persists it in the database's key-value table).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The acting user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Session {
    user_id: String,
}

impl Session {
    /// # Errors
    /// Returns an error if the user id is blank.
    pub fn new(user_id: impl Into<String>) -> Result<Self, ValidationError> {
        let user_id = user_id.into().trim().to_string();
        if user_id.is_empty() {
            return Err(ValidationError::Empty("user_id".into()));
        }
        Ok(Self { user_id })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}
