//! AI-powered habit suggestions.
//!
//! A single stateless request per call: interests and goals in, up to three
//! short habit names out. Failures are reported once, never retried.

mod gemini;

pub use gemini::GeminiClient;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::SuggestionError;
use crate::habit::{HabitInput, PALETTE, SUGGESTION_ICONS};

/// How many suggestions the model is asked for.
pub const SUGGESTION_COUNT: usize = 3;

/// Description given to habits adopted from a suggestion.
pub const SUGGESTED_DESCRIPTION: &str = "AI Suggested Habit. Edit to add your own description.";

const API_KEY_ENV: &str = "GEMINI_API_KEY";
const API_KEY_ENTRY: &str = "gemini_api_key";

/// The prompt sent to the model.
pub fn build_prompt(interests: &str, goals: &str) -> String {
    format!(
        "Based on the user's interests and goals, generate a list of exactly {SUGGESTION_COUNT} \
         concise, actionable habit suggestions.\n\
         Respond with JSON of the form {{\"suggestions\": [\"...\", \"...\", \"...\"]}}.\n\n\
         Interests: {}\n\
         Goals: {}\n",
        interests.trim(),
        goals.trim()
    )
}

fn strip_numbering(text: &str) -> &str {
    let trimmed = text.trim();
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = trimmed[digits..].strip_prefix('.') {
            return rest.trim();
        }
    }
    trimmed
}

/// Strip list numbering (`"1. "`), drop blanks and keep at most three.
///
/// # Errors
/// Returns [`SuggestionError::Empty`] when nothing usable remains.
pub fn clean_suggestions<I, S>(raw: I) -> Result<Vec<String>, SuggestionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cleaned: Vec<String> = raw
        .into_iter()
        .map(|s| strip_numbering(s.as_ref()).to_string())
        .filter(|s| !s.is_empty())
        .take(SUGGESTION_COUNT)
        .collect();
    if cleaned.is_empty() {
        return Err(SuggestionError::Empty);
    }
    Ok(cleaned)
}

/// Turn an accepted suggestion into a new habit with a random look.
pub fn suggestion_to_input<R: Rng + ?Sized>(suggestion: &str, rng: &mut R) -> HabitInput {
    let icon = SUGGESTION_ICONS
        .choose(rng)
        .copied()
        .unwrap_or_default();
    let color = PALETTE[..SUGGESTION_ICONS.len()]
        .choose(rng)
        .copied()
        .unwrap_or(PALETTE[0]);
    HabitInput::new(suggestion)
        .description(SUGGESTED_DESCRIPTION)
        .icon(icon)
        .color(color)
}

pub fn random_suggestion_input(suggestion: &str) -> HabitInput {
    suggestion_to_input(suggestion, &mut rand::thread_rng())
}

/// API key from `GEMINI_API_KEY`, falling back to the OS keyring.
///
/// # Errors
/// Returns [`SuggestionError::MissingApiKey`] when neither source has one.
pub fn resolve_api_key() -> Result<String, SuggestionError> {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            return Ok(key.trim().to_string());
        }
    }
    keyring_store::get(API_KEY_ENTRY)?.ok_or(SuggestionError::MissingApiKey)
}

/// Store the API key in the OS keyring.
pub fn store_api_key(key: &str) -> Result<(), SuggestionError> {
    keyring_store::set(API_KEY_ENTRY, key.trim())
}

pub fn forget_api_key() -> Result<(), SuggestionError> {
    keyring_store::delete(API_KEY_ENTRY)
}

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    use crate::error::SuggestionError;

    const SERVICE: &str = "habitquest";

    fn entry(key: &str) -> Result<keyring::Entry, SuggestionError> {
        keyring::Entry::new(SERVICE, key).map_err(|e| SuggestionError::Keyring(e.to_string()))
    }

    pub fn get(key: &str) -> Result<Option<String>, SuggestionError> {
        match entry(key)?.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(SuggestionError::Keyring(e.to_string())),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), SuggestionError> {
        entry(key)?
            .set_password(value)
            .map_err(|e| SuggestionError::Keyring(e.to_string()))
    }

    pub fn delete(key: &str) -> Result<(), SuggestionError> {
        match entry(key)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(SuggestionError::Keyring(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn strips_leading_numbers() {
        let cleaned = clean_suggestions(["1. Walk 10 minutes", "2.Drink water", "  Stretch  "]).unwrap();
        assert_eq!(cleaned, vec!["Walk 10 minutes", "Drink water", "Stretch"]);
    }

    #[test]
    fn keeps_numbers_that_are_not_list_markers() {
        let cleaned = clean_suggestions(["10 push-ups daily"]).unwrap();
        assert_eq!(cleaned, vec!["10 push-ups daily"]);
    }

    #[test]
    fn caps_at_three_and_drops_blanks() {
        let cleaned = clean_suggestions(["a", "", "3. ", "b", "c", "d"]).unwrap();
        assert_eq!(cleaned, vec!["a", "b", "c"]);
    }

    #[test]
    fn nothing_usable_is_empty_error() {
        let result = clean_suggestions(Vec::<String>::new());
        assert!(matches!(result, Err(SuggestionError::Empty)));
        let result = clean_suggestions(["  ", "1."]);
        assert!(matches!(result, Err(SuggestionError::Empty)));
    }

    #[test]
    fn prompt_carries_both_inputs() {
        let prompt = build_prompt(" cooking ", "eat better");
        assert!(prompt.contains("exactly 3"));
        assert!(prompt.contains("Interests: cooking\n"));
        assert!(prompt.contains("Goals: eat better\n"));
    }

    #[test]
    fn adopted_suggestion_uses_suggestion_palette() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let input = suggestion_to_input("Walk after lunch", &mut rng);
            assert_eq!(input.name, "Walk after lunch");
            assert_eq!(input.description, SUGGESTED_DESCRIPTION);
            assert!(SUGGESTION_ICONS.contains(&input.icon));
            assert!(PALETTE[..6].contains(&input.color.as_str()));
        }
    }
}
