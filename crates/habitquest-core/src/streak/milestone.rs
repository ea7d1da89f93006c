//! Milestone detection for streak growth.

use serde::{Deserialize, Serialize};

/// Streak lengths that trigger a celebration by default.
pub const DEFAULT_THRESHOLDS: [u32; 6] = [3, 7, 14, 30, 50, 100];

/// A streak length reached for the first time on this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub streak: u32,
}

impl Milestone {
    pub fn title(&self) -> &'static str {
        "Milestone Reached! 🏆"
    }

    pub fn message(&self, habit_name: &str) -> String {
        format!(
            "You've completed \"{}\" for {} days in a row!",
            habit_name, self.streak
        )
    }
}

/// Report a milestone iff the streak grew and landed on a threshold.
///
/// A shrinking or unchanged streak never fires, even when the old value
/// was itself a threshold.
pub fn detect_milestone(previous_streak: u32, new_streak: u32, thresholds: &[u32]) -> Option<Milestone> {
    (new_streak > previous_streak && thresholds.contains(&new_streak)).then_some(Milestone {
        streak: new_streak,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_when_growing_onto_a_threshold() {
        assert_eq!(
            detect_milestone(2, 3, &DEFAULT_THRESHOLDS),
            Some(Milestone { streak: 3 })
        );
        assert_eq!(
            detect_milestone(6, 7, &DEFAULT_THRESHOLDS),
            Some(Milestone { streak: 7 })
        );
    }

    #[test]
    fn silent_off_threshold() {
        assert_eq!(detect_milestone(7, 8, &DEFAULT_THRESHOLDS), None);
        assert_eq!(detect_milestone(0, 1, &DEFAULT_THRESHOLDS), None);
    }

    #[test]
    fn silent_when_shrinking_or_flat() {
        assert_eq!(detect_milestone(3, 2, &DEFAULT_THRESHOLDS), None);
        assert_eq!(detect_milestone(8, 7, &DEFAULT_THRESHOLDS), None);
        assert_eq!(detect_milestone(7, 7, &DEFAULT_THRESHOLDS), None);
    }

    #[test]
    fn honours_custom_thresholds() {
        assert_eq!(detect_milestone(1, 2, &[2]), Some(Milestone { streak: 2 }));
        assert_eq!(detect_milestone(2, 3, &[]), None);
    }

    #[test]
    fn message_names_habit_and_length() {
        let m = Milestone { streak: 14 };
        assert_eq!(
            m.message("Meditate"),
            "You've completed \"Meditate\" for 14 days in a row!"
        );
    }
}
