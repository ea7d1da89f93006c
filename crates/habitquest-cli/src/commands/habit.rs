//! Habit management commands for CLI.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use habitquest_core::habit::{PALETTE, PICKER_ICONS};
use habitquest_core::{
    date_key, parse_date_key, share_text, Config, CoreError, Habit, HabitDb, HabitIcon,
    HabitInput, HabitProgress, HabitStore, Tracker,
};
use serde::Serialize;

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Habit description
        #[arg(long, default_value = "")]
        description: String,
        /// Icon name (see `habit icons`)
        #[arg(long)]
        icon: Option<String>,
        /// Hex color (default from config)
        #[arg(long)]
        color: Option<String>,
        /// Target number of days for the progress bar
        #[arg(long)]
        duration: Option<u32>,
    },
    /// List habits, newest first
    List,
    /// Get habit details
    Show {
        /// Habit ID
        id: String,
    },
    /// Mark or un-mark a day as completed
    Toggle {
        /// Habit ID
        id: String,
        /// Day to toggle (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a habit
    Delete {
        /// Habit ID
        id: String,
    },
    /// Print a shareable streak summary
    Share {
        /// Habit ID
        id: String,
    },
    /// List available icons and colors
    Icons,
}

/// A habit as displayed, with values derived for `today`.
#[derive(Serialize)]
struct HabitView<'a> {
    #[serde(flatten)]
    habit: &'a Habit,
    icon_glyph: &'static str,
    completed_today: bool,
    current_streak: u32,
    progress: HabitProgress,
}

impl<'a> HabitView<'a> {
    fn new(habit: &'a Habit, today: NaiveDate, config: &Config) -> Self {
        Self {
            habit,
            icon_glyph: habit.icon.glyph(),
            completed_today: habit.is_completed_on(today),
            current_streak: habit.current_streak(today),
            progress: habit.progress(config.habits.default_goal_days),
        }
    }
}

#[derive(Serialize)]
struct MilestoneView {
    streak: u32,
    title: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ToggleView<'a> {
    date: String,
    completed: bool,
    previous_streak: u32,
    milestone: Option<MilestoneView>,
    habit: HabitView<'a>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Store and network failures get a generic message; details go to the log.
fn user_facing(action: &str, err: CoreError) -> Box<dyn std::error::Error> {
    if err.is_transient() {
        tracing::error!(error = %err, "{action} failed");
        format!("Failed to {action}. Please try again.").into()
    } else {
        err.into()
    }
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = HabitDb::open()?;

    match action {
        HabitAction::Add {
            name,
            description,
            icon,
            color,
            duration,
        } => {
            let session = db.require_session()?;
            let icon = match icon {
                Some(name) => {
                    HabitIcon::parse(&name).ok_or(format!("unknown icon: {name}"))?
                }
                None => HabitIcon::default(),
            };
            let mut input = HabitInput::new(name)
                .description(description)
                .icon(icon)
                .color(color.unwrap_or_else(|| config.habits.default_color.clone()));
            input.duration = duration;

            let habit = db
                .create(&session, input)
                .map_err(|e| user_facing("add habit", e))?;
            println!("Habit created: {}", habit.id);
            println!(
                "{}",
                serde_json::to_string_pretty(&HabitView::new(&habit, today(), &config))?
            );
        }
        HabitAction::List => {
            let session = db.require_session()?;
            let habits = db.list(&session).map_err(|e| user_facing("load habits", e))?;
            let today = today();
            let views: Vec<_> = habits
                .iter()
                .map(|h| HabitView::new(h, today, &config))
                .collect();
            println!("{}", serde_json::to_string_pretty(&views)?);
        }
        HabitAction::Show { id } => {
            let session = db.require_session()?;
            let habit = db
                .get(&session, &id)
                .map_err(|e| user_facing("load habit", e))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&HabitView::new(&habit, today(), &config))?
            );
        }
        HabitAction::Toggle { id, date } => {
            let session = db.require_session()?;
            let day = match date {
                Some(s) => parse_date_key(&s)?,
                None => today(),
            };
            let mut tracker = Tracker::load(db, session, config.milestones.thresholds.clone())
                .map_err(|e| user_facing("update habit", e))?;
            let outcome = tracker
                .toggle(&id, day)
                .map_err(|e| user_facing("update habit", e))?;

            let milestone = outcome.milestone.map(|m| MilestoneView {
                streak: m.streak,
                title: m.title(),
                message: m.message(&outcome.habit.name),
            });
            if let Some(m) = &milestone {
                eprintln!("{} {}", m.title, m.message);
            }
            let view = ToggleView {
                date: date_key(day),
                completed: outcome.completed,
                previous_streak: outcome.previous_streak,
                milestone,
                habit: HabitView::new(&outcome.habit, day, &config),
            };
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        HabitAction::Delete { id } => {
            let session = db.require_session()?;
            db.delete(&session, &id)
                .map_err(|e| user_facing("delete habit", e))?;
            println!("Habit deleted: {id}");
        }
        HabitAction::Share { id } => {
            let session = db.require_session()?;
            let habit = db
                .get(&session, &id)
                .map_err(|e| user_facing("load habit", e))?;
            println!("{}", share_text(&habit));
        }
        HabitAction::Icons => {
            let icons: Vec<_> = PICKER_ICONS
                .iter()
                .map(|icon| format!("{} {}", icon.glyph(), icon.name()))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "icons": icons,
                    "colors": PALETTE,
                }))?
            );
        }
    }
    Ok(())
}
