use clap::Args;
use habitquest_core::suggest::{random_suggestion_input, resolve_api_key};
use habitquest_core::{Config, GeminiClient, HabitDb, HabitStore};

#[derive(Args)]
pub struct SuggestArgs {
    /// Your interests, e.g. "fitness, reading, cooking"
    #[arg(long)]
    interests: String,
    /// Your goals, e.g. "lose weight, learn Spanish"
    #[arg(long)]
    goals: String,
    /// Adopt suggestions by position (1-based), e.g. `--add 1 --add 3`
    #[arg(long = "add")]
    add: Vec<usize>,
}

/// Look up every 1-based position, failing on the first one out of range.
fn pick<'a>(suggestions: &'a [String], positions: &[usize]) -> Result<Vec<&'a String>, String> {
    positions
        .iter()
        .map(|&position| {
            position
                .checked_sub(1)
                .and_then(|i| suggestions.get(i))
                .ok_or(format!(
                    "no suggestion #{position} (got {})",
                    suggestions.len()
                ))
        })
        .collect()
}

pub fn run(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = HabitDb::open()?;
    let session = db.require_session()?;
    let api_key = resolve_api_key().map_err(|e| e.user_message())?;
    let client = GeminiClient::new(&config.suggestions, api_key)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let suggestions = runtime
        .block_on(client.suggest(&args.interests, &args.goals))
        .map_err(|e| {
            tracing::error!(error = %e, "suggestion request failed");
            e.user_message()
        })?;

    if args.add.is_empty() {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "suggestions": suggestions }))?
        );
        return Ok(());
    }

    let picked = pick(&suggestions, &args.add)?;
    let mut created = Vec::with_capacity(picked.len());
    for suggestion in picked {
        created.push(db.create(&session, random_suggestion_input(suggestion))?);
    }
    println!("{}", serde_json::to_string_pretty(&created)?);
    Ok(())
}
