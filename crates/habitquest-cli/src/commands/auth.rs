use clap::Subcommand;
use habitquest_core::suggest;
use habitquest_core::{HabitDb, Session};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in as a user
    Login {
        /// User id
        user: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Store the Gemini API key in the OS keyring
    SetKey {
        /// API key
        key: String,
    },
    /// Remove the stored API key
    ForgetKey,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Login { user } => {
            let db = HabitDb::open()?;
            let session = Session::new(user)?;
            db.set_active_session(&session)?;
            println!("Signed in as {}", session.user_id());
        }
        AuthAction::Logout => {
            let db = HabitDb::open()?;
            db.clear_active_session()?;
            println!("Signed out");
        }
        AuthAction::Whoami => {
            let db = HabitDb::open()?;
            let session = db.require_session()?;
            println!("{}", session.user_id());
        }
        AuthAction::SetKey { key } => {
            suggest::store_api_key(&key)?;
            println!("API key stored");
        }
        AuthAction::ForgetKey => {
            suggest::forget_api_key()?;
            println!("API key removed");
        }
    }
    Ok(())
}
