use clap::Subcommand;
use focusquest_core::storage::Database;
use focusquest_core::{Preferences, Theme};
use serde_json::json;

use super::{print_json, CmdResult};

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print every preference
    Show,
    /// Get or set the theme (light, neon, contrast)
    Theme {
        theme: Option<Theme>,
    },
    /// Get or replace the notes
    Notes {
        /// New notes text; omit to print the current notes
        text: Option<String>,
    },
    /// Mark onboarding as finished
    Onboard,
    /// Mark the welcome screen as seen
    Welcome,
}

pub fn run(action: PrefsAction) -> CmdResult {
    let db = Database::open()?;
    let prefs = Preferences::new(&db);

    match action {
        PrefsAction::Show => {
            print_json(&json!({
                "theme": prefs.theme(),
                "onboarded": prefs.is_onboarded(),
                "welcomeShown": prefs.is_welcome_shown(),
                "showWelcome": prefs.should_show_welcome(),
                "notes": prefs.notes(),
            }))?;
        }
        PrefsAction::Theme { theme: None } => println!("{}", prefs.theme()),
        PrefsAction::Theme { theme: Some(theme) } => {
            prefs.set_theme(theme)?;
            println!("{theme}");
        }
        PrefsAction::Notes { text: None } => println!("{}", prefs.notes()),
        PrefsAction::Notes { text: Some(text) } => {
            prefs.set_notes(&text)?;
            println!("ok");
        }
        PrefsAction::Onboard => {
            prefs.set_onboarded()?;
            println!("ok");
        }
        PrefsAction::Welcome => {
            prefs.set_welcome_shown()?;
            println!("ok");
        }
    }
    Ok(())
}
