use clap::{ArgAction, Subcommand};
use circura_core::Config;
use serde::Serialize;

use super::open_store;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current settings as JSON
    Get,
    /// Set the focus length in minutes
    SetLength {
        /// Minutes; values below 1 fall back to the default
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
    },
    /// Turn session-complete alerts on or off
    SetNotifications {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Serialize)]
struct Settings {
    timer_length: i64,
    notifications_enabled: bool,
}

pub fn run(action: SettingsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;

    match action {
        SettingsAction::Get => {
            let settings = Settings {
                timer_length: store.timer_length(),
                notifications_enabled: store.notifications_enabled(),
            };
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        SettingsAction::SetLength { minutes } => {
            store.set_timer_length(minutes)?;
            println!("timer length: {} min", store.timer_length());
        }
        SettingsAction::SetNotifications { enabled } => {
            store.set_notifications_enabled(enabled)?;
            println!("notifications: {}", if enabled { "on" } else { "off" });
        }
    }
    Ok(())
}
