use clap::Subcommand;
use circura_core::Config;

use super::open_store;

#[derive(Subcommand)]
pub enum SessionsAction {
    /// Print every completed session as JSON, oldest first
    List,
}

pub fn run(action: SessionsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;

    match action {
        SessionsAction::List => {
            let sessions = store.load_sessions();
            println!("{}", serde_json::to_string_pretty(&sessions)?);
        }
    }
    Ok(())
}
