use circura_core::{stats, Config};

use super::open_store;

pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;
    let summary = stats::summarize(&store.load_sessions());
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
