use clap::Subcommand;
use circura_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dotted key (e.g. "quotes.refresh_secs")
    Get { key: String },
    /// Change one value and write the file back
    Set { key: String, value: String },
    /// Print the effective configuration as TOML
    List,
    /// Print where the configuration file lives
    Path,
    /// Overwrite the file with the defaults
    Reset,
}

/// `effective` is what this run is using, which may be the defaults if the
/// file could not be read. Writes always go through a fresh, strict load so
/// a broken file is reported instead of silently replaced.
pub fn run(action: ConfigAction, effective: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = effective.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            tracing::info!(key = %key, value = %value, "config updated");
            println!("{key} = {}", config.get(&key).unwrap_or(value));
        }
        ConfigAction::List => print!("{}", toml::to_string_pretty(effective)?),
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("configuration reset to defaults");
        }
    }
    Ok(())
}
