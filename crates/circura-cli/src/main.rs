use clap::{Parser, Subcommand};
use circura_core::Config;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "circura", version, about = "Circura focus timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Focus statistics
    Stats,
    /// Completed session log
    Sessions {
        #[command(subcommand)]
        action: commands::sessions::SessionsAction,
    },
    /// Timer length and notification preferences
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print a motivational quote
    Quote,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let (config, config_err) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    logging::init_logging(&config);
    if let Some(e) = config_err {
        tracing::warn!(error = %e, "using default configuration");
    }

    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action, &config).await,
        Commands::Stats => commands::stats::run(&config),
        Commands::Sessions { action } => commands::sessions::run(action, &config),
        Commands::Settings { action } => commands::settings::run(action, &config),
        Commands::Config { action } => commands::config::run(action, &config),
        Commands::Quote => commands::quote::run(&config).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
