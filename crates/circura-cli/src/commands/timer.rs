use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use clap::Subcommand;
use circura_core::{
    Alert, CompletionAlerts, Config, FocusTimer, NotificationDispatcher, QuoteCadence, QuoteFeed,
    SessionStore, TimerEngine, TimerEvent, TokioScheduler, ZenQuotesClient,
};
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

use super::open_store;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a live countdown, recording each completed session
    Run {
        /// Session length in minutes (defaults to the stored setting)
        #[arg(long, allow_negative_numbers = true)]
        minutes: Option<i64>,
        /// Stop after this many completed sessions
        #[arg(long, default_value = "1")]
        sessions: u32,
    },
    /// Print a fresh timer snapshot for the stored length as JSON
    Status,
}

/// Rings the terminal bell once the alert's delay has passed.
///
/// Delayed alerts run as tasks; [`TerminalDispatcher::drain`] waits for them
/// so an alert raised by the last session is still shown before exit.
#[derive(Default)]
struct TerminalDispatcher {
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl TerminalDispatcher {
    async fn drain(&self) {
        let pending = std::mem::take(
            &mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner),
        );
        for handle in pending {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "alert task failed");
            }
        }
    }
}

impl NotificationDispatcher for TerminalDispatcher {
    fn dispatch(&self, alert: Alert) {
        let Alert { title, body, delay } = alert;
        let message = format!("\x07{title} {body}");
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let handle = runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    eprintln!("{message}");
                });
                self.pending
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(handle);
            }
            Err(_) => eprintln!("{message}"),
        }
    }
}

pub async fn run(action: TimerAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config)?;

    match action {
        TimerAction::Run { minutes, sessions } => {
            let minutes = minutes.unwrap_or_else(|| store.timer_length());
            run_countdown(store, minutes, sessions.max(1), config).await?;
        }
        TimerAction::Status => {
            let snapshot = TimerEngine::new(store.timer_length()).snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }
    Ok(())
}

async fn run_countdown(
    store: SessionStore,
    minutes: i64,
    target: u32,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = TimerEngine::new(minutes).with_sink(store.clone());
    let mut timer = FocusTimer::new(engine, TokioScheduler::new());

    // Alerts subscribe first so a completion's alert is queued before the
    // loop below can see the event and exit.
    let alerts = Arc::new(TerminalDispatcher::default());
    timer.subscribe(CompletionAlerts::new(store, alerts.clone()).into_listener());

    let (tx, mut rx) = mpsc::unbounded_channel();
    timer.subscribe(move |event| {
        let _ = tx.send(event.clone());
    });

    let mut quotes = if config.quotes.enabled {
        let client = ZenQuotesClient::with_endpoint(&config.quotes.endpoint)?;
        Some((
            Arc::new(AsyncMutex::new(QuoteFeed::new(client))),
            QuoteCadence::new(config.quotes.refresh_secs),
        ))
    } else {
        None
    };

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut stdout = std::io::stdout();
    print!("{}", timer.snapshot().formatted);
    stdout.flush()?;
    timer.start();

    let mut completed = 0;
    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                match &event {
                    TimerEvent::TimeUpdated { text } => {
                        print!("\r{text} ");
                        stdout.flush()?;
                    }
                    TimerEvent::SessionCompleted { session } => {
                        completed += 1;
                        println!(
                            "\rsession {completed}/{target} complete ({} min)",
                            session.duration_seconds / 60
                        );
                        if completed >= target {
                            break;
                        }
                        timer.start();
                    }
                    _ => {}
                }
                if let Some((feed, cadence)) = quotes.as_mut() {
                    // Fetch off the loop; skip if the previous fetch is still running.
                    if cadence.observe(&event) {
                        if let Ok(mut feed) = Arc::clone(feed).try_lock_owned() {
                            tokio::spawn(async move {
                                if let Some(quote) = feed.refresh().await {
                                    println!("\n{quote}");
                                }
                            });
                        }
                    }
                }
            }
            _ = &mut ctrl_c => {
                timer.pause();
                println!("\nstopped at {}", timer.snapshot().formatted);
                break;
            }
        }
    }

    drop(timer);
    alerts.drain().await;
    tracing::debug!(completed, "countdown finished");
    Ok(())
}
