//! Session-complete alerts.
//!
//! The core never talks to an OS notification center. It hands an [`Alert`]
//! to a [`NotificationDispatcher`] and forgets about it.

use std::sync::Arc;
use std::time::Duration;

use crate::events::TimerEvent;
use crate::storage::SessionStore;

/// A one-shot local alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub body: String,
    /// How long after dispatch the alert should fire.
    pub delay: Duration,
}

impl Alert {
    /// The alert shown when a focus session ends.
    pub fn session_finished() -> Self {
        Self {
            title: "Time's up!".into(),
            body: "Your focus session has ended.".into(),
            delay: Duration::from_secs(1),
        }
    }
}

/// Schedules alerts. Fire-and-forget: no delivery confirmation comes back.
pub trait NotificationDispatcher: Send + Sync {
    fn dispatch(&self, alert: Alert);
}

/// Timer listener that raises [`Alert::session_finished`] on completion,
/// when the user has notifications switched on.
///
/// The preference is read at completion time, so toggling it takes effect
/// for the next session without re-subscribing.
pub struct CompletionAlerts {
    store: SessionStore,
    dispatcher: Arc<dyn NotificationDispatcher>,
}

impl CompletionAlerts {
    pub fn new(store: SessionStore, dispatcher: Arc<dyn NotificationDispatcher>) -> Self {
        Self { store, dispatcher }
    }

    pub fn observe(&self, event: &TimerEvent) {
        if !matches!(event, TimerEvent::SessionCompleted { .. }) {
            return;
        }
        if self.store.notifications_enabled() {
            self.dispatcher.dispatch(Alert::session_finished());
        }
    }

    /// Adapt into a closure for `subscribe`.
    pub fn into_listener(self) -> impl FnMut(&TimerEvent) + Send + 'static {
        move |event| self.observe(event)
    }
}
