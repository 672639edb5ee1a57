//! Motivational quotes shown while the timer runs.
//!
//! [`ZenQuotesClient`] fetches one quote per request. [`QuoteFeed`] keeps the
//! last good one around so a flaky network still has something to show, and
//! [`QuoteCadence`] decides when a refresh is due.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::QuoteError;
use crate::events::TimerEvent;

pub const ZEN_QUOTES_ENDPOINT: &str = "https://zenquotes.io/api/random";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\u{201c}{}\u{201d}\n\u{2014} {}", self.text, self.author)
    }
}

/// Anything that can produce a quote, eventually.
pub trait QuoteSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Quote, QuoteError>> + Send;
}

#[derive(Deserialize)]
struct ZenQuote {
    q: String,
    a: String,
}

/// Client for the zenquotes.io random-quote API.
#[derive(Debug, Clone)]
pub struct ZenQuotesClient {
    client: Client,
    endpoint: String,
}

impl ZenQuotesClient {
    pub fn new() -> Result<Self, QuoteError> {
        Self::with_endpoint(ZEN_QUOTES_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self, QuoteError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl QuoteSource for ZenQuotesClient {
    async fn fetch(&self) -> Result<Quote, QuoteError> {
        let quotes: Vec<ZenQuote> = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| {
                if e.is_decode() {
                    QuoteError::Malformed(e.to_string())
                } else {
                    QuoteError::Transport(e)
                }
            })?;

        let first = quotes
            .into_iter()
            .next()
            .ok_or_else(|| QuoteError::Malformed("empty quote list".into()))?;
        Ok(Quote {
            text: first.q,
            author: first.a,
        })
    }
}

/// Remembers the last rendered quote.
#[derive(Debug)]
pub struct QuoteFeed<S> {
    source: S,
    last: Option<String>,
}

impl<S: QuoteSource> QuoteFeed<S> {
    pub fn new(source: S) -> Self {
        Self { source, last: None }
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    /// Fetch a fresh quote.
    ///
    /// On a network failure the previous quote is returned again (if there
    /// is one). A response that does not contain a quote yields nothing.
    pub async fn refresh(&mut self) -> Option<String> {
        match self.source.fetch().await {
            Ok(quote) => {
                let text = quote.to_string();
                self.last = Some(text.clone());
                Some(text)
            }
            Err(QuoteError::Transport(e)) => {
                tracing::warn!(error = %e, "quote fetch failed, reusing last quote");
                self.last.clone()
            }
            Err(e @ QuoteError::Malformed(_)) => {
                tracing::warn!(error = %e, "ignoring quote response");
                None
            }
        }
    }
}

/// Counts running seconds from timer events and signals every `every`
/// seconds that a new quote is due.
///
/// Only `TimeUpdated` events that arrive while the timer is running count;
/// the ones emitted by reset, length changes or completion do not.
#[derive(Debug, Clone)]
pub struct QuoteCadence {
    every: u32,
    running: bool,
    elapsed: u32,
}

impl QuoteCadence {
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            running: false,
            elapsed: 0,
        }
    }

    /// Returns true when a refresh is due.
    pub fn observe(&mut self, event: &TimerEvent) -> bool {
        match event {
            TimerEvent::StateChanged { running } => {
                self.running = *running;
                false
            }
            TimerEvent::TimeUpdated { .. } if self.running => {
                self.elapsed += 1;
                if self.elapsed >= self.every {
                    self.elapsed = 0;
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick() -> TimerEvent {
        TimerEvent::TimeUpdated {
            text: "00:00".into(),
        }
    }

    #[test]
    fn quote_renders_with_typographic_quotes() {
        let quote = Quote {
            text: "Well begun is half done.".into(),
            author: "Aristotle".into(),
        };
        assert_eq!(
            quote.to_string(),
            "\u{201c}Well begun is half done.\u{201d}\n\u{2014} Aristotle"
        );
    }

    #[test]
    fn cadence_counts_only_running_seconds() {
        let mut cadence = QuoteCadence::new(3);

        assert!(!cadence.observe(&tick()));
        assert!(!cadence.observe(&TimerEvent::StateChanged { running: true }));
        assert!(!cadence.observe(&tick()));
        assert!(!cadence.observe(&tick()));
        assert!(!cadence.observe(&TimerEvent::StateChanged { running: false }));
        assert!(!cadence.observe(&tick()));
        assert!(!cadence.observe(&TimerEvent::StateChanged { running: true }));
        assert!(cadence.observe(&tick()));

        assert!(!cadence.observe(&tick()));
    }

    #[tokio::test]
    async fn client_parses_first_quote() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/random")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"q":"Act without expectation.","a":"Lao Tzu","h":"<b>"}]"#)
            .create_async()
            .await;

        let client = ZenQuotesClient::with_endpoint(format!("{}/api/random", server.url())).unwrap();
        let quote = client.fetch().await.unwrap();

        assert_eq!(quote.text, "Act without expectation.");
        assert_eq!(quote.author, "Lao Tzu");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn feed_falls_back_on_transport_failure() {
        let mut server = mockito::Server::new_async().await;
        let ok = server
            .mock("GET", "/api/random")
            .with_status(200)
            .with_body(r#"[{"q":"Begin.","a":"Anon"}]"#)
            .create_async()
            .await;

        let client = ZenQuotesClient::with_endpoint(format!("{}/api/random", server.url())).unwrap();
        let mut feed = QuoteFeed::new(client);
        let first = feed.refresh().await.unwrap();
        assert!(first.contains("Begin."));

        ok.remove_async().await;
        server
            .mock("GET", "/api/random")
            .with_status(503)
            .create_async()
            .await;

        assert_eq!(feed.refresh().await, Some(first.clone()));
        assert_eq!(feed.last(), Some(first.as_str()));
    }

    #[tokio::test]
    async fn feed_ignores_malformed_payload() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/random")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = ZenQuotesClient::with_endpoint(format!("{}/api/random", server.url())).unwrap();
        let mut feed = QuoteFeed::new(client);
        assert_eq!(feed.refresh().await, None);
        assert_eq!(feed.last(), None);
    }

    #[tokio::test]
    async fn client_reports_undecodable_body_as_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/random")
            .with_status(200)
            .with_body("<html>rate limited</html>")
            .create_async()
            .await;

        let client = ZenQuotesClient::with_endpoint(format!("{}/api/random", server.url())).unwrap();
        assert!(matches!(client.fetch().await, Err(QuoteError::Malformed(_))));
    }

    #[tokio::test]
    async fn feed_without_history_returns_nothing_on_failure() {
        // Nothing listens on port 9 locally.
        let client = ZenQuotesClient::with_endpoint("http://127.0.0.1:9/api/random").unwrap();
        let mut feed = QuoteFeed::new(client);
        assert_eq!(feed.refresh().await, None);
    }
}
