use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, warn};

use statusbot_core::{extract_homeworks, render_update, ContractError, NO_NEW_STATUS_MESSAGE};

use crate::error::PollError;
use crate::practicum::StatusSource;
use crate::telegram::Notifier;

/// Loop controller: owns the fetch cursor and the dedup state, and
/// runs one fetch-validate-format-notify cycle per tick.
pub struct Poller {
    source: Arc<dyn StatusSource>,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
    /// Lower bound of the next fetch window (seconds since epoch).
    cursor: u64,
    /// Last successfully rendered message. Error texts never end up
    /// here, so an operator alert cannot suppress a later status
    /// change.
    last_message: String,
}

impl Poller {
    pub fn new(
        source: Arc<dyn StatusSource>,
        notifier: Arc<dyn Notifier>,
        poll_interval: Duration,
    ) -> Self {
        // Start one interval back so a status change during downtime
        // is picked up by the first cycle.
        let cursor = now_secs().saturating_sub(poll_interval.as_secs());

        Self {
            source,
            notifier,
            poll_interval,
            cursor,
            // A quiet first cycle should not announce itself.
            last_message: NO_NEW_STATUS_MESSAGE.to_string(),
        }
    }

    /// Run the polling loop forever.
    ///
    /// The interval tick is the only suspension point between cycles,
    /// and it fires on every exit path of `run_cycle`, caught errors
    /// included.
    pub async fn run(mut self) {
        let mut interval = interval(self.poll_interval);

        loop {
            interval.tick().await;
            self.run_cycle().await;
        }
    }

    /// One polling cycle. Every recoverable error is caught here,
    /// exactly once; nothing propagates past this point.
    pub async fn run_cycle(&mut self) {
        match self.poll_once().await {
            Ok(()) => {}
            Err(PollError::Contract(ContractError::MissingHomeworksKey)) => {
                // Known transient API quirk: log it, but keep it out
                // of the operator chat to avoid an alert storm.
                warn!("API response has no `homeworks` key; skipping this cycle");
            }
            Err(e) => {
                error!("Polling cycle failed: {}", e);
                self.notify_best_effort(&format!("Сбой в работе программы: {}", e))
                    .await;
            }
        }
    }

    async fn poll_once(&mut self) -> Result<(), PollError> {
        let body = self.source.fetch(self.cursor).await?;
        self.advance_cursor(&body);

        let homeworks = extract_homeworks(&body)?;
        debug!(
            "Response passed validation; {} submission(s) in window",
            homeworks.len()
        );

        let message = render_update(homeworks)?;

        if message == self.last_message {
            debug!("Status unchanged; suppressing duplicate notification");
            return Ok(());
        }

        self.notify_best_effort(&message).await;
        // Rendered, not delivered, is the dedup criterion: a flaky
        // channel must not cause the same change to be re-announced.
        self.last_message = message;

        Ok(())
    }

    /// Move the fetch window forward to the server-reported time, when
    /// the response carries one. Anything else leaves the cursor
    /// untouched.
    fn advance_cursor(&mut self, body: &Value) {
        if let Some(current_date) = body.get("current_date").and_then(Value::as_u64) {
            self.cursor = current_date;
        }
    }

    /// Deliver a message, tolerating transport failure.
    async fn notify_best_effort(&self, text: &str) {
        match self.notifier.send_message(text).await {
            Ok(()) => info!("Notification delivered: {}", text),
            Err(e) => error!("Failed to deliver notification: {}", e),
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use tokio::sync::Mutex;

    struct ScriptedSource {
        responses: Mutex<VecDeque<Value>>,
        requested_from_dates: Mutex<Vec<u64>>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Value>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requested_from_dates: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl StatusSource for ScriptedSource {
        async fn fetch(&self, from_date: u64) -> Result<Value, PollError> {
            self.requested_from_dates.lock().await.push(from_date);
            let next = self
                .responses
                .lock()
                .await
                .pop_front()
                .expect("scripted source ran out of responses");
            Ok(next)
        }
    }

    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send_message(&self, text: &str) -> Result<()> {
            self.sent.lock().await.push(text.to_string());
            Ok(())
        }
    }

    fn poller(responses: Vec<Value>) -> (Poller, Arc<ScriptedSource>, Arc<RecordingNotifier>) {
        let source = Arc::new(ScriptedSource::new(responses));
        let notifier = Arc::new(RecordingNotifier::new());
        let poller = Poller::new(
            source.clone(),
            notifier.clone(),
            Duration::from_secs(600),
        );
        (poller, source, notifier)
    }

    #[tokio::test]
    async fn test_cursor_advances_to_server_time() {
        let (mut poller, source, _notifier) = poller(vec![
            json!({"homeworks": [], "current_date": 1_700_000_000}),
            json!({"homeworks": []}),
            json!({"homeworks": []}),
        ]);

        poller.run_cycle().await;
        poller.run_cycle().await;
        poller.run_cycle().await;

        let from_dates = source.requested_from_dates.lock().await;
        // Second cycle uses the server-reported time; third cycle sees
        // no cursor movement because the second response had none.
        assert_eq!(from_dates[1], 1_700_000_000);
        assert_eq!(from_dates[2], 1_700_000_000);
    }

    #[tokio::test]
    async fn test_cursor_ignores_non_numeric_current_date() {
        let (mut poller, source, _notifier) = poller(vec![
            json!({"homeworks": [], "current_date": "soon"}),
            json!({"homeworks": []}),
        ]);

        poller.run_cycle().await;
        poller.run_cycle().await;

        let from_dates = source.requested_from_dates.lock().await;
        assert_eq!(from_dates[1], from_dates[0]);
    }

    #[tokio::test]
    async fn test_missing_homeworks_key_is_logged_not_forwarded() {
        let (mut poller, _source, notifier) =
            poller(vec![json!({"current_date": 1_700_000_000})]);

        poller.run_cycle().await;

        assert!(notifier.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_mistyped_homeworks_is_forwarded() {
        let (mut poller, _source, notifier) =
            poller(vec![json!({"homeworks": "not a list"})]);

        poller.run_cycle().await;

        let sent = notifier.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].starts_with("Сбой в работе программы:"));
    }

    #[tokio::test]
    async fn test_duplicate_rendering_suppressed() {
        let update = json!({
            "homeworks": [{"homework_name": "hw1", "status": "approved"}],
            "current_date": 1_700_000_000
        });
        let (mut poller, _source, notifier) = poller(vec![update.clone(), update]);

        poller.run_cycle().await;
        poller.run_cycle().await;

        let sent = notifier.sent.lock().await;
        assert_eq!(
            sent.as_slice(),
            ["Status changed for submission \"hw1\". Работа проверена: ревьюеру всё понравилось. Ура!"]
        );
    }

    #[tokio::test]
    async fn test_cursor_advances_even_when_formatting_fails() {
        let (mut poller, source, _notifier) = poller(vec![
            json!({"homeworks": "not a list", "current_date": 1_700_000_000}),
            json!({"homeworks": []}),
        ]);

        poller.run_cycle().await;
        poller.run_cycle().await;

        let from_dates = source.requested_from_dates.lock().await;
        assert_eq!(from_dates[1], 1_700_000_000);
    }
}
