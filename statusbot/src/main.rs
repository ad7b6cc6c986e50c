use std::sync::Arc;

use tracing::{error, info, Level};

use statusbot::config::Config;
use statusbot::poller::Poller;
use statusbot::practicum::PracticumClient;
use statusbot::telegram::TelegramClient;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    info!("Starting homework status bot");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration check failed: {}", e);
            std::process::exit(1);
        }
    };

    let source = Arc::new(PracticumClient::new(
        config.practicum_token,
        config.request_timeout,
    ));
    let notifier = Arc::new(TelegramClient::new(
        config.telegram_token,
        config.telegram_chat_id,
        config.request_timeout,
    ));

    info!(
        "Polling every {}s with a {}s request timeout",
        config.poll_interval.as_secs(),
        config.request_timeout.as_secs()
    );

    Poller::new(source, notifier, config.poll_interval).run().await;
}
