pub mod config;
pub mod error;
pub mod poller;
pub mod practicum;
pub mod telegram;

pub use config::Config;
pub use error::PollError;
pub use poller::Poller;
pub use practicum::{PracticumClient, StatusSource};
pub use telegram::{Notifier, TelegramClient};
