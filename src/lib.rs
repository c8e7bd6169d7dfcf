//! Chat client for asking payroll questions against a `/chat` endpoint,
//! with a per-session question quota and a timestamped transcript.

pub mod app;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod exchange;
pub mod history;
pub mod login;
pub mod repl;
pub mod session;
pub mod terminal;
pub mod transcript;

#[cfg(test)]
mod testing;

pub use app::{App, Banner};
pub use chat::{ChatController, InputState, SubmitOutcome};
pub use cli::Cli;
pub use config::ClientConfig;
pub use error::{ChatError, ConfigError, ExchangeError};
pub use exchange::{Exchange, ExchangeReply, HttpExchange};
pub use history::{HistoryEntry, MessageRecord, Role};
pub use login::LoginController;
pub use session::SessionState;
pub use transcript::{Body, Entry, Renderer, Transcript, TranscriptSink};
