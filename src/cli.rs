//! Command line entry point.

use crate::app::App;
use crate::config::{self, ClientConfig};
use crate::error::ConfigError;
use crate::exchange::HttpExchange;
use crate::repl::Repl;
use crate::terminal::TerminalSink;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Ask questions about your payroll data.
#[derive(Parser, Debug)]
#[command(name = "payroll-chat", version, about)]
pub struct Cli {
    /// Settings file (defaults to the user config directory).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base URL of the chat service.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Log in with this employee ID instead of prompting.
    #[arg(long)]
    pub employee_id: Option<String>,

    /// Questions allowed per session.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Write logs as JSON.
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Settings file with command line overrides applied.
    pub fn resolve_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut config = config::resolve_config(self.config.as_deref())?;
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(limit) = self.limit {
            config.question_limit = limit;
        }
        config.validate()?;
        Ok(config)
    }

    pub async fn run(self) -> Result<()> {
        let config = self.resolve_config().context("failed to load configuration")?;
        tracing::info!(
            endpoint = %config.endpoint,
            limit = config.question_limit,
            "starting payroll chat"
        );

        let exchange = Arc::new(HttpExchange::new(&config.endpoint));
        let app = App::new(&config, exchange, TerminalSink::stdout());
        Repl::new(app)?.run(self.employee_id).await
    }
}

/// Installs the global subscriber, logging to a daily file so output never
/// mixes with the prompt. Keep the guard alive for the life of the process.
pub fn init_tracing(json: bool) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(config::log_dir(), "payroll-chat.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    guard
}
