//! payroll-chat binary entry point.

use anyhow::Result;
use clap::Parser;
use payroll_chat::cli::{init_tracing, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_json);
    cli.run().await
}
