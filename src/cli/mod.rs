//! Command-line interface parsing and startup.
//!
//! Parses arguments, loads configuration, resolves the backend address, and
//! hands off to the chat loop.

use clap::Parser;
use std::error::Error;

use crate::core::config::Config;
use crate::ui::chat_loop::run_chat;

#[derive(Parser)]
#[command(name = "ragdesk")]
#[command(about = "A terminal chat client for an employee-database RAG assistant")]
#[command(
    long_about = "Ragdesk is a full-screen terminal chat client for an employee-database \
assistant backend. You identify yourself in conversation (name, id, division); once the \
backend reports you as authenticated, your questions are answered from the employee \
database via retrieval-augmented generation.\n\n\
Server resolution (first match wins):\n\
  --server flag\n\
  RAGDESK_SERVER environment variable\n\
  server_url in the config file\n\
  http://localhost:8000\n\n\
Controls:\n\
  Type              Enter your message in the input field\n\
  Enter             Send the message\n\
  Up/Down/Mouse     Scroll through chat history\n\
  Ctrl+R            Reset the conversation\n\
  Ctrl+C            Quit"
)]
pub struct Args {
    /// Base URL of the assistant backend
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// Append the transcript to the given file
    #[arg(short = 'l', long, value_name = "FILE")]
    pub log: Option<String>,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    // Diagnostics go to stderr only when explicitly requested, so the TUI
    // stays clean by default.
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let args = Args::parse();
    let config = Config::load()?;
    let server_url = config.resolve_server_url(args.server.as_deref());

    run_chat(server_url, args.log).await
}
