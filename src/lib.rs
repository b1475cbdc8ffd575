//! Ragdesk is a terminal chat client for an employee-database RAG assistant.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation state machine (unauthenticated vs.
//!   authenticated), the transcript, and configuration.
//! - [`api`] defines the backend wire types and the HTTP transport client.
//! - [`ui`] renders the terminal interface and runs the interactive event
//!   loop that drives user input and display updates.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into
//! [`ui::chat_loop::run_chat`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
