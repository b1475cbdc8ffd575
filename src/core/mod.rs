//! Domain logic: the conversation state machine, transcript entries, and
//! configuration. Nothing in here touches the network or the terminal.

pub mod config;
pub mod message;
pub mod session;
