//! Terminal UI layer.
//!
//! [`chat_loop`] runs the interactive event loop; [`layout`] builds display
//! lines and draws frames. This layer presents and captures interaction
//! state; [`crate::core`] owns the conversation logic.

pub mod chat_loop;
pub mod layout;
