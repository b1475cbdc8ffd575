//! Transcript entries for the chat display.
//!
//! The conversation transcript is an append-only sequence of entries. User
//! and bot entries carry a speaker prefix when displayed; system entries
//! (the welcome line) and app errors render without a conversation prefix.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
    /// Prompts shown by the app itself (the welcome line).
    System,
    /// Inline error surfaced by the app, not part of the conversation.
    AppError,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub speaker: Speaker,
    pub content: String,
}

impl Entry {
    pub fn user(content: impl Into<String>) -> Self {
        Entry {
            speaker: Speaker::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Entry {
            speaker: Speaker::Bot,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Entry {
            speaker: Speaker::System,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Entry {
            speaker: Speaker::AppError,
            content: content.into(),
        }
    }

    /// The line as it appears in the transcript and in transcript logs.
    pub fn display(&self) -> String {
        match self.speaker {
            Speaker::User => format!("You: {}", self.content),
            Speaker::Bot => format!("Bot: {}", self.content),
            Speaker::System => self.content.clone(),
            Speaker::AppError => format!("Error: {}", self.content),
        }
    }

    pub fn is_conversation(&self) -> bool {
        matches!(self.speaker, Speaker::User | Speaker::Bot)
    }
}
