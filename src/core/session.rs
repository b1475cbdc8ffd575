//! The conversation state machine.
//!
//! A session is either `Unauthenticated` (every submission goes to the auth
//! endpoint, which collects identity until it reports success) or
//! `Authenticated` (every submission goes to the RAG endpoint, scoped by the
//! collected identity). The session object owns all conversation state;
//! transitions are plain methods with no I/O, so the whole machine is
//! testable without a backend. The chat loop performs the network call named
//! by [`Outbound`] and feeds the response back through an `apply_*` method.

use crate::api::{AuthRequest, AuthResponse, RagRequest, RagResponse, UserInfo};
use crate::core::message::Entry;

pub const WELCOME: &str =
    "Welcome to the employee database assistant. Please write your name and id.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unauthenticated,
    Authenticated,
}

/// The network call a submission requires. Built from the session's current
/// phase, so callers cannot hit the wrong endpoint.
#[derive(Debug, Clone)]
pub enum Outbound {
    Auth(AuthRequest),
    Rag(RagRequest),
}

pub struct Session {
    phase: Phase,
    pub transcript: Vec<Entry>,
    pub user_info: UserInfo,
    pub system_msg: String,
    pub input: String,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Session {
            phase: Phase::Unauthenticated,
            transcript: vec![Entry::system(WELCOME)],
            user_info: UserInfo::default(),
            system_msg: WELCOME.to_string(),
            input: String::new(),
            generation: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase == Phase::Authenticated
    }

    /// Responses are tagged with the generation current when the request was
    /// fired; a reset bumps it so late responses can be discarded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Take the pending input and turn it into a transcript entry plus the
    /// request for the current phase. Whitespace-only input is a no-op:
    /// nothing is appended, nothing should be sent.
    pub fn begin_submit(&mut self) -> Option<Outbound> {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.input.clear();
        self.transcript.push(Entry::user(text.as_str()));

        Some(match self.phase {
            Phase::Unauthenticated => Outbound::Auth(AuthRequest {
                message: text,
                user_info: self.user_info.clone(),
                system_last_message: self.system_msg.clone(),
            }),
            Phase::Authenticated => Outbound::Rag(RagRequest {
                user_message: text,
                user_info: self.user_info.clone(),
            }),
        })
    }

    /// Apply an auth response: the bot line is appended, identity and the
    /// system message are replaced wholesale, and the session becomes
    /// authenticated iff the backend says so. Authentication never reverts
    /// here; only [`Session::reset`] goes back.
    pub fn apply_auth(&mut self, response: AuthResponse) {
        self.transcript
            .push(Entry::bot(response.system_last_message.as_str()));
        self.user_info = response.user_info;
        self.system_msg = response.system_last_message;
        if response.authenticated {
            self.phase = Phase::Authenticated;
        }
    }

    /// Apply a RAG response: only the bot line is appended. Identity and the
    /// system message stay as they are; the backend keeps the conversation
    /// memory on its side.
    pub fn apply_rag(&mut self, response: RagResponse) {
        self.transcript.push(Entry::bot(response.system_reply.as_str()));
    }

    /// Surface a failed call inline. The optimistic `You:` entry stays;
    /// nothing else is touched, so a stuck conversation is recoverable by
    /// reset.
    pub fn apply_error(&mut self, message: &str) {
        self.transcript.push(Entry::error(message));
    }

    /// Return to the initial state: unauthenticated, all-unset identity,
    /// transcript down to the welcome entry. Returns the user id that was
    /// active, if any, so the caller can ask the backend to drop its stored
    /// conversation too.
    pub fn reset(&mut self) -> Option<String> {
        let previous_id = self.user_info.id.take();
        self.phase = Phase::Unauthenticated;
        self.transcript = vec![Entry::system(WELCOME)];
        self.user_info = UserInfo::default();
        self.system_msg = WELCOME.to_string();
        self.input.clear();
        self.generation += 1;
        previous_id
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
