//! Main chat event loop.
//!
//! The loop owns a [`ChatApp`], draws frames, and handles key and mouse
//! events. Submissions run on a spawned task so the UI stays responsive
//! while a call is outstanding; responses come back over an unbounded
//! channel tagged with the session generation they belong to, and anything
//! from before the latest reset is discarded.

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{error::Error, io, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::client::{Backend, HttpBackend};
use crate::api::{AuthResponse, RagResponse};
use crate::core::session::{Outbound, Session};
use crate::ui::layout::{self, reserved_rows};
use crate::utils::logging::TranscriptLog;

enum BackendEvent {
    Auth(AuthResponse),
    Rag(RagResponse),
    Failed(String),
}

struct Delivery {
    generation: u64,
    event: BackendEvent,
}

pub struct ChatApp {
    pub session: Session,
    pub scroll_offset: u16,
    pub auto_scroll: bool,
    /// At most one call is outstanding; further sends are ignored until the
    /// response (or failure) lands.
    pub request_pending: bool,
    pub log: TranscriptLog,
}

impl ChatApp {
    pub fn new(log: TranscriptLog) -> Self {
        ChatApp {
            session: Session::new(),
            scroll_offset: 0,
            auto_scroll: true,
            request_pending: false,
            log,
        }
    }

    fn max_scroll_offset(&self, available_height: u16) -> u16 {
        let total_lines = layout::build_display_lines(self).len() as u16;
        total_lines.saturating_sub(available_height)
    }

    fn scroll_to_bottom(&mut self, available_height: u16) {
        self.scroll_offset = self.max_scroll_offset(available_height);
    }

    fn record_last_entry(&self) {
        if let Some(entry) = self.session.transcript.last() {
            if let Err(e) = self.log.record(entry) {
                debug!("failed to write transcript log: {e}");
            }
        }
    }
}

fn spawn_submission(
    backend: Arc<dyn Backend>,
    outbound: Outbound,
    generation: u64,
    tx: mpsc::UnboundedSender<Delivery>,
) {
    tokio::spawn(async move {
        let event = match outbound {
            Outbound::Auth(request) => match backend.authenticate(request).await {
                Ok(response) => BackendEvent::Auth(response),
                Err(e) => BackendEvent::Failed(e.to_string()),
            },
            Outbound::Rag(request) => match backend.query_rag(request).await {
                Ok(response) => BackendEvent::Rag(response),
                Err(e) => BackendEvent::Failed(e.to_string()),
            },
        };
        let _ = tx.send(Delivery { generation, event });
    });
}

pub async fn run_chat(server_url: String, log_file: Option<String>) -> Result<(), Box<dyn Error>> {
    let log = TranscriptLog::new(log_file)?;
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(&server_url));
    let mut app = ChatApp::new(log);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend_term = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_term)?;

    let result = run_event_loop(&mut terminal, &mut app, backend).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut ChatApp,
    backend: Arc<dyn Backend>,
) -> Result<(), Box<dyn Error>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();

    loop {
        terminal.draw(|f| layout::draw(f, app))?;

        let terminal_height = terminal.size().map(|s| s.height).unwrap_or_default();
        let available_height = terminal_height
            .saturating_sub(reserved_rows(app.session.is_authenticated()));

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(());
                    }
                    KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        if let Some(user_id) = app.session.reset() {
                            // Best-effort: the local reset never waits on the
                            // backend dropping its stored conversation.
                            let backend = Arc::clone(&backend);
                            tokio::spawn(async move {
                                if let Err(e) = backend.reset_conversation(user_id).await {
                                    debug!("remote reset failed: {e}");
                                }
                            });
                        }
                        app.request_pending = false;
                        app.scroll_offset = 0;
                        app.auto_scroll = true;
                    }
                    KeyCode::Enter => {
                        if app.request_pending {
                            continue;
                        }
                        if let Some(outbound) = app.session.begin_submit() {
                            app.record_last_entry();
                            app.request_pending = true;
                            if app.auto_scroll {
                                app.scroll_to_bottom(available_height);
                            }
                            spawn_submission(
                                Arc::clone(&backend),
                                outbound,
                                app.session.generation(),
                                tx.clone(),
                            );
                        }
                    }
                    KeyCode::Char(c) => {
                        app.session.input.push(c);
                    }
                    KeyCode::Backspace => {
                        app.session.input.pop();
                    }
                    KeyCode::Up => {
                        app.scroll_offset = app.scroll_offset.saturating_sub(1);
                        app.auto_scroll = false;
                    }
                    KeyCode::Down => {
                        let max_scroll = app.max_scroll_offset(available_height);
                        app.scroll_offset = app.scroll_offset.saturating_add(1).min(max_scroll);
                        if app.scroll_offset >= max_scroll {
                            app.auto_scroll = true;
                        }
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => {
                        app.scroll_offset = app.scroll_offset.saturating_sub(3);
                        app.auto_scroll = false;
                    }
                    MouseEventKind::ScrollDown => {
                        let max_scroll = app.max_scroll_offset(available_height);
                        app.scroll_offset = app.scroll_offset.saturating_add(3).min(max_scroll);
                        if app.scroll_offset >= max_scroll {
                            app.auto_scroll = true;
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        while let Ok(delivery) = rx.try_recv() {
            if delivery.generation != app.session.generation() {
                // Response from before the last reset; the session that
                // asked for it no longer exists.
                debug!("discarding stale backend response");
                continue;
            }
            app.request_pending = false;
            match delivery.event {
                BackendEvent::Auth(response) => app.session.apply_auth(response),
                BackendEvent::Rag(response) => app.session.apply_rag(response),
                BackendEvent::Failed(message) => app.session.apply_error(&message),
            }
            app.record_last_entry();
            if app.auto_scroll {
                app.scroll_to_bottom(available_height);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::BackendResult;
    use crate::api::{AuthRequest, RagRequest, UserInfo};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted backend: answers auth calls from a queue and records what
    /// the RAG endpoint was called with.
    struct ScriptedBackend {
        auth_responses: Mutex<Vec<BackendResult<AuthResponse>>>,
        rag_requests: Mutex<Vec<RagRequest>>,
        reset_ids: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(auth_responses: Vec<BackendResult<AuthResponse>>) -> Self {
            ScriptedBackend {
                auth_responses: Mutex::new(auth_responses),
                rag_requests: Mutex::new(Vec::new()),
                reset_ids: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Backend for ScriptedBackend {
        async fn authenticate(&self, _request: AuthRequest) -> BackendResult<AuthResponse> {
            self.auth_responses
                .lock()
                .unwrap()
                .remove(0)
        }

        async fn query_rag(&self, request: RagRequest) -> BackendResult<RagResponse> {
            self.rag_requests.lock().unwrap().push(request.clone());
            Ok(RagResponse {
                system_reply: "You have 12 vacation days left.".to_string(),
            })
        }

        async fn reset_conversation(&self, user_id: String) -> BackendResult<()> {
            self.reset_ids.lock().unwrap().push(user_id);
            Ok(())
        }
    }

    fn authenticated_response() -> BackendResult<AuthResponse> {
        Ok(AuthResponse {
            user_info: UserInfo {
                name: Some("Alice".to_string()),
                id: Some("42".to_string()),
                division: Some("Engineering".to_string()),
            },
            system_last_message: "You're all set. Ask me anything.".to_string(),
            authenticated: true,
        })
    }

    #[tokio::test]
    async fn submissions_round_trip_through_the_channel() {
        let backend: Arc<dyn Backend> = Arc::new(ScriptedBackend::new(vec![
            authenticated_response(),
        ]));
        let mut app = ChatApp::new(TranscriptLog::new(None).unwrap());
        let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();

        app.session.input = "Alice, id 42, Engineering".to_string();
        let outbound = app.session.begin_submit().unwrap();
        spawn_submission(Arc::clone(&backend), outbound, app.session.generation(), tx);

        let delivery = rx.recv().await.unwrap();
        assert_eq!(delivery.generation, app.session.generation());
        match delivery.event {
            BackendEvent::Auth(response) => app.session.apply_auth(response),
            _ => panic!("expected an auth response"),
        }
        assert!(app.session.is_authenticated());
    }

    #[tokio::test]
    async fn rag_requests_carry_the_collected_identity() {
        let scripted = Arc::new(ScriptedBackend::new(vec![authenticated_response()]));
        let backend: Arc<dyn Backend> = scripted.clone();
        let mut app = ChatApp::new(TranscriptLog::new(None).unwrap());
        let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();

        app.session.input = "Alice, id 42, Engineering".to_string();
        let outbound = app.session.begin_submit().unwrap();
        spawn_submission(Arc::clone(&backend), outbound, app.session.generation(), tx.clone());
        let delivery = rx.recv().await.unwrap();
        match delivery.event {
            BackendEvent::Auth(response) => app.session.apply_auth(response),
            _ => panic!("expected an auth response"),
        }

        app.session.input = "How many vacation days do I have?".to_string();
        let outbound = app.session.begin_submit().unwrap();
        spawn_submission(Arc::clone(&backend), outbound, app.session.generation(), tx);
        let delivery = rx.recv().await.unwrap();
        match delivery.event {
            BackendEvent::Rag(response) => app.session.apply_rag(response),
            _ => panic!("expected a RAG response"),
        }

        let recorded = scripted.rag_requests.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].user_info.id.as_deref(), Some("42"));
        assert_eq!(
            app.session.transcript.last().unwrap().display(),
            "Bot: You have 12 vacation days left."
        );
    }

    #[tokio::test]
    async fn failed_calls_surface_as_inline_errors() {
        let backend: Arc<dyn Backend> = Arc::new(ScriptedBackend::new(vec![Err(
            "connection refused".into(),
        )]));
        let mut app = ChatApp::new(TranscriptLog::new(None).unwrap());
        let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();

        app.session.input = "Alice".to_string();
        let outbound = app.session.begin_submit().unwrap();
        spawn_submission(Arc::clone(&backend), outbound, app.session.generation(), tx);

        let delivery = rx.recv().await.unwrap();
        match delivery.event {
            BackendEvent::Failed(message) => app.session.apply_error(&message),
            _ => panic!("expected a failure"),
        }
        assert_eq!(
            app.session.transcript.last().unwrap().display(),
            "Error: connection refused"
        );
        assert_eq!(app.session.user_info, UserInfo::default());
    }

    #[tokio::test]
    async fn responses_from_before_a_reset_are_stale() {
        let backend: Arc<dyn Backend> = Arc::new(ScriptedBackend::new(vec![
            authenticated_response(),
        ]));
        let mut app = ChatApp::new(TranscriptLog::new(None).unwrap());
        let (tx, mut rx) = mpsc::unbounded_channel::<Delivery>();

        app.session.input = "Alice, id 42, Engineering".to_string();
        let outbound = app.session.begin_submit().unwrap();
        let fired_at = app.session.generation();
        spawn_submission(Arc::clone(&backend), outbound, fired_at, tx);

        app.session.reset();
        let delivery = rx.recv().await.unwrap();
        assert_ne!(delivery.generation, app.session.generation());
    }
}
