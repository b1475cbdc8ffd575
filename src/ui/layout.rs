//! Frame layout and display-line construction.
//!
//! Purely reactive: everything rendered here is read from the chat app
//! state. The transcript is one scrollable paragraph; the input box sits at
//! the bottom; a one-line banner appears only while the session is
//! authenticated.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::core::message::Speaker;
use crate::ui::chat_loop::ChatApp;

pub const TRANSCRIPT_TITLE: &str = "Employee Database Assistant";
pub const AUTHENTICATED_BANNER: &str = " Authenticated — ask me about the employee database";
pub const INPUT_TITLE: &str = "Type your message (Enter to send, Ctrl+R to reset, Ctrl+C to quit)";

/// Rows taken by everything except the transcript body: the transcript
/// title, the bordered input box, and (when shown) the banner.
pub fn reserved_rows(authenticated: bool) -> u16 {
    let banner = if authenticated { 1 } else { 0 };
    1 + banner + 3
}

pub fn build_display_lines(app: &ChatApp) -> Vec<Line<'_>> {
    let mut lines = Vec::new();

    for entry in &app.session.transcript {
        match entry.speaker {
            Speaker::User => {
                lines.push(Line::from(vec![
                    Span::styled(
                        "You: ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(entry.content.as_str(), Style::default().fg(Color::Cyan)),
                ]));
            }
            Speaker::Bot => {
                lines.push(Line::from(vec![
                    Span::styled(
                        "Bot: ",
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(entry.content.as_str(), Style::default().fg(Color::White)),
                ]));
            }
            Speaker::System => {
                lines.push(Line::from(Span::styled(
                    entry.content.as_str(),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            Speaker::AppError => {
                lines.push(Line::from(vec![
                    Span::styled(
                        "Error: ",
                        Style::default()
                            .fg(Color::Red)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(entry.content.as_str(), Style::default().fg(Color::Red)),
                ]));
            }
        }
        // Empty line for spacing between entries.
        lines.push(Line::from(""));
    }

    lines
}

pub fn draw(f: &mut Frame, app: &ChatApp) {
    let authenticated = app.session.is_authenticated();

    let constraints = if authenticated {
        vec![
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ]
    } else {
        vec![Constraint::Min(0), Constraint::Length(3)]
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let lines = build_display_lines(app);
    let available_height = chunks[0].height.saturating_sub(1);
    let total_lines = lines.len() as u16;
    let max_offset = total_lines.saturating_sub(available_height);
    let scroll_offset = app.scroll_offset.min(max_offset);

    let transcript = Paragraph::new(lines)
        .block(Block::default().title(TRANSCRIPT_TITLE))
        .wrap(Wrap { trim: true })
        .scroll((scroll_offset, 0));
    f.render_widget(transcript, chunks[0]);

    if authenticated {
        let banner = Paragraph::new(Span::styled(
            AUTHENTICATED_BANNER,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
        f.render_widget(banner, chunks[1]);
    }

    let input_chunk = *chunks.last().expect("layout always has an input area");
    let input_style = if app.request_pending {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let input = Paragraph::new(app.session.input.as_str())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(INPUT_TITLE))
        .wrap(Wrap { trim: true });
    f.render_widget(input, input_chunk);

    f.set_cursor_position((
        input_chunk.x + app.session.input.len() as u16 + 1,
        input_chunk.y + 1,
    ));
}
