//! Modal yes/no dialog drawn over the current screen.

use crossterm::event::{KeyCode, KeyEvent};
use futures::channel::oneshot;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::form::{DialogConfig, DialogResult};
use crate::tui::channels::DialogRequest;

/// Terminal cells per CSS-style pixel width: roughly one cell per 8px.
const PX_PER_CELL: u16 = 8;
/// Width used when the requested width cannot be parsed.
const FALLBACK_COLUMNS: u16 = 40;
const MIN_COLUMNS: u16 = 24;
const DIALOG_HEIGHT: u16 = 5;

/// Converts a requested dialog width to terminal columns.
///
/// `"300px"` is scaled to cells; a bare number is taken as columns.
pub fn dialog_columns(width: &str) -> u16 {
    let width = width.trim();
    let columns = match width.strip_suffix("px") {
        Some(px) => px.trim().parse::<u16>().ok().map(|px| px / PX_PER_CELL),
        None => width.parse::<u16>().ok(),
    };
    columns.unwrap_or(FALLBACK_COLUMNS).max(MIN_COLUMNS)
}

/// An open confirmation dialog waiting for the user's answer.
#[derive(Debug)]
pub struct ConfirmDialogState {
    message: String,
    config: DialogConfig,
    responder: Option<oneshot::Sender<DialogResult>>,
}

impl ConfirmDialogState {
    /// Opens a dialog for `request` asking `message`.
    pub fn new(request: DialogRequest, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            config: request.config,
            responder: Some(request.responder),
        }
    }

    /// Handles a key. Returns `true` once the dialog has closed.
    ///
    /// `y` confirms, `n` refuses, `Esc` dismisses without an answer.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.answer(true),
            KeyCode::Char('n') | KeyCode::Char('N') => self.answer(false),
            KeyCode::Esc => {
                tracing::debug!("confirmation dismissed");
                self.responder = None;
            }
            _ => return false,
        }
        true
    }

    fn answer(&mut self, confirmed: bool) {
        if let Some(responder) = self.responder.take() {
            // The asker may have moved on; an unheard answer is fine.
            let _ = responder.send(DialogResult { confirmed });
        }
    }

    /// The question shown to the user.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Width of the dialog, in terminal columns.
    pub fn columns(&self) -> u16 {
        dialog_columns(&self.config.width)
    }
}

/// Renders the dialog centered over `area`.
#[mutants::skip]
pub fn draw_confirm_dialog(state: &ConfirmDialogState, frame: &mut Frame, area: Rect) {
    let [row] = Layout::vertical([Constraint::Length(DIALOG_HEIGHT)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(state.columns())])
        .flex(Flex::Center)
        .areas(row);

    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let lines = vec![
        Line::from(state.message()),
        Line::from(""),
        Line::from("y: yes  n: no  Esc: cancel").style(Style::default().fg(Color::DarkGray)),
    ];

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        popup,
    );
}
