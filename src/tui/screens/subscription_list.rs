//! Subscription list screen: shows every subscription stored this session.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use crate::state::{StoredSubscription, SubscriptionState};
use crate::tui::action::Action;
use crate::tui::app::Screen;
use crate::tui::widgets::mask;

/// State for the subscription list screen.
#[derive(Debug, Clone)]
pub struct SubscriptionListState {
    /// Snapshot of the stored subscriptions, newest first.
    subscriptions: Vec<StoredSubscription>,
    /// Index of the highlighted row, or `None` if the list is empty.
    selected: Option<usize>,
}

impl Default for SubscriptionListState {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionListState {
    /// Creates an empty state. Call [`load`](Self::load) to populate it.
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            selected: None,
        }
    }

    /// Refreshes the snapshot from `state`, selecting the newest entry.
    pub fn load(&mut self, state: &SubscriptionState) {
        self.subscriptions = state.list();
        self.selected = if self.subscriptions.is_empty() {
            None
        } else {
            Some(0)
        };
    }

    /// Handles a key event, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up => {
                self.select_prev();
                Action::None
            }
            KeyCode::Down => {
                self.select_next();
                Action::None
            }
            KeyCode::Char('n') | KeyCode::Esc => Action::Navigate(Screen::CreateSubscription),
            KeyCode::Char('q') => Action::Quit,
            _ => Action::None,
        }
    }

    /// Returns the cached subscriptions.
    pub fn subscriptions(&self) -> &[StoredSubscription] {
        &self.subscriptions
    }

    /// Returns the selected index.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Moves the selection up by one (no wrap).
    fn select_prev(&mut self) {
        self.selected = match self.selected {
            Some(i) if i > 0 => Some(i - 1),
            other => other,
        };
    }

    /// Moves the selection down by one (no wrap).
    fn select_next(&mut self) {
        self.selected = match self.selected {
            Some(i) if i + 1 < self.subscriptions.len() => Some(i + 1),
            other => other,
        };
    }
}

/// Renders the subscription list screen.
#[mutants::skip]
pub fn draw_subscription_list(state: &SubscriptionListState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Subscriptions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if state.subscriptions().is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from("No subscriptions yet."),
            Line::from("Press 'n' to create one."),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header = Row::new(vec!["Email", "Type", "Created", "Password"])
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .subscriptions()
        .iter()
        .enumerate()
        .map(|(i, sub)| {
            let style = if state.selected() == Some(i) {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                sub.record.email.clone(),
                sub.record.tier.clone(),
                sub.created_at.format("%Y-%m-%d %H:%M").to_string(),
                mask(&sub.record.password),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Min(24),
        Constraint::Length(10),
        Constraint::Length(17),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).header(header);

    let [table_area, footer_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

    frame.render_widget(table, table_area);

    let footer = Paragraph::new("\u{2191}/\u{2193}: select  n/Esc: new  q: quit  F1: help")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
