//! Subscription sign-up screen: email, password and tier, with debounced warnings.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::config::Config;
use crate::form::{FormController, SubmitOutcome};
use crate::model::Field;
use crate::state::SubscriptionState;
use crate::tui::action::Action;
use crate::tui::app::Screen;
use crate::tui::channels::{ChannelNavigator, DialogRequests};
use crate::tui::widgets::form::{FormRow, ROW_HEIGHT, draw_form, mask};
use crate::tui::widgets::{StatusBarContext, draw_status_bar};

/// The form controller wired to the app's collaborators.
pub type SubscriptionForm = FormController<SubscriptionState, ChannelNavigator, DialogRequests>;

const WARNING_TEXT: &str = "Some fields are not valid yet";

/// Which row of the form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Email,
    Password,
    Tier,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Self::Email => Self::Password,
            Self::Password => Self::Tier,
            Self::Tier => Self::Email,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Email => Self::Tier,
            Self::Password => Self::Email,
            Self::Tier => Self::Password,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Email => 0,
            Self::Password => 1,
            Self::Tier => 2,
        }
    }
}

/// State for the sign-up screen.
pub struct CreateSubscriptionState {
    form: SubscriptionForm,
    focus: Focus,
    error: Option<String>,
}

impl CreateSubscriptionState {
    /// Wraps `form`, starting with focus on the email row.
    pub fn new(form: SubscriptionForm) -> Self {
        Self {
            form,
            focus: Focus::Email,
            error: None,
        }
    }

    /// Builds the form from its collaborators and the user's config.
    pub fn from_config(
        store: SubscriptionState,
        navigator: ChannelNavigator,
        dialogs: DialogRequests,
        config: &Config,
    ) -> Self {
        let form = FormController::new(store, navigator, dialogs)
            .with_idle_delay(config.idle_delay())
            .with_dialog_width(config.dialog_width.clone());
        Self::new(form)
    }

    /// Handles a key event at time `now`, returning an [`Action`] for the app to apply.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Action {
        if key.modifiers == KeyModifiers::ALT {
            match key.code {
                KeyCode::Char('c') => {
                    self.form.on_clear();
                    return Action::None;
                }
                KeyCode::Char('l') => return Action::Navigate(Screen::SubscriptionList),
                _ => {}
            }
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                Action::None
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                Action::None
            }
            KeyCode::Left if self.focus == Focus::Tier => {
                self.cycle_tier(false);
                Action::None
            }
            KeyCode::Right if self.focus == Focus::Tier => {
                self.cycle_tier(true);
                Action::None
            }
            // Unbound chords are not text.
            KeyCode::Char(_) if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() => {
                Action::None
            }
            KeyCode::Char(ch) => {
                self.edit_focused(now, |value| value.push(ch));
                Action::None
            }
            KeyCode::Backspace => {
                self.edit_focused(now, |value| {
                    value.pop();
                });
                Action::None
            }
            KeyCode::Enter => {
                self.submit();
                Action::None
            }
            KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }

    /// Applies `edit` to the focused text field and reports the keystroke.
    ///
    /// Email input is folded to lowercase before it reaches the form.
    fn edit_focused(&mut self, now: Instant, edit: impl FnOnce(&mut String)) {
        let (field, mut value) = match self.focus {
            Focus::Email => (Field::Email, self.form.email().unwrap_or("").to_string()),
            Focus::Password => (Field::Password, self.form.password().to_string()),
            Focus::Tier => return,
        };
        edit(&mut value);
        if field == Field::Email {
            value = value.to_lowercase();
        }
        self.form.on_field_input(field, value, now);
    }

    /// Moves the tier selection one step, wrapping around.
    fn cycle_tier(&mut self, forward: bool) {
        let tiers = self.form.subscription_types();
        if tiers.is_empty() {
            return;
        }
        let len = tiers.len();
        let current = tiers
            .iter()
            .position(|t| t.value == self.form.selected_subscription())
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        let value = tiers[next].value.clone();
        if let Err(e) = self.form.select_tier(&value) {
            self.error = Some(e.to_string());
        }
    }

    fn submit(&mut self) {
        self.error = None;
        match self.form.on_submit() {
            Ok(SubmitOutcome::Submitted(_)) | Ok(SubmitOutcome::Invalid) => {}
            Err(e) => {
                tracing::warn!(error = %e, "submit failed");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Advances the idle detector and applies any dialog answer.
    pub fn tick(&mut self, now: Instant) {
        self.form.tick(now);
    }

    /// Time until the idle detector next needs a tick, if it is armed.
    pub fn time_until_idle(&self, now: Instant) -> Option<Duration> {
        self.form.time_until_idle(now)
    }

    /// Resets the form and screen to their initial state.
    pub fn reset(&mut self) {
        self.form.initialize();
        self.focus = Focus::Email;
        self.error = None;
    }

    /// The wrapped form controller.
    pub fn form(&self) -> &SubscriptionForm {
        &self.form
    }

    /// The focused row.
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// The last submit error, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Display name of the selected tier.
    fn tier_display(&self) -> String {
        let name = self
            .form
            .subscription_types()
            .iter()
            .find(|t| t.value == self.form.selected_subscription())
            .map_or("?", |t| t.name.as_str());
        format!("\u{2039} {name} \u{203a}")
    }

    /// Builds the rows to render, attaching submit messages to their fields.
    pub fn rows(&self) -> Vec<FormRow> {
        let error_for = |field: Field| {
            self.form
                .messages()
                .iter()
                .find(|m| m.field == field)
                .map(|m| m.message.clone())
        };
        vec![
            FormRow::new("Email", self.form.email().unwrap_or(""), true)
                .with_error(error_for(Field::Email)),
            FormRow::new("Password", mask(self.form.password()), true)
                .with_error(error_for(Field::Password)),
            FormRow::new("Subscription", self.tier_display(), false),
        ]
    }
}

/// Renders the sign-up screen.
#[mutants::skip]
pub fn draw_create_subscription(
    state: &CreateSubscriptionState,
    subscription_count: usize,
    frame: &mut Frame,
    area: Rect,
) {
    let [status_area, content_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    let ctx = StatusBarContext {
        subscription_count,
        stopped: state.form().stopped(),
        warning: state.form().form_warning(),
    };
    draw_status_bar(&ctx, frame, status_area);

    let block = Block::default()
        .title(" Create Subscription ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(content_area);
    frame.render_widget(block, content_area);

    let rows = state.rows();
    let [form_area, warning_area, messages_area, footer_area] = Layout::vertical([
        Constraint::Length(ROW_HEIGHT * rows.len() as u16),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    draw_form(&rows, state.focus().index(), frame, form_area);

    if state.form().form_warning() {
        let warning = Paragraph::new(Line::from(Span::styled(
            WARNING_TEXT,
            Style::default().fg(Color::Yellow),
        )));
        frame.render_widget(warning, warning_area);
    }

    let mut lines: Vec<Line> = state
        .form()
        .messages()
        .iter()
        .map(|m| {
            Line::from(Span::styled(
                format!("{}: {}", m.field, m.message),
                Style::default().fg(Color::Red),
            ))
        })
        .collect();
    if let Some(err) = state.error() {
        lines.push(Line::from(Span::styled(err, Style::default().fg(Color::Red))));
    }
    frame.render_widget(Paragraph::new(lines), messages_area);

    let footer = Paragraph::new(Line::from(
        "Tab: next  \u{2190}/\u{2192}: tier  Enter: subscribe  Alt+c: clear  Alt+l: list  F1: help",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use crossterm::event::{KeyEventKind, KeyEventState};

    use super::*;
    use crate::form::{DialogResult, Route};
    use crate::tui::channels::DialogRequest;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn alt_press(ch: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(ch),
            modifiers: KeyModifiers::ALT,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    struct Fixture {
        state: CreateSubscriptionState,
        store: SubscriptionState,
        routes: mpsc::Receiver<Route>,
        dialogs: mpsc::Receiver<DialogRequest>,
    }

    fn fixture() -> Fixture {
        let store = SubscriptionState::new();
        let (nav_tx, routes) = mpsc::channel();
        let (dialog_tx, dialogs) = mpsc::channel();
        let state = CreateSubscriptionState::from_config(
            store.clone(),
            ChannelNavigator::new(nav_tx),
            DialogRequests::new(dialog_tx),
            &Config::default(),
        );
        Fixture {
            state,
            store,
            routes,
            dialogs,
        }
    }

    fn type_string(state: &mut CreateSubscriptionState, s: &str, now: Instant) {
        for ch in s.chars() {
            state.handle_key(press(KeyCode::Char(ch)), now);
        }
    }

    fn fill(state: &mut CreateSubscriptionState, email: &str, password: &str, now: Instant) {
        type_string(state, email, now);
        state.handle_key(press(KeyCode::Tab), now);
        type_string(state, password, now);
    }

    mod typing {
        use super::*;

        #[test]
        fn chars_fill_email() {
            let mut f = fixture();
            type_string(&mut f.state, "a@b", Instant::now());
            assert_eq!(f.state.form().email(), Some("a@b"));
        }

        #[test]
        fn email_is_lowercased() {
            let mut f = fixture();
            type_string(&mut f.state, "A@B.COM", Instant::now());
            assert_eq!(f.state.form().email(), Some("a@b.com"));
        }

        #[test]
        fn password_keeps_case_and_is_masked() {
            let mut f = fixture();
            let now = Instant::now();
            f.state.handle_key(press(KeyCode::Tab), now);
            type_string(&mut f.state, "AbC#", now);
            assert_eq!(f.state.form().password(), "AbC#");
            assert_eq!(f.state.rows()[1].value, mask("AbC#"));
        }

        #[test]
        fn shifted_chars_are_typed() {
            let mut f = fixture();
            let now = Instant::now();
            f.state.handle_key(press(KeyCode::Tab), now);
            f.state.handle_key(
                KeyEvent {
                    code: KeyCode::Char('A'),
                    modifiers: KeyModifiers::SHIFT,
                    kind: KeyEventKind::Press,
                    state: KeyEventState::NONE,
                },
                now,
            );
            assert_eq!(f.state.form().password(), "A");
        }

        #[test]
        fn unbound_chords_are_not_typed() {
            let mut f = fixture();
            let now = Instant::now();
            let ctrl_a = KeyEvent {
                code: KeyCode::Char('a'),
                modifiers: KeyModifiers::CONTROL,
                kind: KeyEventKind::Press,
                state: KeyEventState::NONE,
            };
            assert_eq!(f.state.handle_key(ctrl_a, now), Action::None);
            assert_eq!(f.state.handle_key(alt_press('x'), now), Action::None);
            assert_eq!(f.state.form().email(), None);
            assert_eq!(f.state.time_until_idle(now), None);
        }

        #[test]
        fn backspace_deletes_char() {
            let mut f = fixture();
            let now = Instant::now();
            type_string(&mut f.state, "ab", now);
            f.state.handle_key(press(KeyCode::Backspace), now);
            assert_eq!(f.state.form().email(), Some("a"));
        }

        #[test]
        fn typing_on_tier_row_is_ignored() {
            let mut f = fixture();
            let now = Instant::now();
            f.state.handle_key(press(KeyCode::BackTab), now);
            assert_eq!(f.state.focus(), Focus::Tier);
            type_string(&mut f.state, "xyz", now);
            assert_eq!(f.state.form().email(), None);
            assert_eq!(f.state.form().password(), "");
            assert_eq!(f.state.time_until_idle(now), None);
        }

        #[test]
        fn typing_arms_idle_detector() {
            let mut f = fixture();
            let now = Instant::now();
            type_string(&mut f.state, "a", now);
            assert_eq!(
                f.state.time_until_idle(now),
                Some(Duration::from_millis(2000))
            );
        }
    }

    mod focus {
        use super::*;

        #[test]
        fn tab_cycles_forward() {
            let mut f = fixture();
            let now = Instant::now();
            assert_eq!(f.state.focus(), Focus::Email);
            f.state.handle_key(press(KeyCode::Tab), now);
            assert_eq!(f.state.focus(), Focus::Password);
            f.state.handle_key(press(KeyCode::Tab), now);
            assert_eq!(f.state.focus(), Focus::Tier);
            f.state.handle_key(press(KeyCode::Tab), now);
            assert_eq!(f.state.focus(), Focus::Email);
        }

        #[test]
        fn backtab_cycles_backward() {
            let mut f = fixture();
            let now = Instant::now();
            f.state.handle_key(press(KeyCode::BackTab), now);
            assert_eq!(f.state.focus(), Focus::Tier);
            f.state.handle_key(press(KeyCode::BackTab), now);
            assert_eq!(f.state.focus(), Focus::Password);
        }
    }

    mod tier {
        use super::*;

        #[test]
        fn right_and_left_cycle_tiers() {
            let mut f = fixture();
            let now = Instant::now();
            f.state.handle_key(press(KeyCode::BackTab), now);
            f.state.handle_key(press(KeyCode::Right), now);
            assert_eq!(f.state.form().selected_subscription(), "pro");
            f.state.handle_key(press(KeyCode::Right), now);
            assert_eq!(f.state.form().selected_subscription(), "basic");
            f.state.handle_key(press(KeyCode::Left), now);
            assert_eq!(f.state.form().selected_subscription(), "pro");
        }

        #[test]
        fn arrows_ignored_off_tier_row() {
            let mut f = fixture();
            f.state.handle_key(press(KeyCode::Right), Instant::now());
            assert_eq!(f.state.form().selected_subscription(), "advanced");
        }

        #[test]
        fn tier_row_shows_display_name() {
            let f = fixture();
            assert!(f.state.rows()[2].value.contains("Advanced"));
        }
    }

    mod submit {
        use super::*;

        #[test]
        fn invalid_submit_attaches_messages_to_rows() {
            let mut f = fixture();
            let action = f.state.handle_key(press(KeyCode::Enter), Instant::now());
            assert_eq!(action, Action::None);
            let rows = f.state.rows();
            assert_eq!(rows[0].error.as_deref(), Some("Email is required"));
            assert_eq!(rows[1].error.as_deref(), Some("Password is required"));
            assert!(f.store.is_empty());
            assert!(f.routes.try_recv().is_err());
        }

        #[test]
        fn valid_submit_stores_and_requests_list() {
            let mut f = fixture();
            let now = Instant::now();
            fill(&mut f.state, "a@b.com", "abc#1234", now);
            f.state.handle_key(press(KeyCode::Enter), now);
            let stored = f.store.latest().unwrap();
            assert_eq!(stored.record.email, "a@b.com");
            assert_eq!(stored.record.tier, "Advanced");
            assert_eq!(stored.record.password, "abc#1234");
            assert_eq!(f.routes.try_recv(), Ok(Route::SubscriptionList));
            assert_eq!(f.state.error(), None);
        }

        #[test]
        fn navigation_failure_is_shown() {
            let mut f = fixture();
            let now = Instant::now();
            drop(f.routes);
            fill(&mut f.state, "a@b.com", "abc#1234", now);
            f.state.handle_key(press(KeyCode::Enter), now);
            assert!(f.state.error().unwrap().contains("list-subscription"));
            // Storage already happened; there is no rollback.
            assert_eq!(f.store.len(), 1);
        }
    }

    mod clear {
        use super::*;

        #[test]
        fn alt_c_requests_confirmation() {
            let mut f = fixture();
            let action = f.state.handle_key(alt_press('c'), Instant::now());
            assert_eq!(action, Action::None);
            let request = f.dialogs.try_recv().unwrap();
            assert_eq!(request.config.width, "300px");
        }

        #[test]
        fn confirmed_clear_resets_on_tick() {
            let mut f = fixture();
            let now = Instant::now();
            fill(&mut f.state, "a@b.com", "abc", now);
            f.state.handle_key(alt_press('c'), now);
            let request = f.dialogs.try_recv().unwrap();
            request
                .responder
                .send(DialogResult { confirmed: true })
                .unwrap();
            f.state.tick(now);
            assert_eq!(f.state.form().email(), None);
            assert_eq!(f.state.form().password(), "");
        }

        #[test]
        fn refused_clear_keeps_values() {
            let mut f = fixture();
            let now = Instant::now();
            fill(&mut f.state, "a@b.com", "abc", now);
            f.state.handle_key(alt_press('c'), now);
            let request = f.dialogs.try_recv().unwrap();
            request
                .responder
                .send(DialogResult { confirmed: false })
                .unwrap();
            f.state.tick(now);
            assert_eq!(f.state.form().email(), Some("a@b.com"));
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn alt_l_opens_list() {
            let mut f = fixture();
            let action = f.state.handle_key(alt_press('l'), Instant::now());
            assert_eq!(action, Action::Navigate(Screen::SubscriptionList));
        }

        #[test]
        fn esc_quits() {
            let mut f = fixture();
            assert_eq!(
                f.state.handle_key(press(KeyCode::Esc), Instant::now()),
                Action::Quit
            );
        }
    }

    mod warning {
        use super::*;

        #[test]
        fn idle_on_invalid_input_raises_warning() {
            let mut f = fixture();
            let now = Instant::now();
            type_string(&mut f.state, "x", now);
            f.state.tick(now + Duration::from_millis(2000));
            assert!(f.state.form().stopped());
            assert!(f.state.form().form_warning());
        }

        #[test]
        fn reset_clears_everything() {
            let mut f = fixture();
            let now = Instant::now();
            type_string(&mut f.state, "x", now);
            f.state.handle_key(press(KeyCode::Tab), now);
            f.state.tick(now + Duration::from_millis(2000));
            f.state.reset();
            assert_eq!(f.state.focus(), Focus::Email);
            assert!(!f.state.form().form_warning());
            assert_eq!(f.state.form().email(), None);
        }
    }
}
