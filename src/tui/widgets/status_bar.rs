//! Status bar widget: one-line typing state and subscription count.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Data passed to the status bar widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusBarContext {
    /// Number of subscriptions stored so far.
    pub subscription_count: usize,
    /// Whether the user has stopped typing (idle delay elapsed).
    pub stopped: bool,
    /// Whether the form warning is raised.
    pub warning: bool,
}

/// Renders a one-line status bar.
///
/// Display format (left-aligned, Cyan):
/// - Idle, form fine:  `3 subscriptions  idle`
/// - Idle, warning:    `3 subscriptions  idle  CHECK FORM` (CHECK FORM in Yellow)
/// - Typing:           `1 subscription  typing`
#[mutants::skip]
pub fn draw_status_bar(ctx: &StatusBarContext, frame: &mut Frame, area: Rect) {
    let cyan = Style::default().fg(Color::Cyan);
    let yellow = Style::default().fg(Color::Yellow);

    let noun = if ctx.subscription_count == 1 {
        "subscription"
    } else {
        "subscriptions"
    };
    let mut spans = vec![
        Span::styled(format!("{} {noun}", ctx.subscription_count), cyan),
        Span::styled("  ", cyan),
        Span::styled(if ctx.stopped { "idle" } else { "typing" }, cyan),
    ];
    if ctx.warning {
        spans.push(Span::styled("  CHECK FORM", yellow));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
