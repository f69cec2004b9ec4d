//! Form rows renderer for input screens.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Height of one rendered row: top border, value, bottom border.
pub const ROW_HEIGHT: u16 = 3;

/// One rendered row of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRow {
    /// Display label shown in the row's border.
    pub label: String,
    /// Text to display as the value (already masked if needed).
    pub value: String,
    /// Validation error message, if any.
    pub error: Option<String>,
    /// Whether the field must be filled in.
    pub required: bool,
}

impl FormRow {
    /// Creates a row with no error.
    pub fn new(label: impl Into<String>, value: impl Into<String>, required: bool) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            error: None,
            required,
        }
    }

    /// Attaches an error message to the row.
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }
}

/// Replaces every character of `value` with a bullet.
pub fn mask(value: &str) -> String {
    "\u{2022}".repeat(value.chars().count())
}

/// Renders `rows` within `area`, highlighting the row at index `focus`.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form(rows: &[FormRow], focus: usize, frame: &mut Frame, area: Rect) {
    let constraints: Vec<Constraint> = rows
        .iter()
        .map(|_| Constraint::Length(ROW_HEIGHT))
        .collect();

    let areas = Layout::vertical(constraints).split(area);

    for (i, row) in rows.iter().enumerate() {
        let is_focused = i == focus;

        let border_color = if row.error.is_some() {
            Color::Red
        } else if is_focused {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let label = if row.required {
            format!("{} *", row.label)
        } else {
            row.label.clone()
        };

        let block = Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let mut spans = vec![Span::raw(row.value.as_str())];
        if is_focused {
            spans.push(Span::styled(
                "\u{2588}",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), areas[i]);

        // Error text sits on the bottom border of its row.
        if let Some(ref err) = row.error {
            let error_line = Paragraph::new(Span::styled(
                err.as_str(),
                Style::default().fg(Color::Red),
            ));
            let err_area = Rect {
                x: areas[i].x + 2,
                y: areas[i].y + ROW_HEIGHT.saturating_sub(1),
                width: areas[i].width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(error_line, err_area);
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;

    fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
        let mut s = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
            }
            s.push('\n');
        }
        s
    }

    fn render(rows: &[FormRow], focus: usize) -> String {
        let backend = TestBackend::new(40, ROW_HEIGHT * rows.len() as u16);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| draw_form(rows, focus, frame, frame.area()))
            .unwrap();
        buffer_to_string(terminal.backend().buffer())
    }

    #[test]
    fn mask_hides_every_character() {
        assert_eq!(mask("abc#"), "\u{2022}\u{2022}\u{2022}\u{2022}");
        assert_eq!(mask(""), "");
        assert_eq!(mask("éé").chars().count(), 2);
    }

    #[test]
    fn with_error_sets_error() {
        let row = FormRow::new("Email", "", true).with_error(Some("bad".into()));
        assert_eq!(row.error.as_deref(), Some("bad"));
    }

    #[test]
    fn renders_labels_and_values() {
        let rows = [
            FormRow::new("Email", "a@b.com", true),
            FormRow::new("Tier", "Advanced", false),
        ];
        let output = render(&rows, 0);
        assert!(output.contains("Email *"), "required label gets a star");
        assert!(output.contains("a@b.com"));
        assert!(output.contains("Tier"));
        assert!(!output.contains("Tier *"));
        assert!(output.contains("Advanced"));
    }

    #[test]
    fn renders_error_on_bottom_border() {
        let rows = [FormRow::new("Email", "", true).with_error(Some("Email is required".into()))];
        let output = render(&rows, 0);
        let last_line = output.lines().nth(2).unwrap();
        assert!(last_line.contains("Email is required"));
    }

    #[test]
    fn cursor_only_on_focused_row() {
        let rows = [
            FormRow::new("Email", "x", true),
            FormRow::new("Password", "y", true),
        ];
        let output = render(&rows, 1);
        let lines: Vec<&str> = output.lines().collect();
        assert!(!lines[1].contains('\u{2588}'));
        assert!(lines[4].contains('\u{2588}'));
    }
}
