//! Input form pane: one editable line per declared input field.

use crate::app::InputField;
use crate::theme::Theme;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use rb_protocol::InputWidget;

pub fn render_form(
    frame: &mut Frame,
    area: Rect,
    inputs: &[InputField],
    focus: usize,
    busy: bool,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled("Inputs", Style::default().fg(theme.title)));

    let mut lines: Vec<Line> = Vec::new();
    for (i, field) in inputs.iter().enumerate() {
        let marker = if i == focus { "> " } else { "  " };
        let style = if i == focus {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{}: ", field.schema.name), style),
            Span::raw(field_display(field)),
        ]));
    }

    if inputs.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (no inputs)",
            Style::default().fg(theme.muted),
        )));
    }

    lines.push(Line::default());
    let hint = if busy {
        Span::styled("  running...", Style::default().fg(theme.muted))
    } else {
        Span::styled(
            "  Enter: run   Tab: next field   Esc: quit",
            Style::default().fg(theme.muted),
        )
    };
    lines.push(Line::from(hint));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// How the current raw value shows in the form line.
fn field_display(field: &InputField) -> String {
    match &field.spec.widget {
        InputWidget::Checkbox { .. } => {
            if field.value.is_empty() {
                "[ ]".to_string()
            } else {
                "[x]".to_string()
            }
        }
        InputWidget::TextBox { placeholder }
        | InputWidget::NumberBox { placeholder, .. }
        | InputWidget::JsonTextArea { placeholder, .. } => {
            if field.value.is_empty() {
                placeholder.clone()
            } else {
                field.value.clone()
            }
        }
        InputWidget::DatePicker { .. } => field.value.clone(),
    }
}
