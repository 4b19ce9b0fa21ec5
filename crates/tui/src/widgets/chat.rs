//! Chat transcript pane: user triggers, modal responses, and final
//! results as an append-only conversation.

use crate::theme::Theme;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use rb_protocol::{ChatBlock, ChatRole};

pub fn render_chat(frame: &mut Frame, area: Rect, chat: &[ChatBlock], theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled("Chat", Style::default().fg(theme.title)));

    let mut lines: Vec<Line> = Vec::new();
    for entry in chat {
        let (who, color) = match entry.role {
            ChatRole::User => ("you", theme.user),
            ChatRole::Response => ("workflow", theme.response),
        };
        let mut body_lines = entry.body.lines();
        let first = body_lines.next().unwrap_or("");
        lines.push(Line::from(vec![
            Span::styled(format!("{who}: "), Style::default().fg(color)),
            Span::raw(first.to_string()),
        ]));
        for continuation in body_lines {
            lines.push(Line::from(Span::raw(format!("  {continuation}"))));
        }
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
