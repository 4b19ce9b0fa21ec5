//! Event log pane: the per-run stream of intermediate events.

use crate::theme::Theme;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;
use rb_protocol::EventCard;

pub fn render_event_log(frame: &mut Frame, area: Rect, cards: &[EventCard], theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled("Events", Style::default().fg(theme.title)));

    // Keep the tail visible; the log resets on every new run.
    let visible = area.height.saturating_sub(2) as usize;
    let skip = cards.len().saturating_sub(visible);

    let items: Vec<ListItem> = cards
        .iter()
        .skip(skip)
        .map(|card| {
            let label_color = if card.label == "error" {
                theme.error
            } else {
                theme.accent
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>3} ", card.seq),
                    Style::default().fg(theme.muted),
                ),
                Span::styled(format!("[{}] ", card.label), Style::default().fg(label_color)),
                Span::raw(card.body.clone()),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
