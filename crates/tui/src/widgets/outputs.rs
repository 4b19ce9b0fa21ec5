//! Output panes: one per declared output field.

use crate::app::OutputPane;
use crate::theme::Theme;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;
use rb_protocol::{DisplayValue, OutputWidget};

pub fn render_outputs(frame: &mut Frame, area: Rect, outputs: &[OutputPane], theme: &Theme) {
    if outputs.is_empty() {
        return;
    }

    let share = (100 / outputs.len().max(1)) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Percentage(share); outputs.len()])
        .split(area);

    for (pane, chunk) in outputs.iter().zip(chunks.iter()) {
        render_pane(frame, *chunk, pane, theme);
    }
}

fn render_pane(frame: &mut Frame, area: Rect, pane: &OutputPane, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            pane.schema.name.clone(),
            Style::default().fg(theme.title),
        ));

    match &pane.value {
        Some(DisplayValue::Rows(rows)) => {
            let page_size = match pane.spec.widget {
                OutputWidget::DataGrid { page_size } => page_size,
                _ => rows.len(),
            };
            render_grid(frame, area, block, rows, page_size);
        }
        Some(DisplayValue::Text(text)) => {
            frame.render_widget(Paragraph::new(text.clone()).block(block), area);
        }
        Some(DisplayValue::Image(src)) => {
            frame.render_widget(Paragraph::new(format!("[image] {src}")).block(block), area);
        }
        Some(DisplayValue::Figure(figure)) => {
            frame.render_widget(Paragraph::new(describe_figure(figure)).block(block), area);
        }
        None => {
            let placeholder = match &pane.spec.widget {
                OutputWidget::TextArea { placeholder } => placeholder.clone(),
                _ => String::new(),
            };
            let paragraph =
                Paragraph::new(Span::styled(placeholder, Style::default().fg(theme.muted)))
                    .block(block);
            frame.render_widget(paragraph, area);
        }
    }
}

fn render_grid(
    frame: &mut Frame,
    area: Rect,
    block: Block,
    rows: &[serde_json::Map<String, serde_json::Value>],
    page_size: usize,
) {
    let columns: Vec<String> = rows
        .first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default();

    let header = Row::new(columns.iter().map(|c| Cell::from(c.clone())));
    let body: Vec<Row> = rows
        .iter()
        .take(page_size)
        .map(|row| {
            Row::new(columns.iter().map(|column| {
                let text = row
                    .get(column)
                    .map(cell_text)
                    .unwrap_or_default();
                Cell::from(text)
            }))
        })
        .collect();

    let width = 100 / columns.len().max(1) as u16;
    let widths = vec![Constraint::Percentage(width); columns.len().max(1)];
    frame.render_widget(Table::new(body, widths).header(header).block(block), area);
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Figures stay opaque; show a one-line summary instead of raw JSON.
fn describe_figure(figure: &serde_json::Value) -> String {
    let traces = figure
        .get("data")
        .and_then(|data| data.as_array())
        .map_or(0, Vec::len);
    if traces > 0 {
        format!("[figure] {traces} trace(s)")
    } else {
        "[figure]".to_string()
    }
}
