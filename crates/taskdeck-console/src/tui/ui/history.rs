/*
[INPUT]:  Open history view (task id, cached task, load phase)
[OUTPUT]: History overlay rendered into Ratatui frame
[POS]:    TUI UI task history overlay
[UPDATE]: When changing history columns or load states
*/

use ratatui::layout::Constraint;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};
use taskdeck_console::history::{HistoryPhase, HistoryView};
use taskdeck_console::status::display_class;

use crate::tui::runtime::{border_style, header_style, tone_style};

pub(in crate::tui) fn draw_history(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    view: &HistoryView,
) {
    frame.render_widget(Clear, area);

    let title = match view.task.as_ref() {
        Some(task) => format!("History: task {} ({}) | [Esc] close", view.task_id, task.name),
        None => format!("History: task {} | [Esc] close", view.task_id),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &view.phase {
        HistoryPhase::Loading => {
            frame.render_widget(Paragraph::new("Loading history..."), inner);
        }
        HistoryPhase::Failed(message) => {
            let widget = Paragraph::new(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::LightRed),
            )))
            .wrap(Wrap { trim: true });
            frame.render_widget(widget, inner);
        }
        HistoryPhase::Loaded(entries) if entries.is_empty() => {
            frame.render_widget(Paragraph::new("No history recorded"), inner);
        }
        HistoryPhase::Loaded(entries) => {
            let rows = entries
                .iter()
                .map(|entry| {
                    let at = entry
                        .created_at
                        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_else(|| "-".to_string());
                    Row::new(vec![
                        Cell::from(at),
                        Cell::from(Span::styled(
                            entry.status.clone(),
                            tone_style(display_class(&entry.status)),
                        )),
                        Cell::from(entry.details.clone()),
                    ])
                })
                .collect::<Vec<_>>();
            let table = Table::new(
                rows,
                [
                    Constraint::Length(20),
                    Constraint::Length(10),
                    Constraint::Min(10),
                ],
            )
            .header(Row::new(["AT", "STATUS", "DETAILS"]).style(header_style()));
            frame.render_widget(table, inner);
        }
    }
}
