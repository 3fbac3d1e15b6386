/*
[INPUT]:  Current task page, filters, and pagination state
[OUTPUT]: Task table rendered into Ratatui frame
[POS]:    TUI UI task table rendering
[UPDATE]: When changing task columns or the list title
*/

use ratatui::layout::Constraint;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use taskdeck_console::status::{display_class, status_name};

use crate::tui::app::AppState;
use crate::tui::runtime::{border_style, header_style, tone_style};

pub(in crate::tui) fn draw_task_table(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    app: &mut AppState,
) {
    let view = app.console.view();
    let filter = view.filter();
    let page = view.page();
    let mut title = format!(
        "Tasks | status: {} | type: {} | page {} | size {}",
        filter.status.label(),
        filter.task_type.label(),
        page.page,
        page.page_size,
    );
    if page.has_more {
        title.push_str(" | more");
    }
    if app.console.list().is_loading() {
        title.push_str(" | loading");
    }

    let header = Row::new(["ID", "NAME", "TYPE", "STATUS", "RETRIES"]).style(header_style());
    let rows = app
        .console
        .tasks()
        .iter()
        .map(|task| {
            let status = status_name(task.status);
            Row::new(vec![
                Cell::from(task.id.to_string()),
                Cell::from(task.name.clone()),
                Cell::from(task.task_type.clone()),
                Cell::from(Span::styled(status, tone_style(display_class(status)))),
                Cell::from(task.retries.to_string()),
            ])
        })
        .collect::<Vec<_>>();

    let empty = rows.is_empty();
    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(if empty {
                format!("{title} | no tasks")
            } else {
                title
            }),
    )
    .row_highlight_style(
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");
    frame.render_stateful_widget(table, area, &mut app.table_state);
}
