/*
[INPUT]:  Cached global status counts
[OUTPUT]: One count card per status rendered into Ratatui frame
[POS]:    TUI UI status counts panel
[UPDATE]: When changing count card layout or colors
*/

use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use taskdeck_adapter::TaskStatus;
use taskdeck_console::Console;
use taskdeck_console::status::display_class;

use crate::tui::runtime::{border_style, tone_style};

pub(in crate::tui) fn draw_status_counts(
    frame: &mut ratatui::Frame,
    area: ratatui::layout::Rect,
    console: &Console,
) {
    let cache = console.counts();
    let slots = TaskStatus::ALL.len();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, slots as u32); slots])
        .split(area);

    for ((status, count), card) in cache.counts().iter().zip(cards.iter()) {
        let style = tone_style(display_class(status.as_str()));
        let mut title = status.as_str().to_string();
        if cache.last_error().is_some() {
            title.push_str(" (stale)");
        }
        let widget = Paragraph::new(Line::from(Span::styled(
            count.to_string(),
            style.add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title(Span::styled(title, style)),
        );
        frame.render_widget(widget, *card);
    }
}
