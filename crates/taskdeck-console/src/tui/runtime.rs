/*
[INPUT]:  Console state and events, crossterm input, log buffer
[OUTPUT]: Ratatui-based TUI run loop, rendering, and log buffer utilities
[POS]:    TUI runtime loop and shared helpers
[UPDATE]: When changing TUI layout, keybindings, or runtime controls
*/

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyEventKind};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::fmt::MakeWriter;

use taskdeck_console::notify::NotificationLevel;
use taskdeck_console::status::StatusTone;
use taskdeck_console::{Console, ConsoleEvent};

use super::app::{AppState, Tab};
use super::events::handle_key_event;
use super::terminal::TerminalGuard;
use super::ui::*;

const UI_TICK_INTERVAL: Duration = Duration::from_millis(250);
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);
pub const LOG_BUFFER_CAPACITY: usize = 2000;

pub type LogBufferHandle = Arc<StdMutex<LogBuffer>>;

#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
        }
    }

    pub fn handle(capacity: usize) -> LogBufferHandle {
        Arc::new(StdMutex::new(Self::new(capacity)))
    }

    pub fn push_line(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// Last `count` lines, oldest first
    pub fn tail(&self, count: usize) -> Vec<String> {
        let start = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(start).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// `MakeWriter` that feeds formatted tracing output into a [`LogBuffer`]
#[derive(Clone)]
pub struct LogWriterFactory {
    buffer: LogBufferHandle,
}

impl LogWriterFactory {
    pub fn new(buffer: LogBufferHandle) -> Self {
        Self { buffer }
    }
}

pub struct LogWriter {
    buffer: LogBufferHandle,
    partial: String,
}

impl LogWriter {
    fn push(&self, line: String) {
        if let Ok(mut guard) = self.buffer.lock() {
            guard.push_line(line);
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line = self.partial[..pos].trim_end_matches('\r').to_string();
            self.partial.drain(..=pos);
            self.push(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.partial.is_empty() {
            let line = std::mem::take(&mut self.partial);
            self.push(line);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            buffer: self.buffer.clone(),
            partial: String::new(),
        }
    }
}

enum UiEvent {
    Input(CrosstermEvent),
}

/// Run the console until the operator quits or `shutdown` fires.
pub async fn run_tui(
    console: Console,
    mut console_events: UnboundedReceiver<ConsoleEvent>,
    log_buffer: LogBufferHandle,
    shutdown: CancellationToken,
) -> Result<()> {
    let mut terminal = TerminalGuard::new()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let input_shutdown = CancellationToken::new();
    let input_shutdown_clone = input_shutdown.clone();

    tokio::task::spawn_blocking(move || {
        while !input_shutdown_clone.is_cancelled() {
            if crossterm::event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                if let Ok(event) = crossterm::event::read() {
                    let _ = event_tx.send(UiEvent::Input(event));
                }
            }
        }
    });

    let mut app = AppState::new(console, log_buffer);
    app.console.mount();
    tracing::info!("console mounted");

    let mut tick = tokio::time::interval(UI_TICK_INTERVAL);
    let mut should_quit = false;

    while !should_quit {
        tokio::select! {
            _ = shutdown.cancelled() => {
                should_quit = true;
            }
            _ = tick.tick() => {
                app.console.prune_notifications(Instant::now());
            }
            Some(event) = console_events.recv() => {
                app.console.handle_event(event);
                app.sync_after_event();
            }
            Some(UiEvent::Input(event)) = event_rx.recv() => {
                if let CrosstermEvent::Key(key) = event {
                    if key.kind == KeyEventKind::Press && handle_key_event(&mut app, key) {
                        should_quit = true;
                    }
                }
            }
        }

        terminal.draw(|frame| draw_ui(frame, &mut app))?;
    }

    app.console.unmount();
    input_shutdown.cancel();
    tracing::info!("console unmounted");
    Ok(())
}

fn draw_ui(frame: &mut ratatui::Frame, app: &mut AppState) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(area);

    match app.current_tab {
        Tab::Dashboard => {
            let content = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(4), Constraint::Min(6)])
                .split(layout[0]);
            draw_status_counts(frame, content[0], &app.console);
            draw_task_table(frame, content[1], app);
        }
        Tab::Logs => {
            draw_logs(frame, layout[0], &app.log_buffer);
        }
    }

    draw_tabs(frame, layout[1], app.current_tab);
    draw_footer(frame, layout[2], app);

    if let Some(view) = app.console.history().view() {
        draw_history(frame, centered_rect(area, 70, 60), view);
    }

    if let Some(modal) = app.create_modal.as_ref() {
        modal.draw(frame, centered_rect(area, 60, 60), app.console.create());
    }
}

fn draw_footer(frame: &mut ratatui::Frame, area: Rect, app: &AppState) {
    let key_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let line1 = Line::from(vec![
        Span::styled("[Up/Down]", key_style),
        Span::raw(" Select  "),
        Span::styled("[Enter]", key_style),
        Span::raw(" History  "),
        Span::styled("[s/t]", key_style),
        Span::raw(" Status/Type  "),
        Span::styled("[z]", key_style),
        Span::raw(" Page size  "),
        Span::styled("[n/p]", key_style),
        Span::raw(" Page  "),
        Span::styled("[c]", key_style),
        Span::raw(" Create  "),
        Span::styled("[r]", key_style),
        Span::raw(" Refresh  "),
        Span::styled("[Tab]", key_style),
        Span::raw(" Switch  "),
        Span::styled("[q]", key_style),
        Span::raw(" Quit"),
    ]);

    let line2 = match app.console.notifications().latest() {
        Some(notification) => Line::from(Span::styled(
            notification.message.clone(),
            notification_style(notification.level),
        )),
        None if app.console.list().is_loading() => Line::from("Loading tasks..."),
        None => Line::from("Ready"),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title("Hotkeys");
    let text = Text::from(vec![line1, line2]);
    let widget = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

pub(crate) fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

pub(crate) fn border_style() -> Style {
    Style::default().fg(Color::Magenta)
}

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn tone_style(tone: StatusTone) -> Style {
    let color = match tone {
        StatusTone::Queued => Color::Yellow,
        StatusTone::Running => Color::LightBlue,
        StatusTone::Failed => Color::LightRed,
        StatusTone::Succeeded => Color::LightGreen,
        StatusTone::Neutral => Color::Gray,
    };
    Style::default().fg(color)
}

pub(crate) fn notification_style(level: NotificationLevel) -> Style {
    match level {
        NotificationLevel::Success => Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD),
        NotificationLevel::Error => Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD),
        NotificationLevel::Info => Style::default().fg(Color::Cyan),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_buffer_drops_oldest_lines() {
        let mut buffer = LogBuffer::new(2);
        buffer.push_line("one".to_string());
        buffer.push_line("two".to_string());
        buffer.push_line("three".to_string());

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.tail(10), vec!["two", "three"]);
        assert_eq!(buffer.tail(1), vec!["three"]);
    }

    #[test]
    fn test_log_writer_splits_lines_and_flushes_partial() {
        let handle = LogBuffer::handle(10);
        let factory = LogWriterFactory::new(handle.clone());
        {
            let mut writer = factory.make_writer();
            writer.write_all(b"first\r\nsecond\npart").expect("write");
            assert_eq!(handle.lock().expect("lock").len(), 2);
        }

        let lines = handle.lock().expect("lock").tail(10);
        assert_eq!(lines, vec!["first", "second", "part"]);
    }

    #[test]
    fn test_zero_capacity_buffer_stays_empty() {
        let mut buffer = LogBuffer::new(0);
        buffer.push_line("ignored".to_string());
        assert!(buffer.is_empty());
    }
}
