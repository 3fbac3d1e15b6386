/*
[INPUT]:  Task rows, history entries, and status counts
[OUTPUT]: Rendered table text or serialized JSON/YAML documents
[POS]:    CLI layer - output formatting
[UPDATE]: When changing column layout or output formats
*/

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use taskdeck_adapter::Task;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use taskdeck_console::counts::StatusCounts;
use taskdeck_console::history::TaskHistoryEntry;
use taskdeck_console::status::status_name;

const NAME_WIDTH: usize = 32;
const DETAILS_WIDTH: usize = 48;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// Task as printed by the CLI, with the status spelled out
#[derive(Debug, Clone, Serialize)]
pub struct TaskRow {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub status: &'static str,
    pub retries: u32,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
            task_type: task.task_type.clone(),
            status: status_name(task.status),
            retries: task.retries,
            description: task.description.clone(),
            parameters: task.payload.parameters.clone(),
        }
    }
}

pub fn render_value<T: Serialize + ?Sized>(format: OutputFormat, value: &T) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).context("encode json"),
        OutputFormat::Yaml => serde_yaml::to_string(value).context("encode yaml"),
        OutputFormat::Table => anyhow::bail!("table output has no generic encoding"),
    }
}

pub fn render_tasks(rows: &[TaskRow]) -> String {
    let body = rows
        .iter()
        .map(|row| {
            vec![
                row.id.to_string(),
                truncate(&row.name, NAME_WIDTH),
                row.task_type.clone(),
                row.status.to_string(),
                row.retries.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    render_table(&["ID", "NAME", "TYPE", "STATUS", "RETRIES"], &body)
}

pub fn render_history(entries: &[TaskHistoryEntry]) -> String {
    let body = entries
        .iter()
        .map(|entry| {
            vec![
                entry.id.to_string(),
                entry.status.clone(),
                entry
                    .created_at
                    .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                truncate(&entry.details, DETAILS_WIDTH),
            ]
        })
        .collect::<Vec<_>>();
    render_table(&["ID", "STATUS", "AT", "DETAILS"], &body)
}

pub fn render_counts(counts: &StatusCounts) -> String {
    let mut body = counts
        .iter()
        .map(|(status, count)| vec![status.to_string(), count.to_string()])
        .collect::<Vec<_>>();
    body.push(vec!["TOTAL".to_string(), counts.total().to_string()]);
    render_table(&["STATUS", "COUNT"], &body)
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.width()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.width());
            }
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|header| header.to_string()).collect();
    push_line(&mut out, &header_cells, &widths);
    for row in rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (index, cell) in cells.iter().enumerate() {
        if index > 0 {
            line.push_str("  ");
        }
        line.push_str(cell);
        let width = widths.get(index).copied().unwrap_or(0);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Cut `text` to at most `max` display columns, marking the cut with `…`
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let width = ch.width().unwrap_or(0);
        if used + width + 1 > max {
            break;
        }
        out.push(ch);
        used += width;
    }
    out.push('…');
    out
}
