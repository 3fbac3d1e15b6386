/*
[INPUT]:  Parsed one-shot subcommands and a TaskService handle
[OUTPUT]: Task data printed as table, JSON, or YAML
[POS]:    CLI layer - non-interactive access to the task service
[UPDATE]: When adding subcommands or output fields
*/

mod output;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;
use taskdeck_adapter::{ListTasksRequest, TaskService};

use taskdeck_console::counts::StatusCounts;
use taskdeck_console::create::{CreateForm, created_id};
use taskdeck_console::history::TaskHistoryEntry;
use taskdeck_console::{ConsoleError, StatusFilter, TypeFilter};

pub use output::OutputFormat;
use output::{TaskRow, render_counts, render_history, render_tasks, render_value};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Open the interactive terminal console (default)
    Tui,
    /// List tasks
    List(ListArgs),
    /// Show a single task
    Get {
        #[arg(long, short = 'i')]
        id: i64,
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Show the status history of a task
    History {
        #[arg(long, short = 'i')]
        id: i64,
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Show global per-status counts
    Status {
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Submit a new task
    Create(CreateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[arg(long, short = 'f', default_value_t = 0)]
    pub offset: u64,
    #[arg(long, short = 'l', default_value_t = 100)]
    pub limit: u32,
    /// all, queued, running, failed, succeeded or unknown
    #[arg(long, short = 's', default_value = "all")]
    pub status: StatusFilter,
    #[arg(long = "type", short = 't', default_value = "all")]
    pub task_type: String,
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    pub name: String,
    #[arg(long = "type", short = 't', default_value = taskdeck_adapter::TASK_TYPE_RUN_QUERY)]
    pub task_type: String,
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,
    /// Task parameters as a JSON document
    #[arg(long, default_value = "{}")]
    pub parameters: String,
    /// Single string parameter, repeatable; merged over --parameters
    #[arg(long = "parameter", short = 'p', value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub parameter: Vec<(String, String)>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

/// Fold `-p key=value` pairs into the JSON parameters document.
fn merge_parameters(text: &str, pairs: &[(String, String)]) -> Result<String, ConsoleError> {
    if pairs.is_empty() {
        return Ok(text.to_string());
    }
    let mut document: Value = serde_json::from_str(text).map_err(|err| {
        ConsoleError::Validation(format!("parameters must be valid JSON: {err}"))
    })?;
    let Some(object) = document.as_object_mut() else {
        return Err(ConsoleError::Validation(
            "key=value parameters need --parameters to be a JSON object".to_string(),
        ));
    };
    for (key, value) in pairs {
        object.insert(key.clone(), Value::String(value.clone()));
    }
    Ok(document.to_string())
}

pub async fn run_command(command: Command, service: &dyn TaskService) -> Result<()> {
    match command {
        Command::Tui => anyhow::bail!("the tui command is interactive and runs from main"),
        Command::List(args) => {
            let type_filter = TypeFilter::from(args.task_type.as_str());
            let request = ListTasksRequest::new(
                args.limit,
                args.offset,
                args.status.status(),
                type_filter.task_type(),
            );
            let list = service.list_tasks(request).await.context("list tasks")?;
            let rows: Vec<TaskRow> = list.tasks.iter().map(TaskRow::from).collect();
            print_rows(args.output, &rows, render_tasks)
        }
        Command::Get { id, output } => {
            let task = service.get_task(id).await.with_context(|| format!("get task {id}"))?;
            print_rows(output, &[TaskRow::from(&task)], render_tasks)
        }
        Command::History { id, output } => {
            let response = service
                .get_task_history(id)
                .await
                .with_context(|| format!("get history of task {id}"))?;
            let entries: Vec<TaskHistoryEntry> = response
                .history
                .into_iter()
                .map(TaskHistoryEntry::from)
                .collect();
            print_rows(output, &entries, render_history)
        }
        Command::Status { output } => {
            let response = service.get_status().await.context("get status counts")?;
            let counts = StatusCounts::from_codes(&response.status_counts);
            match output {
                OutputFormat::Table => {
                    print!("{}", render_counts(&counts));
                    Ok(())
                }
                format => {
                    println!("{}", render_value(format, &counts)?);
                    Ok(())
                }
            }
        }
        Command::Create(args) => {
            let form = CreateForm {
                name: args.name,
                description: args.description,
                task_type: args.task_type,
                parameters_text: merge_parameters(&args.parameters, &args.parameter)?,
            };
            let spec = form.validate()?;
            let response = service
                .create_task(spec.to_request())
                .await
                .context("create task")?;
            let id = created_id(&response)?;
            tracing::info!(task_id = id, "task created");
            println!("{} task {}", style("created").green().bold(), id);
            Ok(())
        }
    }
}

fn print_rows<T, F>(format: OutputFormat, rows: &[T], render_table: F) -> Result<()>
where
    T: serde::Serialize,
    F: Fn(&[T]) -> String,
{
    match format {
        OutputFormat::Table => print!("{}", render_table(rows)),
        format => println!("{}", render_value(format, rows)?),
    }
    Ok(())
}
