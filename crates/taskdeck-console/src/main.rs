/*
[INPUT]:  CLI arguments, optional YAML configuration, environment, OS shutdown signals
[OUTPUT]: Interactive task console or one-shot CLI output
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

mod cli;
mod tui;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use taskdeck_adapter::{TaskService, TaskServiceClient};
use taskdeck_console::{Console, ConsoleConfig};

use crate::cli::Command;
use crate::tui::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory};

#[derive(Parser, Debug)]
#[command(
    name = "taskdeck",
    version,
    about = "Terminal console for the task management service"
)]
struct Cli {
    /// Task service endpoint, overrides the configured one
    #[arg(long, global = true, value_name = "URL")]
    server: Option<String>,
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
    /// Also write daily-rotated log files into this directory
    #[arg(long = "log-dir", global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let command = args.command.unwrap_or(Command::Tui);
    let interactive = matches!(command, Command::Tui);

    let log_buffer = LogBuffer::handle(LOG_BUFFER_CAPACITY);
    let _file_guard = init_tracing(
        &args.log_level,
        args.log_dir.as_deref(),
        interactive.then(|| log_buffer.clone()),
    )?;

    let config = ConsoleConfig::load(args.config_path.as_deref())
        .context("load configuration")?
        .with_server_override(args.server);
    info!(server = %config.server_endpoint, "configuration loaded");

    let client =
        TaskServiceClient::with_config_and_base_url(config.client_config(), &config.server_endpoint)
            .context("create task service client")?;

    if !interactive {
        return cli::run_command(command, &client).await;
    }

    let service: Arc<dyn TaskService> = Arc::new(client);
    let (mut console, events) = Console::new(service, config.sync);
    console.set_on_task_created(Box::new(|task| {
        info!(task_id = task.id, name = %task.name, task_type = %task.task_type, "task created");
    }));

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    tui::run_tui(console, events, log_buffer, shutdown)
        .await
        .context("run terminal console")
}

/// Route logs to the TUI buffer when interactive, stderr otherwise, plus an optional file.
fn init_tracing(
    log_level: &str,
    log_dir: Option<&Path>,
    tui_buffer: Option<LogBufferHandle>,
) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;

    let primary = match tui_buffer {
        Some(buffer) => fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(BoxMakeWriter::new(LogWriterFactory::new(buffer))),
        None => fmt::layer().with_writer(BoxMakeWriter::new(std::io::stderr)),
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "taskdeck.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(primary)
        .with(file_layer)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(guard)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
