use anyhow::{Context, Result};
use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::Targets,
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    prelude::*,
    registry::LookupSpan,
    Layer,
};

/// Target used for the per-network progress lines
pub const PROGRESS_TARGET: &str = "scan_progress";

fn console_filter(verbose: bool) -> Targets {
    let default = if verbose { Level::DEBUG } else { Level::WARN };
    Targets::new()
        .with_target(PROGRESS_TARGET, Level::INFO)
        .with_default(default)
}

/// Install the stderr console logger, plus a DEBUG file log when `log_file` is set.
///
/// The returned guard flushes the file writer on drop and must be held by
/// the caller until exit.
pub fn setup_logger(verbose: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    // stdout may carry the CSV report
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .event_format(TerminalFormatter)
        .with_filter(console_filter(verbose));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(BufWriter::new(file));

            let file_filter = Targets::new().with_default(Level::DEBUG);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .event_format(FileFormatter)
                .with_filter(file_filter);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to set global subscriber")?;

    Ok(guard)
}

// --- Formatters ---

struct MessageVisitor {
    message: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

fn event_message(event: &Event<'_>) -> String {
    let mut visitor = MessageVisitor {
        message: String::new(),
    };
    event.record(&mut visitor);
    visitor.message
}

/// Colour the first `ERROR` or `Found` token of a progress line.
pub fn colorize(msg: &str) -> String {
    if msg.contains("ERROR") {
        let red = Style::new().fg(Color::LightRed).bold();
        msg.replacen("ERROR", &red.paint("ERROR").to_string(), 1)
    } else if msg.contains("Found") {
        let green = Style::new().fg(Color::LightGreen);
        msg.replacen("Found", &green.paint("Found").to_string(), 1)
    } else {
        msg.to_string()
    }
}

pub struct TerminalFormatter;

impl<S, N> FormatEvent<S, N> for TerminalFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let msg = event_message(event);
        let level = *event.metadata().level();

        // Progress lines are printed bare; everything else carries its level
        if event.metadata().target() == PROGRESS_TARGET {
            writeln!(writer, "{}", colorize(&msg))
        } else if level == Level::WARN || level == Level::ERROR {
            let style = Style::new().fg(Color::Yellow);
            writeln!(writer, "{} {}", style.paint(level.as_str()), msg)
        } else {
            writeln!(writer, "{} {}", level, msg)
        }
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let level = event.metadata().level();

        write!(writer, "{} [{}] ", timestamp, level)?;
        writeln!(writer, "{}", event_message(event))
    }
}
