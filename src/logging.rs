use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, prelude::*};

/// Renders every event as `2026-02-23 08:00:00.000 - INFO - message`,
/// the same line shape on the file sink and on stdout.
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the global subscriber: one append-only file sink plus stdout.
///
/// The returned guard must be held for the life of the process; dropping it
/// flushes and stops the background writer. Recording is best-effort from
/// then on — a full disk never propagates into the slot pipeline.
pub fn init(log_path: &str) -> Result<WorkerGuard> {
    let path = Path::new(log_path);
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).context("failed to create log directory")?;
    let Some(file_name) = path.file_name() else {
        bail!("invalid log path: {log_path}");
    };

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_fmt::layer()
                .with_ansi(false)
                .event_format(LineFormat)
                .with_writer(non_blocking),
        )
        .with(tracing_fmt::layer().event_format(LineFormat))
        .init();

    Ok(guard)
}
