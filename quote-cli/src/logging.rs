//! Tracing setup for the `quote` binary.
//!
//! One global filter (reloadable with the `log <level>` command) sits in
//! front of two layers: stderr, which can be muted at runtime, and an
//! optional append-only log file.

use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::{FmtContext, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, reload};

use crate::config::LoggingConfig;

const DIM: &str = "\x1b[2m";
const CYAN: &str = "\x1b[36m";
const RESET: &str = "\x1b[0m";

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[1;32m",
        Level::DEBUG => "\x1b[1;34m",
        Level::TRACE => "\x1b[1;35m",
    }
}

/// `12:04:31.107  WARN quote_core::wizard::draft: discarding unreadable draft`
struct LineFormat;

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
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let time = Local::now().format("%H:%M:%S%.3f");

        if writer.has_ansi_escapes() {
            write!(
                writer,
                "{DIM}{time}{RESET} {}{:>5}{RESET} {CYAN}{}{RESET}: ",
                level_color(meta.level()),
                meta.level(),
                meta.target()
            )?;
        } else {
            write!(writer, "{time} {:>5} {}: ", meta.level(), meta.target())?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Log file target that can be opened after the subscriber is installed.
/// Records are dropped while it is empty.
#[derive(Clone, Default)]
struct LogFile(Arc<Mutex<Option<File>>>);

impl LogFile {
    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct LogFileWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for LogFileWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match self.0.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.0.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter(self.lock())
    }
}

type Reloader<T> = Box<dyn Fn(T) -> Result<()> + Send + Sync>;

/// Runtime handles kept after initialization.
struct LogControl {
    filter: Reloader<EnvFilter>,
    console: Reloader<bool>,
    file: LogFile,
}

static CONTROL: OnceLock<LogControl> = OnceLock::new();

fn control() -> Result<&'static LogControl> {
    CONTROL.get().context("logging is not initialized")
}

/// Parses a bare level (`debug`) or a full directive
/// (`quote_core=trace,warn`).
pub fn parse_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| anyhow!("invalid log level '{directive}': {e}"))
}

fn console_gate(enabled: bool) -> EnvFilter {
    EnvFilter::new(if enabled { "trace" } else { "off" })
}

/// Replaces the global filter.
pub fn set_log_level(directive: &str) -> Result<()> {
    let filter = parse_filter(directive)?;
    (control()?.filter)(filter)
}

/// Mutes or unmutes stderr output. The log file is unaffected.
pub fn set_console_enabled(enabled: bool) -> Result<()> {
    (control()?.console)(enabled)
}

/// Appends log records to `path` from now on, replacing any open file.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let control = control()?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;
    *control.file.lock() = Some(file);
    Ok(())
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `config.level`. A second call leaves the first subscriber in place.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let initial = EnvFilter::try_from_default_env().or_else(|_| parse_filter(&config.level))?;
    let (filter, filter_handle) = reload::Layer::new(initial);
    let (gate, gate_handle) = reload::Layer::new(console_gate(config.console));
    let file = LogFile::default();

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_filter(gate);
    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_ansi(false)
        .with_writer(file.clone());

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();
    if !installed {
        return Ok(());
    }

    let _ = CONTROL.set(LogControl {
        filter: Box::new(move |filter| {
            filter_handle
                .reload(filter)
                .map_err(|e| anyhow!("filter reload failed: {e}"))
        }),
        console: Box::new(move |enabled| {
            gate_handle
                .reload(console_gate(enabled))
                .map_err(|e| anyhow!("console reload failed: {e}"))
        }),
        file,
    });

    if let Some(path) = &config.file {
        enable_file_logging(path)?;
    }
    Ok(())
}
