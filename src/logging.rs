//! Centralized timestamped logging
//!
//! All logs go through `logi!`, `logw!`, or `loge!` so they share one shape:
//!   <timestamp> [TAG][thread] message
//!
//! Info goes to stdout, warnings and errors to stderr. `init` can add an append-mode file
//! sink that receives every line regardless of level.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

static LOG_FILE: OnceLock<Mutex<std::fs::File>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Install the optional file sink. Call once, before the first log line you want captured.
pub fn init(log_file: Option<&Path>) -> std::io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let f = OpenOptions::new().create(true).append(true).open(path)?;
    // A second init keeps the first sink.
    let _ = LOG_FILE.set(Mutex::new(f));
    Ok(())
}

// Local time when the platform lets us read the offset, UTC otherwise.
pub(crate) fn log_timestamp() -> String {
    let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    let fmt = match time::format_description::parse(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]",
    ) {
        Ok(f) => f,
        Err(_) => return "<time-format-error>".to_string(),
    };
    now.format(&fmt).unwrap_or_else(|_| "<time-format-error>".to_string())
}

pub(crate) fn log_thread_name() -> String {
    std::thread::current().name().unwrap_or("main").to_string()
}

pub(crate) fn format_line(timestamp: &str, tag: &str, thread: &str, msg: &str) -> String {
    format!("{timestamp} [{tag}][{thread}] {msg}")
}

pub(crate) fn log_line(level: Level, tag: &str, msg: &str) {
    let line = format_line(&log_timestamp(), tag, &log_thread_name(), msg);

    match level {
        Level::Info => println!("{line}"),
        Level::Warn | Level::Error => eprintln!("{line}"),
    }

    if let Some(m) = LOG_FILE.get() {
        if let Ok(mut f) = m.lock() {
            let _ = writeln!(f, "{line}");
        }
    }
}

/// Info log: printed to stdout
#[macro_export]
macro_rules! logi {
    ($tag:expr, $($arg:tt)*) => {{
        $crate::logging::log_line($crate::logging::Level::Info, $tag, &format!($($arg)*));
    }};
}

/// Warning log: printed to stderr
#[macro_export]
macro_rules! logw {
    ($tag:expr, $($arg:tt)*) => {{
        $crate::logging::log_line($crate::logging::Level::Warn, $tag, &format!($($arg)*));
    }};
}

/// Error log: printed to stderr
#[macro_export]
macro_rules! loge {
    ($tag:expr, $($arg:tt)*) => {{
        $crate::logging::log_line($crate::logging::Level::Error, $tag, &format!($($arg)*));
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_shape() {
        let line = format_line("2026-01-02 03:04:05.678", "RENDER", "main", "shader -> shader3");
        assert_eq!(line, "2026-01-02 03:04:05.678 [RENDER][main] shader -> shader3");
    }

    #[test]
    fn timestamp_has_millisecond_precision() {
        let ts = log_timestamp();
        // YYYY-MM-DD HH:MM:SS.mmm
        assert_eq!(ts.len(), 23, "{ts}");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[19..20], ".");
    }
}
