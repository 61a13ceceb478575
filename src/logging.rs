use std::{
    io::{self, IsTerminal},
    path::Path,
};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::cli::ColorChoice;

/// Rolled-over log files kept in the log directory.
const MAX_LOG_FILES: usize = 7;

/// Keeps the background file writer alive. Dropping it flushes the log file.
pub struct LogGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Filter used for the console when `RUST_LOG` isn't set.
pub fn console_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "info,libbufferlist=debug",
        2 => "info,libbufferlist=trace",
        _ => "trace",
    }
}

/// Installs the global subscriber. Records sent through the `log` crate are
/// picked up too, so library code only ever needs `log`.
///
/// With `log_dir`, everything down to trace is also written to a file there
/// that rolls over daily.
pub fn init_logging(verbosity: u8, color: ColorChoice, log_dir: Option<&Path>) -> LogGuard {
    let console_env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_filter(verbosity)));

    let use_ansi = match color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stderr().is_terminal(),
    };

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(use_ansi)
        .without_time()
        .with_target(false)
        .with_level(true)
        .with_filter(console_env_filter);

    let mut file_guard = None;

    let file_layer = log_dir.and_then(|dir| {
        if let Err(err) = fs_err::create_dir_all(dir) {
            eprintln!("Warning: could not create log directory: {err}");
            return None;
        }

        let file_appender = match tracing_appender::rolling::Builder::new()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix("bufferlist")
            .filename_suffix("log")
            .max_log_files(MAX_LOG_FILES)
            .build(dir)
        {
            Ok(appender) => appender,
            Err(err) => {
                eprintln!(
                    "Warning: could not open a log file in {}: {err}",
                    dir.display()
                );
                return None;
            }
        };

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        file_guard = Some(guard);

        let layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_timer(UtcTime::rfc_3339())
            .with_target(true)
            .with_level(true)
            .with_filter(LevelFilter::TRACE);

        Some(layer)
    });

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    LogGuard {
        _file_guard: file_guard,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn verbosity_raises_crate_level_first() {
        assert_eq!(console_filter(0), "info");
        assert_eq!(console_filter(1), "info,libbufferlist=debug");
        assert_eq!(console_filter(2), "info,libbufferlist=trace");
        assert_eq!(console_filter(5), "trace");
    }

    #[test]
    fn filters_parse() {
        for verbosity in 0..4 {
            assert!(EnvFilter::try_new(console_filter(verbosity)).is_ok());
        }
    }
}
