//! Logging setup

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{BoardError, Result};

/// Install the global subscriber.
///
/// Without a directory, logs go to stderr. With one, they go to a daily
/// rotated `<app_name>.log` file; keep the returned guard alive so buffered
/// lines are flushed on exit. `RUST_LOG` overrides the default `info` level.
pub fn init_logger(log_dir: Option<&Path>, app_name: &str) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, format!("{}.log", app_name));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .try_init()
                .map_err(|e| BoardError::config(format!("logger already set: {}", e)))?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()
                .map_err(|e| BoardError::config(format!("logger already set: {}", e)))?;
            Ok(None)
        }
    }
}
