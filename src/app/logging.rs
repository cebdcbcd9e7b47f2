//! Usage: Process-wide tracing setup (stderr fmt + optional rolling file logs).

use crate::shared::error::AppResult;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. The returned guard must live until
/// shutdown so buffered file records get flushed.
pub(crate) fn init(log_dir: Option<&Path>) -> AppResult<Option<WorkerGuard>> {
    // Bridge log-crate records from dependencies; harmless if already set.
    let _ = tracing_log::LogTracer::init();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let Some(dir) = log_dir else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .try_init()
            .map_err(|e| format!("SYSTEM_ERROR: tracing init failed: {e}"))?;
        return Ok(None);
    };

    std::fs::create_dir_all(dir)
        .map_err(|e| format!("SYSTEM_ERROR: failed to create log dir: {e}"))?;
    let appender = tracing_appender::rolling::daily(dir, "connector.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| format!("SYSTEM_ERROR: tracing init failed: {e}"))?;

    Ok(Some(guard))
}
