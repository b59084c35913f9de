//! Tracing subscriber setup.

use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use seedbed_shared::SeedbedResult;

const DEFAULT_FILTER: &str = "info";
const LOG_FILE_PREFIX: &str = "seedbed.log";

/// Keeps the non-blocking file writer flushing until process exit.
static LOG_GUARD: OnceLock<Option<WorkerGuard>> = OnceLock::new();

/// Install the global subscriber.
///
/// Filtering follows `RUST_LOG`, falling back to `info`. With `log_dir`
/// set, events are also written to a daily rolling file there. Calling
/// this more than once is a no-op; a subscriber installed by someone else
/// is left in place.
pub fn init_logging(log_dir: Option<&Path>) -> SeedbedResult<()> {
    if LOG_GUARD.get().is_some() {
        return Ok(());
    }

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .try_init()
    {
        tracing::debug!(error = %e, "Global subscriber already installed");
    }

    let _ = LOG_GUARD.set(guard);
    Ok(())
}
