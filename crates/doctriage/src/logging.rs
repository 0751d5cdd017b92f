use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber: daily-rotated file output plus terse
/// stderr, filtered by `RUST_LOG` (default `info`).
///
/// `try_init` also installs the bridge for `log` macro calls, so the
/// worker modules' records land in the same subscriber. Keep the
/// returned guard alive for the lifetime of the process; dropping it
/// stops the background file writer.
pub fn init(log_dir: &Path) -> Result<WorkerGuard, TryInitError> {
    let file_appender = tracing_appender::rolling::daily(log_dir, "doctriage.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_succeeds_and_bridges_log_records() {
        let tmp = TempDir::new().unwrap();

        let guard = init(tmp.path());
        assert!(
            guard.is_ok(),
            "first logging init must succeed: {:?}",
            guard.err()
        );

        // Records from both macro families flow through the installed
        // subscriber without a separate bridge step.
        log::info!("log record after init");
        tracing::info!("tracing record after init");
    }
}
