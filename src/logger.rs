use chrono::Local;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy)]
struct SessionTimer;

impl FormatTime for SessionTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%m%dT%H:%M:%S%.3f"))
    }
}

/// Install stdout logging, plus a plain-text file layer when `log_path` is given.
///
/// Keep the returned guard alive for as long as the file should receive events.
pub fn init(
    log_path: Option<&Path>,
    level: &str,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_timer(SessionTimer)
        .with_writer(std::io::stdout)
        .with_filter(tracing_subscriber::EnvFilter::try_new(level)?);

    let Some(log_path) = log_path else {
        tracing_subscriber::registry().with(stdout_layer).try_init()?;
        return Ok(None);
    };

    let file = std::fs::File::create(log_path)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(SessionTimer)
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(tracing_subscriber::EnvFilter::try_new(level)?),
        )
        .try_init()?;

    Ok(Some(guard))
}
