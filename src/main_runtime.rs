use predictd::config::LoggingConfig;
use std::path::Path;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{},predictd={},tower_http=info", config.level, config.level))
    });

    let file_layer = config.dir.as_deref().and_then(rolling_file_layer);
    let file_logging_dir = file_layer.as_ref().and(config.dir.as_deref());

    // Console layer
    let console_layer = if config.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = file_logging_dir {
        eprintln!("Logging to: {}/predictd.log", dir.display());
    }
}

/// Daily-rolling file layer, or `None` when `log_dir` is not writable.
fn rolling_file_layer<S>(log_dir: &Path) -> Option<Box<dyn Layer<S> + Send + Sync>>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    // `rolling::daily` panics if it cannot create the first file, so check
    // writability up front.
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        eprintln!(
            "Warning: Could not create log directory {} ({}), file logging disabled",
            log_dir.display(),
            e
        );
        return None;
    }
    let probe = log_dir.join(".predictd_write_test");
    if let Err(e) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&probe)
    {
        eprintln!(
            "Warning: Could not write to log directory {} ({}), file logging disabled",
            log_dir.display(),
            e
        );
        return None;
    }
    let _ = std::fs::remove_file(&probe);

    let file_appender = tracing_appender::rolling::daily(log_dir, "predictd.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Keep the guard alive for the life of the process.
    Box::leak(Box::new(guard));

    Some(
        tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false) // No color codes in file
            .with_target(true)
            .boxed(),
    )
}

pub fn init_logging_simple() {
    // Minimal logging for one-shot commands
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();
}
