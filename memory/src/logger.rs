//! Tracing initialization: console and optional log file share the same fmt layer format
//! (level, target, span, all fields).

use std::fs::OpenOptions;
use std::io;
use std::sync::Arc;

use tracing_subscriber::{
    fmt::{format::FmtSpan, writer::MakeWriterExt},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Initializes the global tracing subscriber.
///
/// Output goes to stdout and, when `log_file_path` is given, is tee'd into that file
/// (opened in append mode). The level comes from `RUST_LOG` (e.g. `info`, `debug`,
/// `memory_inmemory=trace`); unset means `info`. Load `.env` before calling this or
/// `RUST_LOG` from it will not apply.
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing(log_file_path: Option<&str>) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(true)
        .with_thread_ids(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    let registry = Registry::default().with(env_filter);

    let result = match log_file_path {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let writer = io::stdout.and(Arc::new(file));
            // escape codes would end up in the file
            registry
                .with(fmt_layer.with_ansi(false).with_writer(writer))
                .try_init()
        }
        None => registry.with(fmt_layer.with_writer(io::stdout)).try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to set global subscriber: {}", e))
}
