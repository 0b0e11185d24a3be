//! Log sink setup.
//!
//! Lines are plain text, one event per line: timestamp, level, message.
//! The subscriber is built over any `MakeWriter` so the destination can be
//! swapped out; the binary points it at an append-only file.

use std::path::Path;

use tracing::Subscriber;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub fn subscriber<W>(writer: W, filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry().with(filter).with(layer)
}

/// Install the global subscriber writing to `log_file`.
///
/// The file is opened in append mode and never rotated. `RUST_LOG` takes
/// precedence over `level`.
pub fn init(log_file: &Path, level: &str) -> Result<(), Box<dyn std::error::Error>> {
    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = match log_file.file_name() {
        Some(name) => name.to_string_lossy().to_string(),
        None => return Err(format!("Log path has no file name: {}", log_file.display()).into()),
    };

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    subscriber(appender, filter).try_init()?;

    Ok(())
}
