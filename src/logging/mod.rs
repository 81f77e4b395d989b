mod suppressor;

pub use suppressor::LogSuppressor;

use std::sync::Arc;
use tracing::Level;

/// Installs the global fmt subscriber.
///
/// With a sink, log lines go through it (filtered, appended to its file);
/// otherwise they go to stderr.
pub fn init(verbose: bool, sink: Option<Arc<LogSuppressor>>) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    match sink {
        Some(sink) => builder.with_ansi(false).with_writer(sink).init(),
        None => builder.with_writer(std::io::stderr).init(),
    }
}
