use std::{fs::File, io, path::Path, sync::Mutex};

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber.
///
/// Logs go to `log_file` when given. Without one they go to stderr, except in
/// dashboard mode where stderr would tear the alternate screen, so logging is
/// left off.
pub fn init(log_file: Option<&Path>, dashboard: bool) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None if dashboard => return Ok(()),
        None => builder.with_writer(io::stderr).init(),
    }

    tracing::info!(service = env!("CARGO_PKG_NAME"), "logger initialized");
    Ok(())
}
