/// Initialize structured logging with tracing.
/// Hosts call this once at startup; a second call only reports that a
/// subscriber is already installed.
pub fn init_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr)
                .json()
        );

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[Logging] subscriber already installed: {}", e);
        return;
    }

    tracing::info!("Structured logging initialized");
}
