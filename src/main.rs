//! sanity CLI entry point

fn main() {
    // Structured logging to stderr with an env-based filter. Defaults to warn so the report on stdout stays clean.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    sanity::cli::run();
}
