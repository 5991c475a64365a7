use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "dwellwell=info";

/// Install a stderr subscriber so stdout stays free for JSON output.
///
/// `RUST_LOG` overrides the default `dwellwell=info` filter. Calling this twice
/// is harmless; the second install is ignored.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init();

    if installed.is_ok() {
        tracing::debug!("logging initialized");
    }
}
