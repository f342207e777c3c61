use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,shoplist=debug";

fn env_filter() -> EnvFilter {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    EnvFilter::new(filter)
}

/// Initialize logging/tracing for a service.
/// - JSON logs, Cloud Logging friendly
/// - RUST_LOG respected; default to "info,shoplist=debug"
pub fn init(service_name: &str) {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!(service = %service_name, "Observability initialized");
}

/// Compact, test-captured logging. Safe to call from every test; only the
/// first call installs a subscriber.
pub fn try_init_for_tests() {
    let installed = tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().compact().with_test_writer())
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("Test logging initialized");
    }
}
