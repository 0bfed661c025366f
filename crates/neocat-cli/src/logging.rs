use tracing_subscriber::{fmt, EnvFilter};

/// Console logging with RUST_LOG-style filtering; pipeline progress at info
/// by default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("neocat=info,neocat_core=info"));

    fmt().with_env_filter(filter).with_target(false).init();
}
