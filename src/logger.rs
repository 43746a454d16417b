use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// `log` records from the library are bridged into tracing by `init`
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
