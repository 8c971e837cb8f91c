use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the process log.
///
/// Default: info for our crates, warn for everything else. Can be overridden
/// with `RUST_LOG`. Safe to call more than once (later calls are no-ops),
/// which keeps tests that touch logging from stepping on each other.
pub fn init(service_name: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,trelay=info,trelay_core=info,{service_name}=info"
        ))
    });

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .try_init();
}
