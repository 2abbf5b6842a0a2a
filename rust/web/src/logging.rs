/// Initialize logging for the application.
///
/// Filter defaults to info globally and debug for this crate; override
/// with `RUST_LOG`.
pub fn init_logging() {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,holdem_web=debug"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    // ignore the error when a subscriber is already installed (tests)
    let _ = tracing::subscriber::set_global_default(subscriber);
}
