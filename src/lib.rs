pub mod classify;
pub mod driver;
pub mod errors;
pub mod extract;
pub mod fees;
pub mod model;
pub mod registry;
pub mod resolve;
pub mod sandwich;

/// Installs a `tracing` subscriber reading `RUST_LOG`, falling back to
/// `info`. Call once from a binary's `main`; the core never installs a
/// subscriber on its own.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
