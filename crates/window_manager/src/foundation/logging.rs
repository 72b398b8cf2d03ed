//! Logging bootstrap

pub use log::{debug, error, info, trace, warn};

/// Initialize logging from `RUST_LOG`, defaulting to `info`
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Initialize logging for tests, ignoring repeated initialization
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
