use std::sync::Once;

mod add_tests;
mod common;
mod init_tests;
mod remove_tests;

/// Setup tracing for the test suite.
/// This function initializes the tracing subscriber with the environment
/// filter. It uses a `Once` so that the setup is performed only once, even if
/// called from every test.
pub fn setup_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_line_number(true)
            .with_file(true)
            .with_test_writer()
            .init();
    });
}
