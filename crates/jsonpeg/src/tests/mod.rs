mod left_recursion;
mod property_roundtrip;

/// Installs a test-writer subscriber once; `RUST_LOG=jsonpeg=trace` shows
/// memo and growth events for a failing test.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Test documents spell the backslash as `%` so escape text stays readable.
pub(crate) fn raw(text: &str) -> String {
    text.replace('%', "\\")
}
