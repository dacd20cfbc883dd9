use tracing::Level;

#[test]
fn init_enables_engine_logs() {
    bucket_budget::init();

    assert!(tracing::enabled!(target: "bucket_core::month", Level::WARN));
    assert!(tracing::enabled!(target: "bucket_core::timeline", Level::INFO));
    assert!(tracing::enabled!(target: "bucket_config", Level::INFO));
    assert!(tracing::enabled!(target: "bucket_budget::engine", Level::INFO));
}
