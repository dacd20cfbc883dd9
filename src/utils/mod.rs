use std::sync::Once;

use tracing_subscriber::filter::Directive;

static TRACING_INIT: Once = Once::new();

/// Info-level logging for every crate of the workspace.
const DEFAULT_DIRECTIVES: [&str; 3] = ["bucket_budget=info", "bucket_core=info", "bucket_config=info"];

/// Initializes the global tracing subscriber with sensible defaults.
///
/// `RUST_LOG` is honoured; the workspace's own info logs are always enabled.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = DEFAULT_DIRECTIVES
            .iter()
            .filter_map(|directive| directive.parse::<Directive>().ok())
            .fold(EnvFilter::from_default_env(), EnvFilter::add_directive);

        // Another subscriber may already be installed by the host application.
        let _ = fmt().with_env_filter(filter).try_init();
    });
}
