//! Tracing initialisation. `REQSCAN_LOG` controls the filter, e.g.
//! `REQSCAN_LOG=reqscan_analysis=debug,info`.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global fmt subscriber. Later calls are no-ops.
///
/// `default_filter` is used when `REQSCAN_LOG` is unset; falls back to
/// `info`.
pub fn init_tracing(default_filter: Option<&str>) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("REQSCAN_LOG")
            .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or("info")));
        // Another subscriber may already be installed by the host.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
    });
}
