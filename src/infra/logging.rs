//! Tracing subscriber setup shared by the binaries.

use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber. `RUST_LOG` overrides the default `desci_registry=info`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("desci_registry=info,api_server=info,preflight=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
