use std::path::Path;

use cypher_core::CypherConfig;
use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config_in(dir: &Path) -> CypherConfig {
    CypherConfig::new(&dir.join("cypher-notes"))
}
