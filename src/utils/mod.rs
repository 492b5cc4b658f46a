pub mod build_info;

use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

/// Installs the global fmt subscriber. `RUST_LOG` directives are honoured on
/// top of the `ewa_core=info` default. Called once through [`crate::init`].
pub(crate) fn init_tracing() {
    let default_directive = "ewa_core=info"
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    let filter = EnvFilter::from_default_env().add_directive(default_directive);

    // Another subscriber may already be installed by an embedding host.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
