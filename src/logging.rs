//! Inicialização do tracing: filtro por `RUST_LOG`, saída em stderr.

use tracing_subscriber::EnvFilter;

/// Instala o subscriber global. `RUST_LOG` tem precedência sobre `verbose`.
pub fn init(verbose: bool) {
    let default = if verbose { "blogsmith=debug" } else { "blogsmith=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
