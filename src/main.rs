use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use deskfolio::{AppError, PortfolioConfig};

const DEFAULT_CONFIG: &str = "deskfolio.toml";

fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("deskfolio=info")),
        )
        .init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = PortfolioConfig::load(&path)?;

    deskfolio::run(config)
}
