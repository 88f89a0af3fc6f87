// ABOUTME: Command handlers for the strato binary.
// ABOUTME: Shared config loading, platform construction, and interrupt wiring.

mod deploy;
mod release;
mod status;

pub use deploy::deploy;
pub use release::release;
pub use status::status;

use strato::cancel::CancelToken;
use strato::config::Config;
use strato::error::Result;
use strato::platform::HttpPlatform;

/// Discover the config in the working directory and apply destination
/// overrides if requested.
pub fn load_config(destination: Option<&str>) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    let config = Config::discover(&cwd)?;

    match destination {
        Some(dest) => config.for_destination(dest),
        None => Ok(config),
    }
}

/// Build the platform client for the configured endpoint and scope.
pub(crate) fn platform_for(config: &Config) -> HttpPlatform {
    HttpPlatform::new(
        config.platform.endpoint.clone(),
        config.project.clone(),
        config.region.clone(),
    )
}

/// A token that fires on Ctrl-C, so in-flight polling waits return
/// `Cancelled` instead of dying with the process.
pub(crate) fn cancel_on_interrupt() -> CancelToken {
    let token = CancelToken::new();
    let signal = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling");
            signal.cancel();
        }
    });
    token
}
