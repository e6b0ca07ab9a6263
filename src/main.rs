use std::process::ExitCode;

use sticker_studio::config::StudioConfig;
use sticker_studio::session::Studio;
use sticker_studio::storage::FileStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match StudioConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    let store = match FileStore::open(&config.data_dir) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, "cannot open data directory");
            return ExitCode::FAILURE;
        }
    };

    let mut studio = Studio::new(config, store);
    studio.init().await;

    match studio.export() {
        Ok(path) => {
            tracing::info!(path = %path.display(), "sticker studio done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "export failed");
            ExitCode::FAILURE
        }
    }
}
