use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use tracing::*;
use transferdeck_common::{TransferdeckConfig, TransferdeckConfigStore};

pub fn load_config(path: &Path) -> Result<TransferdeckConfig> {
    let store: TransferdeckConfigStore = Config::builder()
        .add_source(File::from(path))
        .add_source(Environment::with_prefix("TRANSFERDECK").separator("__"))
        .build()
        .context("Could not load config")?
        .try_deserialize()
        .context("Could not parse config")?;

    store.validate().context("Invalid config")?;

    let config = TransferdeckConfig {
        paths_relative_to: path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf(),
        store,
    };

    info!(
        "Using config: {path:?} (users: {}, bucket: {}, transfer server: {})",
        config.store.users.len(),
        config.store.aws.bucket,
        config.store.aws.transfer_server_id,
    );
    Ok(config)
}
