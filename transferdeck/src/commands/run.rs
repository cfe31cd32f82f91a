use std::net::ToSocketAddrs;
use std::sync::Arc;

use anyhow::Result;
use tracing::*;
use transferdeck_admin::AdminServer;
use transferdeck_aws::{load_sdk_config, S3FileStore, TransferFamilyDirectory};
use transferdeck_core::Services;

use crate::config::load_config;

pub(crate) async fn command(cli: &crate::Cli) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    info!(%version, "Transferdeck");

    let config = load_config(&cli.config)?;
    if !config.store.http.enable {
        anyhow::bail!("The HTTP API is disabled in the config");
    }

    let address = config
        .store
        .http
        .listen
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| anyhow::anyhow!("Failed to resolve the listen address"))?;

    let sdk_config = load_sdk_config(&config.store.aws).await;
    let file_store = Arc::new(S3FileStore::new(
        &sdk_config,
        &config.store.aws,
        config.store.presign_ttl,
        config.store.max_upload_size,
    ));
    let user_directory = Arc::new(TransferFamilyDirectory::new(&sdk_config, &config.store.aws));

    let services = Services::new(config, file_store, user_directory);
    let admin = AdminServer::new(&services);

    tokio::select! {
        result = admin.run(address) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Exiting on Ctrl-C");
            Ok(())
        }
    }
}
