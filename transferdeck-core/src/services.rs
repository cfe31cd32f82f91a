use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use transferdeck_common::TransferdeckConfig;

use crate::directory::TransferUserDirectory;
use crate::sessions::SessionStore;
use crate::store::FileStore;

/// Shared service bundle handed to every API handler.
#[derive(Clone)]
pub struct Services {
    pub config: Arc<Mutex<TransferdeckConfig>>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub file_store: Arc<dyn FileStore + Send + Sync>,
    pub user_directory: Arc<dyn TransferUserDirectory + Send + Sync>,
}

impl Services {
    pub fn new(
        config: TransferdeckConfig,
        file_store: Arc<dyn FileStore + Send + Sync>,
        user_directory: Arc<dyn TransferUserDirectory + Send + Sync>,
    ) -> Self {
        let sessions = Arc::new(Mutex::new(SessionStore::new(config.store.session_ttl)));

        tokio::spawn({
            let sessions = sessions.clone();
            async move {
                loop {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    sessions.lock().await.vacuum();
                }
            }
        });

        Self {
            config: Arc::new(Mutex::new(config)),
            sessions,
            file_store,
            user_directory,
        }
    }
}
