use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Role, Secret, TransferdeckError};

const BYTES_PER_MB: u64 = 1024 * 1024;

fn _default_true() -> bool {
    true
}

fn _default_listen() -> String {
    "0.0.0.0:8888".to_owned()
}

fn _default_region() -> String {
    "us-east-1".to_owned()
}

fn _default_presign_ttl() -> Duration {
    Duration::from_secs(3600)
}

fn _default_session_ttl() -> Duration {
    Duration::from_secs(3600)
}

fn _default_max_upload_size() -> u64 {
    100 * BYTES_PER_MB
}

/// A console login defined in the config file. `password_hash` is an argon2
/// PHC string produced by `transferdeck hash`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ConsoleUserConfig {
    pub username: String,
    pub password_hash: Secret<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "_default_true")]
    pub enable: bool,

    #[serde(default = "_default_listen")]
    pub listen: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enable: true,
            listen: _default_listen(),
        }
    }
}

/// Handles to the managed AWS services this console administers.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AwsConfig {
    #[serde(default = "_default_region")]
    pub region: String,

    pub bucket: String,

    pub transfer_server_id: String,

    pub iam_role_arn: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TransferdeckConfigStore {
    #[serde(default)]
    pub users: Vec<ConsoleUserConfig>,

    #[serde(default)]
    pub http: HttpConfig,

    pub aws: AwsConfig,

    #[serde(default = "_default_presign_ttl", with = "humantime_serde")]
    pub presign_ttl: Duration,

    #[serde(default = "_default_session_ttl", with = "humantime_serde")]
    pub session_ttl: Duration,

    #[serde(default = "_default_max_upload_size")]
    pub max_upload_size: u64,
}

impl TransferdeckConfigStore {
    /// An empty or blank username would turn the `users/<username>` access
    /// rule degenerate, so it is rejected before the config is accepted.
    pub fn validate(&self) -> crate::Result<()> {
        for (index, user) in self.users.iter().enumerate() {
            if user.username.trim().is_empty() {
                return Err(TransferdeckError::InvalidRequest(format!(
                    "config user #{} has an empty username",
                    index + 1
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TransferdeckConfig {
    pub store: TransferdeckConfigStore,
    pub paths_relative_to: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_username(username: &str) -> TransferdeckConfigStore {
        TransferdeckConfigStore {
            users: vec![ConsoleUserConfig {
                username: username.into(),
                password_hash: Secret::new("$argon2id$stub".into()),
                role: Role::User,
                email: None,
                first_name: None,
                last_name: None,
            }],
            http: HttpConfig::default(),
            aws: AwsConfig {
                region: "us-east-1".into(),
                bucket: "test-bucket".into(),
                transfer_server_id: "s-00000000".into(),
                iam_role_arn: "arn:aws:iam::000000000000:role/test".into(),
            },
            presign_ttl: Duration::from_secs(3600),
            session_ttl: Duration::from_secs(3600),
            max_upload_size: 1024,
        }
    }

    #[test]
    fn rejects_blank_usernames() {
        assert!(store_with_username("alice").validate().is_ok());
        assert!(store_with_username("").validate().is_err());
        assert!(store_with_username("   ").validate().is_err());
    }
}
