use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use poem_openapi::Object;
use regex::Regex;
use serde::{Deserialize, Serialize};
use transferdeck_common::{Result, Role, Secret, TransferdeckError};

#[allow(clippy::unwrap_used)]
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{3,50}$").unwrap());
#[allow(clippy::unwrap_used)]
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Object)]
pub struct UserTag {
    pub key: String,
    pub value: String,
}

impl UserTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A provisioned SFTP user as reported by the transfer service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Object)]
pub struct TransferUser {
    pub username: String,
    pub arn: Option<String>,
    pub home_directory: Option<String>,
    pub role: Role,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub ssh_public_key_count: u32,
    pub tags: Vec<UserTag>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TransferUser {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }
}

#[derive(Debug, Clone, Deserialize, Object)]
pub struct CreateTransferUser {
    pub username: String,
    #[oai(default)]
    #[serde(default)]
    pub role: Role,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Home directory inside the bucket; defaults to
    /// `/<bucket>/users/<username>` when absent.
    pub home_directory: Option<String>,
    /// Folders the scoped-down session policy will grant access to.
    #[oai(default)]
    #[serde(default)]
    pub allowed_folders: Vec<String>,
    pub ssh_public_key: Option<Secret<String>>,
    #[oai(default)]
    #[serde(default)]
    pub tags: Vec<UserTag>,
}

impl CreateTransferUser {
    pub fn validate(&self) -> Result<()> {
        if !USERNAME_RE.is_match(&self.username) {
            return Err(TransferdeckError::InvalidRequest(
                "username must be 3-50 characters of letters, numbers, underscores, and hyphens"
                    .into(),
            ));
        }
        if let Some(email) = &self.email {
            if !EMAIL_RE.is_match(email) {
                return Err(TransferdeckError::InvalidRequest(
                    "invalid email format".into(),
                ));
            }
        }
        if let Some(home) = &self.home_directory {
            if !home.starts_with('/') {
                return Err(TransferdeckError::InvalidRequest(
                    "home directory must start with '/'".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Object)]
pub struct UpdateTransferUser {
    pub home_directory: Option<String>,
    pub allowed_folders: Option<Vec<String>>,
}

impl UpdateTransferUser {
    pub fn validate(&self) -> Result<()> {
        if let Some(home) = &self.home_directory {
            if !home.starts_with('/') {
                return Err(TransferdeckError::InvalidRequest(
                    "home directory must start with '/'".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn is_noop(&self) -> bool {
        self.home_directory.is_none() && self.allowed_folders.is_none()
    }
}

/// Seam to the managed transfer service's user database. The production
/// implementation provisions AWS Transfer Family users.
#[async_trait]
pub trait TransferUserDirectory {
    async fn list_users(&self) -> Result<Vec<TransferUser>>;

    async fn get_user(&self, username: &str) -> Result<Option<TransferUser>>;

    async fn create_user(&self, request: CreateTransferUser) -> Result<TransferUser>;

    async fn update_user(
        &self,
        username: &str,
        request: UpdateTransferUser,
    ) -> Result<TransferUser>;

    async fn delete_user(&self, username: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateTransferUser {
        CreateTransferUser {
            username: "alice".into(),
            role: Role::User,
            email: Some("alice@example.com".into()),
            first_name: None,
            last_name: None,
            home_directory: None,
            allowed_folders: vec!["users/alice".into()],
            ssh_public_key: None,
            tags: vec![],
        }
    }

    #[test]
    fn accepts_a_wellformed_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn rejects_bad_usernames() {
        for bad in ["", "ab", "has space", "dot.ted"] {
            let mut r = request();
            r.username = bad.into();
            assert!(r.validate().is_err(), "accepted {bad:?}");
        }
        let mut r = request();
        r.username = "x".repeat(51);
        assert!(r.validate().is_err());
    }

    #[test]
    fn rejects_bad_email_and_home_directory() {
        let mut r = request();
        r.email = Some("not-an-email".into());
        assert!(r.validate().is_err());

        let mut r = request();
        r.home_directory = Some("relative/path".into());
        assert!(r.validate().is_err());
        r.home_directory = Some("/bucket/users/alice".into());
        assert!(r.validate().is_ok());
    }

    #[test]
    fn update_noop_detection() {
        assert!(UpdateTransferUser::default().is_noop());
        let update = UpdateTransferUser {
            allowed_folders: Some(vec!["shared".into()]),
            ..Default::default()
        };
        assert!(!update.is_noop());
        assert!(update.validate().is_ok());
    }
}
