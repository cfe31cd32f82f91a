use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_transfer::types::{DescribedUser, Tag};
use serde_json::json;
use tracing::*;
use transferdeck_common::{AwsConfig, Result, Role, TransferdeckError};
use transferdeck_core::directory::{
    CreateTransferUser, TransferUser, TransferUserDirectory, UpdateTransferUser, UserTag,
};

/// [`TransferUserDirectory`] over an AWS Transfer Family server.
pub struct TransferFamilyDirectory {
    client: aws_sdk_transfer::Client,
    server_id: String,
    iam_role_arn: String,
    bucket: String,
}

impl TransferFamilyDirectory {
    pub fn new(sdk_config: &SdkConfig, config: &AwsConfig) -> Self {
        Self {
            client: aws_sdk_transfer::Client::new(sdk_config),
            server_id: config.transfer_server_id.clone(),
            iam_role_arn: config.iam_role_arn.clone(),
            bucket: config.bucket.clone(),
        }
    }

    async fn describe_user(&self, username: &str) -> Result<Option<TransferUser>> {
        match self
            .client
            .describe_user()
            .server_id(&self.server_id)
            .user_name(username)
            .send()
            .await
        {
            Ok(response) => Ok(response
                .user()
                .map(|user| into_transfer_user(username, user))),
            Err(error) => {
                let error = error.into_service_error();
                if error.is_resource_not_found_exception() {
                    return Ok(None);
                }
                Err(TransferdeckError::directory(error))
            }
        }
    }

    fn default_home_directory(&self, username: &str) -> String {
        format!("/{}/users/{}", self.bucket, username)
    }

    fn build_tags(&self, request: &CreateTransferUser) -> Result<Vec<Tag>> {
        let mut pairs = vec![
            ("CreatedBy".to_owned(), "Transferdeck".to_owned()),
            ("Role".to_owned(), request.role.as_str().to_owned()),
        ];
        if let Some(email) = &request.email {
            pairs.push(("Email".to_owned(), email.clone()));
        }
        if let Some(first_name) = &request.first_name {
            pairs.push(("FirstName".to_owned(), first_name.clone()));
        }
        if let Some(last_name) = &request.last_name {
            pairs.push(("LastName".to_owned(), last_name.clone()));
        }
        for tag in &request.tags {
            pairs.push((tag.key.clone(), tag.value.clone()));
        }

        pairs
            .into_iter()
            .map(|(key, value)| {
                Tag::builder()
                    .key(key)
                    .value(value)
                    .build()
                    .map_err(TransferdeckError::directory)
            })
            .collect()
    }
}

fn into_transfer_user(username: &str, user: &DescribedUser) -> TransferUser {
    let tags: Vec<UserTag> = user
        .tags()
        .iter()
        .map(|t| UserTag::new(t.key(), t.value()))
        .collect();

    let tag = |key: &str| {
        tags.iter()
            .find(|t| t.key == key)
            .map(|t| t.value.clone())
    };

    let role = tag("Role")
        .and_then(|v| v.parse::<Role>().ok())
        .unwrap_or_default();

    TransferUser {
        username: user.user_name().unwrap_or(username).to_owned(),
        arn: Some(user.arn().to_owned()),
        home_directory: user.home_directory().map(str::to_owned),
        role,
        email: tag("Email"),
        first_name: tag("FirstName"),
        last_name: tag("LastName"),
        ssh_public_key_count: user.ssh_public_keys().len() as u32,
        tags,
        created_at: None,
    }
}

/// Session policy restricting an SFTP user to their allowed folders:
/// object-level read/write/delete under each folder plus a prefix-scoped
/// ListBucket. Returns `None` when no folders are given, which leaves the
/// user with the unrestricted IAM role.
pub fn scoped_session_policy(bucket: &str, allowed_folders: &[String]) -> Option<String> {
    if allowed_folders.is_empty() {
        return None;
    }

    let mut statements = vec![];
    for folder in allowed_folders {
        statements.push(json!({
            "Effect": "Allow",
            "Action": ["s3:GetObject", "s3:PutObject", "s3:DeleteObject"],
            "Resource": format!("arn:aws:s3:::{bucket}/{folder}/*"),
        }));
        statements.push(json!({
            "Effect": "Allow",
            "Action": ["s3:ListBucket"],
            "Resource": format!("arn:aws:s3:::{bucket}"),
            "Condition": {
                "StringLike": {
                    "s3:prefix": format!("{folder}/*"),
                }
            },
        }));
    }

    let policy = json!({
        "Version": "2012-10-17",
        "Statement": statements,
    });

    Some(policy.to_string())
}

#[async_trait]
impl TransferUserDirectory for TransferFamilyDirectory {
    async fn list_users(&self) -> Result<Vec<TransferUser>> {
        debug!(server_id=%self.server_id, "Listing transfer users");

        let mut usernames = vec![];
        let mut next_token: Option<String> = None;
        loop {
            let response = self
                .client
                .list_users()
                .server_id(&self.server_id)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(TransferdeckError::directory)?;

            usernames.extend(
                response
                    .users()
                    .iter()
                    .filter_map(|u| u.user_name().map(str::to_owned)),
            );

            match response.next_token() {
                Some(token) => next_token = Some(token.to_owned()),
                None => break,
            }
        }

        let mut users = vec![];
        for username in usernames {
            if let Some(user) = self.describe_user(&username).await? {
                users.push(user);
            }
        }

        debug!(count = users.len(), "Retrieved transfer users");
        Ok(users)
    }

    async fn get_user(&self, username: &str) -> Result<Option<TransferUser>> {
        self.describe_user(username).await
    }

    async fn create_user(&self, request: CreateTransferUser) -> Result<TransferUser> {
        request.validate()?;
        info!(username=%request.username, "Creating transfer user");

        let home_directory = request
            .home_directory
            .clone()
            .unwrap_or_else(|| self.default_home_directory(&request.username));

        self.client
            .create_user()
            .server_id(&self.server_id)
            .user_name(&request.username)
            .role(&self.iam_role_arn)
            .home_directory(home_directory)
            .set_policy(scoped_session_policy(&self.bucket, &request.allowed_folders))
            .set_tags(Some(self.build_tags(&request)?))
            .send()
            .await
            .map_err(TransferdeckError::directory)?;

        if let Some(public_key) = &request.ssh_public_key {
            // A rejected key should not roll back the user
            if let Err(error) = self
                .client
                .import_ssh_public_key()
                .server_id(&self.server_id)
                .user_name(&request.username)
                .ssh_public_key_body(public_key.expose_secret())
                .send()
                .await
            {
                warn!(username=%request.username, ?error, "Failed to import SSH public key");
            }
        }

        self.describe_user(&request.username)
            .await?
            .ok_or_else(|| TransferdeckError::UserNotFound(request.username.clone()))
    }

    async fn update_user(
        &self,
        username: &str,
        request: UpdateTransferUser,
    ) -> Result<TransferUser> {
        request.validate()?;

        if self.describe_user(username).await?.is_none() {
            return Err(TransferdeckError::UserNotFound(username.to_owned()));
        }

        if !request.is_noop() {
            info!(%username, "Updating transfer user");
            self.client
                .update_user()
                .server_id(&self.server_id)
                .user_name(username)
                .set_home_directory(request.home_directory.clone())
                .set_policy(
                    request
                        .allowed_folders
                        .as_deref()
                        .and_then(|folders| scoped_session_policy(&self.bucket, folders)),
                )
                .send()
                .await
                .map_err(TransferdeckError::directory)?;
        }

        self.describe_user(username)
            .await?
            .ok_or_else(|| TransferdeckError::UserNotFound(username.to_owned()))
    }

    async fn delete_user(&self, username: &str) -> Result<()> {
        if self.describe_user(username).await?.is_none() {
            return Err(TransferdeckError::UserNotFound(username.to_owned()));
        }

        info!(%username, "Deleting transfer user");
        self.client
            .delete_user()
            .server_id(&self.server_id)
            .user_name(username)
            .send()
            .await
            .map_err(TransferdeckError::directory)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_folders_means_no_policy() {
        assert_eq!(scoped_session_policy("bucket", &[]), None);
    }

    #[test]
    fn policy_scopes_objects_and_listing_per_folder() {
        let policy =
            scoped_session_policy("files", &["users/alice".into(), "shared".into()]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&policy).unwrap();

        assert_eq!(parsed["Version"], "2012-10-17");
        let statements = parsed["Statement"].as_array().unwrap();
        assert_eq!(statements.len(), 4);

        assert_eq!(
            statements[0]["Resource"],
            "arn:aws:s3:::files/users/alice/*"
        );
        assert_eq!(
            statements[1]["Condition"]["StringLike"]["s3:prefix"],
            "users/alice/*"
        );
        assert_eq!(statements[2]["Resource"], "arn:aws:s3:::files/shared/*");
        assert_eq!(statements[3]["Action"][0], "s3:ListBucket");
    }
}
