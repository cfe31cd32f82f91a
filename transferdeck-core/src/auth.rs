use tracing::*;
use transferdeck_common::helpers::hash::verify_password_hash;
use transferdeck_common::{ConsoleUser, Secret, TransferdeckConfigStore};

/// Check a login attempt against the console users in the config store.
/// Returns the matching user on success, `None` on any failure. Hash parse
/// errors count as failures so a corrupted config entry can never log in.
pub fn authenticate(
    config: &TransferdeckConfigStore,
    username: &str,
    password: &Secret<String>,
) -> Option<ConsoleUser> {
    let Some(entry) = config.users.iter().find(|u| u.username == username) else {
        warn!(%username, "Failed login: unknown user");
        return None;
    };

    match verify_password_hash(
        password.expose_secret(),
        entry.password_hash.expose_secret(),
    ) {
        Ok(true) => {
            info!(%username, "Successful login");
            Some(ConsoleUser {
                username: entry.username.clone(),
                role: entry.role,
                email: entry.email.clone(),
                first_name: entry.first_name.clone(),
                last_name: entry.last_name.clone(),
            })
        }
        Ok(false) => {
            warn!(%username, "Failed login: invalid password");
            None
        }
        Err(error) => {
            error!(%username, ?error, "Failed login: could not verify password hash");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use transferdeck_common::helpers::hash::hash_password;
    use transferdeck_common::{AwsConfig, ConsoleUserConfig, HttpConfig, Role};

    use super::*;

    fn config_with_user(username: &str, password: &str, role: Role) -> TransferdeckConfigStore {
        TransferdeckConfigStore {
            users: vec![ConsoleUserConfig {
                username: username.into(),
                password_hash: Secret::new(hash_password(password)),
                role,
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
            presign_ttl: std::time::Duration::from_secs(3600),
            session_ttl: std::time::Duration::from_secs(3600),
            max_upload_size: 1024,
        }
    }

    #[test]
    fn accepts_valid_credentials() {
        let config = config_with_user("admin", "s3cret", Role::Admin);
        let user = authenticate(&config, "admin", &Secret::new("s3cret".into())).unwrap();
        assert_eq!(user.username, "admin");
        assert!(user.role.is_admin());
    }

    #[test]
    fn rejects_bad_password_and_unknown_user() {
        let config = config_with_user("admin", "s3cret", Role::Admin);
        assert!(authenticate(&config, "admin", &Secret::new("nope".into())).is_none());
        assert!(authenticate(&config, "ghost", &Secret::new("s3cret".into())).is_none());
    }

    #[test]
    fn rejects_corrupted_hash() {
        let mut config = config_with_user("admin", "s3cret", Role::Admin);
        config.users[0].password_hash = Secret::new("garbage".into());
        assert!(authenticate(&config, "admin", &Secret::new("s3cret".into())).is_none());
    }
}
