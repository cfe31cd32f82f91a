use tracing::*;
use transferdeck_common::api::TokenSecurityScheme;
use transferdeck_common::{ConsoleUser, Result, TransferdeckError};
use transferdeck_core::access;
use transferdeck_core::Services;

/// Resolve the bearer token to a live session user or fail with 401.
pub async fn authenticated_user(
    services: &Services,
    token: &TokenSecurityScheme,
) -> Result<ConsoleUser> {
    services
        .sessions
        .lock()
        .await
        .resolve(&token.0.key)
        .ok_or(TransferdeckError::Unauthenticated)
}

pub fn require_admin(user: &ConsoleUser) -> Result<()> {
    if user.role.is_admin() {
        Ok(())
    } else {
        warn!(username=%user.username, "Admin access denied");
        Err(TransferdeckError::PermissionDenied)
    }
}

/// The server-side authorization gate: every file and folder operation goes
/// through here before the store is touched.
pub fn require_folder_access(user: &ConsoleUser, folder_path: &str) -> Result<()> {
    if access::can_access(Some(user), folder_path) {
        Ok(())
    } else {
        warn!(username=%user.username, %folder_path, "Folder access denied");
        Err(TransferdeckError::PermissionDenied)
    }
}
