use std::error::Error;

use poem::error::ResponseError;
use poem::http::StatusCode;
use poem_openapi::registry::{MetaResponses, Registry};

#[derive(thiserror::Error, Debug)]
pub enum TransferdeckError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("permission denied")]
    PermissionDenied,
    #[error("user {0} not found")]
    UserNotFound(String),
    #[error("object {0} not found")]
    ObjectNotFound(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("storage error: {0}")]
    Storage(Box<dyn Error + Send + Sync>),
    #[error("user directory error: {0}")]
    Directory(Box<dyn Error + Send + Sync>),
    #[error("deserialization failed: {0}")]
    DeserializeJson(#[from] serde_json::Error),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
    #[error(transparent)]
    Other(Box<dyn Error + Send + Sync>),
}

impl ResponseError for TransferdeckError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::UserNotFound(_) | Self::ObjectNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Lets handlers return `Result<_, TransferdeckError>` directly; the
// response comes from the `ResponseError` impl above, so no extra
// responses are documented.
impl poem_openapi::ApiResponse for TransferdeckError {
    fn meta() -> MetaResponses {
        MetaResponses { responses: vec![] }
    }

    fn register(_registry: &mut Registry) {}
}

impl TransferdeckError {
    pub fn other<E: Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Other(Box::new(err))
    }

    pub fn storage<E: Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Storage(Box::new(err))
    }

    pub fn directory<E: Error + Send + Sync + 'static>(err: E) -> Self {
        Self::Directory(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn works_as_an_openapi_handler_error() {
        fn assert_handler_error<E: poem_openapi::ApiResponse + Into<poem::Error>>() {}
        assert_handler_error::<TransferdeckError>();
    }

    #[test]
    fn maps_variants_to_statuses() {
        assert_eq!(
            TransferdeckError::Unauthenticated.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TransferdeckError::PermissionDenied.status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            TransferdeckError::UserNotFound("alice".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TransferdeckError::ObjectNotFound("users/alice/a.txt".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TransferdeckError::InvalidRequest("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TransferdeckError::Anyhow(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
