use poem::web::Data;
use poem_openapi::param::Query;
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object, OpenApi};
use transferdeck_common::api::TokenSecurityScheme;
use transferdeck_common::TransferdeckError;
use transferdeck_core::access::governing_folder;
use transferdeck_core::store::{
    normalize_prefix, ListChunk, ListQuery, PresignedUpload, RemoteObject, UploadRequest,
};
use transferdeck_core::Services;

use super::common::{authenticated_user, require_folder_access};

pub struct Api;

#[derive(ApiResponse)]
enum ListFilesResponse {
    #[oai(status = 200)]
    Ok(Json<ListChunk>),
}

#[derive(ApiResponse)]
enum UploadResponse {
    #[oai(status = 201)]
    Created(Json<PresignedUpload>),
}

#[derive(Object)]
struct DownloadUrl {
    url: String,
    key: String,
}

#[derive(ApiResponse)]
enum DownloadResponse {
    #[oai(status = 200)]
    Ok(Json<DownloadUrl>),
}

#[derive(ApiResponse)]
enum ObjectInfoResponse {
    #[oai(status = 200)]
    Ok(Json<RemoteObject>),
}

#[derive(ApiResponse)]
enum DeleteFileResponse {
    #[oai(status = 204)]
    Deleted,
}

#[derive(Object)]
struct MoveRequest {
    source: String,
    destination: String,
}

#[derive(ApiResponse)]
enum MoveResponse {
    #[oai(status = 204)]
    Moved,
}

#[OpenApi]
impl Api {
    #[oai(path = "/files", method = "get", operation_id = "list_files")]
    async fn api_list_files(
        &self,
        services: Data<&Services>,
        prefix: Query<Option<String>>,
        max_keys: Query<Option<usize>>,
        continuation: Query<Option<String>>,
        token: TokenSecurityScheme,
    ) -> Result<ListFilesResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;

        // The slash-terminated prefix keeps the listing inside the folder
        // that was just authorized
        let (folder, prefix) = normalize_prefix(prefix.as_deref());
        require_folder_access(&user, &folder)?;

        let chunk = services
            .file_store
            .list_objects(ListQuery {
                prefix,
                max_keys: max_keys.0,
                continuation: continuation.0.clone(),
            })
            .await?;
        Ok(ListFilesResponse::Ok(Json(chunk)))
    }

    #[oai(path = "/files/upload", method = "post", operation_id = "request_upload")]
    async fn api_request_upload(
        &self,
        services: Data<&Services>,
        body: Json<UploadRequest>,
        token: TokenSecurityScheme,
    ) -> Result<UploadResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;

        let folder = body
            .folder
            .as_deref()
            .map(|f| f.trim_matches('/'))
            .unwrap_or("");
        require_folder_access(&user, folder)?;

        let max_upload_size = services.config.lock().await.store.max_upload_size;
        body.validate(max_upload_size)?;

        let upload = services.file_store.presign_upload(&body).await?;
        Ok(UploadResponse::Created(Json(upload)))
    }

    #[oai(path = "/files/download", method = "get", operation_id = "request_download")]
    async fn api_request_download(
        &self,
        services: Data<&Services>,
        key: Query<String>,
        token: TokenSecurityScheme,
    ) -> Result<DownloadResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;
        require_folder_access(&user, governing_folder(&key))?;

        if services.file_store.head_object(&key).await?.is_none() {
            return Err(TransferdeckError::ObjectNotFound(key.0.clone()));
        }

        let url = services.file_store.presign_download(&key).await?;
        Ok(DownloadResponse::Ok(Json(DownloadUrl {
            url,
            key: key.0.clone(),
        })))
    }

    #[oai(path = "/files/info", method = "get", operation_id = "get_file_info")]
    async fn api_file_info(
        &self,
        services: Data<&Services>,
        key: Query<String>,
        token: TokenSecurityScheme,
    ) -> Result<ObjectInfoResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;
        require_folder_access(&user, governing_folder(&key))?;

        match services.file_store.head_object(&key).await? {
            Some(object) => Ok(ObjectInfoResponse::Ok(Json(object))),
            None => Err(TransferdeckError::ObjectNotFound(key.0.clone())),
        }
    }

    #[oai(path = "/files", method = "delete", operation_id = "delete_file")]
    async fn api_delete_file(
        &self,
        services: Data<&Services>,
        key: Query<String>,
        token: TokenSecurityScheme,
    ) -> Result<DeleteFileResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;
        require_folder_access(&user, governing_folder(&key))?;

        services.file_store.delete_object(&key).await?;
        Ok(DeleteFileResponse::Deleted)
    }

    #[oai(path = "/files/move", method = "post", operation_id = "move_file")]
    async fn api_move_file(
        &self,
        services: Data<&Services>,
        body: Json<MoveRequest>,
        token: TokenSecurityScheme,
    ) -> Result<MoveResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;
        // Both ends of the move must be accessible
        require_folder_access(&user, governing_folder(&body.source))?;
        require_folder_access(&user, governing_folder(&body.destination))?;

        services
            .file_store
            .move_object(&body.source, &body.destination)
            .await?;
        Ok(MoveResponse::Moved)
    }
}
