use poem::web::Data;
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, OpenApi};
use transferdeck_common::api::TokenSecurityScheme;
use transferdeck_common::TransferdeckError;
use transferdeck_core::access::{self, FolderDescriptor};
use transferdeck_core::store::{CreateFolderRequest, FolderSummary};
use transferdeck_core::Services;

use super::common::{authenticated_user, require_folder_access};

pub struct Api;

#[derive(ApiResponse)]
enum GetFoldersResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<FolderSummary>>),
}

#[derive(ApiResponse)]
enum CreateFolderResponse {
    #[oai(status = 201)]
    Created,
}

#[derive(ApiResponse)]
enum QuickAccessResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<FolderDescriptor>>),
}

#[OpenApi]
impl Api {
    #[oai(path = "/folders", method = "get", operation_id = "get_folders")]
    async fn api_get_folders(
        &self,
        services: Data<&Services>,
        token: TokenSecurityScheme,
    ) -> Result<GetFoldersResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;

        let mut folders = services.file_store.list_folders().await?;
        // Non-admins only see the subtrees they can enter
        folders.retain(|folder| access::can_access(Some(&user), &folder.name));

        Ok(GetFoldersResponse::Ok(Json(folders)))
    }

    #[oai(path = "/folders", method = "post", operation_id = "create_folder")]
    async fn api_create_folder(
        &self,
        services: Data<&Services>,
        body: Json<CreateFolderRequest>,
        token: TokenSecurityScheme,
    ) -> Result<CreateFolderResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;

        let parent = body
            .parent
            .as_deref()
            .map(|p| p.trim_matches('/'))
            .unwrap_or("");
        require_folder_access(&user, parent)?;

        services.file_store.create_folder(&body).await?;
        Ok(CreateFolderResponse::Created)
    }

    #[oai(
        path = "/folders/quick-access",
        method = "get",
        operation_id = "get_quick_access_folders"
    )]
    async fn api_quick_access(
        &self,
        services: Data<&Services>,
        token: TokenSecurityScheme,
    ) -> Result<QuickAccessResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;
        Ok(QuickAccessResponse::Ok(Json(access::accessible_folders(
            Some(&user),
        ))))
    }
}
