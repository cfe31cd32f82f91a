use poem::web::Data;
use poem_openapi::param::{Path, Query};
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, OpenApi};
use transferdeck_common::api::TokenSecurityScheme;
use transferdeck_common::TransferdeckError;
use transferdeck_core::directory::{CreateTransferUser, TransferUser, UpdateTransferUser};
use transferdeck_core::Services;

use super::common::{authenticated_user, require_admin};

#[derive(ApiResponse)]
enum GetUsersResponse {
    #[oai(status = 200)]
    Ok(Json<Vec<TransferUser>>),
}

#[derive(ApiResponse)]
enum CreateUserResponse {
    #[oai(status = 201)]
    Created(Json<TransferUser>),
}

#[derive(ApiResponse)]
enum GetUserResponse {
    #[oai(status = 200)]
    Ok(Json<TransferUser>),
    #[oai(status = 404)]
    NotFound,
}

#[derive(ApiResponse)]
enum UpdateUserResponse {
    #[oai(status = 200)]
    Ok(Json<TransferUser>),
}

#[derive(ApiResponse)]
enum DeleteUserResponse {
    #[oai(status = 204)]
    Deleted,
}

pub struct ListApi;

#[OpenApi]
impl ListApi {
    #[oai(path = "/users", method = "get", operation_id = "get_users")]
    async fn api_get_all_users(
        &self,
        services: Data<&Services>,
        search: Query<Option<String>>,
        token: TokenSecurityScheme,
    ) -> Result<GetUsersResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;
        require_admin(&user)?;

        let mut users = services.user_directory.list_users().await?;
        if let Some(search) = &*search {
            let needle = search.to_lowercase();
            users.retain(|u| u.username.to_lowercase().contains(&needle));
        }
        users.sort_by(|a, b| a.username.cmp(&b.username));

        Ok(GetUsersResponse::Ok(Json(users)))
    }

    #[oai(path = "/users", method = "post", operation_id = "create_user")]
    async fn api_create_user(
        &self,
        services: Data<&Services>,
        body: Json<CreateTransferUser>,
        token: TokenSecurityScheme,
    ) -> Result<CreateUserResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;
        require_admin(&user)?;

        let created = services.user_directory.create_user(body.0).await?;
        Ok(CreateUserResponse::Created(Json(created)))
    }
}

pub struct DetailApi;

#[OpenApi]
impl DetailApi {
    #[oai(path = "/users/:username", method = "get", operation_id = "get_user")]
    async fn api_get_user(
        &self,
        services: Data<&Services>,
        username: Path<String>,
        token: TokenSecurityScheme,
    ) -> Result<GetUserResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;
        require_admin(&user)?;

        match services.user_directory.get_user(&username).await? {
            Some(found) => Ok(GetUserResponse::Ok(Json(found))),
            None => Ok(GetUserResponse::NotFound),
        }
    }

    #[oai(path = "/users/:username", method = "put", operation_id = "update_user")]
    async fn api_update_user(
        &self,
        services: Data<&Services>,
        username: Path<String>,
        body: Json<UpdateTransferUser>,
        token: TokenSecurityScheme,
    ) -> Result<UpdateUserResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;
        require_admin(&user)?;

        let updated = services.user_directory.update_user(&username, body.0).await?;
        Ok(UpdateUserResponse::Ok(Json(updated)))
    }

    #[oai(
        path = "/users/:username",
        method = "delete",
        operation_id = "delete_user"
    )]
    async fn api_delete_user(
        &self,
        services: Data<&Services>,
        username: Path<String>,
        token: TokenSecurityScheme,
    ) -> Result<DeleteUserResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;
        require_admin(&user)?;

        services.user_directory.delete_user(&username).await?;
        Ok(DeleteUserResponse::Deleted)
    }
}
