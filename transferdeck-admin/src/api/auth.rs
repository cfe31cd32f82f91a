use poem::web::Data;
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object, OpenApi};
use transferdeck_common::api::TokenSecurityScheme;
use transferdeck_common::{ConsoleUser, Secret, TransferdeckError};
use transferdeck_core::{auth, Services};

use super::common::authenticated_user;

pub struct Api;

#[derive(Object)]
struct LoginRequest {
    username: String,
    password: Secret<String>,
}

#[derive(Object)]
struct LoginResponseData {
    token: Secret<String>,
    user: ConsoleUser,
}

#[derive(ApiResponse)]
enum LoginResponse {
    #[oai(status = 201)]
    Success(Json<LoginResponseData>),

    #[oai(status = 401)]
    Failure,
}

#[derive(ApiResponse)]
enum LogoutResponse {
    #[oai(status = 201)]
    Success,
}

#[derive(ApiResponse)]
enum MeResponse {
    #[oai(status = 200)]
    Ok(Json<ConsoleUser>),
}

#[OpenApi]
impl Api {
    #[oai(path = "/auth/login", method = "post", operation_id = "login")]
    async fn api_auth_login(
        &self,
        services: Data<&Services>,
        body: Json<LoginRequest>,
    ) -> Result<LoginResponse, TransferdeckError> {
        let config = services.config.lock().await;
        let Some(user) = auth::authenticate(&config.store, &body.username, &body.password) else {
            return Ok(LoginResponse::Failure);
        };
        drop(config);

        let token = services.sessions.lock().await.issue(user.clone());
        Ok(LoginResponse::Success(Json(LoginResponseData {
            token,
            user,
        })))
    }

    #[oai(path = "/auth/logout", method = "post", operation_id = "logout")]
    async fn api_auth_logout(
        &self,
        services: Data<&Services>,
        token: TokenSecurityScheme,
    ) -> Result<LogoutResponse, TransferdeckError> {
        services.sessions.lock().await.revoke(&token.0.key);
        Ok(LogoutResponse::Success)
    }

    #[oai(path = "/auth/me", method = "get", operation_id = "get_current_user")]
    async fn api_auth_me(
        &self,
        services: Data<&Services>,
        token: TokenSecurityScheme,
    ) -> Result<MeResponse, TransferdeckError> {
        let user = authenticated_user(&services, &token).await?;
        Ok(MeResponse::Ok(Json(user)))
    }
}
