use poem::web::Data;
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object, OpenApi};
use transferdeck_common::api::TokenSecurityScheme;
use transferdeck_common::TransferdeckError;
use transferdeck_core::Services;

use super::common::authenticated_user;

pub struct Api;

#[derive(Object)]
struct DashboardStats {
    total_users: u64,
    admin_users: u64,
    total_folders: u64,
    total_objects: u64,
    total_size: u64,
}

#[derive(ApiResponse)]
enum StatsResponse {
    #[oai(status = 200)]
    Ok(Json<DashboardStats>),
}

#[OpenApi]
impl Api {
    #[oai(path = "/dashboard/stats", method = "get", operation_id = "get_dashboard_stats")]
    async fn api_dashboard_stats(
        &self,
        services: Data<&Services>,
        token: TokenSecurityScheme,
    ) -> Result<StatsResponse, TransferdeckError> {
        let _user = authenticated_user(&services, &token).await?;

        let users = services.user_directory.list_users().await?;
        let folders = services.file_store.list_folders().await?;

        let stats = DashboardStats {
            total_users: users.len() as u64,
            admin_users: users.iter().filter(|u| u.role.is_admin()).count() as u64,
            total_folders: folders.len() as u64,
            total_objects: folders.iter().map(|f| f.object_count).sum(),
            total_size: folders.iter().map(|f| f.total_size).sum(),
        };

        Ok(StatsResponse::Ok(Json(stats)))
    }
}
