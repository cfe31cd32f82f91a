use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object, OpenApi};
use transferdeck_common::version::transferdeck_version;

pub struct Api;

#[derive(Object)]
struct Info {
    version: String,
}

#[derive(ApiResponse)]
enum InfoResponse {
    #[oai(status = 200)]
    Ok(Json<Info>),
}

#[OpenApi]
impl Api {
    #[oai(path = "/info", method = "get", operation_id = "get_info")]
    async fn api_get_info(&self) -> InfoResponse {
        InfoResponse::Ok(Json(Info {
            version: transferdeck_version().to_owned(),
        }))
    }
}
