use poem_openapi::OpenApi;

pub mod auth;
mod common;
pub mod dashboard;
pub mod files;
pub mod folders;
pub mod info;
pub mod users;

pub fn get() -> impl OpenApi {
    (
        auth::Api,
        users::ListApi,
        users::DetailApi,
        files::Api,
        folders::Api,
        dashboard::Api,
        info::Api,
    )
}
