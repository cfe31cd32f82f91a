mod api;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use poem::listener::TcpListener;
use poem::{EndpointExt, Route, Server};
use poem_openapi::OpenApiService;
use tracing::*;
use transferdeck_common::version::transferdeck_version;
use transferdeck_core::Services;

pub struct AdminServer {
    services: Services,
}

impl AdminServer {
    pub fn new(services: &Services) -> Self {
        Self {
            services: services.clone(),
        }
    }

    pub async fn run(self, address: SocketAddr) -> Result<()> {
        let api_service = OpenApiService::new(
            api::get(),
            "Transferdeck Admin",
            transferdeck_version(),
        )
        .server("/api");

        let docs = api_service.stoplight_elements();
        let spec = api_service.spec_endpoint();

        let app = Route::new()
            .nest("/api", api_service)
            .nest("/api-docs", docs)
            .nest("/openapi.json", spec)
            .data(self.services);

        info!(?address, "Admin API listening");
        Server::new(TcpListener::bind(address))
            .run(app)
            .await
            .context("Failed to start admin server")
    }
}
