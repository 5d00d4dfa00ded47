mod order;

use crate::state::AppState;
use anyhow::{Context, Result};
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus_client::encoding::text::encode;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

pub use self::order::order_routes;

#[derive(OpenApi)]
#[openapi(
    paths(
        order::get_orders,
        order::get_active_orders,
        order::get_trashed_orders,
        order::get_order,
        order::get_order_items,
        order::create_order,
        order::update_order,
        order::trash_order_handler,
        order::restore_order_handler,
        order::delete_order,
        order::restore_all_order_handler,
        order::delete_all_order_handler,
    ),
    tags(
        (name = "Order", description = "Order endpoints"),
    )
)]
struct ApiDoc;

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut buffer = String::new();

    if let Err(e) = encode(&mut buffer, &state.registry) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {e}"),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(
            CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        buffer,
    )
        .into_response()
}

pub struct AppRouter;

impl AppRouter {
    pub fn build(shared_state: Arc<AppState>) -> axum::Router {
        let api_router = OpenApiRouter::with_openapi(ApiDoc::openapi())
            .route("/metrics", get(metrics_handler))
            .with_state(shared_state.clone())
            .merge(order_routes(shared_state));

        let (app_router, api) = api_router.split_for_parts();

        app_router.route(
            "/api-docs/openapi.json",
            get(move || async move { Json(api) }),
        )
    }

    pub async fn serve<F>(addr: SocketAddr, app_state: Arc<AppState>, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = Self::build(app_state);

        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        info!("🚀 Server running on http://{}", listener.local_addr()?);
        info!("📖 OpenAPI document: http://{addr}/api-docs/openapi.json");
        info!("📊 Metrics: http://{addr}/metrics");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server failed")?;

        Ok(())
    }
}
