use crate::{
    abstract_trait::{
        order::service::{DynOrderCommandService, DynOrderQueryService},
        order_item::service::DynOrderItemQueryService,
    },
    domain::{
        requests::order::{CreateOrderRequest, FindAllOrder, UpdateOrderBody},
        response::{
            api::{ApiResponse, ApiResponsePagination},
            order::{OrderResponse, OrderResponseDeleteAt},
            order_item::OrderItemResponse,
        },
    },
    middleware::validate::SimpleValidatedJson,
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use shared::errors::{ErrorResponse, HttpError};
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Order",
    params(FindAllOrder),
    responses(
        (status = 200, description = "List of orders", body = ApiResponsePagination<Vec<OrderResponse>>),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Query(params): Query<FindAllOrder>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_all(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/active",
    tag = "Order",
    params(FindAllOrder),
    responses(
        (status = 200, description = "List of active orders", body = ApiResponsePagination<Vec<OrderResponseDeleteAt>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_active_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Query(params): Query<FindAllOrder>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_active(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/trashed",
    tag = "Order",
    params(FindAllOrder),
    responses(
        (status = 200, description = "List of soft-deleted orders", body = ApiResponsePagination<Vec<OrderResponseDeleteAt>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_trashed_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Query(params): Query<FindAllOrder>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_trashed(&params).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Order",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
pub async fn get_order(
    Extension(service): Extension<DynOrderQueryService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}/items",
    tag = "Order",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Items of the order, trashed ones included", body = ApiResponse<Vec<OrderItemResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_order_items(
    Extension(service): Extension<DynOrderItemQueryService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_order_item_by_order(id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Order",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Merchant, cashier or product not found", body = ErrorResponse),
        (status = 422, description = "Insufficient stock", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_order(
    Extension(service): Extension<DynOrderCommandService>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_order(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    tag = "Order",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = UpdateOrderBody,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Order, item or product not found", body = ErrorResponse),
        (status = 409, description = "Order is trashed or stock changed concurrently", body = ErrorResponse),
        (status = 422, description = "Insufficient stock", body = ErrorResponse)
    )
)]
pub async fn update_order(
    Extension(service): Extension<DynOrderCommandService>,
    Path(id): Path<i32>,
    SimpleValidatedJson(body): SimpleValidatedJson<UpdateOrderBody>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_order(&body.into_request(id)).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/orders/trash/{id}",
    tag = "Order",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order and its items soft-deleted", body = ApiResponse<OrderResponseDeleteAt>),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 409, description = "Order already trashed", body = ErrorResponse)
    )
)]
pub async fn trash_order_handler(
    Extension(service): Extension<DynOrderCommandService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.trashed_order(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/orders/restore/{id}",
    tag = "Order",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order and its items restored", body = ApiResponse<OrderResponseDeleteAt>),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 409, description = "Order is not trashed", body = ErrorResponse)
    )
)]
pub async fn restore_order_handler(
    Extension(service): Extension<DynOrderCommandService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.restore_order(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/orders/delete/{id}",
    tag = "Order",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order and its items permanently deleted", body = ApiResponse<bool>),
        (status = 404, description = "Order not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_order(
    Extension(service): Extension<DynOrderCommandService>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.delete_order_permanent(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/orders/restore-all",
    tag = "Order",
    responses(
        (status = 200, description = "All trashed orders restored", body = ApiResponse<bool>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn restore_all_order_handler(
    Extension(service): Extension<DynOrderCommandService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.restore_all_order().await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/orders/delete-all",
    tag = "Order",
    responses(
        (status = 200, description = "All trashed orders permanently deleted", body = ApiResponse<bool>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn delete_all_order_handler(
    Extension(service): Extension<DynOrderCommandService>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.delete_all_order_permanent().await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn order_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/orders", get(get_orders))
        .route("/api/orders/active", get(get_active_orders))
        .route("/api/orders/trashed", get(get_trashed_orders))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}/items", get(get_order_items))
        .route("/api/orders", post(create_order))
        .route("/api/orders/{id}", put(update_order))
        .route("/api/orders/trash/{id}", delete(trash_order_handler))
        .route("/api/orders/restore/{id}", put(restore_order_handler))
        .route("/api/orders/restore-all", put(restore_all_order_handler))
        .route("/api/orders/delete/{id}", delete(delete_order))
        .route("/api/orders/delete-all", delete(delete_all_order_handler))
        .layer(Extension(app_state.di_container.order_command.clone()))
        .layer(Extension(app_state.di_container.order_query.clone()))
        .layer(Extension(app_state.di_container.order_item_query.clone()))
}
