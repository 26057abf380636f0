use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::{orders::OrderList, products::ProductList},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::dashboard_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(my_products))
        .route("/orders", get(my_shop_orders))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/products",
    responses(
        (status = 200, description = "Products of the caller's shop", body = ApiResponse<ProductList>),
        (status = 404, description = "No shop yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn my_products(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    Ok(Json(dashboard_service::my_products(&state, &user).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard/orders",
    responses(
        (status = 200, description = "Orders containing the shop's products", body = ApiResponse<OrderList>),
        (status = 404, description = "No shop yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn my_shop_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    Ok(Json(dashboard_service::my_shop_orders(&state, &user).await?))
}
