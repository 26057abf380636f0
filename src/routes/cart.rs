use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::cart::{CartView, UpdateQuantityRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cart).delete(clear_cart))
        .route(
            "/{product_id}",
            delete(remove_from_cart)
                .post(add_to_cart)
                .patch(update_quantity),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/cart",
    responses(
        (status = 200, description = "Cart line items with product data", body = ApiResponse<CartView>),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn list_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(Json(cart_service::list_cart(&state, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/cart/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Added or incremented", body = ApiResponse<CartView>),
        (status = 400, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(Json(
        cart_service::add_to_cart(&state, &user, product_id).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/cart/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Quantity updated", body = ApiResponse<CartView>),
        (status = 404, description = "No such line item"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(Json(
        cart_service::update_quantity(&state, &user, product_id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cart/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Removed from cart", body = ApiResponse<CartView>),
        (status = 404, description = "No such line item"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    Ok(Json(
        cart_service::remove_from_cart(&state, &user, product_id).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/cart",
    responses(
        (status = 200, description = "Cart emptied; the cart itself survives"),
        (status = 404, description = "No cart yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(cart_service::clear_cart(&state, &user).await?))
}
