use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::cart::WishlistView,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::wishlist_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_wishlist).delete(clear_wishlist))
        .route(
            "/{product_id}",
            delete(remove_from_wishlist).post(add_to_wishlist),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/wishlist",
    responses(
        (status = 200, description = "Wishlist with product data", body = ApiResponse<WishlistView>),
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn list_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<WishlistView>>> {
    Ok(Json(wishlist_service::list_wishlist(&state, &user).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/wishlist/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Added (idempotent)"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        wishlist_service::add_to_wishlist(&state, &user, product_id).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/wishlist/{product_id}",
    params(("product_id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Removed from wishlist"),
        (status = 404, description = "Not in wishlist"),
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        wishlist_service::remove_from_wishlist(&state, &user, product_id).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/wishlist",
    responses(
        (status = 200, description = "Wishlist deleted"),
        (status = 404, description = "No wishlist yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Wishlist"
)]
pub async fn clear_wishlist(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(wishlist_service::clear_wishlist(&state, &user).await?))
}
