use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::shops::{CreateShopRequest, ShopWithOwner, UpdateShopRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Shop,
    response::ApiResponse,
    services::shop_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(my_shop)
                .post(create_shop)
                .patch(update_my_shop)
                .delete(delete_shop),
        )
        .route("/{id}", get(get_shop_by_id))
}

#[utoipa::path(
    post,
    path = "/api/v1/shops",
    request_body = CreateShopRequest,
    responses(
        (status = 201, description = "Create shop", body = ApiResponse<Shop>),
        (status = 400, description = "Missing fields or shop exists"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shops"
)]
pub async fn create_shop(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateShopRequest>,
) -> AppResult<Json<ApiResponse<Shop>>> {
    Ok(Json(shop_service::create_shop(&state, &user, payload).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/shops",
    responses(
        (status = 200, description = "Caller's shop", body = ApiResponse<ShopWithOwner>),
        (status = 404, description = "No shop yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shops"
)]
pub async fn my_shop(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ShopWithOwner>>> {
    Ok(Json(shop_service::my_shop(&state, &user).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/shops/{id}",
    params(("id" = Uuid, Path, description = "Shop ID")),
    responses(
        (status = 200, description = "Shop", body = ApiResponse<ShopWithOwner>),
        (status = 404, description = "Shop not found"),
    ),
    tag = "Shops"
)]
pub async fn get_shop_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ShopWithOwner>>> {
    Ok(Json(shop_service::get_shop_by_id(&state, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/shops",
    request_body = UpdateShopRequest,
    responses(
        (status = 200, description = "Updated shop", body = ApiResponse<Shop>),
        (status = 404, description = "No shop yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shops"
)]
pub async fn update_my_shop(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateShopRequest>,
) -> AppResult<Json<ApiResponse<Shop>>> {
    Ok(Json(
        shop_service::update_my_shop(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/shops",
    responses(
        (status = 200, description = "Deleted shop"),
        (status = 404, description = "No shop yet"),
    ),
    security(("bearer_auth" = [])),
    tag = "Shops"
)]
pub async fn delete_shop(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(shop_service::delete_shop(&state, &user).await?))
}
