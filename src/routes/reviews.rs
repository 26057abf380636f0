use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::reviews::{AddReviewRequest, ReviewWithProduct, UpdateReviewRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Review,
    response::ApiResponse,
    services::review_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(my_reviews)).route(
        "/{id}",
        post(add_review)
            .patch(update_my_review)
            .delete(delete_my_review),
    )
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = AddReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<Review>),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn add_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<AddReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    Ok(Json(
        review_service::add_review(&state, &user, product_id, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    responses(
        (status = 200, description = "Caller's reviews", body = ApiResponse<Vec<ReviewWithProduct>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn my_reviews(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<ReviewWithProduct>>>> {
    Ok(Json(review_service::my_reviews(&state, &user).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<Review>),
        (status = 404, description = "Not the caller's review"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn update_my_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(review_id): Path<Uuid>,
    Json(payload): Json<UpdateReviewRequest>,
) -> AppResult<Json<ApiResponse<Review>>> {
    Ok(Json(
        review_service::update_my_review(&state, &user, review_id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted"),
        (status = 404, description = "Not the caller's review"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn delete_my_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(review_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        review_service::delete_my_review(&state, &user, review_id).await?,
    ))
}
