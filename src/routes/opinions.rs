use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::opinions::{OpinionList, OpinionRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Opinion,
    response::ApiResponse,
    services::opinion_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{review_id}",
        get(helpful_opinions)
            .post(create_opinion)
            .delete(remove_opinion),
    )
}

#[utoipa::path(
    post,
    path = "/api/v1/opinions/{review_id}",
    params(("review_id" = Uuid, Path, description = "Review ID")),
    request_body = OpinionRequest,
    responses(
        (status = 201, description = "Opinion created or updated in place", body = ApiResponse<Opinion>),
        (status = 404, description = "Review not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Opinions"
)]
pub async fn create_opinion(
    State(state): State<AppState>,
    user: AuthUser,
    Path(review_id): Path<Uuid>,
    Json(payload): Json<OpinionRequest>,
) -> AppResult<Json<ApiResponse<Opinion>>> {
    Ok(Json(
        opinion_service::create_opinion(&state, &user, review_id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/opinions/{review_id}",
    params(("review_id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Opinion removed"),
        (status = 404, description = "No opinion to remove"),
    ),
    security(("bearer_auth" = [])),
    tag = "Opinions"
)]
pub async fn remove_opinion(
    State(state): State<AppState>,
    user: AuthUser,
    Path(review_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        opinion_service::remove_opinion(&state, &user, review_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/opinions/{review_id}",
    params(("review_id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Helpful opinions for a review", body = ApiResponse<OpinionList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Opinions"
)]
pub async fn helpful_opinions(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(review_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OpinionList>>> {
    Ok(Json(
        opinion_service::helpful_opinions(&state, review_id).await?,
    ))
}
