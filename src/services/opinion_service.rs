use uuid::Uuid;

use crate::{
    dto::opinions::{OpinionList, OpinionRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{OPINION_VALUES, Opinion},
    response::ApiResponse,
    state::AppState,
};

/// One opinion per (review, owner): the UNIQUE constraint turns a repeat
/// submission into an in-place update.
pub async fn create_opinion(
    state: &AppState,
    user: &AuthUser,
    review_id: Uuid,
    payload: OpinionRequest,
) -> AppResult<ApiResponse<Opinion>> {
    if !OPINION_VALUES.contains(&payload.opinion.as_str()) {
        return Err(AppError::BadRequest(format!(
            "opinion must be one of {OPINION_VALUES:?}"
        )));
    }

    let review: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM reviews WHERE id = $1")
        .bind(review_id)
        .fetch_optional(&state.pool)
        .await?;
    if review.is_none() {
        return Err(AppError::NotFound);
    }

    let opinion = sqlx::query_as::<_, Opinion>(
        r#"
        INSERT INTO opinions (id, review_id, owner_id, opinion)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (review_id, owner_id) DO UPDATE SET opinion = EXCLUDED.opinion
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(review_id)
    .bind(user.user_id)
    .bind(&payload.opinion)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::created("Opinion created successfully", opinion))
}

pub async fn remove_opinion(
    state: &AppState,
    user: &AuthUser,
    review_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM opinions WHERE review_id = $1 AND owner_id = $2")
        .bind(review_id)
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Opinion removed successfully",
        serde_json::json!({}),
        None,
    ))
}

pub async fn helpful_opinions(
    state: &AppState,
    review_id: Uuid,
) -> AppResult<ApiResponse<OpinionList>> {
    let items = sqlx::query_as::<_, Opinion>(
        "SELECT * FROM opinions WHERE review_id = $1 AND opinion = 'helpful'",
    )
    .bind(review_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Opinions found successfully",
        OpinionList { items },
        None,
    ))
}
