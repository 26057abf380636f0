use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    dto::reviews::{AddReviewRequest, ReviewWithProduct, UpdateReviewRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Review,
    response::ApiResponse,
    state::AppState,
};

/// Keep the product's cached average in step with its reviews. Runs inside
/// the same transaction as the review write; no reviews falls back to the
/// default rating of 5.
async fn recompute_avg_rating(conn: &mut PgConnection, product_id: Uuid) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE products
        SET avg_rating = COALESCE(
            (SELECT AVG(rating) FROM reviews WHERE product_id = $1), 5)
        WHERE id = $1
        "#,
    )
    .bind(product_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

fn validate_rating(rating: i32) -> AppResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::BadRequest(
            "rating must be between 1 and 5".into(),
        ));
    }
    Ok(())
}

pub async fn add_review(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: AddReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    validate_rating(payload.rating)?;
    if payload.content.trim().is_empty() {
        return Err(AppError::BadRequest("All fields are required".into()));
    }

    let product: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&state.pool)
        .await?;
    if product.is_none() {
        return Err(AppError::NotFound);
    }

    let mut txn = state.pool.begin().await?;
    let review = sqlx::query_as::<_, Review>(
        r#"
        INSERT INTO reviews (id, owner_id, product_id, rating, content, images)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(product_id)
    .bind(payload.rating)
    .bind(&payload.content)
    .bind(&payload.images)
    .fetch_one(&mut *txn)
    .await?;

    recompute_avg_rating(&mut txn, product_id).await?;
    txn.commit().await?;

    Ok(ApiResponse::created("Review created successfully", review))
}

pub async fn my_reviews(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<ReviewWithProduct>>> {
    let reviews = sqlx::query_as::<_, ReviewWithProduct>(
        r#"
        SELECT r.id, r.rating, r.content, r.images, r.created_at,
               p.id AS product_id, p.name AS product_name, p.previews AS product_previews
        FROM reviews r
        JOIN products p ON p.id = r.product_id
        WHERE r.owner_id = $1
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success("Reviews found successfully", reviews, None))
}

pub async fn update_my_review(
    state: &AppState,
    user: &AuthUser,
    review_id: Uuid,
    payload: UpdateReviewRequest,
) -> AppResult<ApiResponse<Review>> {
    validate_rating(payload.rating)?;
    if payload.content.trim().is_empty() {
        return Err(AppError::BadRequest("All fields are required".into()));
    }

    let mut txn = state.pool.begin().await?;
    let review = sqlx::query_as::<_, Review>(
        r#"
        UPDATE reviews SET rating = $3, content = $4
        WHERE id = $1 AND owner_id = $2
        RETURNING *
        "#,
    )
    .bind(review_id)
    .bind(user.user_id)
    .bind(payload.rating)
    .bind(&payload.content)
    .fetch_optional(&mut *txn)
    .await?;
    let review = review.ok_or(AppError::NotFound)?;

    recompute_avg_rating(&mut txn, review.product_id).await?;
    txn.commit().await?;

    Ok(ApiResponse::success("Review updated successfully", review, None))
}

pub async fn delete_my_review(
    state: &AppState,
    user: &AuthUser,
    review_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let mut txn = state.pool.begin().await?;
    let deleted: Option<(Uuid,)> = sqlx::query_as(
        "DELETE FROM reviews WHERE id = $1 AND owner_id = $2 RETURNING product_id",
    )
    .bind(review_id)
    .bind(user.user_id)
    .fetch_optional(&mut *txn)
    .await?;
    let (product_id,) = deleted.ok_or(AppError::NotFound)?;

    recompute_avg_rating(&mut txn, product_id).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Review deleted successfully",
        serde_json::json!({}),
        None,
    ))
}
