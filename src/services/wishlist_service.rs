use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    dto::cart::{WishlistLine, WishlistView},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    state::AppState,
};

async fn get_or_create_wishlist(conn: &mut PgConnection, user_id: Uuid) -> AppResult<Uuid> {
    sqlx::query(
        "INSERT INTO wishlists (id, user_id) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    let (wishlist_id,): (Uuid,) = sqlx::query_as("SELECT id FROM wishlists WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(wishlist_id)
}

async fn find_wishlist(state: &AppState, user_id: Uuid) -> AppResult<Option<Uuid>> {
    let wishlist: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM wishlists WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?;
    Ok(wishlist.map(|(id,)| id))
}

/// Adding an already-present product is a no-op.
pub async fn add_to_wishlist(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let product: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&state.pool)
        .await?;
    if product.is_none() {
        return Err(AppError::NotFound);
    }

    let mut conn = state.pool.acquire().await?;
    let wishlist_id = get_or_create_wishlist(&mut conn, user.user_id).await?;

    sqlx::query(
        r#"
        INSERT INTO wishlist_items (id, wishlist_id, product_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (wishlist_id, product_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(wishlist_id)
    .bind(product_id)
    .execute(&mut *conn)
    .await?;

    Ok(ApiResponse::success(
        "Product added to wishlist",
        serde_json::json!({}),
        None,
    ))
}

pub async fn list_wishlist(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<WishlistView>> {
    let items = match find_wishlist(state, user.user_id).await? {
        Some(wishlist_id) => {
            sqlx::query_as::<_, WishlistLine>(
                r#"
                SELECT wi.product_id, p.name, p.price, p.previews, p.in_stock
                FROM wishlist_items wi
                JOIN products p ON p.id = wi.product_id
                WHERE wi.wishlist_id = $1
                ORDER BY wi.created_at
                "#,
            )
            .bind(wishlist_id)
            .fetch_all(&state.pool)
            .await?
        }
        None => Vec::new(),
    };

    Ok(ApiResponse::success(
        "Wishlist fetched successfully",
        WishlistView { items },
        None,
    ))
}

pub async fn remove_from_wishlist(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let wishlist_id = find_wishlist(state, user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let result =
        sqlx::query("DELETE FROM wishlist_items WHERE wishlist_id = $1 AND product_id = $2")
            .bind(wishlist_id)
            .bind(product_id)
            .execute(&state.pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Product removed from wishlist",
        serde_json::json!({}),
        None,
    ))
}

/// Clearing drops the wishlist document itself; items cascade.
pub async fn clear_wishlist(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM wishlists WHERE user_id = $1")
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Wishlist cleared",
        serde_json::json!({}),
        None,
    ))
}
