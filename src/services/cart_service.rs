use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    dto::cart::{CartLine, CartView, UpdateQuantityRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    state::AppState,
};

/// Lazily create the user's single cart. The unique user_id column makes the
/// upsert race-free: concurrent first adds converge on one cart.
async fn get_or_create_cart(conn: &mut PgConnection, user_id: Uuid) -> AppResult<Uuid> {
    sqlx::query("INSERT INTO carts (id, user_id) VALUES ($1, $2) ON CONFLICT (user_id) DO NOTHING")
        .bind(Uuid::new_v4())
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    let (cart_id,): (Uuid,) = sqlx::query_as("SELECT id FROM carts WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(cart_id)
}

async fn find_cart(state: &AppState, user_id: Uuid) -> AppResult<Option<Uuid>> {
    let cart: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM carts WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?;
    Ok(cart.map(|(id,)| id))
}

async fn cart_lines(state: &AppState, cart_id: Uuid) -> AppResult<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
        r#"
        SELECT ci.product_id, p.name, p.price, p.previews, ci.quantity
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.cart_id = $1
        ORDER BY ci.created_at
        "#,
    )
    .bind(cart_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(lines)
}

/// Add-or-increment: an existing line item gains quantity 1, a new product
/// starts at quantity 1.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    let product: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&state.pool)
        .await?;
    if product.is_none() {
        return Err(AppError::BadRequest("Product not found".into()));
    }

    let mut conn = state.pool.acquire().await?;
    let cart_id = get_or_create_cart(&mut conn, user.user_id).await?;

    sqlx::query(
        r#"
        INSERT INTO cart_items (id, cart_id, product_id, quantity)
        VALUES ($1, $2, $3, 1)
        ON CONFLICT (cart_id, product_id)
        DO UPDATE SET quantity = cart_items.quantity + 1
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(cart_id)
    .bind(product_id)
    .execute(&mut *conn)
    .await?;
    drop(conn);

    let items = cart_lines(state, cart_id).await?;
    Ok(ApiResponse::success(
        "Product added to cart",
        CartView { items },
        None,
    ))
}

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let items = match find_cart(state, user.user_id).await? {
        Some(cart_id) => cart_lines(state, cart_id).await?,
        None => Vec::new(),
    };
    Ok(ApiResponse::success(
        "Cart fetched successfully",
        CartView { items },
        None,
    ))
}

pub async fn update_quantity(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: UpdateQuantityRequest,
) -> AppResult<ApiResponse<CartView>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".into(),
        ));
    }

    let cart_id = find_cart(state, user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let result = sqlx::query(
        "UPDATE cart_items SET quantity = $3 WHERE cart_id = $1 AND product_id = $2",
    )
    .bind(cart_id)
    .bind(product_id)
    .bind(payload.quantity)
    .execute(&state.pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    let items = cart_lines(state, cart_id).await?;
    Ok(ApiResponse::success(
        "Quantity updated successfully",
        CartView { items },
        None,
    ))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<CartView>> {
    let cart_id = find_cart(state, user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND product_id = $2")
        .bind(cart_id)
        .bind(product_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    let items = cart_lines(state, cart_id).await?;
    Ok(ApiResponse::success(
        "Product removed from cart",
        CartView { items },
        None,
    ))
}

/// Empty the line items; the cart document itself survives.
pub async fn clear_cart(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let cart_id = find_cart(state, user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
        .bind(cart_id)
        .execute(&state.pool)
        .await?;

    Ok(ApiResponse::success(
        "Cart cleared successfully",
        serde_json::json!({}),
        None,
    ))
}
