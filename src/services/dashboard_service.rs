use uuid::Uuid;

use crate::{
    dto::{orders::OrderList, products::ProductList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, Product},
    response::ApiResponse,
    state::AppState,
};

async fn my_shop_id(state: &AppState, user: &AuthUser) -> AppResult<Uuid> {
    let shop: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM shops WHERE owner_id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;
    shop.map(|(id,)| id).ok_or(AppError::NotFound)
}

pub async fn my_products(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ProductList>> {
    let shop_id = my_shop_id(state, user).await?;

    let items = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE shop_id = $1 ORDER BY created_at DESC",
    )
    .bind(shop_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success("Products found", ProductList { items }, None))
}

/// Orders containing at least one of the caller's shop's products.
pub async fn my_shop_orders(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderList>> {
    let shop_id = my_shop_id(state, user).await?;

    let items = sqlx::query_as::<_, Order>(
        r#"
        SELECT DISTINCT o.*
        FROM orders o
        JOIN order_items oi ON oi.order_id = o.id
        JOIN products p ON p.id = oi.product_id
        WHERE p.shop_id = $1
        ORDER BY o.created_at DESC
        "#,
    )
    .bind(shop_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success("Orders found", OrderList { items }, None))
}
