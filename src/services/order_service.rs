use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderList, OrderWithProducts, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DeliveryDetails, ORDER_STATUSES, Order},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithProducts>> {
    if payload.product_ids.is_empty() {
        return Err(AppError::BadRequest("All fields are required".into()));
    }
    if payload.email.trim().is_empty()
        || payload.username.trim().is_empty()
        || payload.full_name.trim().is_empty()
        || payload.phone.trim().is_empty()
    {
        return Err(AppError::BadRequest("All fields are required".into()));
    }
    if payload.total_price < 0 {
        return Err(AppError::BadRequest("totalPrice must not be negative".into()));
    }
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".into(),
        ));
    }

    let (known,): (i64,) = sqlx::query_as("SELECT count(*) FROM products WHERE id = ANY($1)")
        .bind(&payload.product_ids)
        .fetch_one(&state.pool)
        .await?;
    if known != payload.product_ids.len() as i64 {
        return Err(AppError::BadRequest("Product not found".into()));
    }

    let delivery_details = DeliveryDetails {
        address: payload.address,
        email: payload.email,
        username: payload.username,
        full_name: payload.full_name,
        phone: payload.phone,
    };

    let mut txn = state.pool.begin().await?;
    let order = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (id, buyer_id, total_price, delivery_details, quantity)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(payload.total_price)
    .bind(Json(delivery_details))
    .bind(payload.quantity)
    .fetch_one(&mut *txn)
    .await?;

    for product_id in &payload.product_ids {
        sqlx::query("INSERT INTO order_items (id, order_id, product_id) VALUES ($1, $2, $3)")
            .bind(Uuid::new_v4())
            .bind(order.id)
            .bind(product_id)
            .execute(&mut *txn)
            .await?;
    }
    txn.commit().await?;

    let data = OrderWithProducts {
        order,
        product_ids: payload.product_ids,
    };
    Ok(ApiResponse::created("Order created successfully", data))
}

pub async fn list_my_orders(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderList>> {
    let items = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE buyer_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.user_id)
    .fetch_all(&state.pool)
    .await?;

    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Orders fetched successfully",
        OrderList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<OrderWithProducts>> {
    let order = sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE id = $1 AND buyer_id = $2",
    )
    .bind(order_id)
    .bind(user.user_id)
    .fetch_optional(&state.pool)
    .await?;
    let order = order.ok_or(AppError::NotFound)?;

    let product_ids: Vec<(Uuid,)> =
        sqlx::query_as("SELECT product_id FROM order_items WHERE order_id = $1")
            .bind(order.id)
            .fetch_all(&state.pool)
            .await?;

    let data = OrderWithProducts {
        order,
        product_ids: product_ids.into_iter().map(|(id,)| id).collect(),
    };
    Ok(ApiResponse::success("Order found", data, None))
}

pub async fn update_status(
    state: &AppState,
    order_id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    if !ORDER_STATUSES.contains(&payload.status.as_str()) {
        return Err(AppError::BadRequest(format!(
            "status must be one of {ORDER_STATUSES:?}"
        )));
    }

    let order = sqlx::query_as::<_, Order>(
        "UPDATE orders SET status = $2 WHERE id = $1 RETURNING *",
    )
    .bind(order_id)
    .bind(&payload.status)
    .fetch_optional(&state.pool)
    .await?;
    let order = order.ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Order updated successfully", order, None))
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    order_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1 AND buyer_id = $2")
        .bind(order_id)
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Order deleted successfully",
        serde_json::json!({}),
        None,
    ))
}
