use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    dto::shops::{CreateShopRequest, ShopWithOwner, UpdateShopRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Address, Shop},
    response::ApiResponse,
    state::AppState,
};

pub async fn create_shop(
    state: &AppState,
    user: &AuthUser,
    payload: CreateShopRequest,
) -> AppResult<ApiResponse<Shop>> {
    if payload.name.trim().is_empty()
        || payload.local_address.trim().is_empty()
        || payload.pincode.trim().is_empty()
        || payload.city.trim().is_empty()
        || payload.state.trim().is_empty()
        || payload.country.trim().is_empty()
    {
        return Err(AppError::BadRequest("All fields are required".into()));
    }

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM shops WHERE owner_id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::BadRequest("Shop already exists".into()));
    }

    let address = Address {
        local_address: payload.local_address,
        pincode: payload.pincode,
        city: payload.city,
        state: payload.state,
        country: payload.country,
    };

    let shop = sqlx::query_as::<_, Shop>(
        "INSERT INTO shops (id, name, owner_id, address) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(user.user_id)
    .bind(Json(address))
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::created("Shop created successfully", shop))
}

const SHOP_WITH_OWNER: &str = r#"
    SELECT s.id, s.name, s.address,
           u.username AS owner_username,
           u.full_name AS owner_full_name,
           u.avatar AS owner_avatar
    FROM shops s
    JOIN users u ON u.id = s.owner_id
"#;

pub async fn get_shop_by_id(
    state: &AppState,
    shop_id: Uuid,
) -> AppResult<ApiResponse<ShopWithOwner>> {
    let shop = sqlx::query_as::<_, ShopWithOwner>(&format!("{SHOP_WITH_OWNER} WHERE s.id = $1"))
        .bind(shop_id)
        .fetch_optional(&state.pool)
        .await?;
    let shop = shop.ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Shop found successfully", shop, None))
}

pub async fn my_shop(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<ShopWithOwner>> {
    let shop =
        sqlx::query_as::<_, ShopWithOwner>(&format!("{SHOP_WITH_OWNER} WHERE s.owner_id = $1"))
            .bind(user.user_id)
            .fetch_optional(&state.pool)
            .await?;
    let shop = shop.ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Shop found successfully", shop, None))
}

pub async fn update_my_shop(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateShopRequest,
) -> AppResult<ApiResponse<Shop>> {
    if payload.is_empty() {
        return Err(AppError::BadRequest("At least one field is required".into()));
    }

    let existing: Option<Shop> = sqlx::query_as("SELECT * FROM shops WHERE owner_id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;
    let existing = existing.ok_or(AppError::NotFound)?;

    let mut address = existing.address.0;
    if let Some(local_address) = payload.local_address {
        address.local_address = local_address;
    }
    if let Some(pincode) = payload.pincode {
        address.pincode = pincode;
    }
    if let Some(city) = payload.city {
        address.city = city;
    }
    if let Some(state_name) = payload.state {
        address.state = state_name;
    }
    if let Some(country) = payload.country {
        address.country = country;
    }

    let shop = sqlx::query_as::<_, Shop>(
        "UPDATE shops SET name = $2, address = $3 WHERE id = $1 RETURNING *",
    )
    .bind(existing.id)
    .bind(payload.name.unwrap_or(existing.name))
    .bind(Json(address))
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success("Shop updated successfully", shop, None))
}

pub async fn delete_shop(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM shops WHERE owner_id = $1")
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Shop deleted successfully",
        serde_json::json!({}),
        None,
    ))
}
