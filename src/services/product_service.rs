use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::{
        products::{
            AddOfferRequest, AddPreviewsRequest, AddVariationRequest, CategoryChain,
            CreateProductRequest, DetailView, OfferView, ProductDetail, RemovePreviewRequest,
            ShopPublic, UpdateCategoryRequest, UpdateDetailRequest, UpdatePrimaryRequest,
            UpdateVariationRequest, VariationView,
        },
        reviews::ReviewWithAuthor,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Address, Detail, OFFER_TYPES, Product, Shop, Variation},
    response::{ApiResponse, Meta},
    services::category_service,
    state::AppState,
};

/// The single ownership guard: fetches the product only when the requesting
/// user owns the shop behind it. A missing product and a foreign product are
/// both reported as not-found so the response never leaks existence.
pub async fn ensure_product_owner(
    pool: &DbPool,
    product_id: Uuid,
    user_id: Uuid,
) -> AppResult<Product> {
    let product = sqlx::query_as::<_, Product>(
        r#"
        SELECT p.* FROM products p
        JOIN shops s ON s.id = p.shop_id
        WHERE p.id = $1 AND s.owner_id = $2
        "#,
    )
    .bind(product_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    product.ok_or(AppError::NotFound)
}

fn validate_offer(offer_type: &str, offer_value: Option<i64>) -> AppResult<()> {
    if !OFFER_TYPES.contains(&offer_type) {
        return Err(AppError::BadRequest(format!(
            "offerType must be one of {OFFER_TYPES:?}"
        )));
    }
    if offer_type != "buy_one_get_one" && offer_value.is_none() {
        return Err(AppError::BadRequest(
            "discount and bulk_discount offers require an offer value".into(),
        ));
    }
    Ok(())
}

/// Create a product with its owned detail, optional offer and optional first
/// variation in one transaction: a failure at any step leaves no orphans.
pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    if payload.price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if payload.previews.is_empty() {
        return Err(AppError::BadRequest(
            "at least one preview is required".into(),
        ));
    }
    if let Some(offer_type) = payload.offer_type.as_deref() {
        validate_offer(offer_type, payload.offer_value)?;
    }

    let shop: Option<Shop> = sqlx::query_as("SELECT * FROM shops WHERE owner_id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;
    let shop = shop.ok_or_else(|| AppError::BadRequest("Please add a shop first".into()))?;

    let mut txn = state.pool.begin().await?;

    let category_id = category_service::resolve_leaf_category(
        &mut *txn,
        &payload.category_name,
        &payload.sub_category_name,
    )
    .await?;

    let (detail_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO details (id, material, color, origin, manufacturer, brand, explanation, ships_from, extra_detail)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&payload.material)
    .bind(&payload.color)
    .bind(&payload.origin)
    .bind(&payload.manufacturer)
    .bind(&payload.brand)
    .bind(&payload.explanation)
    .bind(&payload.ships_from)
    .bind(&payload.extra_detail)
    .fetch_one(&mut *txn)
    .await?;

    let offer_id = match payload.offer_type.as_deref() {
        Some(offer_type) => {
            let (id,): (Uuid,) = sqlx::query_as(
                "INSERT INTO offers (id, offer_type, offer_value) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(Uuid::new_v4())
            .bind(offer_type)
            .bind(payload.offer_value)
            .fetch_one(&mut *txn)
            .await?;
            Some(id)
        }
        None => None,
    };

    let product = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products
            (id, name, description, price, delivery_price, in_stock, previews,
             category_id, offer_id, detail_id, shop_id)
        VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.price)
    .bind(payload.delivery_price.unwrap_or(0))
    .bind(&payload.previews)
    .bind(category_id)
    .bind(offer_id)
    .bind(detail_id)
    .bind(shop.id)
    .fetch_one(&mut *txn)
    .await?;

    if let Some(variation) = &payload.variation {
        sqlx::query(
            r#"
            INSERT INTO variations (id, product_id, kind, name, price, previews)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product.id)
        .bind(&variation.kind)
        .bind(&variation.name)
        .bind(variation.price)
        .bind(&variation.previews)
        .execute(&mut *txn)
        .await?;
    }

    txn.commit().await?;

    Ok(ApiResponse::created("Product created successfully", product))
}

#[derive(sqlx::FromRow)]
struct ProductDetailRow {
    id: Uuid,
    name: String,
    description: String,
    price: i64,
    delivery_price: i64,
    in_stock: bool,
    previews: Vec<String>,
    avg_rating: f64,
    offer_type: Option<String>,
    offer_value: Option<i64>,
    category_name: Option<String>,
    parent_category_name: Option<String>,
    material: Option<String>,
    color: Option<String>,
    origin: Option<String>,
    manufacturer: Option<String>,
    brand: Option<String>,
    explanation: Option<String>,
    ships_from: Option<String>,
    extra_detail: Option<serde_json::Value>,
    shop_name: Option<String>,
    shop_address: Option<Json<Address>>,
}

/// Assemble the product page in one joined read plus a variation fetch. The
/// read is pure; the cached average rating is maintained on the review write
/// paths.
pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ProductDetail>> {
    let row = sqlx::query_as::<_, ProductDetailRow>(
        r#"
        SELECT p.id, p.name, p.description, p.price, p.delivery_price, p.in_stock,
               p.previews, p.avg_rating,
               o.offer_type, o.offer_value,
               c.name AS category_name, pc.name AS parent_category_name,
               d.material, d.color, d.origin, d.manufacturer, d.brand,
               d.explanation, d.ships_from, d.extra_detail,
               s.name AS shop_name, s.address AS shop_address
        FROM products p
        LEFT JOIN offers o ON o.id = p.offer_id
        LEFT JOIN categories c ON c.id = p.category_id
        LEFT JOIN categories pc ON pc.id = c.parent_id
        LEFT JOIN details d ON d.id = p.detail_id
        LEFT JOIN shops s ON s.id = p.shop_id
        WHERE p.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&state.pool)
    .await?;
    let row = row.ok_or(AppError::NotFound)?;

    let variations = sqlx::query_as::<_, VariationView>(
        r#"
        SELECT kind, name, price, previews FROM variations
        WHERE product_id = $1 ORDER BY created_at
        "#,
    )
    .bind(id)
    .fetch_all(&state.pool)
    .await?;

    let offer = row.offer_type.map(|offer_type| OfferView {
        offer_type,
        offer_value: row.offer_value,
    });
    let category = row.category_name.map(|name| CategoryChain {
        name,
        parent: row.parent_category_name,
    });
    let details = match (row.manufacturer, row.brand) {
        (Some(manufacturer), Some(brand)) => Some(DetailView {
            material: row.material,
            color: row.color,
            origin: row.origin,
            manufacturer,
            brand,
            explanation: row.explanation,
            ships_from: row.ships_from,
            extra_detail: row.extra_detail,
        }),
        _ => None,
    };
    let shop = match (row.shop_name, row.shop_address) {
        (Some(name), Some(address)) => Some(ShopPublic { name, address }),
        _ => None,
    };

    let detail = ProductDetail {
        id: row.id,
        name: row.name,
        description: row.description,
        price: row.price,
        delivery_price: row.delivery_price,
        in_stock: row.in_stock,
        previews: row.previews,
        avg_rating: row.avg_rating,
        offer,
        category,
        variations,
        shop,
        details,
    };

    Ok(ApiResponse::success("Product found successfully", detail, None))
}

pub async fn update_primary_details(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: UpdatePrimaryRequest,
) -> AppResult<ApiResponse<Product>> {
    if payload.name.is_none()
        && payload.description.is_none()
        && payload.price.is_none()
        && payload.delivery_price.is_none()
    {
        return Err(AppError::BadRequest("At least one field is required".into()));
    }
    if payload.price.is_some_and(|p| p < 0) {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }

    let existing = ensure_product_owner(&state.pool, product_id, user.user_id).await?;

    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET name = $2, description = $3, price = $4, delivery_price = $5
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(product_id)
    .bind(payload.name.unwrap_or(existing.name))
    .bind(payload.description.unwrap_or(existing.description))
    .bind(payload.price.unwrap_or(existing.price))
    .bind(payload.delivery_price.unwrap_or(existing.delivery_price))
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Product updated successfully",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn toggle_stock(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<Product>> {
    let existing = ensure_product_owner(&state.pool, product_id, user.user_id).await?;

    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET in_stock = $2 WHERE id = $1 RETURNING *",
    )
    .bind(product_id)
    .bind(!existing.in_stock)
    .fetch_one(&state.pool)
    .await?;

    let message = if product.in_stock {
        "Product in stock"
    } else {
        "Product out of stock"
    };
    Ok(ApiResponse::success(message, product, None))
}

pub async fn add_previews(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: AddPreviewsRequest,
) -> AppResult<ApiResponse<Product>> {
    if payload.previews.is_empty() {
        return Err(AppError::BadRequest("previews are required".into()));
    }

    ensure_product_owner(&state.pool, product_id, user.user_id).await?;

    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET previews = previews || $2 WHERE id = $1 RETURNING *",
    )
    .bind(product_id)
    .bind(&payload.previews)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success("Product updated successfully", product, None))
}

pub async fn remove_preview(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: RemovePreviewRequest,
) -> AppResult<ApiResponse<Product>> {
    if payload.preview.is_empty() {
        return Err(AppError::BadRequest("preview is required".into()));
    }

    ensure_product_owner(&state.pool, product_id, user.user_id).await?;

    // Only touch the row when the URL is actually present.
    let product = sqlx::query_as::<_, Product>(
        r#"
        UPDATE products SET previews = array_remove(previews, $2)
        WHERE id = $1 AND $2 = ANY(previews)
        RETURNING *
        "#,
    )
    .bind(product_id)
    .bind(&payload.preview)
    .fetch_optional(&state.pool)
    .await?;

    let product = product.ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product updated successfully", product, None))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_product_owner(&state.pool, product_id, user.user_id).await?;

    let mut txn = state.pool.begin().await?;
    let category_id = category_service::resolve_leaf_category(
        &mut *txn,
        &payload.category_name,
        &payload.sub_category_name,
    )
    .await?;

    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET category_id = $2 WHERE id = $1 RETURNING *",
    )
    .bind(product_id)
    .bind(category_id)
    .fetch_one(&mut *txn)
    .await?;
    txn.commit().await?;

    Ok(ApiResponse::success("Category updated successfully", product, None))
}

pub async fn add_variation(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: AddVariationRequest,
) -> AppResult<ApiResponse<Variation>> {
    ensure_product_owner(&state.pool, product_id, user.user_id).await?;

    let variation = sqlx::query_as::<_, Variation>(
        r#"
        INSERT INTO variations (id, product_id, kind, name, price, previews)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(product_id)
    .bind(&payload.kind)
    .bind(&payload.name)
    .bind(payload.price)
    .bind(&payload.previews)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success("Variation added successfully", variation, None))
}

pub async fn update_variation(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    variation_id: Uuid,
    payload: UpdateVariationRequest,
) -> AppResult<ApiResponse<Variation>> {
    if payload.kind.is_none()
        && payload.name.is_none()
        && payload.price.is_none()
        && payload.previews.is_none()
    {
        return Err(AppError::BadRequest("At least one field is required".into()));
    }

    ensure_product_owner(&state.pool, product_id, user.user_id).await?;

    let existing = sqlx::query_as::<_, Variation>(
        "SELECT * FROM variations WHERE id = $1 AND product_id = $2",
    )
    .bind(variation_id)
    .bind(product_id)
    .fetch_optional(&state.pool)
    .await?;
    let existing = existing.ok_or(AppError::NotFound)?;

    // New previews are appended, never replaced.
    let previews = match payload.previews {
        Some(mut extra) => {
            let mut previews = existing.previews;
            previews.append(&mut extra);
            previews
        }
        None => existing.previews,
    };

    let variation = sqlx::query_as::<_, Variation>(
        r#"
        UPDATE variations
        SET kind = $2, name = $3, price = $4, previews = $5
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(variation_id)
    .bind(payload.kind.unwrap_or(existing.kind))
    .bind(payload.name.unwrap_or(existing.name))
    .bind(payload.price.unwrap_or(existing.price))
    .bind(&previews)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success("Variation updated successfully", variation, None))
}

pub async fn delete_variation(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    variation_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_product_owner(&state.pool, product_id, user.user_id).await?;

    let result = sqlx::query("DELETE FROM variations WHERE id = $1 AND product_id = $2")
        .bind(variation_id)
        .bind(product_id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Variation deleted successfully",
        serde_json::json!({}),
        None,
    ))
}

/// Add or replace the product's offer; a replaced offer row is removed so no
/// orphan is left behind.
pub async fn add_offer(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: AddOfferRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    validate_offer(&payload.offer_type, payload.offer_value)?;

    let existing = ensure_product_owner(&state.pool, product_id, user.user_id).await?;

    let mut txn = state.pool.begin().await?;
    let (offer_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO offers (id, offer_type, offer_value) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(&payload.offer_type)
    .bind(payload.offer_value)
    .fetch_one(&mut *txn)
    .await?;

    sqlx::query("UPDATE products SET offer_id = $2 WHERE id = $1")
        .bind(product_id)
        .bind(offer_id)
        .execute(&mut *txn)
        .await?;

    if let Some(old_offer) = existing.offer_id {
        sqlx::query("DELETE FROM offers WHERE id = $1")
            .bind(old_offer)
            .execute(&mut *txn)
            .await?;
    }
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Offer added successfully",
        serde_json::json!({}),
        None,
    ))
}

pub async fn remove_offer(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = ensure_product_owner(&state.pool, product_id, user.user_id).await?;
    let offer_id = existing.offer_id.ok_or(AppError::NotFound)?;

    let mut txn = state.pool.begin().await?;
    sqlx::query("UPDATE products SET offer_id = NULL WHERE id = $1")
        .bind(product_id)
        .execute(&mut *txn)
        .await?;
    sqlx::query("DELETE FROM offers WHERE id = $1")
        .bind(offer_id)
        .execute(&mut *txn)
        .await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Offer removed successfully",
        serde_json::json!({}),
        None,
    ))
}

pub async fn update_detail(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    payload: UpdateDetailRequest,
) -> AppResult<ApiResponse<Detail>> {
    if payload.is_empty() {
        return Err(AppError::BadRequest("At least one field is required".into()));
    }

    let product = ensure_product_owner(&state.pool, product_id, user.user_id).await?;
    let detail_id = product.detail_id.ok_or(AppError::NotFound)?;

    let existing = sqlx::query_as::<_, Detail>("SELECT * FROM details WHERE id = $1")
        .bind(detail_id)
        .fetch_optional(&state.pool)
        .await?;
    let existing = existing.ok_or(AppError::NotFound)?;

    let detail = sqlx::query_as::<_, Detail>(
        r#"
        UPDATE details
        SET material = $2, color = $3, origin = $4, manufacturer = $5,
            brand = $6, explanation = $7, ships_from = $8, extra_detail = $9
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(detail_id)
    .bind(payload.material.or(existing.material))
    .bind(payload.color.or(existing.color))
    .bind(payload.origin.or(existing.origin))
    .bind(payload.manufacturer.unwrap_or(existing.manufacturer))
    .bind(payload.brand.unwrap_or(existing.brand))
    .bind(payload.explanation.or(existing.explanation))
    .bind(payload.ships_from.or(existing.ships_from))
    .bind(payload.extra_detail.or(existing.extra_detail))
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success("Details updated successfully", detail, None))
}

/// Delete the product and its owned detail/offer rows in one transaction;
/// variations and reviews go with it through their foreign keys.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = ensure_product_owner(&state.pool, product_id, user.user_id).await?;

    let mut txn = state.pool.begin().await?;
    sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(product_id)
        .execute(&mut *txn)
        .await?;
    if let Some(detail_id) = existing.detail_id {
        sqlx::query("DELETE FROM details WHERE id = $1")
            .bind(detail_id)
            .execute(&mut *txn)
            .await?;
    }
    if let Some(offer_id) = existing.offer_id {
        sqlx::query("DELETE FROM offers WHERE id = $1")
            .bind(offer_id)
            .execute(&mut *txn)
            .await?;
    }
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Product deleted successfully",
        serde_json::json!({}),
        None,
    ))
}

pub async fn get_reviews(
    state: &AppState,
    product_id: Uuid,
) -> AppResult<ApiResponse<Vec<ReviewWithAuthor>>> {
    let reviews = sqlx::query_as::<_, ReviewWithAuthor>(
        r#"
        SELECT r.id, r.rating, r.content, r.images, r.created_at, u.username, u.avatar
        FROM reviews r
        JOIN users u ON u.id = r.owner_id
        WHERE r.product_id = $1
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(product_id)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success("Reviews found successfully", reviews, None))
}
