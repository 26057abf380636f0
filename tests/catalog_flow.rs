mod common;

use axum_marketplace_api::{
    dto::{
        products::{AddVariationRequest, CreateProductRequest},
        reviews::AddReviewRequest,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::Product,
    routes::params::{AutocompleteQuery, ProductQuery},
    services::{catalog_service, category_service, product_service, review_service},
    state::AppState,
};
use uuid::Uuid;

fn product_query(q: Option<String>) -> ProductQuery {
    ProductQuery {
        page: None,
        per_page: None,
        q,
        category: None,
        brand: None,
        min_price: None,
        max_price: None,
        min_rating: None,
        in_stock: None,
        sort_by: None,
        sort_order: None,
    }
}

async fn make_product(
    state: &AppState,
    user: &AuthUser,
    name: &str,
    price: i64,
    category: &str,
    sub_category: &str,
    brand: &str,
) -> anyhow::Result<Product> {
    let response = product_service::create_product(
        state,
        user,
        CreateProductRequest {
            name: name.into(),
            description: format!("{name} description"),
            price,
            delivery_price: None,
            previews: vec!["https://images.example.com/preview.jpg".into()],
            material: "steel".into(),
            color: "black".into(),
            origin: "Testland".into(),
            manufacturer: brand.into(),
            brand: brand.into(),
            explanation: "test product".into(),
            ships_from: None,
            extra_detail: None,
            variation: None,
            offer_type: None,
            offer_value: None,
            category_name: category.into(),
            sub_category_name: sub_category.into(),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    Ok(response.data.expect("created product"))
}

// A user without a shop cannot list products for sale.
#[tokio::test]
async fn create_product_requires_a_shop() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user = common::register_user(&state, "shopless").await?;
    let suffix = Uuid::new_v4().simple().to_string();
    let err = make_product(
        &state,
        &user,
        &format!("ns-{suffix}"),
        10,
        &format!("nscat-{suffix}"),
        "sub",
        "NoShop",
    )
    .await
    .expect_err("product creation must require a shop");
    assert!(err.to_string().contains("Please add a shop first"));

    Ok(())
}

// Resolving the same (category, sub-category) pair twice yields the same
// leaf id and never duplicates the root.
#[tokio::test]
async fn category_resolution_is_idempotent() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let suffix = Uuid::new_v4().simple().to_string();
    let root_name = format!("gadgets-{suffix}");

    let mut conn = state.pool.acquire().await?;
    let first =
        category_service::resolve_leaf_category(&mut conn, &root_name, "Wearables").await?;
    let second =
        category_service::resolve_leaf_category(&mut conn, &root_name, "WEARABLES").await?;
    assert_eq!(first, second);

    let (roots,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM categories WHERE name = $1 AND parent_id IS NULL")
            .bind(&root_name)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(roots, 1);

    let (parent,): (Option<Uuid>,) =
        sqlx::query_as("SELECT parent_id FROM categories WHERE id = $1")
            .bind(first)
            .fetch_one(&state.pool)
            .await?;
    assert!(parent.is_some(), "the resolved id must be a leaf");

    Ok(())
}

// Price and rating facets narrow the result; a fully-filtered empty page is
// a not-found error, not an empty array.
#[tokio::test]
async fn search_filters_compose_and_error_on_empty() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller = common::register_user(&state, "seller").await?;
    common::create_shop(&state, &seller, "Filter Shop").await?;

    let suffix = Uuid::new_v4().simple().to_string();
    let prefix = format!("fx{suffix}");
    let p1 = make_product(
        &state,
        &seller,
        &format!("{prefix} alpha"),
        10,
        &format!("cat-{suffix}"),
        "sub",
        "BrandA",
    )
    .await?;
    let p2 = make_product(
        &state,
        &seller,
        &format!("{prefix} beta"),
        50,
        &format!("cat-{suffix}"),
        "sub",
        "BrandB",
    )
    .await?;

    let buyer = common::register_user(&state, "buyer").await?;
    review_service::add_review(
        &state,
        &buyer,
        p1.id,
        AddReviewRequest {
            rating: 4,
            content: "solid".into(),
            images: Vec::new(),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    review_service::add_review(
        &state,
        &buyer,
        p2.id,
        AddReviewRequest {
            rating: 2,
            content: "meh".into(),
            images: Vec::new(),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let mut query = product_query(Some(prefix.clone()));
    query.min_price = Some(20);
    let page = catalog_service::list_products(&state, query)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let items = page.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, p2.id);

    let mut query = product_query(Some(prefix.clone()));
    query.min_rating = Some(3.0);
    let page = catalog_service::list_products(&state, query)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let items = page.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, p1.id);

    let mut query = product_query(Some(prefix.clone()));
    query.min_price = Some(20);
    query.min_rating = Some(3.0);
    let err = catalog_service::list_products(&state, query)
        .await
        .expect_err("empty page must be an error");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

#[tokio::test]
async fn autocomplete_requires_query_and_returns_empty_list() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let err = catalog_service::autocomplete(
        &state,
        AutocompleteQuery {
            q: None,
            limit: None,
        },
    )
    .await
    .expect_err("missing query must fail");
    assert!(matches!(err, AppError::BadRequest(_)));

    let nonsense = format!("zz{}", Uuid::new_v4().simple());
    let response = catalog_service::autocomplete(
        &state,
        AutocompleteQuery {
            q: Some(nonsense),
            limit: None,
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert!(response.data.unwrap().is_empty());

    Ok(())
}

// Deleting a variation leaves no dangling reference, and a non-owner cannot
// touch the product.
#[tokio::test]
async fn variation_delete_and_ownership_guard() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller = common::register_user(&state, "seller").await?;
    common::create_shop(&state, &seller, "Variation Shop").await?;

    let suffix = Uuid::new_v4().simple().to_string();
    let product = make_product(
        &state,
        &seller,
        &format!("vp-{suffix}"),
        100,
        &format!("vcat-{suffix}"),
        "sub",
        "VarBrand",
    )
    .await?;

    let added = product_service::add_variation(
        &state,
        &seller,
        product.id,
        AddVariationRequest {
            kind: "color".into(),
            name: "red".into(),
            price: 110,
            previews: Vec::new(),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let variation = added.data.unwrap();

    product_service::delete_variation(&state, &seller, product.id, variation.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let detail = product_service::get_product(&state, product.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert!(detail.data.unwrap().variations.is_empty());

    let stranger = common::register_user(&state, "stranger").await?;
    let err = product_service::toggle_stock(&state, &stranger, product.id)
        .await
        .expect_err("non-owner must not toggle stock");
    assert!(matches!(err, AppError::NotFound));

    let detail = product_service::get_product(&state, product.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert!(detail.data.unwrap().in_stock, "stock flag must be unchanged");

    Ok(())
}
