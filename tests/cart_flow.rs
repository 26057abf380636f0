mod common;

use axum_marketplace_api::{
    dto::{
        auth::VerifyOtpRequest,
        cart::UpdateQuantityRequest,
        opinions::OpinionRequest,
        products::CreateProductRequest,
        reviews::AddReviewRequest,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::Product,
    services::{
        cart_service, opinion_service, product_service, review_service, user_service,
        wishlist_service,
    },
    state::AppState,
};
use uuid::Uuid;

async fn make_product(state: &AppState, user: &AuthUser, name: &str) -> anyhow::Result<Product> {
    let suffix = Uuid::new_v4().simple().to_string();
    let response = product_service::create_product(
        state,
        user,
        CreateProductRequest {
            name: name.into(),
            description: format!("{name} description"),
            price: 2500,
            delivery_price: None,
            previews: vec!["https://images.example.com/preview.jpg".into()],
            material: "cotton".into(),
            color: "blue".into(),
            origin: "Testland".into(),
            manufacturer: "CartCo".into(),
            brand: "CartCo".into(),
            explanation: "test product".into(),
            ships_from: None,
            extra_detail: None,
            variation: None,
            offer_type: None,
            offer_value: None,
            category_name: format!("cartcat-{suffix}"),
            sub_category_name: "sub".into(),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    Ok(response.data.expect("created product"))
}

// Adding the same product twice yields one line item with quantity 2, and
// clearing empties the items while the cart document survives.
#[tokio::test]
async fn cart_add_twice_update_and_clear() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller = common::register_user(&state, "seller").await?;
    common::create_shop(&state, &seller, "Cart Shop").await?;
    let product = make_product(&state, &seller, &format!("cart-{}", Uuid::new_v4().simple())).await?;

    let buyer = common::register_user(&state, "buyer").await?;

    cart_service::add_to_cart(&state, &buyer, product.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let view = cart_service::add_to_cart(&state, &buyer, product.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let items = view.data.unwrap().items;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 2);

    let err = cart_service::remove_from_cart(&state, &buyer, Uuid::new_v4())
        .await
        .expect_err("absent product must be not-found");
    assert!(matches!(err, AppError::NotFound));

    let view = cart_service::update_quantity(
        &state,
        &buyer,
        product.id,
        UpdateQuantityRequest { quantity: 5 },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert_eq!(view.data.unwrap().items[0].quantity, 5);

    cart_service::clear_cart(&state, &buyer)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let view = cart_service::list_cart(&state, &buyer)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert!(view.data.unwrap().items.is_empty());

    let (carts,): (i64,) = sqlx::query_as("SELECT count(*) FROM carts WHERE user_id = $1")
        .bind(buyer.user_id)
        .fetch_one(&state.pool)
        .await?;
    assert_eq!(carts, 1, "clearing must keep the cart document");

    Ok(())
}

#[tokio::test]
async fn wishlist_add_is_idempotent_and_clear_drops_document() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller = common::register_user(&state, "seller").await?;
    common::create_shop(&state, &seller, "Wishlist Shop").await?;
    let product = make_product(&state, &seller, &format!("wish-{}", Uuid::new_v4().simple())).await?;

    let buyer = common::register_user(&state, "buyer").await?;

    wishlist_service::add_to_wishlist(&state, &buyer, product.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    wishlist_service::add_to_wishlist(&state, &buyer, product.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let view = wishlist_service::list_wishlist(&state, &buyer)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert_eq!(view.data.unwrap().items.len(), 1);

    wishlist_service::clear_wishlist(&state, &buyer)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let err = wishlist_service::clear_wishlist(&state, &buyer)
        .await
        .expect_err("the wishlist document is gone after a clear");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

// At most one opinion per (review, owner): a repeat submission updates in
// place instead of inserting a second row.
#[tokio::test]
async fn opinion_upsert_never_duplicates() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let seller = common::register_user(&state, "seller").await?;
    common::create_shop(&state, &seller, "Opinion Shop").await?;
    let product = make_product(&state, &seller, &format!("op-{}", Uuid::new_v4().simple())).await?;

    let buyer = common::register_user(&state, "buyer").await?;
    let review = review_service::add_review(
        &state,
        &buyer,
        product.id,
        AddReviewRequest {
            rating: 5,
            content: "great".into(),
            images: Vec::new(),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .unwrap();

    opinion_service::create_opinion(
        &state,
        &seller,
        review.id,
        OpinionRequest {
            opinion: "helpful".into(),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let updated = opinion_service::create_opinion(
        &state,
        &seller,
        review.id,
        OpinionRequest {
            opinion: "report".into(),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?
    .data
    .unwrap();
    assert_eq!(updated.opinion, "report");

    let (count,): (i64,) =
        sqlx::query_as("SELECT count(*) FROM opinions WHERE review_id = $1 AND owner_id = $2")
            .bind(review.id)
            .bind(seller.user_id)
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(count, 1);

    let helpful = opinion_service::helpful_opinions(&state, review.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert!(helpful.data.unwrap().items.is_empty());

    Ok(())
}

// A stale code fails verification; a fresh one issues a token pair.
#[tokio::test]
async fn otp_expiry_is_enforced() -> anyhow::Result<()> {
    let Some(state) = common::setup_state().await? else {
        return Ok(());
    };

    let user = common::register_user(&state, "otp").await?;
    let email = user_service::current_user(&state, &user)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .unwrap()
        .email;

    let stale_code = format!("{}", 900_000 + rand_suffix());
    sqlx::query(
        r#"
        INSERT INTO otps (id, email, code, created_at)
        VALUES ($1, $2, $3, now() - interval '10 minutes')
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(&stale_code)
    .execute(&state.pool)
    .await?;

    let err = user_service::verify_otp(
        &state,
        VerifyOtpRequest {
            code: stale_code.clone(),
        },
    )
    .await
    .expect_err("stale OTP must fail");
    assert!(matches!(err, AppError::BadRequest(_)));

    let fresh_code = format!("{}", 100_000 + rand_suffix());
    sqlx::query("INSERT INTO otps (id, email, code) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(&email)
        .bind(&fresh_code)
        .execute(&state.pool)
        .await?;

    let tokens = user_service::verify_otp(&state, VerifyOtpRequest { code: fresh_code })
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .data
        .unwrap();
    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());

    Ok(())
}

fn rand_suffix() -> u32 {
    Uuid::new_v4().as_u128() as u32 % 90_000
}
