use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_marketplace_api::{
    config::AppConfig, db::create_pool, models::Address, services::category_service,
};
use sqlx::types::Json;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let seller_id = ensure_user(&pool, "seller", "seller@example.com", "seller123").await?;
    let buyer_id = ensure_user(&pool, "buyer", "buyer@example.com", "buyer123").await?;
    let shop_id = ensure_shop(&pool, seller_id, "Demo Electronics").await?;
    seed_products(&pool, shop_id).await?;

    println!("Seed completed. Seller ID: {seller_id}, Buyer ID: {buyer_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    username: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, full_name, email, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET updated_at = now()
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(user_id)
}

async fn ensure_shop(pool: &sqlx::PgPool, owner_id: Uuid, name: &str) -> anyhow::Result<Uuid> {
    let address = Address {
        local_address: "1 Market Street".into(),
        pincode: "94103".into(),
        city: "San Francisco".into(),
        state: "CA".into(),
        country: "USA".into(),
    };

    let (shop_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO shops (id, name, owner_id, address)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (owner_id) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(owner_id)
    .bind(Json(address))
    .fetch_one(pool)
    .await?;

    Ok(shop_id)
}

async fn seed_products(pool: &sqlx::PgPool, shop_id: Uuid) -> anyhow::Result<()> {
    let samples = [
        ("Noise Cancelling Headphones", 19900_i64, "electronics", "audio", "SoundWave"),
        ("Mechanical Keyboard", 8900, "electronics", "accessories", "KeyForge"),
        ("Espresso Grinder", 14900, "kitchen", "coffee", "BrewCraft"),
    ];

    for (name, price, category, sub_category, brand) in samples {
        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            continue;
        }

        let mut conn = pool.acquire().await?;
        let category_id =
            category_service::resolve_leaf_category(&mut conn, category, sub_category)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        drop(conn);

        let (detail_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO details (id, material, color, origin, manufacturer, brand, explanation)
            VALUES ($1, 'mixed', 'black', 'USA', $2, $2, 'Demo product')
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(brand)
        .fetch_one(pool)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO products
                (id, name, description, price, delivery_price, in_stock, previews,
                 category_id, detail_id, shop_id)
            VALUES ($1, $2, $3, $4, 0, TRUE, $5, $6, $7, $8)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(format!("{name} from the demo seed"))
        .bind(price)
        .bind(vec![format!("https://images.example.com/{}.jpg", name.to_lowercase().replace(' ', "-"))])
        .bind(category_id)
        .bind(detail_id)
        .bind(shop_id)
        .execute(pool)
        .await?;
    }

    Ok(())
}
