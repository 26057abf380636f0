use axum_marketplace_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool},
    dto::{auth::RegisterRequest, shops::CreateShopRequest},
    mail::Mailer,
    middleware::auth::AuthUser,
    services::{shop_service, user_service},
    state::AppState,
};
use uuid::Uuid;

/// Build an AppState against TEST_DATABASE_URL/DATABASE_URL, or None so the
/// caller can skip when no database is configured in the environment.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    let orm = create_orm_conn(&database_url).await?;

    let config = AppConfig {
        database_url,
        host: "127.0.0.1".into(),
        port: 0,
        access_token_secret: "test-access-secret".into(),
        refresh_token_secret: "test-refresh-secret".into(),
        access_token_hours: 1,
        refresh_token_days: 1,
        smtp_host: "localhost".into(),
        smtp_port: 1025,
        smtp_username: String::new(),
        smtp_password: String::new(),
        mail_from: "noreply@localhost".into(),
    };
    let mailer = Mailer::from_config(&config)?;

    Ok(Some(AppState {
        pool,
        orm,
        mailer,
        config,
    }))
}

/// Register a fresh user with a unique username/email and return its auth
/// identity.
pub async fn register_user(state: &AppState, tag: &str) -> anyhow::Result<AuthUser> {
    let suffix = Uuid::new_v4().simple().to_string();
    let response = user_service::register_user(
        state,
        RegisterRequest {
            username: format!("{tag}-{suffix}"),
            full_name: format!("{tag} tester"),
            email: format!("{tag}-{suffix}@example.com"),
            password: "Sup3rSecret!".into(),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let user = response.data.expect("registered user");
    Ok(AuthUser { user_id: user.id })
}

pub async fn create_shop(state: &AppState, user: &AuthUser, name: &str) -> anyhow::Result<Uuid> {
    let response = shop_service::create_shop(
        state,
        user,
        CreateShopRequest {
            name: name.into(),
            local_address: "42 Test Lane".into(),
            pincode: "00000".into(),
            city: "Testville".into(),
            state: "TS".into(),
            country: "Testland".into(),
        },
    )
    .await
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    Ok(response.data.expect("created shop").id)
}
