use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use password_hash::rand_core::OsRng;
use rand::Rng;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dto::auth::{
        AddressRequest, Claims, LoginRequest, RefreshTokenRequest, RegisterRequest,
        ResendOtpRequest, ResetPasswordRequest, TokenPair, UpdateAccountRequest,
        UpdateAvatarRequest, UpdatePasswordRequest, VerifyOtpRequest,
    },
    error::{AppError, AppResult},
    mail::send_otp_in_background,
    middleware::auth::AuthUser,
    models::{Otp, User},
    response::ApiResponse,
    state::AppState,
};

const OTP_TTL_MINUTES: i64 = 3;

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn sign_token(user_id: Uuid, secret: &str, lifetime: Duration) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(lifetime)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

/// Issue an access/refresh pair and persist the refresh token on the user.
async fn issue_tokens(state: &AppState, user_id: Uuid) -> AppResult<TokenPair> {
    let config: &AppConfig = &state.config;
    let access_token = sign_token(
        user_id,
        &config.access_token_secret,
        Duration::hours(config.access_token_hours),
    )?;
    let refresh_token = sign_token(
        user_id,
        &config.refresh_token_secret,
        Duration::days(config.refresh_token_days),
    )?;

    sqlx::query("UPDATE users SET refresh_token = $2, updated_at = now() WHERE id = $1")
        .bind(user_id)
        .bind(&refresh_token)
        .execute(&state.pool)
        .await?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

fn generate_otp_code() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

/// Store a fresh OTP and mail it in the background.
async fn create_and_send_otp(state: &AppState, email: &str) -> AppResult<()> {
    let code = generate_otp_code();
    sqlx::query("INSERT INTO otps (id, email, code) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(&code)
        .execute(&state.pool)
        .await?;
    send_otp_in_background(&state.mailer, email, &code);
    Ok(())
}

async fn sweep_expired_otps(state: &AppState) -> AppResult<()> {
    sqlx::query("DELETE FROM otps WHERE created_at < now() - make_interval(mins => $1)")
        .bind(OTP_TTL_MINUTES as i32)
        .execute(&state.pool)
        .await?;
    Ok(())
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let RegisterRequest {
        username,
        full_name,
        email,
        password,
    } = payload;
    if username.trim().is_empty()
        || full_name.trim().is_empty()
        || email.trim().is_empty()
        || password.is_empty()
    {
        return Err(AppError::BadRequest("All fields are required".into()));
    }
    let username = username.trim().to_lowercase();

    let exists: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = $1 OR username = $2")
            .bind(&email)
            .bind(&username)
            .fetch_optional(&state.pool)
            .await?;
    if exists.is_some() {
        return Err(AppError::BadRequest("User already exists".into()));
    }

    let password_hash = hash_password(&password)?;
    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, full_name, email, password_hash)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&username)
    .bind(&full_name)
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&state.pool)
    .await?;

    create_and_send_otp(state, &email).await?;

    Ok(ApiResponse::created(format!("OTP sent to {email}"), user))
}

pub async fn verify_otp(
    state: &AppState,
    payload: VerifyOtpRequest,
) -> AppResult<ApiResponse<TokenPair>> {
    if payload.code.trim().is_empty() {
        return Err(AppError::BadRequest("All fields are required".into()));
    }

    let otp: Option<Otp> = sqlx::query_as("SELECT * FROM otps WHERE code = $1")
        .bind(payload.code.trim())
        .fetch_optional(&state.pool)
        .await?;

    let Some(otp) = otp else {
        sweep_expired_otps(state).await?;
        return Err(AppError::BadRequest("Invalid OTP".into()));
    };

    if otp.created_at < Utc::now() - Duration::minutes(OTP_TTL_MINUTES) {
        sweep_expired_otps(state).await?;
        return Err(AppError::BadRequest("Invalid OTP".into()));
    }

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&otp.email)
        .fetch_optional(&state.pool)
        .await?;
    let user = user.ok_or_else(|| AppError::BadRequest("User not found".into()))?;

    let tokens = issue_tokens(state, user.id).await?;

    sqlx::query("DELETE FROM otps WHERE id = $1")
        .bind(otp.id)
        .execute(&state.pool)
        .await?;

    Ok(ApiResponse::success(
        "OTP verified successfully",
        tokens,
        None,
    ))
}

pub async fn resend_otp(
    state: &AppState,
    payload: ResendOtpRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let email = payload.email.trim();
    if email.is_empty() {
        return Err(AppError::BadRequest("All fields are required".into()));
    }

    let user: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(&state.pool)
        .await?;
    if user.is_none() {
        return Err(AppError::BadRequest("User not found".into()));
    }

    sqlx::query("DELETE FROM otps WHERE email = $1")
        .bind(email)
        .execute(&state.pool)
        .await?;

    create_and_send_otp(state, email).await?;

    Ok(ApiResponse::created(
        format!("OTP sent to {email} again"),
        serde_json::json!({}),
    ))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<TokenPair>> {
    let LoginRequest {
        username,
        email,
        password,
    } = payload;
    if (username.is_none() && email.is_none()) || password.is_empty() {
        return Err(AppError::BadRequest("All fields are required".into()));
    }

    let user: Option<User> =
        sqlx::query_as("SELECT * FROM users WHERE username = $1 OR email = $2")
            .bind(username.map(|u| u.to_lowercase()))
            .bind(email)
            .fetch_optional(&state.pool)
            .await?;
    let user = user.ok_or_else(|| AppError::Unauthorized("Incorrect credentials".into()))?;

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Incorrect credentials".into()));
    }

    let tokens = issue_tokens(state, user.id).await?;

    // A login also gets a mailed OTP for second-step verification.
    create_and_send_otp(state, &user.email).await?;

    Ok(ApiResponse::success(
        "Login successful, an OTP has been sent",
        tokens,
        None,
    ))
}

pub async fn refresh_access_token(
    state: &AppState,
    payload: RefreshTokenRequest,
) -> AppResult<ApiResponse<TokenPair>> {
    let decoded = decode::<Claims>(
        &payload.refresh_token,
        &DecodingKey::from_secret(state.config.refresh_token_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token".into()))?;

    let user_id = Uuid::parse_str(&decoded.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".into()))?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&state.pool)
        .await?;
    let user = user.ok_or_else(|| AppError::Unauthorized("Invalid refresh token".into()))?;

    if user.refresh_token.as_deref() != Some(payload.refresh_token.as_str()) {
        return Err(AppError::Unauthorized("Refresh token has been revoked".into()));
    }

    let tokens = issue_tokens(state, user.id).await?;
    Ok(ApiResponse::success("Token refreshed", tokens, None))
}

pub async fn logout_user(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    sqlx::query("UPDATE users SET refresh_token = NULL, updated_at = now() WHERE id = $1")
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;

    Ok(ApiResponse::success(
        "User logged out successfully",
        serde_json::json!({}),
        None,
    ))
}

pub async fn current_user(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let found: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;
    let found = found.ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("User fetched successfully", found, None))
}

pub async fn update_password(
    state: &AppState,
    user: &AuthUser,
    payload: UpdatePasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if payload.old_password.trim().is_empty()
        || payload.new_password.trim().is_empty()
        || payload.confirm_password.trim().is_empty()
    {
        return Err(AppError::BadRequest("All fields are required".into()));
    }
    if payload.new_password != payload.confirm_password {
        return Err(AppError::BadRequest("Passwords do not match".into()));
    }

    let found: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;
    let found = found.ok_or(AppError::NotFound)?;

    if !verify_password(&payload.old_password, &found.password_hash)? {
        return Err(AppError::BadRequest("Old password is incorrect".into()));
    }

    let password_hash = hash_password(&payload.new_password)?;
    sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
        .bind(user.user_id)
        .bind(&password_hash)
        .execute(&state.pool)
        .await?;

    Ok(ApiResponse::success(
        "User password updated successfully",
        serde_json::json!({}),
        None,
    ))
}

pub async fn reset_password(
    state: &AppState,
    user: &AuthUser,
    payload: ResetPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if payload.password.is_empty() {
        return Err(AppError::BadRequest("All fields are required".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let result =
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(user.user_id)
            .bind(&password_hash)
            .execute(&state.pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Password reset successful",
        serde_json::json!({}),
        None,
    ))
}

pub async fn update_account(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateAccountRequest,
) -> AppResult<ApiResponse<User>> {
    if payload.username.is_none() && payload.email.is_none() && payload.full_name.is_none() {
        return Err(AppError::BadRequest("At least one field is required".into()));
    }

    let username = payload.username.map(|u| u.trim().to_lowercase());

    if username.is_some() || payload.email.is_some() {
        let taken: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM users WHERE (username = $1 OR email = $2) AND id <> $3",
        )
        .bind(&username)
        .bind(&payload.email)
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;
        if taken.is_some() {
            return Err(AppError::BadRequest(
                "Username or email is already taken".into(),
            ));
        }
    }

    let updated: User = sqlx::query_as(
        r#"
        UPDATE users
        SET username = COALESCE($2, username),
            email = COALESCE($3, email),
            full_name = COALESCE($4, full_name),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user.user_id)
    .bind(&username)
    .bind(&payload.email)
    .bind(&payload.full_name)
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "User details updated successfully",
        updated,
        None,
    ))
}

/// Store the URL handed back by the external upload collaborator.
pub async fn update_avatar(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateAvatarRequest,
) -> AppResult<ApiResponse<User>> {
    if payload.avatar.trim().is_empty() {
        return Err(AppError::BadRequest("Avatar is required".into()));
    }

    let updated: Option<User> = sqlx::query_as(
        "UPDATE users SET avatar = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(user.user_id)
    .bind(payload.avatar.trim())
    .fetch_optional(&state.pool)
    .await?;
    let updated = updated.ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "User avatar updated successfully",
        updated,
        None,
    ))
}

pub async fn create_address(
    state: &AppState,
    user: &AuthUser,
    payload: AddressRequest,
) -> AppResult<ApiResponse<User>> {
    let updated: User = sqlx::query_as(
        r#"
        UPDATE users
        SET addresses = addresses || $2, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(user.user_id)
    .bind(Json(vec![payload.address]))
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success("Address created successfully", updated, None))
}

pub async fn remove_address(
    state: &AppState,
    user: &AuthUser,
    payload: AddressRequest,
) -> AppResult<ApiResponse<User>> {
    let found: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;
    let found = found.ok_or(AppError::NotFound)?;

    let remaining: Vec<_> = found
        .addresses
        .0
        .into_iter()
        .filter(|address| *address != payload.address)
        .collect();

    let updated: User = sqlx::query_as(
        "UPDATE users SET addresses = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(user.user_id)
    .bind(Json(remaining))
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success("Address removed successfully", updated, None))
}
