use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch, post},
};

use crate::{
    dto::auth::{
        AddressRequest, LoginRequest, RefreshTokenRequest, RegisterRequest, ResendOtpRequest,
        ResetPasswordRequest, TokenPair, UpdateAccountRequest, UpdateAvatarRequest,
        UpdatePasswordRequest, VerifyOtpRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify-otp", post(verify_otp))
        .route("/resend-otp", post(resend_otp))
        .route("/refresh-token", post(refresh_token))
        .route("/logout", post(logout))
        .route("/current-user", get(current_user))
        .route("/update-password", patch(update_password))
        .route("/reset-password", patch(reset_password))
        .route("/update-account", patch(update_account))
        .route("/update-avatar", patch(update_avatar))
        .route("/create-address", patch(create_address))
        .route("/remove-address", patch(remove_address))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user and mail an OTP", body = ApiResponse<User>),
        (status = 400, description = "Missing fields or user exists"),
    ),
    tag = "Users"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    Ok(Json(user_service::register_user(&state, payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<TokenPair>),
        (status = 401, description = "Incorrect credentials"),
    ),
    tag = "Users"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<TokenPair>>> {
    Ok(Json(user_service::login_user(&state, payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/verify-otp",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Verify OTP and issue tokens", body = ApiResponse<TokenPair>),
        (status = 400, description = "Invalid or expired OTP"),
    ),
    tag = "Users"
)]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyOtpRequest>,
) -> AppResult<Json<ApiResponse<TokenPair>>> {
    Ok(Json(user_service::verify_otp(&state, payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/resend-otp",
    request_body = ResendOtpRequest,
    responses(
        (status = 201, description = "Resend OTP", body = ApiResponse<serde_json::Value>),
    ),
    tag = "Users"
)]
pub async fn resend_otp(
    State(state): State<AppState>,
    Json(payload): Json<ResendOtpRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(user_service::resend_otp(&state, payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/refresh-token",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Rotate the token pair", body = ApiResponse<TokenPair>),
        (status = 401, description = "Invalid or revoked refresh token"),
    ),
    tag = "Users"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> AppResult<Json<ApiResponse<TokenPair>>> {
    Ok(Json(
        user_service::refresh_access_token(&state, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    responses(
        (status = 200, description = "Logout user", body = ApiResponse<serde_json::Value>),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(user_service::logout_user(&state, &user).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/current-user",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<User>),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn current_user(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<User>>> {
    Ok(Json(user_service::current_user(&state, &user).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/update-password",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Update password", body = ApiResponse<serde_json::Value>),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdatePasswordRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        user_service::update_password(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Reset password", body = ApiResponse<serde_json::Value>),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ResetPasswordRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        user_service::reset_password(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/update-account",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Update account details", body = ApiResponse<User>),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_account(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateAccountRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    Ok(Json(
        user_service::update_account(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/update-avatar",
    request_body = UpdateAvatarRequest,
    responses(
        (status = 200, description = "Update avatar URL", body = ApiResponse<User>),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_avatar(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateAvatarRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    Ok(Json(
        user_service::update_avatar(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/create-address",
    request_body = AddressRequest,
    responses(
        (status = 200, description = "Add an address", body = ApiResponse<User>),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn create_address(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddressRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    Ok(Json(
        user_service::create_address(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/remove-address",
    request_body = AddressRequest,
    responses(
        (status = 200, description = "Remove an address", body = ApiResponse<User>),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn remove_address(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<AddressRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    Ok(Json(
        user_service::remove_address(&state, &user, payload).await?,
    ))
}
