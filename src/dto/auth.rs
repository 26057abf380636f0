use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Address;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct VerifyOtpRequest {
    pub code: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ResendOtpRequest {
    pub email: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct ResetPasswordRequest {
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct UpdateAvatarRequest {
    pub avatar: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct UpdateAccountRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct AddressRequest {
    pub address: Address,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}
