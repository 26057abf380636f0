use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Address;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShopRequest {
    pub name: String,
    pub local_address: String,
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateShopRequest {
    pub name: Option<String>,
    pub local_address: Option<String>,
    pub pincode: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl UpdateShopRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.local_address.is_none()
            && self.pincode.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.country.is_none()
    }
}

/// Shop joined with the owner's public profile.
#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct ShopWithOwner {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = Address)]
    pub address: Json<Address>,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar: String,
}
