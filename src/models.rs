use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

/// Postal address embedded on users, shops and order delivery details.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Address {
    pub local_address: String,
    pub pincode: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeliveryDetails {
    pub address: Address,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar: String,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    #[schema(value_type = Vec<Address>)]
    pub addresses: Json<Vec<Address>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    #[schema(value_type = Address)]
    pub address: Json<Address>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Detail {
    pub id: Uuid,
    pub material: Option<String>,
    pub color: Option<String>,
    pub origin: Option<String>,
    pub manufacturer: String,
    pub brand: String,
    pub explanation: Option<String>,
    pub ships_from: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub extra_detail: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Offer {
    pub id: Uuid,
    pub offer_type: String,
    pub offer_value: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub delivery_price: i64,
    pub in_stock: bool,
    pub previews: Vec<String>,
    pub category_id: Uuid,
    pub offer_id: Option<Uuid>,
    pub detail_id: Option<Uuid>,
    pub shop_id: Uuid,
    pub avg_rating: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Variation {
    pub id: Uuid,
    pub product_id: Uuid,
    pub kind: String,
    pub name: String,
    pub price: i64,
    pub previews: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Review {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub product_id: Uuid,
    pub rating: i32,
    pub content: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Opinion {
    pub id: Uuid,
    pub review_id: Uuid,
    pub owner_id: Uuid,
    pub opinion: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Cart {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct CartItem {
    pub id: Uuid,
    pub cart_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Wishlist {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct WishlistItem {
    pub id: Uuid,
    pub wishlist_id: Uuid,
    pub product_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Order {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub total_price: i64,
    #[schema(value_type = DeliveryDetails)]
    pub delivery_details: Json<DeliveryDetails>,
    pub status: String,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Otp {
    pub id: Uuid,
    pub email: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

pub const ORDER_STATUSES: [&str; 4] = ["pending", "shipped", "delivered", "cancelled"];
pub const OFFER_TYPES: [&str; 3] = ["buy_one_get_one", "discount", "bulk_discount"];
pub const OPINION_VALUES: [&str; 2] = ["helpful", "report"];
