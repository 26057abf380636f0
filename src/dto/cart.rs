use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

/// One cart line joined with the product fields the storefront renders.
#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub price: i64,
    pub previews: Vec<String>,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLine>,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct WishlistLine {
    pub product_id: Uuid,
    pub name: String,
    pub price: i64,
    pub previews: Vec<String>,
    pub in_stock: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistView {
    pub items: Vec<WishlistLine>,
}
