use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Address, Order};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub product_ids: Vec<Uuid>,
    pub total_price: i64,
    pub quantity: i32,
    pub address: Address,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub phone: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithProducts {
    pub order: Order,
    pub product_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}
