use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Address, Product};

#[derive(Debug, Deserialize, ToSchema)]
pub struct InitialVariation {
    pub kind: String,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub previews: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub delivery_price: Option<i64>,
    pub previews: Vec<String>,
    pub material: String,
    pub color: String,
    pub origin: String,
    pub manufacturer: String,
    pub brand: String,
    pub explanation: String,
    pub ships_from: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub extra_detail: Option<serde_json::Value>,
    pub variation: Option<InitialVariation>,
    pub offer_type: Option<String>,
    pub offer_value: Option<i64>,
    pub category_name: String,
    pub sub_category_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePrimaryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub delivery_price: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategoryRequest {
    pub category_name: String,
    pub sub_category_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddVariationRequest {
    pub kind: String,
    pub name: String,
    pub price: i64,
    #[serde(default)]
    pub previews: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateVariationRequest {
    pub kind: Option<String>,
    pub name: Option<String>,
    pub price: Option<i64>,
    pub previews: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddOfferRequest {
    pub offer_type: String,
    pub offer_value: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDetailRequest {
    pub material: Option<String>,
    pub color: Option<String>,
    pub origin: Option<String>,
    pub manufacturer: Option<String>,
    pub brand: Option<String>,
    pub explanation: Option<String>,
    pub ships_from: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub extra_detail: Option<serde_json::Value>,
}

impl UpdateDetailRequest {
    pub fn is_empty(&self) -> bool {
        self.material.is_none()
            && self.color.is_none()
            && self.origin.is_none()
            && self.manufacturer.is_none()
            && self.brand.is_none()
            && self.explanation.is_none()
            && self.ships_from.is_none()
            && self.extra_detail.is_none()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddPreviewsRequest {
    pub previews: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RemovePreviewRequest {
    pub preview: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

/// Autocomplete projection: product name plus the joined category/brand.
#[derive(Debug, Clone, Serialize, ToSchema, FromQueryResult)]
pub struct Suggestion {
    pub name: String,
    pub category: Option<String>,
    pub brand: Option<String>,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct OfferView {
    pub offer_type: String,
    pub offer_value: Option<i64>,
}

/// Leaf category plus its root parent.
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryChain {
    pub name: String,
    pub parent: Option<String>,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct VariationView {
    pub kind: String,
    pub name: String,
    pub price: i64,
    pub previews: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShopPublic {
    pub name: String,
    #[schema(value_type = Address)]
    pub address: Json<Address>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DetailView {
    pub material: Option<String>,
    pub color: Option<String>,
    pub origin: Option<String>,
    pub manufacturer: String,
    pub brand: String,
    pub explanation: Option<String>,
    pub ships_from: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub extra_detail: Option<serde_json::Value>,
}

/// The fully assembled product page: one joined read, no side effects.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDetail {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub delivery_price: i64,
    pub in_stock: bool,
    pub previews: Vec<String>,
    pub avg_rating: f64,
    pub offer: Option<OfferView>,
    pub category: Option<CategoryChain>,
    pub variations: Vec<VariationView>,
    pub shop: Option<ShopPublic>,
    pub details: Option<DetailView>,
}
