use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddReviewRequest {
    pub rating: i32,
    pub content: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReviewRequest {
    pub rating: i32,
    pub content: String,
}

/// A product's review with the reviewer's public profile joined.
#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct ReviewWithAuthor {
    pub id: Uuid,
    pub rating: i32,
    pub content: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub username: String,
    pub avatar: String,
}

/// One of the caller's own reviews with the reviewed product joined.
#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct ReviewWithProduct {
    pub id: Uuid,
    pub rating: i32,
    pub content: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub product_id: Uuid,
    pub product_name: String,
    pub product_previews: Vec<String>,
}
