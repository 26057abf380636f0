use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Opinion;

#[derive(Debug, Deserialize, ToSchema)]
pub struct OpinionRequest {
    pub opinion: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OpinionList {
    pub items: Vec<Opinion>,
}
