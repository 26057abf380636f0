use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        products::{
            AddOfferRequest, AddPreviewsRequest, AddVariationRequest, CreateProductRequest,
            ProductDetail, ProductList, RemovePreviewRequest, Suggestion, UpdateCategoryRequest,
            UpdateDetailRequest, UpdatePrimaryRequest, UpdateVariationRequest,
        },
        reviews::ReviewWithAuthor,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Detail, Product, Variation},
    response::ApiResponse,
    routes::params::{AutocompleteQuery, ProductQuery},
    services::{catalog_service, product_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/autocomplete", get(autocomplete))
        .route("/{id}", get(get_product).delete(delete_product))
        .route("/{id}/reviews", get(get_reviews))
        .route("/{id}/primary", patch(update_primary_details))
        .route("/{id}/stock", patch(toggle_stock))
        .route("/{id}/category", patch(update_category))
        .route("/{id}/previews", post(add_previews).delete(remove_preview))
        .route("/{id}/variations", post(add_variation))
        .route(
            "/{id}/variations/{variation_id}",
            patch(update_variation).delete(delete_variation),
        )
        .route("/{id}/offer", post(add_offer).delete(remove_offer))
        .route("/{id}/details", patch(update_detail))
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(
        ("q" = Option<String>, Query, description = "Free-text search term"),
        ("category" = Option<String>, Query, description = "Category name filter"),
        ("brand" = Option<String>, Query, description = "Brand name filter"),
        ("min_price" = Option<i64>, Query, description = "Minimum price"),
        ("max_price" = Option<i64>, Query, description = "Maximum price"),
        ("min_rating" = Option<f64>, Query, description = "Minimum average rating"),
        ("in_stock" = Option<bool>, Query, description = "Only in-stock products when true"),
        ("sort_by" = Option<String>, Query, description = "created_at | price | name | avg_rating"),
        ("sort_order" = Option<String>, Query, description = "asc | desc"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 10"),
    ),
    responses(
        (status = 200, description = "Matching product page", body = ApiResponse<ProductList>),
        (status = 404, description = "No products matched"),
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    Ok(Json(catalog_service::list_products(&state, query).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/autocomplete",
    params(
        ("q" = String, Query, description = "Partial search term"),
        ("limit" = Option<u64>, Query, description = "Max suggestions, default 10"),
    ),
    responses(
        (status = 200, description = "Suggestions", body = ApiResponse<Vec<Suggestion>>),
        (status = 400, description = "Missing query"),
    ),
    tag = "Products"
)]
pub async fn autocomplete(
    State(state): State<AppState>,
    Query(query): Query<AutocompleteQuery>,
) -> AppResult<Json<ApiResponse<Vec<Suggestion>>>> {
    Ok(Json(catalog_service::autocomplete(&state, query).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Missing fields or no shop"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    Ok(Json(
        product_service::create_product(&state, &user, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Assembled product page", body = ApiResponse<ProductDetail>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductDetail>>> {
    Ok(Json(product_service::get_product(&state, id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted product"),
        (status = 404, description = "Not found or not the owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        product_service::delete_product(&state, &user, id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{id}/reviews",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Reviews", body = ApiResponse<Vec<ReviewWithAuthor>>),
    ),
    tag = "Products"
)]
pub async fn get_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<ReviewWithAuthor>>>> {
    Ok(Json(product_service::get_reviews(&state, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}/primary",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdatePrimaryRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 404, description = "Not found or not the owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_primary_details(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePrimaryRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    Ok(Json(
        product_service::update_primary_details(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}/stock",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Toggled stock flag", body = ApiResponse<Product>),
        (status = 404, description = "Not found or not the owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn toggle_stock(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    Ok(Json(product_service::toggle_stock(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}/category",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Re-categorized product", body = ApiResponse<Product>),
        (status = 404, description = "Not found or not the owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    Ok(Json(
        product_service::update_category(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/previews",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = AddPreviewsRequest,
    responses(
        (status = 200, description = "Previews appended", body = ApiResponse<Product>),
        (status = 404, description = "Not found or not the owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn add_previews(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddPreviewsRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    Ok(Json(
        product_service::add_previews(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}/previews",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = RemovePreviewRequest,
    responses(
        (status = 200, description = "Preview removed", body = ApiResponse<Product>),
        (status = 404, description = "Preview not present"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn remove_preview(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RemovePreviewRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    Ok(Json(
        product_service::remove_preview(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/variations",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = AddVariationRequest,
    responses(
        (status = 200, description = "Variation added", body = ApiResponse<Variation>),
        (status = 404, description = "Not found or not the owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn add_variation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddVariationRequest>,
) -> AppResult<Json<ApiResponse<Variation>>> {
    Ok(Json(
        product_service::add_variation(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}/variations/{variation_id}",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("variation_id" = Uuid, Path, description = "Variation ID"),
    ),
    request_body = UpdateVariationRequest,
    responses(
        (status = 200, description = "Variation updated", body = ApiResponse<Variation>),
        (status = 404, description = "Not found or not the owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_variation(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, variation_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateVariationRequest>,
) -> AppResult<Json<ApiResponse<Variation>>> {
    Ok(Json(
        product_service::update_variation(&state, &user, id, variation_id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}/variations/{variation_id}",
    params(
        ("id" = Uuid, Path, description = "Product ID"),
        ("variation_id" = Uuid, Path, description = "Variation ID"),
    ),
    responses(
        (status = 200, description = "Variation deleted"),
        (status = 404, description = "Not found or not the owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_variation(
    State(state): State<AppState>,
    user: AuthUser,
    Path((id, variation_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        product_service::delete_variation(&state, &user, id, variation_id).await?,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/products/{id}/offer",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = AddOfferRequest,
    responses(
        (status = 200, description = "Offer added"),
        (status = 404, description = "Not found or not the owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn add_offer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddOfferRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(
        product_service::add_offer(&state, &user, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}/offer",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Offer removed"),
        (status = 404, description = "No offer to remove"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn remove_offer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    Ok(Json(product_service::remove_offer(&state, &user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}/details",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateDetailRequest,
    responses(
        (status = 200, description = "Detail updated", body = ApiResponse<Detail>),
        (status = 404, description = "Not found or not the owner"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_detail(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDetailRequest>,
) -> AppResult<Json<ApiResponse<Detail>>> {
    Ok(Json(
        product_service::update_detail(&state, &user, id, payload).await?,
    ))
}
