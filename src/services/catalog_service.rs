use std::collections::HashSet;

use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use uuid::Uuid;

use crate::{
    dto::products::{ProductList, Suggestion},
    entity::{Categories, Details, Products, categories, details, products},
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{AutocompleteQuery, ProductQuery, ProductSortBy, SortOrder},
    state::AppState,
};

/// First category whose name matches the term, case-insensitively.
async fn category_by_name(state: &AppState, term: &str) -> AppResult<Option<Uuid>> {
    let pattern = format!("%{term}%");
    let found = Categories::find()
        .filter(Expr::col(categories::Column::Name).ilike(pattern))
        .one(&state.orm)
        .await?;
    Ok(found.map(|c| c.id))
}

/// First detail whose brand matches the term, case-insensitively.
async fn detail_by_brand(state: &AppState, term: &str) -> AppResult<Option<Uuid>> {
    let pattern = format!("%{term}%");
    let found = Details::find()
        .filter(Expr::col(details::Column::Brand).ilike(pattern))
        .one(&state.orm)
        .await?;
    Ok(found.map(|d| d.id))
}

/// Faceted product listing: free-text union match, name-resolved category and
/// brand filters, numeric ranges, single-key sort and limit/offset pagination.
/// A fully-filtered empty page is reported as not-found, never as an empty
/// array.
pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, per_page, offset) = query.normalize_pagination();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{search}%");
        let mut any = Condition::any()
            .add(Expr::col(products::Column::Name).ilike(pattern.clone()))
            .add(Expr::col(products::Column::Description).ilike(pattern));
        if let Some(category_id) = category_by_name(state, search).await? {
            any = any.add(products::Column::CategoryId.eq(category_id));
        }
        if let Some(detail_id) = detail_by_brand(state, search).await? {
            any = any.add(products::Column::DetailId.eq(detail_id));
        }
        condition = condition.add(any);
    }

    if let Some(category) = query.category.as_ref().filter(|s| !s.is_empty()) {
        // An unknown name resolves to the nil id and matches nothing.
        let resolved = category_by_name(state, category)
            .await?
            .unwrap_or_else(Uuid::nil);
        condition = condition.add(products::Column::CategoryId.eq(resolved));
    }

    if let Some(brand) = query.brand.as_ref().filter(|s| !s.is_empty()) {
        let resolved = detail_by_brand(state, brand)
            .await?
            .unwrap_or_else(Uuid::nil);
        condition = condition.add(products::Column::DetailId.eq(resolved));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(products::Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(products::Column::Price.lte(max_price));
    }

    if let Some(min_rating) = query.min_rating {
        condition = condition.add(products::Column::AvgRating.gte(min_rating));
    }

    if query.in_stock == Some(true) {
        condition = condition.add(products::Column::InStock.eq(true));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => products::Column::CreatedAt,
        ProductSortBy::Price => products::Column::Price,
        ProductSortBy::Name => products::Column::Name,
        ProductSortBy::AvgRating => products::Column::AvgRating,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items: Vec<Product> = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    if items.is_empty() {
        return Err(AppError::NotFound);
    }

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    ))
}

/// Name suggestions for a partial search term, de-duplicated by product name
/// and sorted case-insensitively. No matches is an empty list, not an error.
pub async fn autocomplete(
    state: &AppState,
    query: AutocompleteQuery,
) -> AppResult<ApiResponse<Vec<Suggestion>>> {
    let term = query
        .q
        .as_ref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Query parameter is required".into()))?;
    let limit = query.limit.unwrap_or(10);

    let pattern = format!("%{term}%");
    let condition = Condition::any()
        .add(Expr::col((products::Entity, products::Column::Name)).ilike(pattern.clone()))
        .add(Expr::col((products::Entity, products::Column::Description)).ilike(pattern.clone()))
        .add(Expr::col((categories::Entity, categories::Column::Name)).ilike(pattern.clone()))
        .add(Expr::col((details::Entity, details::Column::Brand)).ilike(pattern));

    let results = Products::find()
        .select_only()
        .column(products::Column::Name)
        .column_as(categories::Column::Name, "category")
        .column_as(details::Column::Brand, "brand")
        .join(JoinType::LeftJoin, products::Relation::Categories.def())
        .join(JoinType::LeftJoin, products::Relation::Details.def())
        .filter(condition)
        .limit(limit)
        .into_model::<Suggestion>()
        .all(&state.orm)
        .await?;

    let mut seen = HashSet::new();
    let mut suggestions: Vec<Suggestion> = results
        .into_iter()
        .filter(|s| seen.insert(s.name.clone()))
        .collect();
    suggestions.sort_by_key(|s| s.name.to_lowercase());

    Ok(ApiResponse::success("Suggestions", suggestions, None))
}

pub fn product_from_entity(model: products::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        delivery_price: model.delivery_price,
        in_stock: model.in_stock,
        previews: model.previews,
        category_id: model.category_id,
        offer_id: model.offer_id,
        detail_id: model.detail_id,
        shop_id: model.shop_id,
        avg_rating: model.avg_rating,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}
