use axum::Router;

use crate::state::AppState;

pub mod cart;
pub mod dashboard;
pub mod doc;
pub mod health;
pub mod opinions;
pub mod orders;
pub mod params;
pub mod products;
pub mod reviews;
pub mod shops;
pub mod users;
pub mod wishlist;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/products", products::router())
        .nest("/shops", shops::router())
        .nest("/cart", cart::router())
        .nest("/wishlist", wishlist::router())
        .nest("/reviews", reviews::router())
        .nest("/opinions", opinions::router())
        .nest("/orders", orders::router())
        .nest("/dashboard", dashboard::router())
}
