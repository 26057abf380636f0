pub mod cart_service;
pub mod catalog_service;
pub mod category_service;
pub mod dashboard_service;
pub mod opinion_service;
pub mod order_service;
pub mod product_service;
pub mod review_service;
pub mod shop_service;
pub mod user_service;
pub mod wishlist_service;
