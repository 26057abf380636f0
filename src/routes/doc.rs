use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{
            AddressRequest, Claims, LoginRequest, RefreshTokenRequest, RegisterRequest,
            ResendOtpRequest, ResetPasswordRequest, TokenPair, UpdateAccountRequest,
            UpdateAvatarRequest, UpdatePasswordRequest, VerifyOtpRequest,
        },
        cart::{CartLine, CartView, UpdateQuantityRequest, WishlistLine, WishlistView},
        opinions::{OpinionList, OpinionRequest},
        orders::{CreateOrderRequest, OrderList, OrderWithProducts, UpdateOrderStatusRequest},
        products as product_dto,
        reviews::{AddReviewRequest, ReviewWithAuthor, ReviewWithProduct, UpdateReviewRequest},
        shops::{CreateShopRequest, ShopWithOwner, UpdateShopRequest},
    },
    models::{
        Address, Category, DeliveryDetails, Detail, Offer, Opinion, Order, Product, Review, Shop,
        User, Variation,
    },
    response::{ApiResponse, Meta},
    routes::{
        cart, dashboard, health, opinions, orders, params, products as product_routes, reviews,
        shops, users, wishlist,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::register,
        users::login,
        users::verify_otp,
        users::resend_otp,
        users::refresh_token,
        users::logout,
        users::current_user,
        users::update_password,
        users::reset_password,
        users::update_account,
        users::update_avatar,
        users::create_address,
        users::remove_address,
        product_routes::list_products,
        product_routes::autocomplete,
        product_routes::create_product,
        product_routes::get_product,
        product_routes::delete_product,
        product_routes::get_reviews,
        product_routes::update_primary_details,
        product_routes::toggle_stock,
        product_routes::update_category,
        product_routes::add_previews,
        product_routes::remove_preview,
        product_routes::add_variation,
        product_routes::update_variation,
        product_routes::delete_variation,
        product_routes::add_offer,
        product_routes::remove_offer,
        product_routes::update_detail,
        shops::create_shop,
        shops::my_shop,
        shops::get_shop_by_id,
        shops::update_my_shop,
        shops::delete_shop,
        cart::list_cart,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        wishlist::list_wishlist,
        wishlist::add_to_wishlist,
        wishlist::remove_from_wishlist,
        wishlist::clear_wishlist,
        reviews::add_review,
        reviews::my_reviews,
        reviews::update_my_review,
        reviews::delete_my_review,
        opinions::create_opinion,
        opinions::remove_opinion,
        opinions::helpful_opinions,
        orders::create_order,
        orders::list_my_orders,
        orders::get_order,
        orders::update_status,
        orders::delete_order,
        dashboard::my_products,
        dashboard::my_shop_orders,
    ),
    components(
        schemas(
            Address,
            DeliveryDetails,
            User,
            Shop,
            Category,
            Detail,
            Offer,
            Product,
            Variation,
            Review,
            Opinion,
            Order,
            RegisterRequest,
            LoginRequest,
            TokenPair,
            VerifyOtpRequest,
            ResendOtpRequest,
            RefreshTokenRequest,
            UpdatePasswordRequest,
            ResetPasswordRequest,
            UpdateAccountRequest,
            UpdateAvatarRequest,
            AddressRequest,
            Claims,
            CreateShopRequest,
            UpdateShopRequest,
            ShopWithOwner,
            UpdateQuantityRequest,
            CartLine,
            CartView,
            WishlistLine,
            WishlistView,
            AddReviewRequest,
            UpdateReviewRequest,
            ReviewWithAuthor,
            ReviewWithProduct,
            OpinionRequest,
            OpinionList,
            CreateOrderRequest,
            UpdateOrderStatusRequest,
            OrderWithProducts,
            OrderList,
            product_dto::CreateProductRequest,
            product_dto::InitialVariation,
            product_dto::UpdatePrimaryRequest,
            product_dto::UpdateCategoryRequest,
            product_dto::AddVariationRequest,
            product_dto::UpdateVariationRequest,
            product_dto::AddOfferRequest,
            product_dto::UpdateDetailRequest,
            product_dto::AddPreviewsRequest,
            product_dto::RemovePreviewRequest,
            product_dto::ProductList,
            product_dto::Suggestion,
            product_dto::OfferView,
            product_dto::CategoryChain,
            product_dto::VariationView,
            product_dto::ShopPublic,
            product_dto::DetailView,
            product_dto::ProductDetail,
            params::ProductQuery,
            params::AutocompleteQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<product_dto::ProductList>,
            ApiResponse<product_dto::ProductDetail>,
            ApiResponse<CartView>,
            ApiResponse<WishlistView>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithProducts>,
            ApiResponse<TokenPair>,
            ApiResponse<User>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Users", description = "Account, session and OTP endpoints"),
        (name = "Products", description = "Catalog search and product management"),
        (name = "Shops", description = "Shop endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Wishlist", description = "Wishlist endpoints"),
        (name = "Reviews", description = "Review endpoints"),
        (name = "Opinions", description = "Review opinion endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Dashboard", description = "Seller dashboard endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
