use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::{ErrorResponse, HealthResponse};
use crate::handlers;
use crate::models::{
    AboutPage, AddToCartQuery, ChangePasswordForm, CheckoutForm, CheckoutPage, ContactForm,
    ContactFormPage, ContactPage, EditProfileForm, ForgotPasswordForm, HomePage, LoginForm,
    MessageResponse, OrderListResponse, ProductDetailsResponse, ProductListQuery,
    ProductListResponse, ProductReviewPage, ProfileResponse, PromoForm, RegisterForm,
    ResetCodeForm, ResetPasswordForm, ResetSentPage, ResetStatusPage, ReviewForm, ReviewableLine,
    SearchQuery, SearchResponse, SessionResponse, SubscribeForm, ToggleWishlistForm,
    ToggleWishlistResponse, UpdateCartForm, WishlistResponse,
};
use crate::store::{CartSummary, Order, OrderStatus, PricedLine, Product, Review};

/// Registers the `bearer` scheme referenced by signed-in endpoints.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "storefront API",
        version = "1.0.0",
        description = "An online store: catalog, accounts, cart, checkout, reviews, wishlist and password reset"
    ),
    paths(
        handlers::health::health_handler,
        handlers::pages::home,
        handlers::pages::about,
        handlers::pages::contact,
        handlers::pages::contact_us_form,
        handlers::pages::contact_us_submit,
        handlers::pages::subscribe,
        handlers::products::products,
        handlers::products::products_by_category,
        handlers::products::product_details,
        handlers::products::search_product,
        handlers::account::profile_page,
        handlers::account::edit_profile_page,
        handlers::account::edit_profile_submit,
        handlers::account::change_password,
        handlers::cart::cart_view,
        handlers::cart::add_to_cart,
        handlers::cart::update_cart,
        handlers::cart::remove_from_cart,
        handlers::cart::apply_promo,
        handlers::orders::checkout_view,
        handlers::orders::place_order,
        handlers::orders::order_success_page,
        handlers::orders::orders_page,
        handlers::orders::order_details_view,
        handlers::reviews::product_review_view,
        handlers::reviews::add_review,
        handlers::wishlist::add_to_wishlist,
        handlers::wishlist::remove_from_wishlist,
        handlers::wishlist::wishlist_page,
        handlers::wishlist::toggle_wishlist,
        handlers::sessions::login,
        handlers::sessions::register,
        handlers::sessions::logout,
        handlers::password_reset::forgot_password,
        handlers::password_reset::password_reset_sent,
        handlers::password_reset::enter_reset_code,
        handlers::password_reset::reset_password_page,
        handlers::password_reset::reset_password_submit
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            HomePage,
            AboutPage,
            ContactPage,
            ContactFormPage,
            ContactForm,
            SubscribeForm,
            MessageResponse,
            Product,
            ProductListQuery,
            ProductListResponse,
            ProductDetailsResponse,
            Review,
            SearchQuery,
            SearchResponse,
            ProfileResponse,
            EditProfileForm,
            ChangePasswordForm,
            PricedLine,
            CartSummary,
            AddToCartQuery,
            UpdateCartForm,
            PromoForm,
            CheckoutPage,
            CheckoutForm,
            Order,
            OrderStatus,
            OrderListResponse,
            ReviewableLine,
            ProductReviewPage,
            ReviewForm,
            WishlistResponse,
            ToggleWishlistForm,
            ToggleWishlistResponse,
            LoginForm,
            RegisterForm,
            SessionResponse,
            ForgotPasswordForm,
            ResetSentPage,
            ResetCodeForm,
            ResetStatusPage,
            ResetPasswordForm
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "pages", description = "Home, about and contact pages, newsletter"),
        (name = "products", description = "Catalog browsing and search"),
        (name = "account", description = "Profile and password management"),
        (name = "cart", description = "Shopping cart and promo codes"),
        (name = "orders", description = "Checkout and order history"),
        (name = "reviews", description = "Product reviews"),
        (name = "wishlist", description = "Wishlist operations"),
        (name = "auth", description = "Sign in, registration and sign out"),
        (name = "password-reset", description = "Emailed code password reset")
    )
)]
pub struct ApiDoc;
