pub mod account;
pub mod cart;
pub mod health;
pub mod orders;
pub mod pages;
pub mod password_reset;
pub mod products;
pub mod reviews;
pub mod sessions;
pub mod wishlist;

pub use health::health_handler;

use crate::error::ApiError;
use crate::routes::{self, RouteName};
use crate::state::AppState;
use axum::{
    response::Redirect,
    routing::{get, post, MethodRouter},
};

/// Handlers serving a named route, keyed by HTTP method.
pub fn method_router(name: RouteName) -> MethodRouter<AppState> {
    match name {
        RouteName::StoreHome => get(pages::home),
        RouteName::About => get(pages::about),
        RouteName::Contact => get(pages::contact),
        RouteName::ContactUs => get(pages::contact_us_form).post(pages::contact_us_submit),
        RouteName::Subscribe => post(pages::subscribe),
        RouteName::Products => get(products::products),
        RouteName::ProductsByCategory => get(products::products_by_category),
        RouteName::ProductDetails => get(products::product_details),
        RouteName::SearchProduct => get(products::search_product),
        RouteName::ProfilePage => get(account::profile_page),
        RouteName::EditProfilePage => {
            get(account::edit_profile_page).post(account::edit_profile_submit)
        }
        RouteName::ChangePassword => post(account::change_password),
        RouteName::CartView => get(cart::cart_view),
        RouteName::AddToCart => post(cart::add_to_cart),
        RouteName::UpdateCart => post(cart::update_cart),
        RouteName::RemoveFromCart => post(cart::remove_from_cart),
        RouteName::ApplyPromo => post(cart::apply_promo),
        RouteName::CheckoutView => get(orders::checkout_view).post(orders::place_order),
        RouteName::OrderSuccessPage => get(orders::order_success_page),
        RouteName::OrdersPage => get(orders::orders_page),
        RouteName::OrderDetailsView => get(orders::order_details_view),
        RouteName::ProductReviewView => get(reviews::product_review_view),
        RouteName::AddReview => post(reviews::add_review),
        RouteName::AddToWishlist => post(wishlist::add_to_wishlist),
        RouteName::RemoveFromWishlist => post(wishlist::remove_from_wishlist),
        RouteName::WishlistPage => get(wishlist::wishlist_page),
        RouteName::ToggleWishlist => post(wishlist::toggle_wishlist),
        RouteName::LoginPage => post(sessions::login),
        RouteName::RegisterPage => post(sessions::register),
        RouteName::Logout => get(sessions::logout).post(sessions::logout),
        RouteName::ForgotPassword => post(password_reset::forgot_password),
        RouteName::PasswordResetSent => get(password_reset::password_reset_sent),
        RouteName::ResetPassword => get(password_reset::reset_password_page)
            .post(password_reset::reset_password_submit),
        RouteName::EnterResetCode => post(password_reset::enter_reset_code),
    }
}

/// 303 redirect to a named route.
pub(crate) fn see_other(name: RouteName, params: &[(&str, &str)]) -> Result<Redirect, ApiError> {
    let target = routes::reverse(name, params)?;
    Ok(Redirect::to(&target))
}
