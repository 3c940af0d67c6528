use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::store::{CartSummary, Order, PricedLine, Product, Review, User};

// ---- public pages ----

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HomePage {
    pub store_name: String,
    pub categories: Vec<String>,
    pub featured_products: Vec<Product>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct AboutPage {
    pub store_name: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContactPage {
    pub store_name: String,
    pub email: String,
    pub phone: String,
}

/// Describes the fields accepted by the contact form
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ContactFormPage {
    pub fields: Vec<String>,
}

#[derive(Deserialize, Validate, utoipa::ToSchema)]
pub struct ContactForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub subject: String,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

#[derive(Deserialize, Validate, utoipa::ToSchema)]
pub struct SubscribeForm {
    #[validate(email)]
    pub email: String,
}

/// Generic acknowledgement for form submissions that do not redirect
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// ---- products ----

/// Query parameters for product listings
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ProductListQuery {
    pub sort: Option<String>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProductListResponse {
    pub category: Option<String>,
    pub products: Vec<Product>,
    pub total_count: usize,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProductDetailsResponse {
    pub product: Product,
    pub reviews: Vec<Review>,
    pub average_rating: Option<f64>,
    pub in_wishlist: bool,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub products: Vec<Product>,
    pub total_count: usize,
}

// ---- account ----

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub member_since: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        ProfileResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            address: user.address,
            member_since: user.created_at,
        }
    }
}

#[derive(Deserialize, Validate, utoipa::ToSchema)]
pub struct EditProfileForm {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

#[derive(Deserialize, Validate, utoipa::ToSchema)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

// ---- cart & checkout ----

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddToCartQuery {
    pub quantity: Option<u32>,
}

#[derive(Deserialize, Validate, utoipa::ToSchema)]
pub struct UpdateCartForm {
    pub quantity: u32,
}

#[derive(Deserialize, Validate, utoipa::ToSchema)]
pub struct PromoForm {
    pub code: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct CheckoutPage {
    pub cart: CartSummary,
    pub shipping_address: String,
}

#[derive(Deserialize, Default, Validate, utoipa::ToSchema)]
pub struct CheckoutForm {
    pub shipping_address: Option<String>,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<Order>,
    pub total_count: usize,
}

// ---- reviews ----

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReviewableLine {
    #[serde(flatten)]
    pub line: PricedLine,
    pub reviewed: bool,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProductReviewPage {
    pub order_id: String,
    pub lines: Vec<ReviewableLine>,
}

#[derive(Deserialize, Validate, utoipa::ToSchema)]
pub struct ReviewForm {
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub comment: String,
}

// ---- wishlist ----

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct WishlistResponse {
    pub products: Vec<Product>,
    pub total_count: usize,
}

#[derive(Deserialize, Validate, utoipa::ToSchema)]
pub struct ToggleWishlistForm {
    pub product_id: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ToggleWishlistResponse {
    pub product_id: String,
    pub in_wishlist: bool,
}

// ---- authentication ----

#[derive(Deserialize, Validate, utoipa::ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Validate, utoipa::ToSchema)]
pub struct RegisterForm {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub username: String,
}

// ---- password reset ----

#[derive(Deserialize, Validate, utoipa::ToSchema)]
pub struct ForgotPasswordForm {
    #[validate(email)]
    pub email: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ResetSentPage {
    pub reset_id: String,
    pub email: String,
    pub expires_at: String,
}

#[derive(Deserialize, Validate, utoipa::ToSchema)]
pub struct ResetCodeForm {
    pub reset_id: String,
    pub code: String,
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ResetStatusPage {
    pub reset_id: String,
    pub verified: bool,
    pub expired: bool,
    pub used: bool,
}

#[derive(Deserialize, Validate, utoipa::ToSchema)]
pub struct ResetPasswordForm {
    pub new_password: String,
    pub confirm_password: String,
}
