use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Domain-level failures reported by the store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("{0}")]
    Conflict(String),
    #[error("only {available} of product {product_id} in stock")]
    OutOfStock { product_id: String, available: u32 },
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Invalid(String),
}

fn not_found(entity: &'static str, id: &str) -> StoreError {
    StoreError::NotFound {
        entity,
        id: id.to_string(),
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price_cents: i64,
    pub stock: u32,
    pub created_at: DateTime<Utc>,
}

/// Fields for a product about to be inserted
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price_cents: i64,
    pub stock: u32,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Profile fields a user may edit. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoCode {
    pub code: String,
    pub percent_off: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    pub promo: Option<PromoCode>,
}

impl Cart {
    fn line_mut(&mut self, product_id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.product_id == product_id)
    }
}

/// A cart line priced against the current catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PricedLine {
    pub product_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CartSummary {
    pub lines: Vec<PricedLine>,
    pub item_count: u32,
    pub subtotal_cents: i64,
    pub promo_code: Option<String>,
    pub discount_cents: i64,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Placed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Order {
    pub id: String,
    #[serde(skip)]
    pub user_id: String,
    pub lines: Vec<PricedLine>,
    pub subtotal_cents: i64,
    pub promo_code: Option<String>,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub shipping_address: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Review {
    pub id: String,
    pub product_id: String,
    #[serde(skip)]
    pub user_id: String,
    pub username: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReset {
    pub id: String,
    pub user_id: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub verified: bool,
    pub used: bool,
}

impl PasswordReset {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Sort order options for product listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
}

impl ProductSort {
    pub const VALUES: &'static str = "newest, price_asc, price_desc, name";

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(ProductSort::Newest),
            "price_asc" => Some(ProductSort::PriceAsc),
            "price_desc" => Some(ProductSort::PriceDesc),
            "name" => Some(ProductSort::Name),
            _ => None,
        }
    }

    fn sort(self, products: &mut [Product]) {
        match self {
            ProductSort::Newest => products.sort_by(|a, b| {
                b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id))
            }),
            ProductSort::PriceAsc => products.sort_by(|a, b| {
                a.price_cents.cmp(&b.price_cents).then_with(|| a.name.cmp(&b.name))
            }),
            ProductSort::PriceDesc => products.sort_by(|a, b| {
                b.price_cents.cmp(&a.price_cents).then_with(|| a.name.cmp(&b.name))
            }),
            ProductSort::Name => {
                products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            }
        }
    }
}

#[derive(Default)]
struct StoreData {
    products: Vec<Product>,
    users: HashMap<String, User>,
    sessions: HashMap<String, String>,
    carts: HashMap<String, Cart>,
    orders: Vec<Order>,
    reviews: Vec<Review>,
    wishlists: HashMap<String, Vec<String>>,
    password_resets: HashMap<String, PasswordReset>,
    subscribers: BTreeSet<String>,
    contact_messages: Vec<ContactMessage>,
}

impl StoreData {
    fn product(&self, id: &str) -> Result<&Product, StoreError> {
        self.products
            .iter()
            .find(|product| product.id == id)
            .ok_or_else(|| not_found("Product", id))
    }

    fn user_mut(&mut self, id: &str) -> Result<&mut User, StoreError> {
        self.users.get_mut(id).ok_or_else(|| not_found("User", id))
    }

    /// Returns how many sessions were ended.
    fn end_sessions_of(&mut self, user_id: &str) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, owner| owner != user_id);
        before - self.sessions.len()
    }

    fn email_taken(&self, email: &str, except_user: Option<&str>) -> bool {
        self.users.values().any(|user| {
            user.email.eq_ignore_ascii_case(email) && Some(user.id.as_str()) != except_user
        })
    }

    fn summarize(&self, cart: &Cart) -> CartSummary {
        let lines: Vec<PricedLine> = cart
            .lines
            .iter()
            .filter_map(|line| {
                let product = self.product(&line.product_id).ok()?;
                Some(PricedLine {
                    product_id: product.id.clone(),
                    name: product.name.clone(),
                    unit_price_cents: product.price_cents,
                    quantity: line.quantity,
                    line_total_cents: product.price_cents * i64::from(line.quantity),
                })
            })
            .collect();

        let subtotal_cents: i64 = lines.iter().map(|line| line.line_total_cents).sum();
        let discount_cents = cart
            .promo
            .as_ref()
            .map(|promo| subtotal_cents * i64::from(promo.percent_off) / 100)
            .unwrap_or(0);

        CartSummary {
            item_count: lines.iter().map(|line| line.quantity).sum(),
            lines,
            subtotal_cents,
            promo_code: cart.promo.as_ref().map(|promo| promo.code.clone()),
            discount_cents,
            total_cents: subtotal_cents - discount_cents,
        }
    }
}

/// Shareable in-memory store for use across async handlers
///
/// Every operation takes the lock once, so each call is atomic with respect
/// to the others. The lock is never held across an `.await`.
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<StoreData>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of products in the catalog, reported by the health endpoint.
    pub fn health_check(&self) -> usize {
        self.inner.read().products.len()
    }

    // ---- catalog ----

    pub fn insert_product(&self, new: NewProduct) -> Product {
        let product = Product {
            id: new.id.unwrap_or_else(new_id),
            name: new.name,
            description: new.description,
            category: new.category,
            price_cents: new.price_cents,
            stock: new.stock,
            created_at: Utc::now(),
        };
        let mut data = self.inner.write();
        data.products.retain(|existing| existing.id != product.id);
        data.products.push(product.clone());
        tracing::debug!("Inserted product with id: {}", product.id);
        product
    }

    /// Load a small fixed catalog so a fresh instance has something to browse.
    pub fn seed_demo_catalog(&self) {
        let catalog: [(&str, &str, &str, &str, i64, u32); 8] = [
            ("1001", "Trail Runner", "Lightweight trail running shoe", "shoes", 8999, 25),
            ("1002", "City Sneaker", "Everyday canvas sneaker", "shoes", 5499, 40),
            ("1003", "Rain Shell", "Packable waterproof jacket", "clothing", 12900, 12),
            ("1004", "Merino Tee", "Breathable merino wool t-shirt", "clothing", 4500, 60),
            ("1005", "Day Pack", "20 litre everyday backpack", "accessories", 7000, 18),
            ("1006", "Steel Bottle", "Insulated 750ml water bottle", "accessories", 2500, 100),
            ("1007", "Field Guide", "Guide to local hiking trails", "books", 1999, 30),
            ("1008", "Camp Cookbook", "Recipes for the outdoors", "books", 2450, 0),
        ];

        for (id, name, description, category, price_cents, stock) in catalog {
            self.insert_product(NewProduct {
                id: Some(id.to_string()),
                name: name.to_string(),
                description: description.to_string(),
                category: category.to_string(),
                price_cents,
                stock,
            });
        }
        tracing::info!("Seeded demo catalog with {} products", catalog.len());
    }

    pub fn product(&self, id: &str) -> Result<Product, StoreError> {
        self.inner.read().product(id).cloned()
    }

    /// Products in `category` (case-insensitive), or all products.
    pub fn list_products(&self, category: Option<&str>, sort: ProductSort) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .inner
            .read()
            .products
            .iter()
            .filter(|product| category.is_none_or(|c| product.category.eq_ignore_ascii_case(c)))
            .cloned()
            .collect();
        sort.sort(&mut products);
        products
    }

    /// Case-insensitive substring search over name, description and category.
    pub fn search_products(&self, query: &str) -> Vec<Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let mut products: Vec<Product> = self
            .inner
            .read()
            .products
            .iter()
            .filter(|product| {
                product.name.to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
                    || product.category.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        ProductSort::Name.sort(&mut products);
        products
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<String> {
        let data = self.inner.read();
        let categories: BTreeSet<String> = data
            .products
            .iter()
            .map(|product| product.category.to_lowercase())
            .collect();
        categories.into_iter().collect()
    }

    // ---- users & sessions ----

    pub fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut data = self.inner.write();
        if data
            .users
            .values()
            .any(|user| user.username.eq_ignore_ascii_case(&new.username))
        {
            return Err(StoreError::Conflict(format!(
                "Username already taken: {}",
                new.username
            )));
        }
        if data.email_taken(&new.email, None) {
            return Err(StoreError::Conflict(format!(
                "Email already registered: {}",
                new.email
            )));
        }

        let user = User {
            id: new_id(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            first_name: String::new(),
            last_name: String::new(),
            phone: String::new(),
            address: String::new(),
            created_at: Utc::now(),
        };
        data.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    pub fn user(&self, id: &str) -> Result<User, StoreError> {
        self.inner
            .read()
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| not_found("User", id))
    }

    pub fn user_by_username(&self, username: &str) -> Option<User> {
        self.inner
            .read()
            .users
            .values()
            .find(|user| user.username.eq_ignore_ascii_case(username))
            .cloned()
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.inner
            .read()
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned()
    }

    pub fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<User, StoreError> {
        let mut data = self.inner.write();
        if let Some(email) = &update.email {
            if data.email_taken(email, Some(user_id)) {
                return Err(StoreError::Conflict(format!(
                    "Email already registered: {}",
                    email
                )));
            }
        }

        let user = data.user_mut(user_id)?;
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(first_name) = update.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            user.last_name = last_name;
        }
        if let Some(phone) = update.phone {
            user.phone = phone;
        }
        if let Some(address) = update.address {
            user.address = address;
        }
        Ok(user.clone())
    }

    pub fn set_password_hash(
        &self,
        user_id: &str,
        password_hash: String,
    ) -> Result<(), StoreError> {
        let mut data = self.inner.write();
        data.user_mut(user_id)?.password_hash = password_hash;
        Ok(())
    }

    pub fn create_session(&self, user_id: &str, token: String) {
        self.inner.write().sessions.insert(token, user_id.to_string());
    }

    pub fn session_user(&self, token: &str) -> Option<User> {
        let data = self.inner.read();
        let user_id = data.sessions.get(token)?;
        data.users.get(user_id).cloned()
    }

    /// Returns whether a session was removed.
    pub fn end_session(&self, token: &str) -> bool {
        self.inner.write().sessions.remove(token).is_some()
    }

    // ---- cart ----

    pub fn cart_summary(&self, user_id: &str) -> CartSummary {
        let data = self.inner.read();
        let cart = data.carts.get(user_id).cloned().unwrap_or_default();
        data.summarize(&cart)
    }

    /// Add `quantity` units of a product to the user's cart.
    pub fn add_to_cart(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<CartSummary, StoreError> {
        if quantity == 0 {
            return Err(StoreError::Invalid("Quantity must be at least 1".to_string()));
        }
        let mut data = self.inner.write();
        let available = data.product(product_id)?.stock;

        let cart = data.carts.entry(user_id.to_string()).or_default();
        let current = cart.line_mut(product_id).map_or(0, |line| line.quantity);
        // Stock bounds the whole line, not just the units being added.
        let wanted = current.saturating_add(quantity);
        if wanted > available {
            return Err(StoreError::OutOfStock {
                product_id: product_id.to_string(),
                available,
            });
        }

        match cart.line_mut(product_id) {
            Some(line) => line.quantity = wanted,
            None => cart.lines.push(CartLine {
                product_id: product_id.to_string(),
                quantity: wanted,
            }),
        }

        let cart = cart.clone();
        Ok(data.summarize(&cart))
    }

    /// Set the quantity of an existing cart line; zero removes it.
    pub fn set_cart_quantity(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<CartSummary, StoreError> {
        let mut data = self.inner.write();
        let available = data.product(product_id)?.stock;

        let cart = data.carts.entry(user_id.to_string()).or_default();
        let Some(index) = cart
            .lines
            .iter()
            .position(|line| line.product_id == product_id)
        else {
            return Err(not_found("Cart item", product_id));
        };

        if quantity == 0 {
            cart.lines.remove(index);
        } else if quantity > available {
            return Err(StoreError::OutOfStock {
                product_id: product_id.to_string(),
                available,
            });
        } else {
            cart.lines[index].quantity = quantity;
        }

        let cart = cart.clone();
        Ok(data.summarize(&cart))
    }

    pub fn remove_from_cart(
        &self,
        user_id: &str,
        product_id: &str,
    ) -> Result<CartSummary, StoreError> {
        let mut data = self.inner.write();
        let cart = data.carts.entry(user_id.to_string()).or_default();
        let before = cart.lines.len();
        cart.lines.retain(|line| line.product_id != product_id);
        if cart.lines.len() == before {
            return Err(not_found("Cart item", product_id));
        }

        let cart = cart.clone();
        Ok(data.summarize(&cart))
    }

    pub fn apply_promo(&self, user_id: &str, promo: PromoCode) -> Result<CartSummary, StoreError> {
        let mut data = self.inner.write();
        let cart = data.carts.entry(user_id.to_string()).or_default();
        if cart.lines.is_empty() {
            return Err(StoreError::Invalid(
                "Cannot apply a promo code to an empty cart".to_string(),
            ));
        }
        cart.promo = Some(promo);

        let cart = cart.clone();
        Ok(data.summarize(&cart))
    }

    // ---- orders ----

    /// Turn the user's cart into an order.
    ///
    /// Stock is checked for every line before any of it is decremented, so a
    /// shortfall leaves catalog and cart untouched.
    pub fn place_order(&self, user_id: &str, shipping_address: &str) -> Result<Order, StoreError> {
        let mut data = self.inner.write();
        let cart = data.carts.get(user_id).cloned().unwrap_or_default();
        if cart.lines.is_empty() {
            return Err(StoreError::Invalid("Cart is empty".to_string()));
        }

        for line in &cart.lines {
            let product = data.product(&line.product_id)?;
            if line.quantity > product.stock {
                return Err(StoreError::OutOfStock {
                    product_id: product.id.clone(),
                    available: product.stock,
                });
            }
        }

        let summary = data.summarize(&cart);
        for line in &cart.lines {
            if let Some(product) = data
                .products
                .iter_mut()
                .find(|product| product.id == line.product_id)
            {
                product.stock -= line.quantity;
            }
        }

        let order = Order {
            id: new_id(),
            user_id: user_id.to_string(),
            lines: summary.lines,
            subtotal_cents: summary.subtotal_cents,
            promo_code: summary.promo_code,
            discount_cents: summary.discount_cents,
            total_cents: summary.total_cents,
            shipping_address: shipping_address.to_string(),
            status: OrderStatus::Placed,
            created_at: Utc::now(),
        };
        data.orders.push(order.clone());
        data.carts.remove(user_id);
        Ok(order)
    }

    /// The user's orders, newest first.
    pub fn orders_for(&self, user_id: &str) -> Vec<Order> {
        self.inner
            .read()
            .orders
            .iter()
            .rev()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn latest_order(&self, user_id: &str) -> Option<Order> {
        self.inner
            .read()
            .orders
            .iter()
            .rev()
            .find(|order| order.user_id == user_id)
            .cloned()
    }

    /// An order owned by `user_id`. Orders of other users read as missing.
    pub fn order(&self, user_id: &str, order_id: &str) -> Result<Order, StoreError> {
        self.inner
            .read()
            .orders
            .iter()
            .find(|order| order.id == order_id && order.user_id == user_id)
            .cloned()
            .ok_or_else(|| not_found("Order", order_id))
    }

    // ---- reviews ----

    /// Create or replace the user's review of a product they have ordered.
    pub fn upsert_review(
        &self,
        user: &User,
        product_id: &str,
        rating: u8,
        comment: String,
    ) -> Result<Review, StoreError> {
        let mut data = self.inner.write();
        data.product(product_id)?;

        let purchased = data.orders.iter().any(|order| {
            order.user_id == user.id && order.lines.iter().any(|line| line.product_id == product_id)
        });
        if !purchased {
            return Err(StoreError::Forbidden(
                "Only customers who ordered this product can review it".to_string(),
            ));
        }

        let review = Review {
            id: new_id(),
            product_id: product_id.to_string(),
            user_id: user.id.clone(),
            username: user.username.clone(),
            rating,
            comment,
            created_at: Utc::now(),
        };
        data.reviews
            .retain(|existing| !(existing.user_id == user.id && existing.product_id == product_id));
        data.reviews.push(review.clone());
        Ok(review)
    }

    /// Reviews of a product, newest first.
    pub fn reviews_for(&self, product_id: &str) -> Vec<Review> {
        self.inner
            .read()
            .reviews
            .iter()
            .rev()
            .filter(|review| review.product_id == product_id)
            .cloned()
            .collect()
    }

    pub fn reviewed_products(&self, user_id: &str) -> HashSet<String> {
        self.inner
            .read()
            .reviews
            .iter()
            .filter(|review| review.user_id == user_id)
            .map(|review| review.product_id.clone())
            .collect()
    }

    // ---- wishlist ----

    /// Wishlist products in the order they were added.
    pub fn wishlist(&self, user_id: &str) -> Vec<Product> {
        let data = self.inner.read();
        data.wishlists
            .get(user_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| data.product(id).ok().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn in_wishlist(&self, user_id: &str, product_id: &str) -> bool {
        self.inner
            .read()
            .wishlists
            .get(user_id)
            .is_some_and(|ids| ids.iter().any(|id| id == product_id))
    }

    /// Returns whether the product was newly added.
    pub fn add_to_wishlist(&self, user_id: &str, product_id: &str) -> Result<bool, StoreError> {
        let mut data = self.inner.write();
        data.product(product_id)?;
        let ids = data.wishlists.entry(user_id.to_string()).or_default();
        if ids.iter().any(|id| id == product_id) {
            return Ok(false);
        }
        ids.push(product_id.to_string());
        Ok(true)
    }

    /// Returns whether the product was on the wishlist.
    pub fn remove_from_wishlist(&self, user_id: &str, product_id: &str) -> bool {
        let mut data = self.inner.write();
        let Some(ids) = data.wishlists.get_mut(user_id) else {
            return false;
        };
        let before = ids.len();
        ids.retain(|id| id != product_id);
        ids.len() != before
    }

    /// Flip wishlist membership; returns the new membership.
    pub fn toggle_wishlist(&self, user_id: &str, product_id: &str) -> Result<bool, StoreError> {
        let mut data = self.inner.write();
        if let Some(ids) = data.wishlists.get_mut(user_id) {
            if let Some(position) = ids.iter().position(|id| id == product_id) {
                ids.remove(position);
                return Ok(false);
            }
        }

        data.product(product_id)?;
        data.wishlists
            .entry(user_id.to_string())
            .or_default()
            .push(product_id.to_string());
        Ok(true)
    }

    // ---- password resets ----

    pub fn create_password_reset(
        &self,
        user_id: &str,
        code: String,
        ttl: Duration,
    ) -> PasswordReset {
        let created_at = Utc::now();
        let reset = PasswordReset {
            id: new_id(),
            user_id: user_id.to_string(),
            code,
            created_at,
            expires_at: created_at + ttl,
            verified: false,
            used: false,
        };
        self.inner
            .write()
            .password_resets
            .insert(reset.id.clone(), reset.clone());
        reset
    }

    pub fn password_reset(&self, reset_id: &str) -> Result<PasswordReset, StoreError> {
        self.inner
            .read()
            .password_resets
            .get(reset_id)
            .cloned()
            .ok_or_else(|| not_found("Password reset", reset_id))
    }

    /// Check a submitted reset code and mark the request verified.
    pub fn verify_reset_code(
        &self,
        reset_id: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<PasswordReset, StoreError> {
        let mut data = self.inner.write();
        let reset = data
            .password_resets
            .get_mut(reset_id)
            .ok_or_else(|| not_found("Password reset", reset_id))?;

        if reset.used {
            return Err(StoreError::Invalid("Reset code already used".to_string()));
        }
        if reset.is_expired(now) {
            return Err(StoreError::Invalid("Reset code expired".to_string()));
        }
        if reset.code != code.trim() {
            return Err(StoreError::Invalid("Invalid reset code".to_string()));
        }
        reset.verified = true;
        Ok(reset.clone())
    }

    /// Set a new password through a verified reset request and end every
    /// session of its user. Returns the user id.
    pub fn complete_password_reset(
        &self,
        reset_id: &str,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Result<String, StoreError> {
        let mut data = self.inner.write();
        let reset = data
            .password_resets
            .get_mut(reset_id)
            .ok_or_else(|| not_found("Password reset", reset_id))?;

        if reset.used {
            return Err(StoreError::Invalid("Reset request already used".to_string()));
        }
        if reset.is_expired(now) {
            return Err(StoreError::Invalid("Reset request expired".to_string()));
        }
        if !reset.verified {
            return Err(StoreError::Invalid(
                "Reset code has not been verified".to_string(),
            ));
        }
        reset.used = true;
        let user_id = reset.user_id.clone();

        data.user_mut(&user_id)?.password_hash = password_hash;
        let ended = data.end_sessions_of(&user_id);
        tracing::debug!("Ended {} sessions for user id {}", ended, user_id);
        Ok(user_id)
    }

    // ---- newsletter & contact ----

    /// Returns whether the address was newly subscribed.
    pub fn subscribe(&self, email: &str) -> bool {
        self.inner.write().subscribers.insert(email.trim().to_lowercase())
    }

    pub fn add_contact_message(
        &self,
        name: String,
        email: String,
        subject: String,
        message: String,
    ) -> ContactMessage {
        let message = ContactMessage {
            id: new_id(),
            name,
            email,
            subject,
            message,
            created_at: Utc::now(),
        };
        self.inner.write().contact_messages.push(message.clone());
        message
    }

    #[cfg(test)]
    pub fn contact_messages(&self) -> Vec<ContactMessage> {
        self.inner.read().contact_messages.clone()
    }
}
