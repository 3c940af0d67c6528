// Route path constants - single source of truth for all storefront paths

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const HEALTH: &str = "/health";

// Public pages
pub const STORE_HOME: &str = "/";
pub const ABOUT: &str = "/about/";
pub const CONTACT: &str = "/contact/";
pub const CONTACT_US: &str = "/contact_us/";
pub const SUBSCRIBE: &str = "/subscribe/";

// Product listings & search
pub const PRODUCTS: &str = "/products/";
pub const PRODUCTS_BY_CATEGORY: &str = "/products/{category}/";
pub const PRODUCT_DETAILS: &str = "/product-details/{product_id}/";
pub const SEARCH_PRODUCT: &str = "/search-product/";

// Account
pub const PROFILE_PAGE: &str = "/profile-page/";
pub const EDIT_PROFILE_PAGE: &str = "/edit-profile-page/";
pub const CHANGE_PASSWORD: &str = "/change-password/";

// Cart
pub const CART_VIEW: &str = "/cart-view/";
pub const ADD_TO_CART: &str = "/add-to-cart/{product_id}/";
pub const UPDATE_CART: &str = "/update-cart/{product_id}/";
pub const REMOVE_FROM_CART: &str = "/remove-from-cart/{product_id}/";
pub const APPLY_PROMO: &str = "/apply-promo/";

// Checkout & orders
pub const CHECKOUT_VIEW: &str = "/checkout-view/";
pub const ORDER_SUCCESS_PAGE: &str = "/order-success-page/";
pub const ORDERS_PAGE: &str = "/orders-page/";
pub const ORDER_DETAILS_VIEW: &str = "/order-details-view/{order_id}/";

// Reviews
pub const PRODUCT_REVIEW_VIEW: &str = "/product-review-view/{order_id}/";
pub const ADD_REVIEW: &str = "/add-review/{product_id}/";

// Wishlist
pub const ADD_TO_WISHLIST: &str = "/add-to-wishlist/{product_id}/";
pub const REMOVE_FROM_WISHLIST: &str = "/remove-from-wishlist/{product_id}/";
pub const WISHLIST_PAGE: &str = "/wishlist-page/";
pub const TOGGLE_WISHLIST: &str = "/wishlist-toggle/";

// Authentication
pub const LOGIN_PAGE: &str = "/login/";
pub const REGISTER_PAGE: &str = "/register/";
pub const LOGOUT: &str = "/logout/";

// Password reset
pub const FORGOT_PASSWORD: &str = "/forgot-password/";
pub const PASSWORD_RESET_SENT: &str = "/password-reset-sent/{reset_id}/";
pub const RESET_PASSWORD: &str = "/reset-password/{reset_id}/";
pub const ENTER_RESET_CODE: &str = "/enter-reset-code/";

/// Name of a storefront route, used for reverse lookups and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    StoreHome,
    About,
    Contact,
    ContactUs,
    Subscribe,
    Products,
    ProductsByCategory,
    ProductDetails,
    SearchProduct,
    ProfilePage,
    EditProfilePage,
    ChangePassword,
    CartView,
    AddToCart,
    UpdateCart,
    RemoveFromCart,
    ApplyPromo,
    CheckoutView,
    OrderSuccessPage,
    OrdersPage,
    OrderDetailsView,
    ProductReviewView,
    AddReview,
    AddToWishlist,
    RemoveFromWishlist,
    WishlistPage,
    ToggleWishlist,
    LoginPage,
    RegisterPage,
    Logout,
    ForgotPassword,
    PasswordResetSent,
    ResetPassword,
    EnterResetCode,
}

impl RouteName {
    /// The public route name, as used in links and reverse lookups.
    pub const fn as_str(self) -> &'static str {
        match self {
            RouteName::StoreHome => "store_home",
            RouteName::About => "about",
            RouteName::Contact => "contact",
            RouteName::ContactUs => "contact_us",
            RouteName::Subscribe => "subscribe",
            RouteName::Products => "products",
            RouteName::ProductsByCategory => "products_by_category",
            RouteName::ProductDetails => "product-details",
            RouteName::SearchProduct => "search-product",
            RouteName::ProfilePage => "profile-page",
            RouteName::EditProfilePage => "edit-profile-page",
            RouteName::ChangePassword => "change-password",
            RouteName::CartView => "cart-view",
            RouteName::AddToCart => "add-to-cart",
            RouteName::UpdateCart => "update-cart",
            RouteName::RemoveFromCart => "remove-from-cart",
            RouteName::ApplyPromo => "apply-promo",
            RouteName::CheckoutView => "checkout-view",
            RouteName::OrderSuccessPage => "order-success-page",
            RouteName::OrdersPage => "orders-page",
            RouteName::OrderDetailsView => "order-details-view",
            RouteName::ProductReviewView => "product-review-view",
            RouteName::AddReview => "add-review",
            RouteName::AddToWishlist => "add-to-wishlist",
            RouteName::RemoveFromWishlist => "remove-from-wishlist",
            RouteName::WishlistPage => "wishlist-page",
            RouteName::ToggleWishlist => "toggle-wishlist",
            RouteName::LoginPage => "login-page",
            RouteName::RegisterPage => "register-page",
            RouteName::Logout => "logout",
            RouteName::ForgotPassword => "forgot-password",
            RouteName::PasswordResetSent => "password-reset-sent",
            RouteName::ResetPassword => "reset-password",
            RouteName::EnterResetCode => "enter-reset-code",
        }
    }

    /// Path pattern registered for this route.
    pub const fn pattern(self) -> &'static str {
        match self {
            RouteName::StoreHome => STORE_HOME,
            RouteName::About => ABOUT,
            RouteName::Contact => CONTACT,
            RouteName::ContactUs => CONTACT_US,
            RouteName::Subscribe => SUBSCRIBE,
            RouteName::Products => PRODUCTS,
            RouteName::ProductsByCategory => PRODUCTS_BY_CATEGORY,
            RouteName::ProductDetails => PRODUCT_DETAILS,
            RouteName::SearchProduct => SEARCH_PRODUCT,
            RouteName::ProfilePage => PROFILE_PAGE,
            RouteName::EditProfilePage => EDIT_PROFILE_PAGE,
            RouteName::ChangePassword => CHANGE_PASSWORD,
            RouteName::CartView => CART_VIEW,
            RouteName::AddToCart => ADD_TO_CART,
            RouteName::UpdateCart => UPDATE_CART,
            RouteName::RemoveFromCart => REMOVE_FROM_CART,
            RouteName::ApplyPromo => APPLY_PROMO,
            RouteName::CheckoutView => CHECKOUT_VIEW,
            RouteName::OrderSuccessPage => ORDER_SUCCESS_PAGE,
            RouteName::OrdersPage => ORDERS_PAGE,
            RouteName::OrderDetailsView => ORDER_DETAILS_VIEW,
            RouteName::ProductReviewView => PRODUCT_REVIEW_VIEW,
            RouteName::AddReview => ADD_REVIEW,
            RouteName::AddToWishlist => ADD_TO_WISHLIST,
            RouteName::RemoveFromWishlist => REMOVE_FROM_WISHLIST,
            RouteName::WishlistPage => WISHLIST_PAGE,
            RouteName::ToggleWishlist => TOGGLE_WISHLIST,
            RouteName::LoginPage => LOGIN_PAGE,
            RouteName::RegisterPage => REGISTER_PAGE,
            RouteName::Logout => LOGOUT,
            RouteName::ForgotPassword => FORGOT_PASSWORD,
            RouteName::PasswordResetSent => PASSWORD_RESET_SENT,
            RouteName::ResetPassword => RESET_PASSWORD,
            RouteName::EnterResetCode => ENTER_RESET_CODE,
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteName {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ROUTES
            .iter()
            .map(|route| route.name)
            .find(|name| name.as_str() == s)
            .ok_or_else(|| RouteError::UnknownName(s.to_string()))
    }
}

/// A (path pattern, name) binding. The handler for each name is chosen by
/// `handlers::method_router`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: RouteName,
    pub pattern: &'static str,
}

impl Route {
    /// Placeholder names in the order they appear in the pattern.
    pub fn params(&self) -> impl Iterator<Item = &'static str> {
        let pattern: &'static str = self.pattern;
        pattern.split('/').filter_map(placeholder)
    }
}

const fn entry(name: RouteName) -> Route {
    Route {
        name,
        pattern: name.pattern(),
    }
}

/// The storefront routing table. Lookups walk it in order and stop at the
/// first match.
pub const ROUTES: &[Route] = &[
    entry(RouteName::StoreHome),
    entry(RouteName::About),
    entry(RouteName::Contact),
    entry(RouteName::ContactUs),
    entry(RouteName::Subscribe),
    entry(RouteName::Products),
    entry(RouteName::ProductsByCategory),
    entry(RouteName::ProductDetails),
    entry(RouteName::SearchProduct),
    entry(RouteName::ProfilePage),
    entry(RouteName::EditProfilePage),
    entry(RouteName::ChangePassword),
    entry(RouteName::CartView),
    entry(RouteName::AddToCart),
    entry(RouteName::UpdateCart),
    entry(RouteName::RemoveFromCart),
    entry(RouteName::ApplyPromo),
    entry(RouteName::CheckoutView),
    entry(RouteName::OrderSuccessPage),
    entry(RouteName::OrdersPage),
    entry(RouteName::OrderDetailsView),
    entry(RouteName::ProductReviewView),
    entry(RouteName::AddReview),
    entry(RouteName::AddToWishlist),
    entry(RouteName::RemoveFromWishlist),
    entry(RouteName::WishlistPage),
    entry(RouteName::ToggleWishlist),
    entry(RouteName::LoginPage),
    entry(RouteName::RegisterPage),
    entry(RouteName::Logout),
    entry(RouteName::ForgotPassword),
    entry(RouteName::PasswordResetSent),
    entry(RouteName::ResetPassword),
    entry(RouteName::EnterResetCode),
];

/// Table entry for a route name.
pub const fn route(name: RouteName) -> Route {
    entry(name)
}

/// Errors from reverse lookups
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("unknown route name '{0}'")]
    UnknownName(String),
    #[error("route '{route}' requires parameter '{param}'")]
    MissingParam { route: RouteName, param: &'static str },
    #[error("route '{route}' has no parameter '{param}'")]
    UnexpectedParam { route: RouteName, param: String },
    #[error("parameter '{param}' of route '{route}' is given more than once")]
    DuplicateParam { route: RouteName, param: &'static str },
    #[error("invalid value '{value}' for parameter '{param}' of route '{route}'")]
    InvalidParamValue {
        route: RouteName,
        param: &'static str,
        value: String,
    },
}

/// Outcome of matching a request path against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub name: RouteName,
    pub params: Vec<(&'static str, String)>,
}

impl ResolvedRoute {
    #[cfg(test)]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
    }
}

fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

fn match_pattern(route: &Route, path: &str) -> Option<ResolvedRoute> {
    let pattern_segments = route.pattern.strip_prefix('/')?.split('/');
    let mut path_segments = path.strip_prefix('/')?.split('/');
    let mut params = Vec::new();

    for pattern_segment in pattern_segments {
        let segment = path_segments.next()?;
        match placeholder(pattern_segment) {
            Some(param) if !segment.is_empty() => params.push((param, segment.to_string())),
            Some(_) => return None,
            None if segment == pattern_segment => {}
            None => return None,
        }
    }

    if path_segments.next().is_some() {
        return None;
    }

    Some(ResolvedRoute {
        name: route.name,
        params,
    })
}

/// Match a request path (without query string) against the table.
///
/// Captured segments are returned verbatim; no percent-decoding is applied.
pub fn resolve(path: &str) -> Option<ResolvedRoute> {
    ROUTES.iter().find_map(|route| match_pattern(route, path))
}

/// Build the path for a named route.
///
/// Every placeholder of the route must be supplied exactly once, with a
/// non-empty value that does not contain `/`.
pub fn reverse(name: RouteName, params: &[(&str, &str)]) -> Result<String, RouteError> {
    let route = route(name);

    if let Some((unknown, _)) = params
        .iter()
        .find(|(key, _)| !route.params().any(|param| param == *key))
    {
        return Err(RouteError::UnexpectedParam {
            route: name,
            param: unknown.to_string(),
        });
    }

    let segments = route
        .pattern
        .split('/')
        .map(|segment| match placeholder(segment) {
            None => Ok(segment.to_string()),
            Some(param) => {
                let mut values = params.iter().filter(|(key, _)| *key == param);
                let (_, value) = values
                    .next()
                    .ok_or(RouteError::MissingParam { route: name, param })?;
                if values.next().is_some() {
                    return Err(RouteError::DuplicateParam { route: name, param });
                }
                if value.is_empty() || value.contains('/') {
                    return Err(RouteError::InvalidParamValue {
                        route: name,
                        param,
                        value: value.to_string(),
                    });
                }
                Ok(value.to_string())
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample_params(route: &Route) -> Vec<(&'static str, &'static str)> {
        route.params().map(|param| (param, "sample-value")).collect()
    }

    #[test]
    fn test_route_names_are_unique() {
        let names: HashSet<&str> = ROUTES.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), ROUTES.len());
        assert_eq!(ROUTES.len(), 34);
    }

    #[test]
    fn test_route_patterns_are_unique_and_well_formed() {
        let patterns: HashSet<&str> = ROUTES.iter().map(|r| r.pattern).collect();
        assert_eq!(patterns.len(), ROUTES.len());

        for route in ROUTES {
            assert!(route.pattern.starts_with('/'), "{}", route.pattern);
            assert!(route.pattern.ends_with('/'), "{}", route.pattern);
        }
    }

    #[test]
    fn test_every_pattern_resolves_to_its_own_name() {
        for route in ROUTES {
            let params = sample_params(route);
            let path = reverse(route.name, &params).unwrap();
            let resolved = resolve(&path).unwrap();

            assert_eq!(resolved.name, route.name, "path {}", path);
            assert_eq!(resolved.params.len(), params.len());
        }
    }

    #[test]
    fn test_names_parse_back() {
        for route in ROUTES {
            let parsed: RouteName = route.name.as_str().parse().unwrap();
            assert_eq!(parsed, route.name);
        }
        assert_eq!(
            "no-such-route".parse::<RouteName>(),
            Err(RouteError::UnknownName("no-such-route".to_string()))
        );
    }

    #[test]
    fn test_resolve_home() {
        let resolved = resolve("/").unwrap();
        assert_eq!(resolved.name, RouteName::StoreHome);
        assert!(resolved.params.is_empty());
    }

    #[test]
    fn test_resolve_captures_category() {
        let resolved = resolve("/products/shoes/").unwrap();
        assert_eq!(resolved.name, RouteName::ProductsByCategory);
        assert_eq!(resolved.param("category"), Some("shoes"));
    }

    #[test]
    fn test_resolve_captures_product_id() {
        let resolved = resolve("/product-details/42/").unwrap();
        assert_eq!(resolved.name, RouteName::ProductDetails);
        assert_eq!(resolved.param("product_id"), Some("42"));
        assert_eq!(resolved.param("order_id"), None);
    }

    #[test]
    fn test_resolve_distinguishes_listing_from_category() {
        assert_eq!(resolve("/products/").unwrap().name, RouteName::Products);
        assert_eq!(
            resolve("/products/books/").unwrap().name,
            RouteName::ProductsByCategory
        );
    }

    #[test]
    fn test_resolve_rejects_unknown_and_malformed_paths() {
        assert_eq!(resolve("/nonexistent/"), None);
        assert_eq!(resolve("/products/shoes"), None);
        assert_eq!(resolve("/products//"), None);
        assert_eq!(resolve("/products/shoes/extra/"), None);
        assert_eq!(resolve("products/"), None);
        assert_eq!(resolve(""), None);
    }

    #[test]
    fn test_contact_routes_stay_distinct() {
        assert_eq!(resolve("/contact/").unwrap().name, RouteName::Contact);
        assert_eq!(resolve("/contact_us/").unwrap().name, RouteName::ContactUs);
    }

    #[test]
    fn test_toggle_wishlist_name_differs_from_path() {
        assert_eq!(RouteName::ToggleWishlist.as_str(), "toggle-wishlist");
        assert_eq!(RouteName::ToggleWishlist.pattern(), "/wishlist-toggle/");
        assert_eq!(RouteName::LoginPage.pattern(), "/login/");
    }

    #[test]
    fn test_reverse_builds_paths() {
        assert_eq!(reverse(RouteName::StoreHome, &[]).unwrap(), "/");
        assert_eq!(reverse(RouteName::CartView, &[]).unwrap(), "/cart-view/");
        assert_eq!(
            reverse(RouteName::PasswordResetSent, &[("reset_id", "abc")]).unwrap(),
            "/password-reset-sent/abc/"
        );
    }

    #[test]
    fn test_reverse_parameter_errors() {
        assert_eq!(
            reverse(RouteName::AddToCart, &[]),
            Err(RouteError::MissingParam {
                route: RouteName::AddToCart,
                param: "product_id",
            })
        );
        assert_eq!(
            reverse(RouteName::CartView, &[("product_id", "1")]),
            Err(RouteError::UnexpectedParam {
                route: RouteName::CartView,
                param: "product_id".to_string(),
            })
        );
        assert!(matches!(
            reverse(RouteName::AddToCart, &[("product_id", "a/b")]),
            Err(RouteError::InvalidParamValue { .. })
        ));
        assert!(matches!(
            reverse(RouteName::AddToCart, &[("product_id", "")]),
            Err(RouteError::InvalidParamValue { .. })
        ));
        assert_eq!(
            reverse(RouteName::AddToCart, &[("product_id", "a"), ("product_id", "b")]),
            Err(RouteError::DuplicateParam {
                route: RouteName::AddToCart,
                param: "product_id",
            })
        );
        assert_eq!(
            reverse(RouteName::AddToCart, &[("product_id", "a"), ("product_id", "a")]),
            Err(RouteError::DuplicateParam {
                route: RouteName::AddToCart,
                param: "product_id",
            })
        );
    }

    #[test]
    fn test_route_params_in_order() {
        let params: Vec<_> = route(RouteName::OrderDetailsView).params().collect();
        assert_eq!(params, vec!["order_id"]);
        assert_eq!(route(RouteName::WishlistPage).params().count(), 0);
    }
}
