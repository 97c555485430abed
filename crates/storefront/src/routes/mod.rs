//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check (catalog readable)
//!
//! # Catalog (JSON, unauthenticated)
//! GET    /products             - All products
//! POST   /products             - Create product (201)
//! GET    /products/{id}        - Single product
//! PUT    /products/{id}        - Update product
//! DELETE /products/{id}        - Delete product
//!
//! # Menu
//! GET  /menu?lang=uz|ru        - Catalog grouped by category, localized
//!
//! # Cart (session)
//! GET  /cart                   - Cart contents and total
//! GET  /cart/count             - Item count badge
//! POST /cart/add               - Add one unit `{productId}`
//! POST /cart/remove            - Remove one unit `{productId}`
//!
//! # Orders
//! POST /orders                 - Place order (rate limited)
//! ```

pub mod cart;
pub mod menu;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::order_rate_limiter;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create))
        .layer(order_rate_limiter())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Product routes
        .nest("/products", product_routes())
        // Menu
        .route("/menu", get(menu::index))
        // Cart routes
        .nest("/cart", cart_routes())
        // Orders
        .nest("/orders", order_routes())
}
