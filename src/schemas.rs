use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::config::AppConfig;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Runtime configuration (token secret/TTL, default identity)
    pub config: AppConfig,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Plain message response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    /// Response message
    pub message: String,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::register,
        crate::handlers::users::login,
        crate::handlers::products::list_products,
        crate::handlers::restaurants::list_restaurants,
        crate::handlers::restaurants::list_restaurant_products,
        crate::handlers::orders::place_order,
        crate::handlers::orders::list_orders,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            HealthResponse,
            crate::handlers::users::RegisterRequest,
            crate::handlers::users::LoginRequest,
            crate::handlers::users::TokenResponse,
            crate::handlers::products::ProductResponse,
            crate::handlers::restaurants::RestaurantResponse,
            crate::handlers::orders::PlaceOrderRequest,
            crate::handlers::orders::OrderLineRequest,
            crate::handlers::orders::OrderLineResponse,
            crate::handlers::orders::OrderResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login endpoints"),
        (name = "catalog", description = "Restaurant and product browsing endpoints"),
        (name = "orders", description = "Order placement and history endpoints"),
    ),
    info(
        title = "QuickBite API",
        description = "Food-ordering backend - registration/login, catalog browsing and order placement/history",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
