use crate::handlers::{
    health::health_check,
    orders::{list_orders, place_order},
    products::list_products,
    restaurants::{list_restaurant_products, list_restaurants},
    users::{login, register},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    Router,
    routing::{get, post},
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Identity routes
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        // Catalog routes
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/restaurants", get(list_restaurants))
        .route(
            "/api/v1/restaurants/:restaurant_id/products",
            get(list_restaurant_products),
        )
        // Order routes
        .route("/api/v1/orders", post(place_order))
        .route("/api/v1/orders", get(list_orders))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
