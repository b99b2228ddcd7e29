use axum::{
    extract::{Path, State},
    response::Json,
};
use model::entities::{product, restaurant};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::handlers::products::ProductResponse;
use crate::schemas::AppState;

/// Restaurant response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub address: Option<String>,
}

impl From<restaurant::Model> for RestaurantResponse {
    fn from(model: restaurant::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            logo_url: model.logo_url,
            address: model.address,
        }
    }
}

/// List all restaurants
#[utoipa::path(
    get,
    path = "/api/v1/restaurants",
    tag = "catalog",
    responses(
        (status = 200, description = "Restaurants retrieved successfully", body = Vec<RestaurantResponse>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn list_restaurants(
    State(state): State<AppState>,
) -> Result<Json<Vec<RestaurantResponse>>, ApiError> {
    debug!("Fetching all restaurants from database");

    let restaurants = restaurant::Entity::find().all(&state.db).await?;

    info!("Returning {} restaurants", restaurants.len());
    Ok(Json(
        restaurants
            .into_iter()
            .map(RestaurantResponse::from)
            .collect(),
    ))
}

/// List the products of a specific restaurant
#[utoipa::path(
    get,
    path = "/api/v1/restaurants/{restaurant_id}/products",
    tag = "catalog",
    params(
        ("restaurant_id" = i32, Path, description = "Restaurant ID"),
    ),
    responses(
        (status = 200, description = "Products retrieved successfully", body = Vec<ProductResponse>),
        (status = 404, description = "Restaurant not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn list_restaurant_products(
    Path(restaurant_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    debug!("Fetching products for restaurant ID: {}", restaurant_id);

    // Validate the restaurant exists before filtering
    let existing = restaurant::Entity::find_by_id(restaurant_id)
        .one(&state.db)
        .await?;
    if existing.is_none() {
        warn!("Restaurant with ID {} not found", restaurant_id);
        return Err(ApiError::not_found(
            "RESTAURANT_NOT_FOUND",
            format!("Restaurant {} does not exist", restaurant_id),
        ));
    }

    let products = product::Entity::find()
        .filter(product::Column::RestaurantId.eq(restaurant_id))
        .all(&state.db)
        .await?;

    info!(
        "Returning {} products for restaurant ID: {}",
        products.len(),
        restaurant_id
    );
    Ok(Json(
        products.into_iter().map(ProductResponse::from).collect(),
    ))
}
