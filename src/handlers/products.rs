use axum::{extract::State, response::Json};
use model::entities::product;
use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::schemas::AppState;

/// Product response model. Wire names are camelCase; storage names stay
/// snake_case. The serde rename is the single mapping point.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub restaurant_id: i32,
}

impl From<product::Model> for ProductResponse {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            description: model.description,
            image_url: model.image_url,
            restaurant_id: model.restaurant_id,
        }
    }
}

/// List all products
#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "catalog",
    responses(
        (status = 200, description = "Products retrieved successfully", body = Vec<ProductResponse>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    debug!("Fetching all products from database");

    let products = product::Entity::find().all(&state.db).await?;

    info!("Returning {} products", products.len());
    Ok(Json(
        products.into_iter().map(ProductResponse::from).collect(),
    ))
}
