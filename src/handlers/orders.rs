use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::Json,
};
use chrono::{NaiveDateTime, Utc};
use model::entities::{order, order_item, product, user};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::handlers::products::ProductResponse;
use crate::schemas::{AppState, ErrorResponse};
use crate::token;

/// A (product, quantity) pair in an order request
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub product_id: i32,
    pub quantity: i32,
}

/// Request body for placing an order
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    /// Delivery address
    #[serde(default)]
    pub address: String,
    /// Order total; must equal the sum of line-item price x quantity
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub total: Option<Decimal>,
    /// Ordered line items
    #[serde(default)]
    pub items: Vec<OrderLineRequest>,
}

/// A line item with full nested product detail
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub product: ProductResponse,
    pub quantity: i32,
}

/// Order response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: i32,
    pub address: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total: Decimal,
    pub created_at: NaiveDateTime,
    pub items: Vec<OrderLineResponse>,
}

/// Place an order
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed successfully", body = OrderResponse),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 404, description = "Referenced product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn place_order(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    debug!(
        "Placing order with {} line items to address: {}",
        request.items.len(),
        request.address
    );

    // Validation never touches storage
    if request.items.is_empty() {
        return Err(ApiError::validation(
            "EMPTY_CART",
            "Order must contain at least one item",
        ));
    }
    if request.address.trim().is_empty() {
        return Err(ApiError::validation(
            "MISSING_ADDRESS",
            "Delivery address must not be blank",
        ));
    }
    let total = request.total.ok_or_else(|| {
        ApiError::validation("INVALID_TOTAL", "Order total is missing")
    })?;
    if total < Decimal::ZERO {
        return Err(ApiError::validation(
            "INVALID_TOTAL",
            "Order total must not be negative",
        ));
    }
    for line in &request.items {
        if line.quantity <= 0 {
            return Err(ApiError::validation(
                "INVALID_QUANTITY",
                format!("Quantity for product {} must be positive", line.product_id),
            ));
        }
    }

    // Resolve every referenced product up front; a miss fails the whole
    // request before anything is written.
    let mut products = Vec::with_capacity(request.items.len());
    let mut expected_total = Decimal::ZERO;
    for line in &request.items {
        let product_model = product::Entity::find_by_id(line.product_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| {
                warn!("Order rejected: product {} does not exist", line.product_id);
                ApiError::not_found(
                    "PRODUCT_NOT_FOUND",
                    format!("Product {} does not exist", line.product_id),
                )
            })?;
        expected_total += product_model.price * Decimal::from(line.quantity);
        products.push(product_model);
    }
    if expected_total != total {
        return Err(ApiError::validation(
            "TOTAL_MISMATCH",
            format!(
                "Order total {} does not match the line items (expected {})",
                total, expected_total
            ),
        ));
    }

    let user_id = current_user_id(&headers, &state).await?;

    // All-or-nothing: the header and its items commit together or not at
    // all. An early return drops the transaction, which rolls it back.
    let txn = state.db.begin().await?;

    let order_model = order::ActiveModel {
        user_id: Set(user_id),
        address: Set(request.address.clone()),
        total: Set(total),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for (line, product_model) in request.items.iter().zip(&products) {
        order_item::ActiveModel {
            order_id: Set(order_model.id),
            product_id: Set(product_model.id),
            quantity: Set(line.quantity),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    info!(
        "Order placed with ID: {}, user ID: {}, total: {}",
        order_model.id, user_id, total
    );

    let items = request
        .items
        .iter()
        .zip(products)
        .map(|(line, product_model)| OrderLineResponse {
            product: ProductResponse::from(product_model),
            quantity: line.quantity,
        })
        .collect();

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            id: order_model.id,
            user_id: order_model.user_id,
            address: order_model.address,
            total: order_model.total,
            created_at: order_model.created_at,
            items,
        }),
    ))
}

/// List the current identity's orders, newest first
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "orders",
    responses(
        (status = 200, description = "Orders retrieved successfully", body = Vec<OrderResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, headers))]
pub async fn list_orders(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let user_id = current_user_id(&headers, &state).await?;
    debug!("Fetching order history for user ID: {}", user_id);

    let orders = order::Entity::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .all(&state.db)
        .await?;

    let mut responses = Vec::with_capacity(orders.len());
    for order_model in orders {
        let items = order_item::Entity::find()
            .filter(order_item::Column::OrderId.eq(order_model.id))
            .all(&state.db)
            .await?;

        // Best-effort assembly: a line item whose product has since been
        // removed is omitted, never a failure.
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            match product::Entity::find_by_id(item.product_id)
                .one(&state.db)
                .await?
            {
                Some(product_model) => lines.push(OrderLineResponse {
                    product: ProductResponse::from(product_model),
                    quantity: item.quantity,
                }),
                None => warn!(
                    "Order {}: product {} no longer exists, omitting line item",
                    order_model.id, item.product_id
                ),
            }
        }

        responses.push(OrderResponse {
            id: order_model.id,
            user_id: order_model.user_id,
            address: order_model.address,
            total: order_model.total,
            created_at: order_model.created_at,
            items: lines,
        });
    }

    info!("Returning {} orders for user ID: {}", responses.len(), user_id);
    Ok(Json(responses))
}

/// Resolve the identity a request acts as: the bearer token's subject if
/// a valid one was presented, else the configured default identity.
async fn current_user_id(headers: &HeaderMap, state: &AppState) -> Result<i32, ApiError> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.strip_prefix("Bearer "));

    if let Some(bearer) = bearer {
        match token::verify(bearer, state.config.token_secret.as_bytes()) {
            Ok(claims) => {
                let user_model = user::Entity::find()
                    .filter(user::Column::Username.eq(claims.subject.as_str()))
                    .one(&state.db)
                    .await?;
                match user_model {
                    Some(user_model) => return Ok(user_model.id),
                    None => warn!(
                        "Token subject '{}' no longer exists, using default identity",
                        claims.subject
                    ),
                }
            }
            Err(e) => warn!("Rejected bearer token ({}), using default identity", e),
        }
    }

    Ok(state.config.default_user_id)
}
