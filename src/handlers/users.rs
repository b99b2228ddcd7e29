use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::schemas::{AppState, ErrorResponse, MessageResponse};
use crate::token;

/// Request body for registering a new user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Username (must be unique)
    pub username: String,
    /// Password (stored as an Argon2id hash)
    pub password: String,
    /// Phone number
    pub phone: Option<String>,
    /// Email (must be unique when present)
    pub email: Option<String>,
    /// Display name
    pub name: Option<String>,
}

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Bearer token issued on successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Signed access token
    pub access_token: String,
    /// Always "bearer"
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = MessageResponse),
        (status = 400, description = "Blank username or password", body = ErrorResponse),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    debug!("Registering user with username: {}", request.username);

    if request.username.trim().is_empty() || request.password.trim().is_empty() {
        return Err(ApiError::validation(
            "BLANK_CREDENTIALS",
            "Username and password must not be blank",
        ));
    }

    // Uniqueness checks run before any write
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(request.username.as_str()))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        warn!("Registration rejected: username '{}' taken", request.username);
        return Err(ApiError::conflict(
            "USERNAME_ALREADY_EXISTS",
            format!("Username '{}' is already taken", request.username),
        ));
    }

    // Empty-string emails count as absent
    let email = request.email.filter(|e| !e.trim().is_empty());
    if let Some(email) = email.as_deref() {
        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&state.db)
            .await?;
        if existing.is_some() {
            warn!("Registration rejected: email already registered");
            return Err(ApiError::conflict(
                "EMAIL_ALREADY_REGISTERED",
                "Email is already registered".to_string(),
            ));
        }
    }

    let password_hash = hash_password(&request.password)?;

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        password_hash: Set(password_hash),
        phone: Set(request.phone),
        email: Set(email),
        name: Set(request.name),
        ..Default::default()
    };
    let user_model = new_user.insert(&state.db).await?;

    info!(
        "User registered with ID: {}, username: {}",
        user_model.id, user_model.username
    );
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Registration successful".to_string(),
        }),
    ))
}

/// Log in and receive an access token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Blank username or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    debug!("Login attempt for username: {}", request.username);

    if request.username.trim().is_empty() || request.password.trim().is_empty() {
        return Err(ApiError::validation(
            "BLANK_CREDENTIALS",
            "Username and password must not be blank",
        ));
    }

    let user_model = user::Entity::find()
        .filter(user::Column::Username.eq(request.username.as_str()))
        .one(&state.db)
        .await?;

    // Unknown user and wrong password are indistinguishable to the caller
    let Some(user_model) = user_model else {
        warn!("Login failed for username: {}", request.username);
        return Err(ApiError::InvalidCredentials);
    };
    if !verify_password(&request.password, &user_model.password_hash) {
        warn!("Login failed for username: {}", request.username);
        return Err(ApiError::InvalidCredentials);
    }

    let access_token = token::mint(
        &user_model.username,
        state.config.token_secret.as_bytes(),
        state.config.token_ttl_secs,
    );

    info!("User logged in: {}", user_model.username);
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: state.config.token_ttl_secs,
    }))
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| ApiError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
