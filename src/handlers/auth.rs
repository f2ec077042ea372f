use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use model::entities::user;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::ToSchema;

use crate::auth;
use crate::error::{ApiError, ApiResult};
use crate::schemas::AppState;

const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub year_of_study: Option<String>,
    pub faculty: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub university: String,
    pub year_of_study: Option<String>,
    pub faculty: Option<String>,
    pub verified: bool,
    pub is_admin: bool,
    pub created_at: chrono::NaiveDateTime,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            university: model.university,
            year_of_study: model.year_of_study,
            faculty: model.faculty,
            verified: model.verified,
            is_admin: model.is_admin,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PasswordResetRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PasswordResetConfirm {
    pub token: Option<String>,
    pub password: Option<String>,
}

fn required<'a>(value: &'a Option<String>, field: &str) -> ApiResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(format!("{} is required", field)))
}

/// Register a new student account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Validation error", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(axum::http::StatusCode, Json<MessageResponse>)> {
    trace!("Processing registration");
    let email = required(&payload.email, "Email")?.to_lowercase();
    let password = required(&payload.password, "Password")?;
    let name = required(&payload.name, "Name")?.to_string();

    let university = auth::university_for_email(&email).ok_or_else(|| {
        ApiError::Validation(
            "Please use your university student email address (e.g. 1234567@students.wits.ac.za)"
                .to_string(),
        )
    })?;

    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_CHARS
        )));
    }

    if auth::find_user_by_email(&state, &email).await?.is_some() {
        debug!("Registration rejected, email already in use");
        return Err(ApiError::Validation("Email already registered".to_string()));
    }

    let password_hash = state.auth.hash_password(password)?;
    let active = user::ActiveModel {
        email: Set(email.clone()),
        password_hash: Set(password_hash),
        name: Set(name),
        university: Set(university.to_string()),
        year_of_study: Set(payload.year_of_study),
        faculty: Set(payload.faculty),
        // The campus domain check already proves student status.
        verified: Set(true),
        is_admin: Set(false),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };

    let created = active
        .insert(&state.db)
        .await
        .map_err(|e| ApiError::from_insert_error(e, "Email already registered"))?;
    info!("Registered user {} at {}", created.id, university);

    Ok((
        axum::http::StatusCode::CREATED,
        Json(MessageResponse {
            message: "Registration successful.".to_string(),
        }),
    ))
}

/// Log in and receive an access token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    trace!("Processing login");
    let email = required(&payload.email, "Email")?.to_lowercase();
    let password = required(&payload.password, "Password")?;

    let user = auth::find_user_by_email(&state, &email)
        .await?
        .ok_or_else(|| ApiError::Auth("Invalid credentials".to_string()))?;
    if !state.auth.verify_password(password, &user.password_hash) {
        warn!("Failed login attempt for user {}", user.id);
        return Err(ApiError::Auth("Invalid credentials".to_string()));
    }

    let access_token = state.auth.issue_access_token(user.id)?;
    info!("User {} logged in", user.id);

    Ok(Json(LoginResponse {
        access_token,
        user: user.into(),
    }))
}

/// Fetch the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Profile for the current user", body = ProfileResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip(state, headers))]
pub async fn profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<ProfileResponse>> {
    let user = auth::current_user(&state, &headers).await?;
    Ok(Json(ProfileResponse { user: user.into() }))
}

/// Request a password reset token.
///
/// Always answers 200 so the endpoint cannot be used to probe which
/// addresses have accounts.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password/request",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset requested", body = MessageResponse),
        (status = 400, description = "Validation error", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let email = required(&payload.email, "Email")?.to_lowercase();
    if let Some(user) = auth::find_user_by_email(&state, &email).await? {
        let token = state.auth.issue_reset_token(user.id)?;
        state.mailer.send_password_reset(&user.email, &token);
        debug!("Issued password reset token for user {}", user.id);
    } else {
        debug!("Password reset requested for unknown address");
    }
    Ok(Json(MessageResponse {
        message: "If the account exists, a reset link has been sent.".to_string(),
    }))
}

/// Set a new password using a reset token.
#[utoipa::path(
    post,
    path = "/api/auth/reset-password/confirm",
    request_body = PasswordResetConfirm,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Validation error", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid or expired token", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(payload): Json<PasswordResetConfirm>,
) -> ApiResult<Json<MessageResponse>> {
    let token = required(&payload.token, "Token")?;
    let password = required(&payload.password, "Password")?;
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_CHARS
        )));
    }

    let user_id = state.auth.validate_reset_token(token)?;
    let user = model::entities::prelude::User::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::Auth("Invalid or expired token".to_string()))?;

    let mut active: user::ActiveModel = user.into();
    active.password_hash = Set(state.auth.hash_password(password)?);
    active.update(&state.db).await?;
    info!("Password reset completed for user {}", user_id);

    Ok(Json(MessageResponse {
        message: "Password updated successfully.".to_string(),
    }))
}
