use std::fmt;
use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::auth::AuthService;
use crate::mail::Mailer;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: AuthService,
    pub mailer: Arc<dyn Mailer>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db)
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::profile,
        crate::handlers::auth::request_password_reset,
        crate::handlers::auth::confirm_password_reset,
        crate::handlers::properties::list_properties,
        crate::handlers::properties::get_property,
        crate::handlers::reviews::list_reviews,
        crate::handlers::reviews::list_property_reviews,
        crate::handlers::reviews::create_review,
        crate::handlers::reviews::mark_review_helpful,
        crate::handlers::reviews::user_review_stats,
        crate::handlers::admin::dashboard,
        crate::handlers::admin::admin_list_properties,
        crate::handlers::admin::create_property,
        crate::handlers::admin::update_property,
        crate::handlers::admin::delete_property,
        crate::handlers::admin::approve_property,
        crate::handlers::admin::list_users,
        crate::handlers::admin::verify_user,
        crate::handlers::admin::admin_list_reviews,
        crate::handlers::admin::delete_review,
    ),
    components(schemas(
        HealthResponse,
        crate::error::ErrorResponse,
        crate::handlers::auth::RegisterRequest,
        crate::handlers::auth::LoginRequest,
        crate::handlers::auth::LoginResponse,
        crate::handlers::auth::UserResponse,
        crate::handlers::auth::ProfileResponse,
        crate::handlers::auth::MessageResponse,
        crate::handlers::auth::PasswordResetRequest,
        crate::handlers::auth::PasswordResetConfirm,
        crate::handlers::properties::PropertyResponse,
        crate::handlers::properties::PropertyImageResponse,
        crate::handlers::properties::PropertyListResponse,
        crate::handlers::properties::SinglePropertyResponse,
        crate::handlers::reviews::ReviewResponse,
        crate::handlers::reviews::ReviewListResponse,
        crate::handlers::reviews::PropertyRef,
        crate::handlers::reviews::PropertyReviewListResponse,
        crate::handlers::reviews::CreateReviewRequest,
        crate::handlers::reviews::CreateReviewResponse,
        crate::handlers::reviews::HelpfulResponse,
        crate::handlers::admin::PropertyInput,
        crate::handlers::admin::ImageInput,
        crate::handlers::admin::AdminPropertyResponse,
        crate::handlers::admin::DashboardResponse,
        crate::handlers::admin::AdminUserListResponse,
        crate::handlers::admin::AdminReviewResponse,
        crate::handlers::admin::AdminReviewListResponse,
        crate::handlers::admin::MessageOnly,
        crate::helpers::ratings::ReviewStats,
        crate::helpers::ratings::RecentReview,
        crate::helpers::ratings::UserReviewStats,
    )),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and password reset"),
        (name = "properties", description = "Public accommodation listings"),
        (name = "reviews", description = "Student reviews of accommodations"),
        (name = "admin", description = "Administrative management endpoints"),
    ),
    info(
        title = "StudentStay API",
        description = "Student accommodation listing and review platform for South African campuses",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;
