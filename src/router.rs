use std::time::Duration;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, trace};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::schemas::{ApiDoc, AppState};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    trace!("Building application router");

    let api_routes = Router::new()
        .route("/properties", get(handlers::properties::list_properties))
        .route(
            "/properties/:property_id",
            get(handlers::properties::get_property),
        )
        .route("/reviews", get(handlers::reviews::list_reviews))
        .route(
            "/reviews/property/:property_id",
            get(handlers::reviews::list_property_reviews)
                .post(handlers::reviews::create_review),
        )
        .route(
            "/reviews/:review_id/helpful",
            post(handlers::reviews::mark_review_helpful),
        )
        .route("/reviews/user/stats", get(handlers::reviews::user_review_stats))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/profile", get(handlers::auth::profile))
        .route(
            "/auth/reset-password/request",
            post(handlers::auth::request_password_reset),
        )
        .route(
            "/auth/reset-password/confirm",
            post(handlers::auth::confirm_password_reset),
        )
        .route("/admin/dashboard", get(handlers::admin::dashboard))
        .route(
            "/admin/properties",
            get(handlers::admin::admin_list_properties).post(handlers::admin::create_property),
        )
        .route(
            "/admin/properties/:property_id",
            put(handlers::admin::update_property).delete(handlers::admin::delete_property),
        )
        .route(
            "/admin/properties/:property_id/approve",
            post(handlers::admin::approve_property),
        )
        .route("/admin/users", get(handlers::admin::list_users))
        .route(
            "/admin/users/:user_id/verify",
            post(handlers::admin::verify_user),
        )
        .route(
            "/admin/reviews",
            get(handlers::admin::admin_list_reviews),
        )
        .route(
            "/admin/reviews/:review_id",
            delete(handlers::admin::delete_review),
        );

    debug!("Routes registered");

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(handlers::health::health_check))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
