#[cfg(test)]
pub mod test_utils {
    use crate::auth::AuthService;
    use crate::mail::LogMailer;
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{
        ActiveModelTrait, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Set,
        Statement,
    };
    use std::sync::Arc;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    pub const TEST_JWT_SECRET: &str = "test-secret";
    pub const TEST_ADMIN_EMAIL: &str = "admin@studentstay.local";
    pub const TEST_ADMIN_PASSWORD: &str = "admin-password";

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        db.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "PRAGMA foreign_keys = ON;",
        ))
        .await
        .expect("Failed to enable foreign keys");

        // Run migrations
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing, with a seeded admin account
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_test_db().await;
        let auth = AuthService::new(TEST_JWT_SECRET);

        let admin = model::entities::user::ActiveModel {
            email: Set(TEST_ADMIN_EMAIL.to_string()),
            password_hash: Set(auth
                .hash_password(TEST_ADMIN_PASSWORD)
                .expect("Failed to hash admin password")),
            name: Set("Test Admin".to_string()),
            university: Set("wits".to_string()),
            year_of_study: Set(None),
            faculty: Set(None),
            verified: Set(true),
            is_admin: Set(true),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        admin.insert(&db).await.expect("Failed to create admin user");

        AppState {
            db,
            auth,
            mailer: Arc::new(LogMailer),
        }
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is determined by the RUST_LOG environment variable,
    /// defaulting to WARN if not set.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr) // Output to stderr, which is captured by tests
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let (router, _) = setup_test_app_with_state().await;
        router
    }

    /// Create axum app for testing, keeping the state for white-box checks
    pub async fn setup_test_app_with_state() -> (Router, AppState) {
        let _ = init_test_tracing();

        let state = setup_test_app_state().await;
        let router = create_router(state.clone());
        (router, state)
    }
}
