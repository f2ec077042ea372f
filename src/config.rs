use std::sync::Arc;

use anyhow::Result;
use sea_orm::Database;
use tracing::{debug, error, info, trace};

use crate::auth::AuthService;
use crate::mail::LogMailer;
use crate::schemas::AppState;

/// Connects to the database and builds the shared application state.
pub async fn initialize_app_state_with_url(
    database_url: &str,
    jwt_secret: &str,
) -> Result<AppState> {
    trace!("Entering initialize_app_state_with_url");
    info!("Connecting to database");
    debug!("Database URL: {}", database_url);

    let db = match Database::connect(database_url).await {
        Ok(connection) => {
            info!("Database connection established");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    Ok(AppState {
        db,
        auth: AuthService::new(jwt_secret),
        mailer: Arc::new(LogMailer),
    })
}
