use std::fmt;
use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::http::HeaderMap;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use model::entities::{prelude::*, user};
use regex::Regex;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{ApiError, ApiResult};
use crate::schemas::AppState;

/// University email domains accepted at registration, with the campus each
/// one maps to.
pub const ALLOWED_EMAIL_DOMAINS: &[(&str, &str)] = &[
    ("students.wits.ac.za", "wits"),
    ("student.uj.ac.za", "uj"),
];

const ACCESS_TOKEN_TTL_SECONDS: i64 = 3600;
const RESET_TOKEN_TTL_SECONDS: i64 = 1800;

const PURPOSE_ACCESS: &str = "access";
const PURPOSE_RESET: &str = "password-reset";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i32,
    pub iat: i64,
    pub exp: i64,
    /// Distinguishes access tokens from password-reset tokens.
    pub purpose: String,
}

/// Issues and validates tokens and password hashes. Held in application
/// state so tests can mint tokens against their own secret.
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue_access_token(&self, user_id: i32) -> ApiResult<String> {
        self.issue_token(user_id, PURPOSE_ACCESS, ACCESS_TOKEN_TTL_SECONDS)
    }

    pub fn issue_reset_token(&self, user_id: i32) -> ApiResult<String> {
        self.issue_token(user_id, PURPOSE_RESET, RESET_TOKEN_TTL_SECONDS)
    }

    fn issue_token(&self, user_id: i32, purpose: &str, ttl_seconds: i64) -> ApiResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + ttl_seconds,
            purpose: purpose.to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Returns the user id carried by a valid access token.
    pub fn validate_access_token(&self, token: &str) -> ApiResult<i32> {
        self.validate_token(token, PURPOSE_ACCESS)
    }

    /// Returns the user id carried by a valid password-reset token.
    pub fn validate_reset_token(&self, token: &str) -> ApiResult<i32> {
        self.validate_token(token, PURPOSE_RESET)
    }

    fn validate_token(&self, token: &str, expected_purpose: &str) -> ApiResult<i32> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                ApiError::Auth("Invalid or expired token".to_string())
            })?;
        if data.claims.purpose != expected_purpose {
            warn!(
                "Token purpose mismatch: expected {}, got {}",
                expected_purpose, data.claims.purpose
            );
            return Err(ApiError::Auth("Invalid or expired token".to_string()));
        }
        Ok(data.claims.sub)
    }

    pub fn hash_password(&self, password: &str) -> ApiResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        match PasswordHash::new(password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                warn!("Stored password hash is malformed: {}", e);
                false
            }
        }
    }
}

/// Extracts a bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Resolves the authenticated user for a request.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> ApiResult<user::Model> {
    trace!("Resolving authenticated user");
    let token = bearer_token(headers)
        .ok_or_else(|| ApiError::Auth("Authentication required".to_string()))?;
    let user_id = state.auth.validate_access_token(token)?;
    User::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::Auth("Invalid or expired token".to_string()))
}

/// Resolves the authenticated user and requires the admin flag.
pub async fn require_admin(state: &AppState, headers: &HeaderMap) -> ApiResult<user::Model> {
    let user = current_user(state, headers).await?;
    if !user.is_admin {
        warn!("User {} attempted an admin operation", user.id);
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }
    Ok(user)
}

fn student_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{6,10}$").expect("valid regex"))
}

/// Maps a registration email to its campus. Returns None unless the address
/// is a student number at an allowed university domain.
pub fn university_for_email(email: &str) -> Option<&'static str> {
    let (local, domain) = email.split_once('@')?;
    if !student_number_pattern().is_match(local) {
        return None;
    }
    ALLOWED_EMAIL_DOMAINS
        .iter()
        .find(|(allowed, _)| *allowed == domain)
        .map(|(_, university)| *university)
}

/// Looks up a user by email address.
pub async fn find_user_by_email(state: &AppState, email: &str) -> ApiResult<Option<user::Model>> {
    let user = User::find()
        .filter(user::Column::Email.eq(email))
        .one(&state.db)
        .await?;
    Ok(user)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_university_for_email() {
        assert_eq!(
            university_for_email("2345678@students.wits.ac.za"),
            Some("wits")
        );
        assert_eq!(university_for_email("123456@student.uj.ac.za"), Some("uj"));
        // Local part must be a 6-10 digit student number.
        assert_eq!(university_for_email("john@students.wits.ac.za"), None);
        assert_eq!(university_for_email("12345@students.wits.ac.za"), None);
        assert_eq!(university_for_email("12345678901@students.wits.ac.za"), None);
        // Unknown domains are rejected outright.
        assert_eq!(university_for_email("1234567@gmail.com"), None);
        assert_eq!(university_for_email("no-at-sign"), None);
    }

    #[test]
    fn test_access_token_roundtrip() {
        let auth = AuthService::new("test-secret");
        let token = auth.issue_access_token(42).unwrap();
        assert_eq!(auth.validate_access_token(&token).unwrap(), 42);
    }

    #[test]
    fn test_token_purpose_is_enforced() {
        let auth = AuthService::new("test-secret");
        let reset = auth.issue_reset_token(7).unwrap();
        assert!(auth.validate_access_token(&reset).is_err());
        assert_eq!(auth.validate_reset_token(&reset).unwrap(), 7);
    }

    #[test]
    fn test_token_secret_mismatch() {
        let token = AuthService::new("secret-a").issue_access_token(1).unwrap();
        assert!(AuthService::new("secret-b")
            .validate_access_token(&token)
            .is_err());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let auth = AuthService::new("test-secret");
        let hash = auth.hash_password("correct horse").unwrap();
        assert!(auth.verify_password("correct horse", &hash));
        assert!(!auth.verify_password("wrong horse", &hash));
        assert!(!auth.verify_password("correct horse", "not-a-hash"));
    }
}
