//! JWT access tokens and the JWT-backed identity resolver.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload. The
//! `role` claim must name one of the closed [`Role`] variants; anything
//! else is rejected as unauthenticated before a request reaches the engine.

use consentry_core::error::CoreError;
use consentry_core::identity::{Caller, IdentityResolver};
use consentry_core::roles::Role;
use consentry_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the caller's id.
    pub sub: DbId,
    /// Role name (e.g. `"performer"`, `"safety_officer"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
}

/// Default access token expiry in minutes.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ACCESS_EXPIRY_MINS.to_string())
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            access_token_expiry_mins,
        }
    }
}

/// Generate an HS256 access token for `user_id` acting as `role`.
pub fn generate_access_token(
    user_id: DbId,
    role: Role,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.as_str().to_string(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// [`IdentityResolver`] over bearer JWTs.
#[derive(Debug, Clone)]
pub struct JwtIdentityResolver {
    config: JwtConfig,
}

impl JwtIdentityResolver {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

impl IdentityResolver for JwtIdentityResolver {
    fn resolve(&self, credential: &str) -> Result<Caller, CoreError> {
        let claims = validate_token(credential, &self.config).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            CoreError::Unauthenticated("Invalid or expired token".into())
        })?;
        let role: Role = claims.role.parse()?;
        Ok(Caller::new(claims.sub, role))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        }
    }

    fn signed(claims: &Claims, config: &JwtConfig) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn test_generate_and_resolve() {
        let config = test_config();
        let token = generate_access_token(42, Role::SafetyOfficer, &config)
            .expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.role, "safety_officer");
        assert!(claims.exp > claims.iat);

        let caller = JwtIdentityResolver::new(config).resolve(&token).unwrap();
        assert_eq!(caller, Caller::new(42, Role::SafetyOfficer));
    }

    #[test]
    fn test_expired_token_is_unauthenticated() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let token = signed(
            &Claims {
                sub: 1,
                role: "moderator".to_string(),
                exp: now - 300, // well past the default leeway
                iat: now - 600,
                jti: Uuid::new_v4().to_string(),
            },
            &config,
        );

        let result = JwtIdentityResolver::new(config).resolve(&token);
        assert_matches!(result, Err(CoreError::Unauthenticated(_)));
    }

    #[test]
    fn test_unknown_role_is_unauthenticated() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let token = signed(
            &Claims {
                sub: 1,
                role: "superuser".to_string(),
                exp: now + 600,
                iat: now,
                jti: Uuid::new_v4().to_string(),
            },
            &config,
        );

        let result = JwtIdentityResolver::new(config).resolve(&token);
        assert_matches!(result, Err(CoreError::Unauthenticated(msg)) if msg.contains("superuser"));
    }

    #[test]
    fn test_different_secret_fails() {
        let token = generate_access_token(1, Role::Admin, &test_config()).unwrap();
        let other = JwtConfig {
            secret: "secret-bravo".to_string(),
            access_token_expiry_mins: 15,
        };
        assert!(validate_token(&token, &other).is_err());
    }
}
