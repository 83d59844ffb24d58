//! JWT verification for the auth middleware.

use chrono::Utc;
use jobportal_config::SecurityConfig;
use jobportal_core::{JobPortalError, JobPortalResult, Principal, Role};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// JWT claims carried by portal tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// User's role.
    pub role: String,
    /// Issuer.
    pub iss: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

/// Signs and verifies HS256 tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    validation: Validation,
}

impl TokenVerifier {
    #[must_use]
    pub fn new(config: &SecurityConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.jwt_issuer.clone(),
            validation,
        }
    }

    /// Issues a token for `principal` valid for `ttl`.
    pub fn issue(&self, principal: &Principal, ttl: Duration) -> JobPortalResult<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: principal.id.clone(),
            role: principal.role.as_str().to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX - now),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JobPortalError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Verifies `token` and returns the principal it names.
    pub fn verify(&self, token: &str) -> JobPortalResult<Principal> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JobPortalError::InvalidToken("Token expired".to_string()),
                ErrorKind::InvalidSignature => {
                    JobPortalError::InvalidToken("Invalid token signature".to_string())
                }
                ErrorKind::InvalidIssuer => JobPortalError::InvalidToken("Invalid token issuer".to_string()),
                _ => JobPortalError::InvalidToken(e.to_string()),
            }
        })?;

        let role = Role::parse(&data.claims.role).ok_or_else(|| {
            JobPortalError::InvalidToken(format!("Unknown role '{}'", data.claims.role))
        })?;
        Ok(Principal::new(data.claims.sub, role))
    }
}
