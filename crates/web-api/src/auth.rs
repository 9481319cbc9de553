//! JWT identity validation.
//!
//! Credential issuance lives in an external collaborator; this service
//! only validates tokens and reads the identity they carry.

use axum::http::HeaderMap;
use config::JwtConfig;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub full_name: String,
    pub exp: i64,
}

/// The externally-validated identity every HTTP operation runs under.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub full_name: String,
}

#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issues a token carrying `user_id` and `full_name`. Used by tests
    /// and tooling; real tokens come from the external identity service
    /// sharing the same secret.
    pub fn generate_token(&self, user_id: Uuid, full_name: &str) -> Result<String, ApiError> {
        let exp = time::OffsetDateTime::now_utc()
            + time::Duration::hours(self.config.expiration_hours);

        let claims = Claims {
            user_id,
            full_name: full_name.to_owned(),
            exp: exp.unix_timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| ApiError::unauthorized(format!("token generation failed: {}", err)))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
            .map_err(|err| ApiError::unauthorized(format!("invalid token: {}", err)))
    }

    /// Extracts and validates the Bearer token from request headers.
    pub fn extract_identity(&self, headers: &HeaderMap) -> Result<Identity, ApiError> {
        let auth_header = headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("invalid authorization header format"))?;

        let claims = self.verify_token(token)?;
        Ok(Identity {
            user_id: claims.user_id,
            full_name: claims.full_name,
        })
    }
}
