//! HS256 JWT verification against a shared secret.
//!
//! Token *issuance* belongs to the external identity system; this adapter
//! only validates signatures and expiry and extracts the principal.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use domains::{Identity, IdentityError, IdentityProvider, Role};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// The user id, as issued by the identity system.
    sub: String,
    role: Role,
    exp: i64,
}

pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn resolve(&self, bearer_token: &str) -> Result<Identity, IdentityError> {
        let data = decode::<Claims>(bearer_token, &self.decoding_key, &self.validation)
            .map_err(|err| {
                debug!(error = %err, "token rejected");
                IdentityError::InvalidCredential
            })?;
        let user_id = Uuid::parse_str(&data.claims.sub)
            .map_err(|_| IdentityError::InvalidCredential)?;
        Ok(Identity {
            user_id,
            role: data.claims.role,
        })
    }
}
