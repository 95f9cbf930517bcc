//! Fixed token → principal map for tests and the dev profile.

use async_trait::async_trait;
use dashmap::DashMap;

use domains::{Identity, IdentityError, IdentityProvider};

/// Resolves bearer tokens against a fixed in-memory map. Anything not in
/// the map is rejected, the same as an expired real credential.
#[derive(Default)]
pub struct StaticTokenProvider {
    tokens: DashMap<String, Identity>,
}

impl StaticTokenProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: impl Into<String>, identity: Identity) {
        self.tokens.insert(token.into(), identity);
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    async fn resolve(&self, bearer_token: &str) -> Result<Identity, IdentityError> {
        self.tokens
            .get(bearer_token)
            .map(|i| i.clone())
            .ok_or(IdentityError::InvalidCredential)
    }
}
