use std::future::Future;

use crate::config::{self, Credentials, CredentialsLocation};
use crate::errors::Error;

/// Supplies the credential set used for token grants and `x-api-key` headers.
///
/// Implementations are queried again on every cache miss rather than captured
/// once at startup, so request-scoped sources can rotate credentials between
/// calls.
pub trait CredentialProvider: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Credentials, Error>> + Send;
}

/// Reads the `MODMED_*` process environment on every fetch.
pub struct EnvCredentials;

impl CredentialProvider for EnvCredentials {
    async fn fetch(&self) -> Result<Credentials, Error> {
        config::read_credentials(CredentialsLocation::Env).await
    }
}

/// Wraps an owned credential set, e.g. one decoded from a request-scoped
/// store. Composition per credential set is the caller's job; see
/// [`crate::token::TokenManager`] for the cache-scope caveat.
pub struct StaticCredentials {
    creds: Credentials,
}

impl StaticCredentials {
    pub fn new(creds: Credentials) -> Self {
        Self { creds }
    }
}

impl CredentialProvider for StaticCredentials {
    async fn fetch(&self) -> Result<Credentials, Error> {
        Ok(self.creds.clone())
    }
}
