use std::sync::Arc;

use reqwest::{Client, Method};
use serde_json::Value;
use tracing::{error, info};

use crate::ModMedClient;
use crate::credentials::CredentialProvider;
use crate::errors::Error;
use crate::token::{SystemClock, TokenManager, TokenManagerConfig};

const FHIR_PATH: &str = "ema/fhir/v2";

impl<P: CredentialProvider> ModMedClient<P> {
    /// Create a client with default token-cache tunables.
    /// # Arguments
    /// * `provider` - Credential source, re-queried on every request for the
    ///   `x-api-key` header and on every token-cache miss for the grant.
    pub fn new(provider: P) -> Result<Self, Error> {
        Self::with_config(provider, TokenManagerConfig::default())
    }

    pub fn with_config(provider: P, config: TokenManagerConfig) -> Result<Self, Error> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        let provider = Arc::new(provider);
        let tokens = TokenManager::with_parts(
            http.clone(),
            Arc::clone(&provider),
            config,
            Arc::new(SystemClock),
        );
        Ok(Self {
            http,
            provider,
            tokens,
        })
    }

    /// The token cache backing this client.
    pub fn tokens(&self) -> &TokenManager<P> {
        &self.tokens
    }

    /// Search a resource type, forwarding the caller's query untouched.
    pub async fn search(&self, resource: &str, params: &[(&str, &str)]) -> Result<Value, Error> {
        let path = format!("{}/{}", FHIR_PATH, resource);
        self.send(Method::GET, &path, params, None).await
    }

    /// Read one resource by id.
    pub async fn read(&self, resource: &str, id: &str) -> Result<Value, Error> {
        let path = format!("{}/{}/{}", FHIR_PATH, resource, id);
        self.send(Method::GET, &path, &[], None).await
    }

    /// Create a resource from an opaque JSON body.
    pub async fn create(&self, resource: &str, body: &Value) -> Result<Value, Error> {
        let path = format!("{}/{}", FHIR_PATH, resource);
        self.send(Method::POST, &path, &[], Some(body)).await
    }

    /// Replace a resource by id.
    pub async fn update(&self, resource: &str, id: &str, body: &Value) -> Result<Value, Error> {
        let path = format!("{}/{}/{}", FHIR_PATH, resource, id);
        self.send(Method::PUT, &path, &[], Some(body)).await
    }

    /// Exchange credentials for a token, then issue a minimal Patient
    /// search, proving both the grant endpoint and the FHIR surface answer.
    pub async fn test_connection(&self) -> Result<(), Error> {
        self.search("Patient", &[("_count", "1")]).await?;
        info!("connection test ok");
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, Error> {
        let creds = self.provider.fetch().await?;
        let token = self.tokens.bearer_token().await?;
        let url = format!("{}/{}", creds.api_root(), path);

        let mut req = self
            .http
            .request(method.clone(), &url)
            .header("Authorization", format!("Bearer {}", token))
            .header("x-api-key", creds.api_key.as_str());
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(
                "upstream request failed: method={} path={} status={} body='{}'",
                method, path, status, body
            );
            return Err(Error::Upstream(status, body));
        }
        info!("upstream request ok: method={} path={}", method, path);
        Ok(resp.json().await?)
    }
}
