use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::{Mutex, RwLock};
use tracing::warn;

use crate::credentials::CredentialProvider;
use crate::errors::Error;
use crate::telemetry::grant::GrantTelemetry;

use super::{Clock, SystemClock, TokenCache, grant};

/// Tunables for the cached grant exchange.
#[derive(Clone)]
pub struct TokenManagerConfig {
    /// Window subtracted from the upstream-reported expiry so a served token
    /// stays valid through in-flight requests and modest clock skew.
    pub expiry_margin: Duration,
    /// Timeout applied to outbound requests.
    pub request_timeout: Duration,
}

impl Default for TokenManagerConfig {
    fn default() -> Self {
        Self {
            expiry_margin: Duration::from_secs(60),
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// Owns the process-lifetime bearer-token cache for one credential set and
/// exchanges credentials with the upstream grant endpoint on a miss.
///
/// The manager holds exactly one cache slot. A provider that resolves
/// different credentials per request (multi-tenant) must get one manager per
/// credential set, or one tenant will be served another tenant's token.
pub struct TokenManager<P> {
    http: Client,
    provider: Arc<P>,
    cache: RwLock<Option<TokenCache>>,
    refresh_lock: Mutex<()>,
    clock: Arc<dyn Clock>,
    expiry_margin: Duration,
}

impl<P: CredentialProvider> TokenManager<P> {
    pub fn new(provider: Arc<P>, config: TokenManagerConfig) -> Result<Self, Error> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_parts(
            http,
            provider,
            config,
            Arc::new(SystemClock),
        ))
    }

    /// Construct from pre-built parts; lets callers share an HTTP client and
    /// tests substitute the clock.
    pub fn with_parts(
        http: Client,
        provider: Arc<P>,
        config: TokenManagerConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http,
            provider,
            cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            clock,
            expiry_margin: config.expiry_margin,
        }
    }

    /// Returns a bearer token still inside its refresh margin, issuing at
    /// most one upstream grant per cache miss.
    ///
    /// The fresh-cache path takes a read lock and clones a string; it does
    /// no I/O and is meant to be called on every outbound request. On
    /// failure the previous cache contents are left untouched and no stale
    /// token is served past its computed expiry.
    pub async fn bearer_token(&self) -> Result<String, Error> {
        let now = self.clock.now().as_millisecond();
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref()
                && cached.is_fresh(now)
            {
                return Ok(cached.token.clone());
            }
        }

        // Only one grant exchange runs at a time; callers queued behind it
        // re-check the slot the winner filled instead of fetching again.
        let _lock = self.refresh_lock.lock().await;
        let now = self.clock.now().as_millisecond();
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref()
                && cached.is_fresh(now)
            {
                return Ok(cached.token.clone());
            }
        }

        let creds = self.provider.fetch().await?;
        let telemetry = GrantTelemetry::new("token.grant");
        telemetry.emit_start(self.clock.now());
        match grant::exchange(&self.http, &creds).await {
            Ok(resp) => {
                let margin_secs = self.expiry_margin.as_secs() as i64;
                if resp.expires_in <= margin_secs {
                    warn!(
                        expires_in = resp.expires_in,
                        margin_secs, "granted token ttl is inside the refresh margin; it will not be served from cache"
                    );
                }
                let expires_at = now + (resp.expires_in - margin_secs) * 1000;
                let entry = TokenCache::new(resp.access_token, now, expires_at);
                let token = entry.token.clone();
                {
                    let mut cache = self.cache.write().await;
                    *cache = Some(entry);
                }
                telemetry.emit_success(self.clock.now());
                Ok(token)
            }
            Err(err) => {
                telemetry.emit_failure(&err, self.clock.now());
                Err(err)
            }
        }
    }
}
