use std::sync::Arc;

use crate::token::TokenManager;

mod impls;

/// Thin authenticated passthrough over the ModMed FHIR surface. Resource
/// bodies stay opaque JSON; the client only attaches auth and forwards.
pub struct ModMedClient<P> {
    http: reqwest::Client,
    provider: Arc<P>,
    tokens: TokenManager<P>,
}
