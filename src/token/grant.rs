use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::Credentials;
use crate::errors::Error;

pub(crate) const GRANT_PATH: &str = "ema/ws/oauth2/grant";

/// Success body of the password-grant exchange. Anything else the endpoint
/// returns alongside these fields is ignored.
#[derive(Debug, Deserialize)]
pub struct GrantResponse {
    pub access_token: String,
    pub expires_in: i64,
}

pub(crate) fn grant_url(creds: &Credentials) -> String {
    format!("{}/{}", creds.api_root(), GRANT_PATH)
}

pub(crate) fn form_body(creds: &Credentials) -> String {
    format!(
        "grant_type=password&username={}&password={}",
        urlencoding::encode(&creds.username),
        urlencoding::encode(&creds.password)
    )
}

/// One password-grant round trip. No retries: a failure here propagates to
/// the caller untouched, and the caller's cache stays as it was.
pub(crate) async fn exchange(http: &Client, creds: &Credentials) -> Result<GrantResponse, Error> {
    let url = grant_url(creds);
    let resp = http
        .post(&url)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("x-api-key", creds.api_key.as_str())
        .body(form_body(creds))
        .send()
        .await?;

    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    if !status.is_success() {
        error!("token grant failed: status={} body='{}'", status, body);
        return Err(Error::UpstreamAuth(status, body));
    }
    let grant: GrantResponse = serde_json::from_str(&body)?;
    info!("token grant ok (expires_in={}s)", grant.expires_in);
    Ok(grant)
}
