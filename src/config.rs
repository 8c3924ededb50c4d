//! read upstream credentials from a file, the environment, or a secret

use aws_config::BehaviorVersion;

use crate::errors::Error;

pub enum CredentialsLocation {
    File(String),
    Env,
    Secret,
}

/// Credential set for one ModMed firm. The serde shape is camelCase,
/// matching the JSON payload request-scoped stores hand over.
#[derive(Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub base_url: String,
    pub firm_url_prefix: String,
    pub api_key: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Joined `{base_url}/{firm_url_prefix}` with a scheme ensured and
    /// stray slashes trimmed.
    pub fn api_root(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let firm = self.firm_url_prefix.trim_matches('/');
        if base.starts_with("http") {
            format!("{}/{}", base, firm)
        } else {
            format!("https://{}/{}", base, firm)
        }
    }
}

pub async fn read_credentials(loc: CredentialsLocation) -> Result<Credentials, Error> {
    let creds = match loc {
        CredentialsLocation::File(path) => {
            let contents = std::fs::read_to_string(path)?;
            serde_json::from_str(&contents)?
        }
        CredentialsLocation::Env => read_credentials_from_env()?,
        CredentialsLocation::Secret => read_credentials_from_secret().await?,
    };
    Ok(creds)
}

pub(crate) fn read_credentials_from_env() -> Result<Credentials, Error> {
    Ok(Credentials {
        base_url: std::env::var("MODMED_BASE_URL")
            .map_err(|_| Error::Config("Missing MODMED_BASE_URL env var".to_string()))?,
        firm_url_prefix: std::env::var("MODMED_FIRM_URL_PREFIX")
            .map_err(|_| Error::Config("Missing MODMED_FIRM_URL_PREFIX env var".to_string()))?,
        api_key: std::env::var("MODMED_API_KEY")
            .map_err(|_| Error::Config("Missing MODMED_API_KEY env var".to_string()))?,
        username: std::env::var("MODMED_USERNAME")
            .map_err(|_| Error::Config("Missing MODMED_USERNAME env var".to_string()))?,
        password: std::env::var("MODMED_PASSWORD")
            .map_err(|_| Error::Config("Missing MODMED_PASSWORD env var".to_string()))?,
    })
}

async fn read_credentials_from_secret() -> Result<Credentials, Error> {
    let secret_arn = std::env::var("MODMED_CREDS_SECRET_ARN")
        .map_err(|_| Error::Config("Missing MODMED_CREDS_SECRET_ARN env var".to_string()))?;
    let client = aws_sdk_secretsmanager::Client::new(
        &aws_config::load_defaults(BehaviorVersion::latest()).await,
    );
    let resp = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Config(format!("Failed to get secret: {}", e)))?;
    let secret = match resp.secret_string() {
        Some(s) => Ok(s),
        None => Err(Error::Config(
            "Failed to get secret string, returned None".to_string(),
        )),
    }?;
    let creds: Credentials = serde_json::from_str(secret)?;
    Ok(creds)
}
