pub mod client;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod telemetry;
pub mod token;

pub use client::ModMedClient;
pub use config::{Credentials, CredentialsLocation, read_credentials};
pub use credentials::{CredentialProvider, EnvCredentials, StaticCredentials};
pub use errors::Error;
pub use token::{TokenManager, TokenManagerConfig};
