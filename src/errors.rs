use std::fmt;

use reqwest::StatusCode;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Json(serde_json::Error),
    Http(reqwest::Error),
    UpstreamAuth(StatusCode, String),
    Upstream(StatusCode, String),
    Config(String),
}

impl Error {
    /// Upstream status carried by the error, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::UpstreamAuth(status, _) | Error::Upstream(status, _) => Some(*status),
            Error::Http(err) => err.status(),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "io error: {}", err),
            Error::Json(err) => write!(f, "json error: {}", err),
            Error::Http(err) => write!(f, "http error: {}", err),
            Error::UpstreamAuth(status, body) => {
                write!(f, "token grant failed: status={} body='{}'", status, body)
            }
            Error::Upstream(status, body) => {
                write!(f, "upstream request failed: status={} body='{}'", status, body)
            }
            Error::Config(msg) => write!(f, "config error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err)
    }
}
