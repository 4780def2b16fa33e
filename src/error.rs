//! Error taxonomy.
//!
//! [`AuthError`] covers everything that can go wrong while obtaining a token
//! and is fatal to the current tool call. [`Error::TokenExpired`] is recovered
//! locally by the gateway with a single forced refresh. Rate limiting and
//! other upstream failures are surfaced to the caller unchanged.

use std::{io, time::Duration};

use serde_json::{Value, json};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization was declined: {0}")]
    Declined(String),

    #[error("no authorization callback received within {0:?}")]
    Timeout(Duration),

    #[error("state parameter of the authorization callback does not match")]
    StateMismatch,

    #[error("authorization callback is missing the `{0}` parameter")]
    MissingParameter(&'static str),

    #[error("cannot bind callback listener on {addr}: {source}")]
    Listener {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("callback listener stopped before a redirect arrived")]
    ListenerClosed,

    #[error("token endpoint returned {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    #[error("token request failed: {0}")]
    Transport(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("token cache I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("token cache is malformed: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SPOTIFY_CLIENT_ID must be set")]
    MissingClientId,

    #[error("invalid redirect URI `{uri}`: {reason}")]
    InvalidRedirectUri { uri: String, reason: String },

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("access token was rejected by Spotify")]
    TokenExpired,

    #[error("rate limited by Spotify ({})", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<u64> },

    #[error("Spotify API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("request to Spotify failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed response from Spotify: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown tool `{0}`")]
    UnknownTool(String),

    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: String, reason: String },
}

fn retry_hint(retry_after: &Option<u64>) -> String {
    match retry_after {
        Some(secs) => format!("retry after {secs}s"),
        None => "no retry hint".to_string(),
    }
}

impl Error {
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Stable machine-readable name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Auth(AuthError::Timeout(_)) => "auth_timeout",
            Error::Auth(AuthError::StateMismatch) => "auth_state_mismatch",
            Error::Auth(AuthError::Declined(_)) => "auth_declined",
            Error::Auth(_) => "auth_error",
            Error::TokenExpired => "token_expired",
            Error::RateLimited { .. } => "rate_limited",
            Error::Api { .. } => "api_error",
            Error::Http(_) => "http_error",
            Error::Decode(_) => "decode_error",
            Error::Cache(_) => "cache_error",
            Error::Config(_) => "config_error",
            Error::UnknownTool(_) => "unknown_tool",
            Error::InvalidArgument { .. } => "invalid_argument",
        }
    }

    /// Structured rendering handed back to the tool caller.
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });

        match self {
            Error::Api { status, .. } => body["status"] = json!(status),
            Error::RateLimited { retry_after } => body["retry_after"] = json!(retry_after),
            Error::Auth(AuthError::TokenEndpoint { status, .. }) => body["status"] = json!(status),
            _ => {}
        }

        json!({ "error": body })
    }
}
