use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use reqwest::Url;
use sha2::{Digest, Sha256};

use crate::{config::Config, error::ConfigError, types::PkceSession};

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Opaque anti-forgery value echoed back on the redirect.
pub fn generate_state() -> String {
    random_alphanumeric(32)
}

/// Current time as a Unix timestamp in seconds.
pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// Authorization endpoint URL for one PKCE session.
pub fn authorize_url(config: &Config, session: &PkceSession) -> Result<Url, ConfigError> {
    let scope = config.scope();
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code_challenge_method", "S256"),
            ("code_challenge", session.code_challenge.as_str()),
            ("state", session.state.as_str()),
            ("scope", scope.as_str()),
        ],
    )
    .map_err(|_| ConfigError::InvalidValue {
        name: "SPOTIFY_AUTH_URL",
        value: config.auth_url.clone(),
    })
}
