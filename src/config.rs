//! Configuration management for spotify-tools.
//!
//! This module handles loading configuration values from environment
//! variables and `.env` files and assembles them into a [`Config`] value that
//! is passed explicitly to the components that need it.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (everything except the client ID)

use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use reqwest::Url;

use crate::error::ConfigError;

pub const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(120);

/// Scopes requested when `SPOTIFY_SCOPES` is not set.
pub const DEFAULT_SCOPES: &[&str] = &[
    "user-read-private",
    "user-read-email",
    "user-library-read",
    "user-library-modify",
    "playlist-read-private",
    "playlist-read-collaborative",
    "playlist-modify-public",
    "playlist-modify-private",
    "user-top-read",
    "user-read-recently-played",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
];

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the directory structure if it doesn't exist and loads variables
/// from `spotify-tools/.env` under the platform-specific local data
/// directory. A missing file is not an error: every value can also come from
/// the process environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotify-tools/.env`
/// - macOS: `~/Library/Application Support/spotify-tools/.env`
/// - Windows: `%LOCALAPPDATA%/spotify-tools/.env`
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotify-tools/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Runtime configuration shared by the authenticator, the API client and the
/// callback listener.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub redirect_uri: Url,
    pub scopes: Vec<String>,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub cache_path: PathBuf,
    pub callback_timeout: Duration,
}

impl Config {
    /// Builds a configuration with Spotify's public endpoints, the default
    /// loopback redirect URI and the default token cache location.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri: Url::parse(DEFAULT_REDIRECT_URI)
                .expect("default redirect URI is a valid URL"),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            auth_url: SPOTIFY_AUTH_URL.to_string(),
            token_url: SPOTIFY_TOKEN_URL.to_string(),
            api_url: SPOTIFY_API_URL.to_string(),
            cache_path: default_cache_path(),
            callback_timeout: DEFAULT_CALLBACK_TIMEOUT,
        }
    }

    /// Reads the configuration from the process environment.
    ///
    /// `SPOTIFY_CLIENT_ID` is required; every other variable overrides a
    /// default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// Blank values count as unset.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the value of the named variable, if any
    ///
    /// # Variables
    ///
    /// - `SPOTIFY_CLIENT_ID` (required)
    /// - `SPOTIFY_REDIRECT_URI` - loopback `http` URI with a literal path
    /// - `SPOTIFY_SCOPES` - separated by commas or whitespace
    /// - `SPOTIFY_TOKEN_CACHE`
    /// - `SPOTIFY_CALLBACK_TIMEOUT_SECS`
    /// - `SPOTIFY_AUTH_URL`, `SPOTIFY_TOKEN_URL`, `SPOTIFY_API_URL`
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingClientId`] if no client ID is set
    /// - [`ConfigError::InvalidRedirectUri`] for a non-loopback, non-`http`
    ///   or unroutable redirect URI
    /// - [`ConfigError::InvalidValue`] for a non-numeric timeout
    ///
    /// # Example
    ///
    /// ```
    /// let config = Config::from_lookup(|name| {
    ///     (name == "SPOTIFY_CLIENT_ID").then(|| "abc123".to_string())
    /// })?;
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let client_id = var("SPOTIFY_CLIENT_ID").ok_or(ConfigError::MissingClientId)?;
        let mut config = Self::new(client_id.trim());

        if let Some(uri) = var("SPOTIFY_REDIRECT_URI") {
            config.redirect_uri = parse_redirect_uri(&uri)?;
        }
        if let Some(scopes) = var("SPOTIFY_SCOPES") {
            config.scopes = scopes
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(path) = var("SPOTIFY_TOKEN_CACHE") {
            config.cache_path = PathBuf::from(path);
        }
        if let Some(secs) = var("SPOTIFY_CALLBACK_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    name: "SPOTIFY_CALLBACK_TIMEOUT_SECS",
                    value: secs.clone(),
                })?;
            config.callback_timeout = Duration::from_secs(secs);
        }
        if let Some(url) = var("SPOTIFY_AUTH_URL") {
            config.auth_url = url;
        }
        if let Some(url) = var("SPOTIFY_TOKEN_URL") {
            config.token_url = url;
        }
        if let Some(url) = var("SPOTIFY_API_URL") {
            config.api_url = url;
        }

        Ok(config)
    }

    /// Space-separated scope string as sent to the authorization endpoint.
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }

    /// Socket address the callback listener binds to.
    pub fn callback_addr(&self) -> Result<SocketAddr, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidRedirectUri {
            uri: self.redirect_uri.to_string(),
            reason: reason.to_string(),
        };

        let ip = match self.redirect_uri.host_str() {
            Some("localhost") => IpAddr::V4(Ipv4Addr::LOCALHOST),
            Some(host) => host
                .trim_start_matches('[')
                .trim_end_matches(']')
                .parse::<IpAddr>()
                .map_err(|_| invalid("host must be a loopback address"))?,
            None => return Err(invalid("missing host")),
        };
        if !ip.is_loopback() {
            return Err(invalid("host must be a loopback address"));
        }

        let port = self
            .redirect_uri
            .port_or_known_default()
            .ok_or_else(|| invalid("missing port"))?;

        Ok(SocketAddr::new(ip, port))
    }

    /// Path component the callback listener routes, e.g. `/callback`.
    pub fn callback_path(&self) -> &str {
        self.redirect_uri.path()
    }
}

/// `~/.spotify-tools/token-cache.json`
pub fn default_cache_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".spotify-tools/token-cache.json");
    path
}

fn parse_redirect_uri(uri: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidRedirectUri {
        uri: uri.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(uri.trim()).map_err(|e| invalid(&e.to_string()))?;
    if url.scheme() != "http" {
        return Err(invalid("scheme must be http"));
    }
    if url.path().is_empty() || url.path() == "/" {
        return Err(invalid("path must name the callback route"));
    }
    // the path is routed literally; capture and wildcard syntax is not
    if url
        .path()
        .split('/')
        .any(|s| s.starts_with(':') || s.contains(['*', '{', '}']))
    {
        return Err(invalid("path must not contain route captures or wildcards"));
    }

    let config = Config {
        redirect_uri: url,
        ..Config::new(String::new())
    };
    config.callback_addr()?;
    Ok(config.redirect_uri)
}
