use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use spotify_tools::{
    config::{Config, DEFAULT_CALLBACK_TIMEOUT, DEFAULT_SCOPES, SPOTIFY_API_URL},
    error::ConfigError,
};

fn from_vars(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|name| vars.get(name).cloned())
}

#[test]
fn test_client_id_is_required() {
    assert!(matches!(from_vars(&[]), Err(ConfigError::MissingClientId)));
    assert!(matches!(
        from_vars(&[("SPOTIFY_CLIENT_ID", "  ")]),
        Err(ConfigError::MissingClientId)
    ));
}

#[test]
fn test_defaults() {
    let config = from_vars(&[("SPOTIFY_CLIENT_ID", "abc123")]).unwrap();

    assert_eq!(config.client_id, "abc123");
    assert_eq!(config.api_url, SPOTIFY_API_URL);
    assert_eq!(config.scopes.len(), DEFAULT_SCOPES.len());
    assert_eq!(config.callback_timeout, DEFAULT_CALLBACK_TIMEOUT);
    assert_eq!(config.callback_path(), "/callback");
    assert_eq!(
        config.callback_addr().unwrap(),
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8888)
    );
    assert!(config.cache_path.ends_with(".spotify-tools/token-cache.json"));
}

#[test]
fn test_overrides() {
    let config = from_vars(&[
        ("SPOTIFY_CLIENT_ID", "abc123"),
        ("SPOTIFY_REDIRECT_URI", "http://localhost:9090/spotify/redirect"),
        ("SPOTIFY_SCOPES", "user-top-read, user-read-recently-played"),
        ("SPOTIFY_TOKEN_CACHE", "/tmp/tokens.json"),
        ("SPOTIFY_CALLBACK_TIMEOUT_SECS", "30"),
    ])
    .unwrap();

    assert_eq!(config.callback_path(), "/spotify/redirect");
    assert_eq!(config.callback_addr().unwrap().port(), 9090);
    assert_eq!(
        config.scopes,
        vec!["user-top-read".to_string(), "user-read-recently-played".to_string()]
    );
    assert_eq!(config.scope(), "user-top-read user-read-recently-played");
    assert_eq!(config.cache_path, PathBuf::from("/tmp/tokens.json"));
    assert_eq!(config.callback_timeout, Duration::from_secs(30));
}

#[test]
fn test_redirect_uri_must_be_loopback_http() {
    for uri in [
        "https://127.0.0.1:8888/callback",
        "http://example.com:8888/callback",
        "http://127.0.0.1:8888/",
        "http://127.0.0.1:8888/:cb",
        "http://127.0.0.1:8888/spotify/:cb",
        "http://127.0.0.1:8888/cb/*rest",
        "not a uri",
    ] {
        let result = from_vars(&[("SPOTIFY_CLIENT_ID", "abc"), ("SPOTIFY_REDIRECT_URI", uri)]);
        assert!(
            matches!(result, Err(ConfigError::InvalidRedirectUri { .. })),
            "{uri} should be rejected"
        );
    }
}

#[test]
fn test_invalid_timeout() {
    let result = from_vars(&[
        ("SPOTIFY_CLIENT_ID", "abc"),
        ("SPOTIFY_CALLBACK_TIMEOUT_SECS", "soon"),
    ]);
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
}
