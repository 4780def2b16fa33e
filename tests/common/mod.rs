#![allow(dead_code)]

use std::{
    collections::HashMap,
    io,
    net::{SocketAddr, TcpListener as StdTcpListener},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header::RETRY_AFTER},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use reqwest::Url;
use serde_json::json;
use spotify_tools::{
    config::Config,
    spotify::Browser,
    types::TokenRecord,
    utils,
};
use tempfile::TempDir;

/// How the mock answers Web API requests.
#[derive(Debug, Clone)]
pub enum ApiMode {
    /// 200 with `{path, query, token}` of the request.
    Echo,
    /// 401 for the given bearer token, echo for any other.
    RejectToken(&'static str),
    AlwaysUnauthorized,
    RateLimited(u64),
    Failure(u16),
}

/// How the mock answers the token endpoint.
#[derive(Debug, Clone)]
pub enum TokenMode {
    Issue {
        access_token: &'static str,
        refresh_token: Option<&'static str>,
        expires_in: u64,
    },
    Reject,
}

pub struct MockState {
    api_mode: ApiMode,
    token_mode: TokenMode,
    pub api_calls: AtomicUsize,
    pub token_calls: AtomicUsize,
    pub token_forms: Mutex<Vec<HashMap<String, String>>>,
}

/// Local stand-in for the accounts service and the Web API.
pub struct MockSpotify {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockSpotify {
    pub async fn start(api_mode: ApiMode, token_mode: TokenMode) -> Self {
        let state = Arc::new(MockState {
            api_mode,
            token_mode,
            api_calls: AtomicUsize::new(0),
            token_calls: AtomicUsize::new(0),
            token_forms: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/token", post(token))
            .route("/v1/{*rest}", get(api))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn api_calls(&self) -> usize {
        self.state.api_calls.load(Ordering::SeqCst)
    }

    pub fn token_calls(&self) -> usize {
        self.state.token_calls.load(Ordering::SeqCst)
    }

    pub fn token_forms(&self) -> Vec<HashMap<String, String>> {
        self.state.token_forms.lock().unwrap().clone()
    }

    pub fn config(&self, dir: &TempDir) -> Config {
        let mut config = Config::new("test-client");
        config.token_url = format!("http://{}/api/token", self.addr);
        config.api_url = format!("http://{}/v1", self.addr);
        config.cache_path = dir.path().join("token-cache.json");
        config.redirect_uri =
            Url::parse(&format!("http://127.0.0.1:{}/callback", free_port())).unwrap();
        config.callback_timeout = Duration::from_millis(500);
        config
    }
}

async fn token(
    State(state): State<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.token_calls.fetch_add(1, Ordering::SeqCst);
    state.token_forms.lock().unwrap().push(form);

    match &state.token_mode {
        TokenMode::Issue {
            access_token,
            refresh_token,
            expires_in,
        } => {
            let mut body = json!({
                "access_token": access_token,
                "token_type": "Bearer",
                "scope": "user-read-private",
                "expires_in": expires_in,
            });
            if let Some(refresh_token) = refresh_token {
                body["refresh_token"] = json!(refresh_token);
            }
            Json(body).into_response()
        }
        TokenMode::Reject => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Refresh token revoked" })),
        )
            .into_response(),
    }
}

async fn api(State(state): State<Arc<MockState>>, uri: Uri, headers: HeaderMap) -> Response {
    state.api_calls.fetch_add(1, Ordering::SeqCst);

    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string();
    let echo = || {
        Json(json!({
            "path": uri.path(),
            "query": uri.query().unwrap_or_default(),
            "token": token,
        }))
        .into_response()
    };

    match &state.api_mode {
        ApiMode::Echo => echo(),
        ApiMode::RejectToken(rejected) if token == *rejected => {
            (StatusCode::UNAUTHORIZED, "The access token expired").into_response()
        }
        ApiMode::RejectToken(_) => echo(),
        ApiMode::AlwaysUnauthorized => {
            (StatusCode::UNAUTHORIZED, "The access token expired").into_response()
        }
        ApiMode::RateLimited(secs) => (
            StatusCode::TOO_MANY_REQUESTS,
            [(RETRY_AFTER, secs.to_string())],
            "API rate limit exceeded",
        )
            .into_response(),
        ApiMode::Failure(status) => (
            StatusCode::from_u16(*status).unwrap(),
            "upstream failure",
        )
            .into_response(),
    }
}

pub fn free_port() -> u16 {
    let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

pub fn record(access_token: &str, refresh_token: &str, expires_in: i64) -> TokenRecord {
    TokenRecord {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        expires_at: utils::now() + expires_in,
    }
}

/// Browser that never shows up.
pub struct IdleBrowser {
    pub opened: Arc<AtomicUsize>,
}

impl IdleBrowser {
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let opened = Arc::new(AtomicUsize::new(0));
        (
            Self {
                opened: Arc::clone(&opened),
            },
            opened,
        )
    }
}

impl Browser for IdleBrowser {
    fn open(&self, _url: &str) -> io::Result<()> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Browser that follows the authorization URL straight to the redirect.
pub struct RedirectingBrowser {
    /// Replaces the `state` echoed back when set.
    pub forged_state: Option<&'static str>,
    /// Sends `error=<value>` instead of a code when set.
    pub error: Option<&'static str>,
}

impl Browser for RedirectingBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        let url = Url::parse(url).map_err(io::Error::other)?;
        let param = |name: &str| {
            url.query_pairs()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default()
        };

        let mut redirect = Url::parse(&param("redirect_uri")).map_err(io::Error::other)?;
        match self.error {
            Some(error) => {
                redirect.query_pairs_mut().append_pair("error", error);
            }
            None => {
                let state = self
                    .forged_state
                    .map(str::to_string)
                    .unwrap_or_else(|| param("state"));
                redirect
                    .query_pairs_mut()
                    .append_pair("code", "auth-code")
                    .append_pair("state", &state);
            }
        }

        tokio::spawn(async move {
            let _ = reqwest::get(redirect).await;
        });
        Ok(())
    }
}
