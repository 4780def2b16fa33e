use reqwest::{Client, StatusCode, header::RETRY_AFTER};
use serde_json::Value;

use crate::error::{Error, Result};

/// Thin bearer-authenticated GET client for the Spotify Web API.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    base_url: String,
}

impl SpotifyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues `GET {base_url}{path}` and returns the parsed JSON body.
    ///
    /// 401 maps to [`Error::TokenExpired`], 429 to [`Error::RateLimited`]
    /// with the `Retry-After` hint, any other non-success status to
    /// [`Error::Api`]. Nothing is retried here. An empty success body is
    /// returned as `null`.
    pub async fn get(&self, path: &str, query: &[(String, String)], token: &str) -> Result<Value> {
        let api_url = format!("{uri}{path}", uri = self.base_url, path = path);
        let response = self
            .http
            .get(&api_url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => Err(Error::TokenExpired),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.trim().parse::<u64>().ok());
                Err(Error::RateLimited { retry_after })
            }
            s if s.is_success() => {
                let body = response.text().await?;
                if body.trim().is_empty() {
                    return Ok(Value::Null);
                }
                Ok(serde_json::from_str(&body)?)
            }
            s => Err(Error::Api {
                status: s.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}
