use serde_json::Value;

use crate::{
    config::Config,
    error::{Error, Result},
    management::TokenCache,
    spotify::{Authenticator, SpotifyClient},
    warning,
};

/// Couples the authenticator with the API client.
pub struct Gateway {
    auth: Authenticator,
    client: SpotifyClient,
}

impl Gateway {
    pub fn new(auth: Authenticator, client: SpotifyClient) -> Self {
        Self { auth, client }
    }

    /// Gateway talking to the API base URL of `config`.
    pub fn from_config(config: Config, cache: TokenCache) -> Self {
        let client = SpotifyClient::new(config.api_url.clone());
        Self::new(Authenticator::new(config, cache), client)
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    /// Calls an endpoint with a valid token.
    ///
    /// A 401 triggers one forced refresh and one retry; a second 401 is
    /// returned as [`Error::TokenExpired`].
    pub async fn call(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let token = self.auth.get_valid_token().await?;

        match self.client.get(path, query, &token).await {
            Err(Error::TokenExpired) => {
                warning!("Access token rejected by Spotify, refreshing and retrying once");
                let token = self.auth.force_refresh(&token).await?;
                self.client.get(path, query, &token).await
            }
            other => other,
        }
    }
}
