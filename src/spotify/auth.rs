use std::{io, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::{AuthError, Result},
    info,
    management::TokenCache,
    server::CallbackListener,
    success,
    types::{PkceSession, TokenRecord, TokenResponse},
    utils, warning,
};

/// Opens the authorization URL for the user.
pub trait Browser: Send + Sync {
    fn open(&self, url: &str) -> io::Result<()>;
}

/// Launches the platform's default browser.
pub struct SystemBrowser;

impl Browser for SystemBrowser {
    fn open(&self, url: &str) -> io::Result<()> {
        webbrowser::open(url)
    }
}

/// Hands out valid access tokens, refreshing or re-authorizing as needed.
///
/// The cached record is read from disk on first use and kept in memory
/// afterwards. A mutex spans the whole check-then-refresh sequence, so
/// concurrent callers never refresh the same token twice.
pub struct Authenticator {
    config: Config,
    cache: TokenCache,
    http: Client,
    browser: Box<dyn Browser>,
    current: Mutex<Option<TokenRecord>>,
}

impl Authenticator {
    pub fn new(config: Config, cache: TokenCache) -> Self {
        Self {
            config,
            cache,
            http: Client::new(),
            browser: Box::new(SystemBrowser),
            current: Mutex::new(None),
        }
    }

    pub fn with_browser(mut self, browser: impl Browser + 'static) -> Self {
        self.browser = Box::new(browser);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns an access token that has not reached its `expires_at`.
    ///
    /// # Token Sources
    ///
    /// 1. **Cache**: the memoized record, read from the token cache on first use
    /// 2. **Refresh**: an expired record with a refresh token is refreshed at
    ///    the token endpoint and persisted
    /// 3. **Authorization**: otherwise, or when the refresh fails, the browser
    ///    PKCE flow runs and its token is persisted
    ///
    /// A corrupt or unreadable cache is logged as a warning and treated as
    /// absent.
    ///
    /// # Returns
    ///
    /// The bearer access token.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Auth`] if the user declines, the
    /// redirect fails validation, no redirect arrives within the configured
    /// timeout or the code exchange is rejected. Also returns
    /// [`crate::error::Error::Config`] if the redirect URI has no bindable
    /// loopback address.
    ///
    /// # Example
    ///
    /// ```
    /// let token = authenticator.get_valid_token().await?;
    /// ```
    pub async fn get_valid_token(&self) -> Result<String> {
        let mut current = self.current.lock().await;
        if current.is_none() {
            *current = self.load_cached().await;
        }

        if let Some(record) = current
            .as_ref()
            .filter(|r| r.is_valid_at(utils::now()))
        {
            return Ok(record.access_token.clone());
        }

        self.renew(&mut current).await
    }

    /// Replaces a token the API rejected.
    ///
    /// # Arguments
    ///
    /// * `rejected` - The access token Spotify answered with 401
    ///
    /// # Returns
    ///
    /// The memoized token if another caller already replaced `rejected` and it
    /// is still valid, without contacting Spotify. Otherwise a refreshed or
    /// newly authorized token.
    ///
    /// # Errors
    ///
    /// Same as [`Authenticator::get_valid_token`].
    pub async fn force_refresh(&self, rejected: &str) -> Result<String> {
        let mut current = self.current.lock().await;
        if current.is_none() {
            *current = self.load_cached().await;
        }

        if let Some(record) = current
            .as_ref()
            .filter(|r| r.access_token != rejected && r.is_valid_at(utils::now()))
        {
            return Ok(record.access_token.clone());
        }

        self.renew(&mut current).await
    }

    /// Runs a new browser authorization regardless of the cache.
    ///
    /// The resulting record replaces the cached one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Auth`] if the authorization does not
    /// complete; the cached record is left untouched in that case.
    ///
    /// # Example
    ///
    /// ```
    /// authenticator.login().await?;
    /// ```
    pub async fn login(&self) -> Result<String> {
        let mut current = self.current.lock().await;
        let record = self.authorize().await?;
        Ok(self.store(&mut current, record).await)
    }

    /// Deletes the token cache and forgets the in-memory token.
    pub async fn logout(&self) -> Result<()> {
        let mut current = self.current.lock().await;
        *current = None;
        self.cache.clear().await?;
        Ok(())
    }

    pub async fn cached_record(&self) -> Option<TokenRecord> {
        let mut current = self.current.lock().await;
        if current.is_none() {
            *current = self.load_cached().await;
        }
        current.clone()
    }

    async fn load_cached(&self) -> Option<TokenRecord> {
        match self.cache.load().await {
            Ok(record) => record,
            Err(e) => {
                warning!("Ignoring token cache {}: {}", self.cache.path().display(), e);
                None
            }
        }
    }

    async fn renew(&self, current: &mut Option<TokenRecord>) -> Result<String> {
        let refreshed = match current.as_ref().filter(|r| r.has_refresh_token()) {
            Some(record) => match self.refresh(record).await {
                Ok(record) => Some(record),
                Err(e) => {
                    warning!("Failed to refresh token, starting new authorization: {}", e);
                    None
                }
            },
            None => None,
        };

        let record = match refreshed {
            Some(record) => record,
            None => self.authorize().await?,
        };

        Ok(self.store(current, record).await)
    }

    async fn store(&self, current: &mut Option<TokenRecord>, record: TokenRecord) -> String {
        if let Err(e) = self.cache.save(&record).await {
            warning!("Failed to save token cache: {}", e);
        }

        let token = record.access_token.clone();
        *current = Some(record);
        token
    }

    async fn refresh(&self, record: &TokenRecord) -> std::result::Result<TokenRecord, AuthError> {
        info!("Access token expired, refreshing...");
        let response = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", record.refresh_token.as_str()),
                ("client_id", self.config.client_id.as_str()),
            ])
            .await?;

        Ok(TokenRecord::from_response(
            response,
            Some(&record.refresh_token),
            utils::now(),
        ))
    }

    /// Full PKCE authorization: listener, browser, redirect, code exchange.
    async fn authorize(&self) -> Result<TokenRecord> {
        let session = PkceSession::new();
        let listener = CallbackListener::bind(
            self.config.callback_addr()?,
            self.config.callback_path(),
            &session.state,
        )
        .await?;

        let auth_url = utils::authorize_url(&self.config, &session)?;
        info!("Opening browser for Spotify authorization...");
        if self.browser.open(auth_url.as_str()).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                auth_url
            )
        }

        let pb = spinner("Waiting for Spotify authorization...");
        let code = listener.wait(self.config.callback_timeout).await;
        pb.finish_and_clear();

        let response = self.exchange_code(&code?, &session.code_verifier).await?;
        success!("Authentication successful!");

        Ok(TokenRecord::from_response(response, None, utils::now()))
    }

    async fn exchange_code(
        &self,
        code: &str,
        verifier: &str,
    ) -> std::result::Result<TokenResponse, AuthError> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ])
        .await
    }

    async fn request_token(
        &self,
        form: &[(&str, &str)],
    ) -> std::result::Result<TokenResponse, AuthError> {
        let res = self
            .http
            .post(&self.config.token_url)
            .form(form)
            .send()
            .await
            .map_err(AuthError::Transport)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AuthError::TokenEndpoint {
                status: status.as_u16(),
                body,
            });
        }

        res.json::<TokenResponse>()
            .await
            .map_err(AuthError::Transport)
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
