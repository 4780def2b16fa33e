use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::utils;

/// Seconds subtracted from `expires_in` when a token is stored, so that
/// `expires_at` stays a strict upper bound on the token's validity.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// The persisted token cache record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) after which the access token is treated as expired.
    pub expires_at: i64,
}

impl TokenRecord {
    /// Builds a record from a token endpoint reply received at `now`.
    ///
    /// Refresh replies may omit the refresh token; `previous_refresh` is kept
    /// in that case.
    pub fn from_response(response: TokenResponse, previous_refresh: Option<&str>, now: i64) -> Self {
        let lifetime = i64::try_from(response.expires_in)
            .unwrap_or(i64::MAX)
            .saturating_sub(EXPIRY_MARGIN_SECS)
            .max(0);
        let refresh_token = response
            .refresh_token
            .filter(|t| !t.is_empty())
            .or_else(|| previous_refresh.map(str::to_string))
            .unwrap_or_default();

        Self {
            access_token: response.access_token,
            refresh_token,
            expires_at: now.saturating_add(lifetime),
        }
    }

    pub fn is_valid_at(&self, now: i64) -> bool {
        now < self.expires_at
    }

    pub fn has_refresh_token(&self) -> bool {
        !self.refresh_token.is_empty()
    }
}

/// Reply of the token endpoint for both code exchange and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Secrets of one in-flight authorization; dropped after the code exchange.
#[derive(Debug, Clone)]
pub struct PkceSession {
    pub code_verifier: String,
    pub code_challenge: String,
    pub state: String,
}

impl PkceSession {
    pub fn new() -> Self {
        let code_verifier = utils::generate_code_verifier();
        let code_challenge = utils::generate_code_challenge(&code_verifier);
        Self {
            code_verifier,
            code_challenge,
            state: utils::generate_state(),
        }
    }
}

impl Default for PkceSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Query parameters of the OAuth redirect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Tabled)]
pub struct ToolTableRow {
    pub name: String,
    pub parameters: String,
    pub endpoint: String,
}
