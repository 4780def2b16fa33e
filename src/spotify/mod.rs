//! # Spotify Integration Module
//!
//! Everything that talks to Spotify: the OAuth 2.0 PKCE authenticator, the
//! Web API client and the gateway that joins them.
//!
//! ```text
//! Tool Registry
//!      ↓
//! Gateway ──→ Authenticator ──→ TokenCache / CallbackListener / token endpoint
//!      ↓
//! SpotifyClient (reqwest, JSON)
//!      ↓
//! Spotify Web API
//! ```
//!
//! ## Authentication
//!
//! [`Authenticator::get_valid_token`] returns the cached token while it is
//! valid, refreshes it with the refresh token once it expires and, when
//! refreshing is impossible, runs the browser flow:
//! 1. **Code Verifier Generation**: 128 random alphanumeric characters
//! 2. **Challenge Creation**: base64url(SHA-256(verifier)) without padding
//! 3. **Callback Listener**: bound on the loopback redirect URI
//! 4. **Authorization Request**: browser opened at Spotify's authorize URL
//! 5. **Redirect**: `state` checked, authorization code extracted
//! 6. **Token Exchange**: code + verifier exchanged for tokens
//! 7. **Token Storage**: record persisted to the token cache
//!
//! ## Error Handling
//!
//! - **401 Unauthorized**: the gateway forces one refresh and retries once
//! - **429 Too Many Requests**: surfaced with the `Retry-After` hint, never retried
//! - **Other failures**: surfaced with status and body

pub mod auth;
pub mod client;
pub mod gateway;

pub use auth::{Authenticator, Browser, SystemBrowser};
pub use client::SpotifyClient;
pub use gateway::Gateway;
