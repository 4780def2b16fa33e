//! # API Module
//!
//! HTTP handlers served by the local OAuth redirect listener.
//!
//! - [`callback`] - receives Spotify's redirect at the end of the PKCE
//!   authorization, checks the `state` value and hands the authorization
//!   code to the waiting [`crate::server::CallbackListener`].
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spotify_tools::api::callback;
//!
//! let app = Router::new().route("/callback", get(callback));
//! ```

mod callback;

pub use callback::CallbackContext;
pub use callback::authorization_code;
pub use callback::callback;
