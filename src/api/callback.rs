use std::sync::Arc;

use axum::{Extension, extract::Query, http::StatusCode, response::Html};
use tokio::sync::mpsc;

use crate::{error::AuthError, types::CallbackParams};

const SUCCESS_PAGE: &str = "<html><body>\
<h2>Authentication successful.</h2>\
<p>You have authorized spotify-tools. You can close this window and return to your assistant.</p>\
<script>window.close();</script>\
</body></html>";

const FAILURE_PAGE: &str = "<html><body>\
<h2>Authentication failed.</h2>\
<p>Return to your assistant and try again. You can close this window.</p>\
</body></html>";

/// Shared between the listener and the handler for one authorization.
pub struct CallbackContext {
    pub expected_state: String,
    pub outcome: mpsc::Sender<Result<String, AuthError>>,
}

/// Handles the OAuth redirect.
///
/// Only the first redirect is delivered to the waiting authorization; later
/// requests still get a page but are otherwise ignored.
pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(context): Extension<Arc<CallbackContext>>,
) -> (StatusCode, Html<&'static str>) {
    let outcome = authorization_code(params, &context.expected_state);
    let reply = match &outcome {
        Ok(_) => (StatusCode::OK, Html(SUCCESS_PAGE)),
        Err(_) => (StatusCode::BAD_REQUEST, Html(FAILURE_PAGE)),
    };

    // Full or closed means a redirect was already taken.
    let _ = context.outcome.try_send(outcome);
    reply
}

/// Validates the redirect parameters and extracts the authorization code.
///
/// The state check runs before the code is looked at, so a forged redirect
/// never yields a code.
pub fn authorization_code(
    params: CallbackParams,
    expected_state: &str,
) -> Result<String, AuthError> {
    if let Some(error) = params.error {
        return Err(AuthError::Declined(error));
    }

    match params.state.as_deref() {
        None => return Err(AuthError::MissingParameter("state")),
        Some(state) if state != expected_state => return Err(AuthError::StateMismatch),
        Some(_) => {}
    }

    params
        .code
        .filter(|code| !code.is_empty())
        .ok_or(AuthError::MissingParameter("code"))
}
