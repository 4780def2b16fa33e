use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::sync::{mpsc, oneshot};

use crate::{
    api::{self, CallbackContext},
    error::AuthError,
    warning,
};

/// Single-shot listener for the OAuth redirect.
///
/// Binding starts an axum server on the redirect address that routes only the
/// callback path. [`CallbackListener::wait`] resolves with the first redirect
/// or fails after the timeout. Dropping the listener, on any path, shuts the
/// server down and releases the port.
pub struct CallbackListener {
    addr: SocketAddr,
    outcome: mpsc::Receiver<Result<String, AuthError>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl CallbackListener {
    pub async fn bind(
        addr: SocketAddr,
        path: &str,
        expected_state: &str,
    ) -> Result<Self, AuthError> {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| AuthError::Listener {
                addr: addr.to_string(),
                source,
            })?;
        let addr = listener.local_addr().unwrap_or(addr);

        let (outcome_tx, outcome_rx) = mpsc::channel(1);
        let context = Arc::new(CallbackContext {
            expected_state: expected_state.to_string(),
            outcome: outcome_tx,
        });

        let app = Router::new().route(path, get(api::callback).layer(Extension(context)));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = server.await {
                warning!("Callback listener stopped: {}", e);
            }
        });

        Ok(Self {
            addr,
            outcome: outcome_rx,
            shutdown: Some(shutdown_tx),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Waits for the redirect and returns its authorization code.
    pub async fn wait(mut self, timeout: Duration) -> Result<String, AuthError> {
        match tokio::time::timeout(timeout, self.outcome.recv()).await {
            Ok(Some(outcome)) => outcome,
            Ok(None) => Err(AuthError::ListenerClosed),
            Err(_) => Err(AuthError::Timeout(timeout)),
        }
    }
}

impl Drop for CallbackListener {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}
