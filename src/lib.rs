//! Spotify Tools Library
//!
//! Exposes a read-only slice of the Spotify Web API (search, track, artist,
//! album and playlist lookups, the current user's profile, top items and
//! recently played tracks) as a fixed table of named tools that an assistant
//! integration can invoke. Access is authorized with the OAuth 2.0
//! authorization code flow with PKCE; tokens are cached in a JSON file and
//! refreshed when they expire.
//!
//! # Modules
//!
//! - `api` - HTTP handlers of the local OAuth redirect listener
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration from environment variables and `.env` files
//! - `error` - Error taxonomy shared by every layer
//! - `management` - On-disk token cache
//! - `server` - Scoped, single-shot OAuth callback listener
//! - `spotify` - Authenticator, Web API client and gateway
//! - `tools` - The tool registry and its parameter handling
//! - `types` - Data structures and type definitions
//! - `utils` - PKCE helpers and small utilities
//!
//! # Example
//!
//! ```
//! use serde_json::{Map, json};
//! use spotify_tools::{config::Config, management::TokenCache, spotify, tools::ToolRegistry};
//!
//! #[tokio::main]
//! async fn main() -> spotify_tools::error::Result<()> {
//!     let config = Config::from_env()?;
//!     let cache = TokenCache::new(config.cache_path.clone());
//!     let registry = ToolRegistry::new(spotify::Gateway::from_config(config, cache));
//!
//!     let mut args = Map::new();
//!     args.insert("query".into(), json!("Daft Punk"));
//!     let tracks = registry.invoke("search_tracks", &args).await?;
//!     println!("{tracks:#}");
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod tools;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// All status macros write to stderr; stdout is reserved for tool output.
///
/// # Example
///
/// ```
/// info!("Opening browser for Spotify authorization...");
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the CLI layer uses this macro; library code returns errors instead.
///
/// # Behavior
///
/// Terminates the process with exit code 1 after printing.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, e.g. a failed token refresh that falls back
/// to a fresh authorization.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
