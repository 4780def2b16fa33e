//! # CLI Module
//!
//! Command implementations behind the `spotify-tools` binary. Each command
//! receives the context it needs from `main` and reports progress through the
//! crate's status macros on stderr; tool results go to stdout as JSON.
//!
//! ## Commands
//!
//! - [`auth`] - Ensures a valid token exists, running the browser authorization if needed
//! - [`logout`] - Deletes the cached token
//! - [`list_tools`] - Lists the tool table or its JSON schemas
//! - [`call`] - Invokes one tool and prints its JSON response
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotify-tools auth                                   # authorize once
//! spotify-tools tools --json                           # schemas for the assistant
//! spotify-tools call search_tracks -a query="Daft Punk" -a limit=5
//! spotify-tools call get_user_top_artists --args '{"time_range": "long_term"}'
//! ```

mod auth;
mod call;
mod tools;

pub use auth::auth;
pub use auth::logout;
pub use call::call;
pub use call::parse_key_value;
pub use tools::list_tools;
