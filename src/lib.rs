//! Blind listening game for Spotify
//!
//! This library drives a "guess the year" listening game: it picks a random
//! track from a playlist or the saved-tracks library, plays a few seconds of it
//! from a random position on a Spotify device and pauses it again. A companion
//! operation shuffles a whole pool into the playback queue.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the game server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `game` - Round orchestration: pool fetching, shuffling, devices, playback, stop timer
//! - `management` - Token cache and refresh
//! - `server` - axum server for the OAuth callback and the game routes
//! - `spotify` - Spotify Web API port and client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use hitstercli::{config, game::Session, spotify::WebApiClient, types::PoolRef};
//!
//! #[tokio::main]
//! async fn main() -> hitstercli::Res<()> {
//!     config::load_env().await?;
//!     let client = Arc::new(WebApiClient::from_cache(config::spotify_apiurl()).await);
//!     let mut session = Session::new(client);
//!     let round = session.start_round(&PoolRef::Favorites).await?;
//!     println!("{}", round.year_label());
//!     session.wait_for_stop().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod game;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Provides a standard error handling pattern throughout the application
/// using a boxed dynamic error trait object. This allows for flexible
/// error handling while maintaining Send + Sync bounds for async contexts.
///
/// # Type Parameters
///
/// - `T` - The success type returned on successful operations
///
/// # Example
///
/// ```
/// use hitstercli::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Accepts the same arguments as `println!`.
///
/// ```
/// info!("there were {} tracks in {}", count, pool);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark to stderr and exits
/// the program with code 1.
///
/// Only the binary uses it. Library code returns errors instead, a failed
/// round must never take the server down.
///
/// ```
/// let session = match build_session().await {
///     Ok(session) => session,
///     Err(e) => error!("Cannot prepare session: {}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning with a yellow exclamation mark to stderr. Used for
/// recoverable failures such as a rejected play or queue call.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
