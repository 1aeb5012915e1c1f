//! Static audio file server library.
//!
//! Serves audio files from a single directory by base name, picking the most
//! preferred available format, and lists the directory as a catalog.

pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod resolver;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

pub use config::Config;
pub use error::AudioServerError;
pub use routes::create_router;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Directory audio files are served from
    pub root_dir: PathBuf,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState with the given root directory and config.
    pub fn with_config(root_dir: PathBuf, config: Config) -> Self {
        Self {
            root_dir,
            config: Arc::new(config),
        }
    }
}
