//! Servers for lectern sites.
//!
//! The preview server serves a built site under its base path, resolving
//! clean URLs to `.html` files. The development server rebuilds on change
//! and tells connected browsers to reload over a WebSocket.

pub mod dev;
pub mod preview;
pub mod reload;
pub mod watcher;

pub use dev::{DevServer, DevServerConfig};
pub use preview::{preview_router, PreviewConfig, PreviewServer};
pub use reload::{ReloadHub, ReloadMessage};
pub use watcher::{FileWatcher, WatchEvent};

use std::net::SocketAddr;

/// Errors that can occur with the servers.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    Bind(SocketAddr, #[source] std::io::Error),

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("File watch error: {0}")]
    Watch(#[source] std::io::Error),

    #[error("Directory not found: {0}")]
    MissingDir(std::path::PathBuf),

    #[error(transparent)]
    Config(#[from] lectern_config::ConfigError),

    #[error(transparent)]
    Build(#[from] lectern_static::BuildError),
}
