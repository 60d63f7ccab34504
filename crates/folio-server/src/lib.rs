//! Preview server for the built site.
//!
//! Serves the output directory, optionally renders preview images per request,
//! and can rebuild the site when content changes.

pub mod og;
pub mod server;
pub mod watcher;

pub use server::{DevServer, DynamicOg, ServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
