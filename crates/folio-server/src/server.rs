//! Preview server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use folio_og::{AssetConfig, OgGenerator};
use folio_static::StaticBuilder;

use crate::og::{og_handler, OgState};
use crate::watcher::FileWatcher;

/// On-demand image generation settings.
#[derive(Debug, Clone)]
pub struct DynamicOg {
    /// Content collections root
    pub content_dir: PathBuf,

    pub assets: AssetConfig,
}

/// Configuration for the preview server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Built site to serve
    pub dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Render `/og/<slug>.png` per request instead of serving built files
    pub dynamic_og: Option<DynamicOg>,

    /// Paths whose changes trigger a rebuild
    pub watch: Vec<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("dist"),
            port: 4321,
            host: "127.0.0.1".to_string(),
            open: false,
            dynamic_og: None,
            watch: Vec::new(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Server error: {0}")]
    Serve(String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("Failed to set up OG image generation: {0}")]
    Og(#[from] folio_og::OgError),
}

/// Preview server for the built site.
pub struct DevServer {
    config: ServerConfig,
    builder: Option<StaticBuilder>,
}

impl DevServer {
    /// Create a new server.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            builder: None,
        }
    }

    /// Rebuild with `builder` whenever a watched path changes.
    pub fn with_rebuild(mut self, builder: StaticBuilder) -> Self {
        self.builder = Some(builder);
        self
    }

    /// The application router.
    pub fn router(&self) -> Result<Router, ServerError> {
        let mut app = Router::new();

        if let Some(dynamic) = &self.config.dynamic_og {
            let state = Arc::new(OgState {
                content_dir: dynamic.content_dir.clone(),
                generator: OgGenerator::new(dynamic.assets.clone())?,
            });
            app = app.route("/og/{*path}", get(og_handler).with_state(state));
            tracing::info!("Rendering OG images on demand");
        }

        Ok(app.fallback_service(ServeDir::new(&self.config.dir)))
    }

    /// Start the server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|_| {
                ServerError::InvalidAddress(format!("{}:{}", self.config.host, self.config.port))
            })?;

        let app = self.router()?;

        if let Some(builder) = self.builder {
            spawn_rebuilds(builder, &self.config.watch)?;
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        tracing::info!("Serving {} at http://{}", self.config.dir.display(), addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))
    }
}

fn spawn_rebuilds(builder: StaticBuilder, paths: &[PathBuf]) -> Result<(), ServerError> {
    let (watcher, mut rx) =
        FileWatcher::new(paths).map_err(|e| ServerError::WatchError(e.to_string()))?;

    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            // Let editors finish writing before reading the tree
            tokio::time::sleep(Duration::from_millis(50)).await;
            while rx.try_recv().is_ok() {}

            tracing::info!("Changed: {}", event.path().display());
            match builder.build().await {
                Ok(result) => {
                    tracing::info!("Rebuilt {} pages in {}ms", result.pages, result.duration_ms)
                }
                Err(e) => tracing::error!("Rebuild failed: {}", e),
            }
        }
        // Keep watcher alive
        drop(watcher);
    });

    Ok(())
}
