//! Error taxonomy for image generation.

use std::path::PathBuf;

use crate::raster::RasterError;

/// Errors that fail a single image generation.
#[derive(Debug, thiserror::Error)]
pub enum OgError {
    /// The font host answered with a non-success status.
    #[error("failed to fetch {url}: HTTP {status}")]
    Fetch { url: String, status: u16 },

    /// The font request never produced a response.
    #[error("failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Raster(#[from] RasterError),
}

impl OgError {
    /// Whether another attempt could succeed.
    ///
    /// Client errors such as 404 are final; transport failures and 5xx are not.
    pub fn is_transient(&self) -> bool {
        match self {
            OgError::Transport { .. } => true,
            OgError::Fetch { status, .. } => *status >= 500,
            OgError::Io { .. } | OgError::Raster(_) => false,
        }
    }

    /// HTTP status carried by a fetch failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            OgError::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }
}
