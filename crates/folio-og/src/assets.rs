//! Asset loading for image generation.
//!
//! Fonts come from a remote host, the favicon and background from the project
//! tree. Every call to [`AssetLoader::load`] reads everything again unless a
//! font cache directory is configured.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::error::OgError;
use crate::raster::Font;

pub const INTER_REGULAR: &str =
    "https://cdn.jsdelivr.net/fontsource/fonts/inter@latest/latin-400-normal.ttf";
pub const INTER_BOLD: &str =
    "https://cdn.jsdelivr.net/fontsource/fonts/inter@latest/latin-700-normal.ttf";

/// A remote font weight.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSource {
    /// Cache key, e.g. `inter-700`.
    pub id: String,
    pub family: String,
    pub weight: u16,
    pub url: String,
}

impl FontSource {
    pub fn new(family: &str, weight: u16, url: impl Into<String>) -> Self {
        Self {
            id: format!("{}-{}", family.to_lowercase(), weight),
            family: family.to_string(),
            weight,
            url: url.into(),
        }
    }
}

/// Retry behavior for font fetches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. `1` disables retrying.
    pub max_attempts: usize,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.base_delay)
            .with_max_times(self.max_attempts.saturating_sub(1))
    }
}

/// Where the loader finds its inputs.
#[derive(Debug, Clone)]
pub struct AssetConfig {
    /// Project root that local paths are relative to.
    pub root: PathBuf,
    pub fonts: Vec<FontSource>,
    pub favicon: PathBuf,
    pub background: PathBuf,
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
    pub cache_dir: Option<PathBuf>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            fonts: vec![
                FontSource::new("Inter", 400, INTER_REGULAR),
                FontSource::new("Inter", 700, INTER_BOLD),
            ],
            favicon: PathBuf::from("public/favicon-192x192.png"),
            background: PathBuf::from("src/assets/base-og.png"),
            timeout: None,
            retry: RetryPolicy::default(),
            cache_dir: None,
        }
    }
}

/// Raw bytes of everything one image needs.
#[derive(Debug, Clone)]
pub struct OgAssets {
    pub fonts: Vec<Font>,
    pub favicon: LocalAsset,
    pub background: LocalAsset,
}

/// A file read from the project tree.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalAsset {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

impl LocalAsset {
    /// Base64 data URI for embedding in the layout tree.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Media type guessed from a file extension.
pub fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "image/png",
    }
}

/// Fetches fonts and reads local images.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    config: AssetConfig,
    client: reqwest::Client,
}

impl AssetLoader {
    pub fn new(config: AssetConfig) -> Result<Self, OgError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| OgError::Transport {
            url: String::new(),
            source: e,
        })?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AssetConfig {
        &self.config
    }

    /// Load all assets. Fonts are fetched concurrently; the first failure wins.
    pub async fn load(&self) -> Result<OgAssets, OgError> {
        let fonts = futures::future::try_join_all(
            self.config.fonts.iter().map(|source| self.fetch_font(source)),
        );
        let favicon = self.read_local(&self.config.favicon);
        let background = self.read_local(&self.config.background);

        let (fonts, favicon, background) = tokio::try_join!(fonts, favicon, background)?;

        Ok(OgAssets {
            fonts,
            favicon,
            background,
        })
    }

    async fn fetch_font(&self, source: &FontSource) -> Result<Font, OgError> {
        if let Some(bytes) = self.cached(source).await {
            tracing::debug!("Font {} served from cache", source.id);
            return Ok(Font::new(source.family.clone(), source.weight, bytes));
        }

        let bytes = if self.config.retry.max_attempts > 1 {
            (|| self.fetch_once(source))
                .retry(self.config.retry.backoff())
                .when(OgError::is_transient)
                .notify(|err, delay| {
                    tracing::warn!("Retrying {} in {:?}: {}", source.url, delay, err);
                })
                .await?
        } else {
            self.fetch_once(source).await?
        };

        self.store(source, &bytes).await;

        Ok(Font::new(source.family.clone(), source.weight, bytes))
    }

    async fn fetch_once(&self, source: &FontSource) -> Result<Vec<u8>, OgError> {
        let response = self
            .client
            .get(&source.url)
            .send()
            .await
            .map_err(|e| OgError::Transport {
                url: source.url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(OgError::Fetch {
                url: source.url.clone(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| OgError::Transport {
            url: source.url.clone(),
            source: e,
        })?;

        Ok(bytes.to_vec())
    }

    async fn read_local(&self, relative: &Path) -> Result<LocalAsset, OgError> {
        let path = self.config.root.join(relative);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| OgError::Io { path, source: e })?;

        Ok(LocalAsset {
            bytes,
            mime: mime_for(relative),
        })
    }

    /// `<cache_dir>/<id>-<url hash>.ttf`, so a changed URL misses.
    fn cache_path(&self, source: &FontSource) -> Option<PathBuf> {
        let digest = Sha256::digest(source.url.as_bytes());
        self.config
            .cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}-{}.ttf", source.id, hex::encode(&digest[..8]))))
    }

    /// A cached font, if present and parseable. Unparseable entries are dropped.
    async fn cached(&self, source: &FontSource) -> Option<Vec<u8>> {
        let path = self.cache_path(source)?;
        let bytes = tokio::fs::read(&path).await.ok()?;

        if let Err(e) = ttf_parser::Face::parse(&bytes, 0) {
            tracing::warn!("Discarding cached font {}: {}", path.display(), e);
            if let Err(e) = tokio::fs::remove_file(&path).await {
                tracing::warn!("Failed to remove {}: {}", path.display(), e);
            }
            return None;
        }
        Some(bytes)
    }

    /// Cache writes are best effort. Only parseable fonts are kept.
    async fn store(&self, source: &FontSource, bytes: &[u8]) {
        let Some(path) = self.cache_path(source) else {
            return;
        };
        if ttf_parser::Face::parse(bytes, 0).is_err() {
            return;
        }

        let shown = path.display().to_string();
        let bytes = bytes.to_vec();
        match tokio::task::spawn_blocking(move || write_atomic(&path, &bytes)).await {
            Ok(Ok(())) => tracing::debug!("Cached font {}", shown),
            Ok(Err(e)) => tracing::warn!("Failed to cache font {}: {}", shown, e),
            Err(e) => tracing::warn!("Failed to cache font {}: {}", shown, e),
        }
    }
}

/// Write through a temporary file in the same directory, then rename.
///
/// Readers see either the old file or the complete new one.
fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
