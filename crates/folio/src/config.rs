//! `site.toml` loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use folio_og::{AssetConfig, FontSource, RetryPolicy, INTER_BOLD, INTER_REGULAR};
use folio_static::BuildConfig;

/// Configuration file structure (site.toml).
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub og: OgSection,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteSection {
    pub content_dir: PathBuf,
    pub public_dir: PathBuf,
    pub output_dir: PathBuf,
    pub minify: bool,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            public_dir: PathBuf::from("public"),
            output_dir: PathBuf::from("dist"),
            minify: true,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct OgSection {
    pub font_regular: String,
    pub font_bold: String,
    pub favicon: PathBuf,
    pub background: PathBuf,
    /// Images rendered at once during a build
    pub concurrency: usize,
    pub timeout_secs: Option<u64>,
    pub cache_dir: Option<PathBuf>,
    pub retry: RetrySection,
}

impl Default for OgSection {
    fn default() -> Self {
        let assets = AssetConfig::default();
        Self {
            font_regular: INTER_REGULAR.to_string(),
            font_bold: INTER_BOLD.to_string(),
            favicon: assets.favicon,
            background: assets.background,
            concurrency: 4,
            timeout_secs: None,
            cache_dir: None,
            retry: RetrySection::default(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrySection {
    pub max_attempts: usize,
    pub base_delay_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            base_delay_ms: policy.base_delay.as_millis() as u64,
        }
    }
}

impl ConfigFile {
    /// Load `path` if it exists. A malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No {} found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Image asset settings. Local paths resolve against `root`.
    pub fn asset_config(&self, root: &Path) -> AssetConfig {
        let og = &self.og;
        AssetConfig {
            root: root.to_path_buf(),
            fonts: vec![
                FontSource::new("Inter", 400, og.font_regular.clone()),
                FontSource::new("Inter", 700, og.font_bold.clone()),
            ],
            favicon: og.favicon.clone(),
            background: og.background.clone(),
            timeout: og.timeout_secs.map(Duration::from_secs),
            retry: RetryPolicy {
                max_attempts: og.retry.max_attempts.max(1),
                base_delay: Duration::from_millis(og.retry.base_delay_ms),
            },
            cache_dir: og.cache_dir.as_ref().map(|dir| root.join(dir)),
        }
    }

    pub fn build_config(&self, root: &Path) -> BuildConfig {
        BuildConfig {
            content_dir: root.join(&self.site.content_dir),
            public_dir: root.join(&self.site.public_dir),
            output_dir: root.join(&self.site.output_dir),
            minify: self.site.minify,
            og: self.asset_config(root),
            og_concurrency: self.og.concurrency.max(1),
            skip_og: false,
        }
    }
}
