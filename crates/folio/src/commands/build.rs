//! Static site build command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_static::{SiteConfig, StaticBuilder};

use crate::config::ConfigFile;

/// Run the build command.
pub async fn run(
    config_path: &Path,
    output: Option<PathBuf>,
    skip_og: bool,
    minify: Option<bool>,
) -> Result<()> {
    tracing::info!("Building site...");

    let file_config = ConfigFile::load(config_path)?;
    let mut config = file_config.build_config(Path::new("."));
    if let Some(output) = output {
        config.output_dir = output;
    }
    if let Some(minify) = minify {
        config.minify = minify;
    }
    config.skip_og = skip_og;

    let result = StaticBuilder::new(config, SiteConfig::from_env())?
        .build()
        .await
        .context("Build failed")?;

    tracing::info!(
        "Built {} pages and {} OG images in {}ms",
        result.pages,
        result.og_images,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
