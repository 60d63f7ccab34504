//! Render a single preview image.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_content::{ContentStore, Writing};
use folio_og::OgGenerator;
use folio_static::og_target;

use crate::config::ConfigFile;

/// Run the og command.
pub async fn run(config_path: &Path, slug: &str, output: Option<PathBuf>) -> Result<()> {
    let file_config = ConfigFile::load(config_path)?;
    let root = Path::new(".");
    let build = file_config.build_config(root);

    let store = ContentStore::load(&build.content_dir)?;
    let entry = store
        .get_entry::<Writing>(slug)
        .with_context(|| format!("No writing entry with slug '{}'", slug))?;
    if entry.data.draft {
        tracing::warn!("'{}' is a draft", slug);
    }
    let target = og_target(entry);

    let generator = OgGenerator::new(file_config.asset_config(root))?;
    let path = match output {
        Some(path) => {
            let image = generator.generate(&target).await?;
            tokio::fs::write(&path, &image.png)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path
        }
        None => generator.write(&target, &build.output_dir).await?,
    };

    tracing::info!("Wrote {}", path.display());

    Ok(())
}
