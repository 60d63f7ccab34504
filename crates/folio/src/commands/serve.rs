//! Preview server command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use folio_server::{DevServer, DynamicOg, ServerConfig};
use folio_static::{SiteConfig, StaticBuilder};

use crate::config::ConfigFile;

/// Options for the serve command.
#[derive(Debug)]
pub struct ServeOptions {
    pub port: u16,
    pub dir: Option<PathBuf>,
    pub dynamic_og: bool,
    pub watch: bool,
    pub open: bool,
}

/// Run the serve command.
pub async fn run(config_path: &Path, options: ServeOptions) -> Result<()> {
    let file_config = ConfigFile::load(config_path)?;
    let root = Path::new(".");
    let mut build = file_config.build_config(root);
    let dir = options.dir.unwrap_or_else(|| build.output_dir.clone());

    if !dir.exists() && !options.watch {
        anyhow::bail!(
            "Directory not found: {}. Run 'folio build' first.",
            dir.display()
        );
    }

    let dynamic_og = options.dynamic_og.then(|| DynamicOg {
        content_dir: build.content_dir.clone(),
        assets: file_config.asset_config(root),
    });

    let config = ServerConfig {
        dir: dir.clone(),
        port: options.port,
        open: options.open,
        dynamic_og,
        watch: vec![build.content_dir.clone(), build.public_dir.clone()],
        ..ServerConfig::default()
    };

    let mut server = DevServer::new(config);
    if options.watch {
        build.output_dir = dir;
        // Images are rendered on demand or by a full build
        build.skip_og = true;
        let builder = StaticBuilder::new(build, SiteConfig::from_env())?;
        builder.build().await?;
        server = server.with_rebuild(builder);
    }

    server.start().await?;

    Ok(())
}
