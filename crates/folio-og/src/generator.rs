//! End-to-end generation: assets, composition, rasterization.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use futures::future::FutureExt;
use futures::stream::{self, StreamExt};

use crate::assets::{AssetConfig, AssetLoader, OgAssets};
use crate::compose::{compose, ImageSources};
use crate::emit::entity_tag;
use crate::error::OgError;
use crate::raster::{Rasterizer, RasterError};

/// Parameters for one preview image.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub publish_date: NaiveDate,
}

impl RenderTarget {
    /// Output path below an output directory: `og/<slug>.png`.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        output_dir.join("og").join(format!("{}.png", self.slug))
    }
}

/// A rendered preview.
#[derive(Debug, Clone, PartialEq)]
pub struct OgImage {
    pub png: Vec<u8>,
    pub etag: String,
}

/// Inputs loaded for one target, tagged before any rendering happens.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub etag: String,
    target: RenderTarget,
    assets: OgAssets,
}

/// Outcome of rendering many targets.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(String, OgError)>,
}

/// Generates preview images.
#[derive(Debug, Clone)]
pub struct OgGenerator {
    loader: AssetLoader,
    rasterizer: Rasterizer,
}

impl OgGenerator {
    pub fn new(config: AssetConfig) -> Result<Self, OgError> {
        Ok(Self {
            loader: AssetLoader::new(config)?,
            rasterizer: Rasterizer::default(),
        })
    }

    /// Render one target. Assets are loaded fresh for every call.
    pub async fn generate(&self, target: &RenderTarget) -> Result<OgImage, OgError> {
        let prepared = self.prepare(target).await?;
        self.render(prepared).await
    }

    /// Load the assets for `target` and compute the tag of its image.
    pub async fn prepare(&self, target: &RenderTarget) -> Result<PreparedImage, OgError> {
        let assets = self.loader.load().await?;
        Ok(PreparedImage {
            etag: etag_for(target, &assets),
            target: target.clone(),
            assets,
        })
    }

    /// Compose and rasterize prepared inputs.
    pub async fn render(&self, prepared: PreparedImage) -> Result<OgImage, OgError> {
        let PreparedImage {
            etag,
            target,
            assets,
        } = prepared;

        let images = ImageSources {
            background: assets.background.data_uri(),
            favicon: assets.favicon.data_uri(),
        };
        let tree = compose(
            &target.title,
            &target.description,
            target.publish_date,
            &images,
        );

        let rasterizer = self.rasterizer;
        let fonts = assets.fonts;
        let png = tokio::task::spawn_blocking(move || rasterizer.render(&tree, &fonts))
            .await
            .map_err(|e| RasterError::Task(e.to_string()))??;

        Ok(OgImage { png, etag })
    }

    /// Render one target to `og/<slug>.png`. Nothing is written on failure.
    pub async fn write(&self, target: &RenderTarget, output_dir: &Path) -> Result<PathBuf, OgError> {
        let image = self.generate(target).await?;
        let path = target.output_path(output_dir);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| OgError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        tokio::fs::write(&path, &image.png)
            .await
            .map_err(|e| OgError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(path)
    }

    /// Render every target with at most `concurrency` in flight.
    ///
    /// A failing target is reported and skipped; the others still render.
    pub async fn write_all(
        &self,
        targets: &[RenderTarget],
        output_dir: &Path,
        concurrency: usize,
    ) -> BatchReport {
        let jobs: Vec<_> = targets
            .iter()
            .map(|target| {
                async move { (target.slug.clone(), self.write(target, output_dir).await) }.boxed()
            })
            .collect();
        let results: Vec<(String, Result<PathBuf, OgError>)> = stream::iter(jobs)
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

        let mut report = BatchReport::default();
        for (slug, result) in results {
            match result {
                Ok(path) => {
                    tracing::debug!("Wrote {}", path.display());
                    report.written.push(path);
                }
                Err(e) => {
                    tracing::error!("Failed to generate OG image for {}: {}", slug, e);
                    report.failed.push((slug, e));
                }
            }
        }
        report.written.sort();
        report.failed.sort_by(|a, b| a.0.cmp(&b.0));
        report
    }
}

fn etag_for(target: &RenderTarget, assets: &OgAssets) -> String {
    let date = target.publish_date.to_string();
    let mut parts: Vec<&[u8]> = vec![
        target.title.as_bytes(),
        target.description.as_bytes(),
        date.as_bytes(),
        assets.favicon.bytes.as_slice(),
        assets.background.bytes.as_slice(),
    ];
    for font in &assets.fonts {
        parts.push(font.data.as_slice());
    }
    entity_tag(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::FontSource;
    use crate::testutil::{fixture_font, tiny_png};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tempfile::tempdir;

    /// Font host whose regular weight answers 404 for the first `failures` requests.
    async fn flaky_host(failures: usize) -> String {
        let count = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                "/regular.ttf",
                get(move || {
                    let count = Arc::clone(&count);
                    async move {
                        if count.fetch_add(1, Ordering::SeqCst) < failures {
                            (StatusCode::NOT_FOUND, Vec::new())
                        } else {
                            (StatusCode::OK, fixture_font())
                        }
                    }
                }),
            )
            .route("/bold.ttf", get(|| async { (StatusCode::OK, fixture_font()) }))
            .route("/garbage.ttf", get(|| async { b"not a font".to_vec() }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn generator(root: &Path, host: &str) -> OgGenerator {
        std::fs::create_dir_all(root.join("public")).unwrap();
        std::fs::create_dir_all(root.join("src/assets")).unwrap();
        std::fs::write(root.join("public/favicon-192x192.png"), tiny_png()).unwrap();
        std::fs::write(root.join("src/assets/base-og.png"), tiny_png()).unwrap();

        OgGenerator::new(AssetConfig {
            root: root.to_path_buf(),
            fonts: vec![
                FontSource::new("Inter", 400, format!("{host}/regular.ttf")),
                FontSource::new("Inter", 700, format!("{host}/bold.ttf")),
            ],
            ..AssetConfig::default()
        })
        .unwrap()
    }

    fn target(slug: &str) -> RenderTarget {
        RenderTarget {
            slug: slug.to_string(),
            title: "Shipping side projects".to_string(),
            description: "What finishing things taught me.".to_string(),
            publish_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn identical_inputs_give_identical_png() {
        let temp = tempdir().unwrap();
        let host = flaky_host(0).await;
        let generator = generator(temp.path(), &host);

        let first = generator.generate(&target("a")).await.unwrap();
        let second = generator.generate(&target("a")).await.unwrap();

        assert_eq!(first.png, second.png);
        assert_eq!(first.etag, second.etag);
    }

    #[tokio::test]
    async fn etag_tracks_content() {
        let temp = tempdir().unwrap();
        let host = flaky_host(0).await;
        let generator = generator(temp.path(), &host);
        let mut changed = target("a");
        changed.title.push('!');

        let first = generator.generate(&target("a")).await.unwrap();
        let second = generator.generate(&changed).await.unwrap();

        assert_ne!(first.etag, second.etag);
    }

    #[tokio::test]
    async fn prepared_tag_matches_rendered_image() {
        let temp = tempdir().unwrap();
        let host = flaky_host(0).await;
        let generator = generator(temp.path(), &host);

        let prepared = generator.prepare(&target("a")).await.unwrap();
        let etag = prepared.etag.clone();
        let image = generator.render(prepared).await.unwrap();

        assert_eq!(image.etag, etag);
        assert_eq!(image, generator.generate(&target("a")).await.unwrap());
    }

    #[tokio::test]
    async fn preparing_does_not_parse_fonts() {
        let temp = tempdir().unwrap();
        let host = flaky_host(0).await;
        let mut generator = generator(temp.path(), &host);
        generator.loader = AssetLoader::new(AssetConfig {
            fonts: vec![FontSource::new("Inter", 400, format!("{host}/garbage.ttf"))],
            ..generator.loader.config().clone()
        })
        .unwrap();

        let prepared = generator.prepare(&target("a")).await.unwrap();
        let err = generator.render(prepared).await.unwrap_err();

        assert!(matches!(err, OgError::Raster(RasterError::InvalidFont { .. })));
    }

    #[tokio::test]
    async fn failed_fetch_writes_nothing() {
        let temp = tempdir().unwrap();
        let host = flaky_host(usize::MAX).await;
        let generator = generator(temp.path(), &host);
        let out = temp.path().join("dist");

        let err = generator.write(&target("a"), &out).await.unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(!out.join("og/a.png").exists());
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_other_targets() {
        let temp = tempdir().unwrap();
        let host = flaky_host(1).await;
        let generator = generator(temp.path(), &host);
        let out = temp.path().join("dist");

        let report = generator
            .write_all(&[target("first"), target("second")], &out, 1)
            .await;

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "first");
        assert_eq!(report.written, vec![out.join("og/second.png")]);
        assert!(!out.join("og/first.png").exists());
        assert!(out.join("og/second.png").exists());
    }

    #[test]
    fn nested_slugs_map_to_nested_files() {
        let path = target("2024/launch").output_path(Path::new("dist"));
        assert_eq!(path, PathBuf::from("dist/og/2024/launch.png"));
    }
}
