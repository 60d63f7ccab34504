//! Static site builder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use minijinja::{context, Value};
use rayon::prelude::*;

use folio_content::{
    sort_projects, sort_uses, ContentError, ContentStore, Entry, Note, Project, Rant, Schema,
    Uses, Writing,
};
use folio_og::{format_date, AssetConfig, OgError, OgGenerator};

use crate::assets::AssetPipeline;
use crate::feed::build_feed;
use crate::og::{og_image_path, og_targets};
use crate::site::{SiteConfig, StaticPage};
use crate::sitemap::{robots_txt, sitemap_xml, UrlEntry};
use crate::templates::{ListItem, Seo, TemplateEngine};

/// Number of entries shown in each home page section.
const HOME_SECTION_LEN: usize = 3;

/// Configuration for building the site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Content collections root
    pub content_dir: PathBuf,

    /// Files copied verbatim into the output
    pub public_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Preview image assets
    pub og: AssetConfig,

    /// Preview images rendered at once
    pub og_concurrency: usize,

    /// Skip preview image generation
    pub skip_og: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            public_dir: PathBuf::from("public"),
            output_dir: PathBuf::from("dist"),
            minify: true,
            og: AssetConfig::default(),
            og_concurrency: 4,
            skip_og: false,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated
    pub pages: usize,

    /// Number of preview images written
    pub og_images: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Failed to read {0}")]
    ReadError(String),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),

    #[error("Invalid RSS feed: {0}")]
    Feed(#[from] rss::validation::ValidationError),

    #[error("Failed to set up OG image generation: {0}")]
    Og(#[from] OgError),

    #[error("{failed} of {total} OG images failed to generate")]
    OgImages { failed: usize, total: usize },
}

/// A page to be rendered.
#[derive(Debug)]
struct Page {
    /// Site path with trailing slash
    path: String,
    template: &'static str,
    seo: Seo,
    data: Value,
    lastmod: Option<String>,
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    site: SiteConfig,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig, site: SiteConfig) -> Result<Self, BuildError> {
        let templates =
            TemplateEngine::new().map_err(|e| BuildError::TemplateError(e.to_string()))?;

        Ok(Self {
            config,
            site,
            templates,
        })
    }

    /// Build the site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let store = ContentStore::load(&self.config.content_dir)?;

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let copied = AssetPipeline::copy_public(&self.config.public_dir, &self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;
        tracing::debug!("Copied {} public files", copied);

        let pages = self.collect_pages(&store);

        // Render pages in parallel
        let results: Vec<Result<(), BuildError>> =
            pages.par_iter().map(|page| self.write_page(page)).collect();
        for result in results {
            result?;
        }
        tracing::info!("Rendered {} pages", pages.len());

        self.generate_assets()?;
        self.generate_feed(&store)?;
        self.generate_sitemap(&pages)?;
        self.generate_search_index(&pages)?;

        let og_images = if self.config.skip_og {
            tracing::info!("Skipping OG images");
            0
        } else {
            self.generate_og_images(&store).await?
        };

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: pages.len(),
            og_images,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    fn collect_pages(&self, store: &ContentStore) -> Vec<Page> {
        let mut projects = store.get_collection(|_: &Entry<Project>| true);
        sort_projects(&mut projects);
        let writing = store.published_writing();
        let rants = store.select(|_: &Entry<Rant>| true);
        let notes = store.select(|_: &Entry<Note>| true);
        let mut uses = store.get_collection(|_: &Entry<Uses>| true);
        sort_uses(&mut uses);

        let mut pages = Vec::new();

        let featured: Vec<ListItem> = projects
            .iter()
            .filter(|p| p.data.featured)
            .take(HOME_SECTION_LEN)
            .map(|p| project_item(p))
            .collect();
        let recent: Vec<ListItem> = writing
            .iter()
            .take(HOME_SECTION_LEN)
            .map(|w| writing_item(w))
            .collect();
        pages.push(self.static_page(
            StaticPage::Home,
            "home.html",
            context! { projects => featured, writing => recent },
        ));

        pages.push(self.listing(
            StaticPage::Projects,
            projects.iter().map(|p| project_item(p)).collect(),
        ));
        pages.push(self.listing(
            StaticPage::Writing,
            writing.iter().map(|w| writing_item(w)).collect(),
        ));
        pages.push(self.listing(
            StaticPage::Rants,
            rants.iter().map(|r| rant_item(r)).collect(),
        ));
        pages.push(self.listing(
            StaticPage::Notes,
            notes.iter().map(|n| note_item(n)).collect(),
        ));

        let categories: Vec<&Uses> = uses.iter().map(|u| &u.data).collect();
        pages.push(self.static_page(
            StaticPage::Uses,
            "uses.html",
            context! { categories => categories },
        ));
        pages.push(self.static_page(StaticPage::About, "about.html", context! {}));
        pages.push(self.static_page(StaticPage::Contact, "contact.html", context! {}));

        pages.extend(projects.iter().map(|p| self.project_page(store, p)));
        pages.extend(writing.iter().map(|w| self.writing_page(w)));
        pages.extend(rants.iter().map(|r| self.rant_page(store, r)));
        pages.extend(notes.iter().map(|n| self.note_page(n)));

        pages
    }

    fn seo(&self, title: &str, description: &str, path: &str) -> Seo {
        Seo {
            title: format!("{} | {}", title, self.site.author.name),
            description: description.to_string(),
            canonical: self.site.absolute(path),
            image: None,
            kind: "website",
            published: None,
            json_ld: None,
        }
    }

    fn static_page(&self, page: StaticPage, template: &'static str, extra: Value) -> Page {
        let meta = page.meta();
        let path = page.path();
        let mut seo = self.seo(meta.title, meta.description, path);
        if page == StaticPage::Home {
            seo.title = self.site.title.clone();
        }

        Page {
            path: path.to_string(),
            template,
            seo,
            data: context! { meta => meta, heading => meta.heading(), ..extra },
            lastmod: None,
        }
    }

    fn listing(&self, page: StaticPage, items: Vec<ListItem>) -> Page {
        self.static_page(page, "listing.html", context! { items => items })
    }

    fn project_page(&self, store: &ContentStore, entry: &Entry<Project>) -> Page {
        let project = &entry.data;
        let path = entry.url_path();
        let mut links = related::<Project>(store, project.related_projects.as_deref(), |p| {
            p.title.as_str()
        });
        links.extend(related_writing(store, project.related_writing.as_deref()));

        Page {
            seo: self.seo(&project.title, &project.outcome_summary, &path),
            path,
            template: "project.html",
            data: context! {
                project => project,
                content => body_html(entry),
                related => links,
            },
            lastmod: None,
        }
    }

    fn writing_page(&self, entry: &Entry<Writing>) -> Page {
        let post = &entry.data;
        let path = entry.url_path();
        let rendered = entry.render();
        let image = self.site.absolute(&og_image_path(&entry.slug));

        let mut seo = self.seo(&post.title, &post.description, &path);
        seo.kind = "article";
        seo.published = Some(post.publish_date.to_string());
        seo.json_ld = Some(self.article_json_ld(post, &seo.canonical, &image));
        seo.image = Some(image);

        let lastmod = post.updated_date.unwrap_or(post.publish_date).to_string();

        Page {
            seo,
            path,
            template: "article.html",
            data: context! {
                title => &post.title,
                date => format_date(post.publish_date),
                updated => post.updated_date.map(format_date),
                tags => &post.tags,
                toc => rendered.toc,
                content => rendered.html,
            },
            lastmod: Some(lastmod),
        }
    }

    fn rant_page(&self, store: &ContentStore, entry: &Entry<Rant>) -> Page {
        let rant = &entry.data;
        let path = entry.url_path();
        let mut links =
            related::<Rant>(store, rant.related_rants.as_deref(), |r| r.title.as_str());
        links.extend(related::<Project>(
            store,
            rant.related_projects.as_deref(),
            |p| p.title.as_str(),
        ));

        let mut seo = self.seo(&rant.title, &rant.context, &path);
        seo.kind = "article";
        seo.published = Some(rant.date.to_string());

        Page {
            seo,
            path,
            template: "rant.html",
            data: context! {
                rant => rant,
                date => format_date(rant.date),
                content => body_html(entry),
                related => links,
            },
            lastmod: Some(rant.date.to_string()),
        }
    }

    fn note_page(&self, entry: &Entry<Note>) -> Page {
        let note = &entry.data;
        let path = entry.url_path();
        let rendered = entry.render();

        let mut seo = self.seo(&note.title, &note.description, &path);
        seo.kind = "article";
        seo.published = Some(note.date.to_string());

        Page {
            seo,
            path,
            template: "article.html",
            data: context! {
                title => &note.title,
                date => format_date(note.date),
                toc => rendered.toc,
                content => rendered.html,
            },
            lastmod: Some(note.date.to_string()),
        }
    }

    fn article_json_ld(&self, post: &Writing, url: &str, image: &str) -> String {
        let json = serde_json::json!({
            "@context": "https://schema.org",
            "@type": "BlogPosting",
            "headline": post.title,
            "description": post.description,
            "datePublished": post.publish_date.to_string(),
            "dateModified": post.updated_date.unwrap_or(post.publish_date).to_string(),
            "url": url,
            "image": image,
            "author": {
                "@type": "Person",
                "name": self.site.author.name,
                "url": self.site.url,
            },
        });
        // A literal `</` would close the surrounding script element
        json.to_string().replace("</", "<\\/")
    }

    /// Render and write a single page.
    fn write_page(&self, page: &Page) -> Result<(), BuildError> {
        let html = self
            .templates
            .render(
                page.template,
                &self.site,
                &page.seo,
                &page.path,
                page.data.clone(),
            )
            .map_err(|e| BuildError::TemplateError(format!("{}: {}", page.path, e)))?;

        let output_path = page_output_path(&self.config.output_dir, &page.path);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
        }

        fs::write(&output_path, html).map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Generate static assets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        let css = AssetPipeline::generate_css();
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Failed to minify CSS: {}", e);
                css
            })
        } else {
            css
        };
        fs::write(assets_dir.join("main.css"), css)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    fn generate_feed(&self, store: &ContentStore) -> Result<(), BuildError> {
        let xml = build_feed(&self.site, &store.published_writing())?;

        fs::write(self.config.output_dir.join("rss.xml"), xml)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Generate sitemap and robots.txt.
    fn generate_sitemap(&self, pages: &[Page]) -> Result<(), BuildError> {
        let urls: Vec<UrlEntry> = pages
            .iter()
            .map(|page| UrlEntry {
                loc: page.seo.canonical.clone(),
                lastmod: page.lastmod.clone(),
            })
            .collect();

        fs::write(self.config.output_dir.join("sitemap.xml"), sitemap_xml(&urls))
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(
            self.config.output_dir.join("robots.txt"),
            robots_txt(&self.site.url),
        )
        .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Generate search index.
    fn generate_search_index(&self, pages: &[Page]) -> Result<(), BuildError> {
        let index: Vec<serde_json::Value> = pages
            .iter()
            .map(|page| {
                serde_json::json!({
                    "title": page.seo.title,
                    "description": page.seo.description,
                    "url": page.path,
                    "date": page.seo.published,
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&index)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        fs::write(self.config.output_dir.join("search-index.json"), json)
            .map_err(|e| BuildError::WriteError(e.to_string()))
    }

    /// Render a preview image for every published writing entry.
    ///
    /// Every target is attempted; the build fails afterwards if any did.
    async fn generate_og_images(&self, store: &ContentStore) -> Result<usize, BuildError> {
        let targets = og_targets(store);
        if targets.is_empty() {
            return Ok(0);
        }

        tracing::info!("Generating {} OG images", targets.len());
        let generator = OgGenerator::new(self.config.og.clone())?;
        let report = generator
            .write_all(&targets, &self.config.output_dir, self.config.og_concurrency)
            .await;

        if !report.failed.is_empty() {
            return Err(BuildError::OgImages {
                failed: report.failed.len(),
                total: targets.len(),
            });
        }

        Ok(report.written.len())
    }
}

/// `dist/writing/a/` becomes `dist/writing/a/index.html`.
fn page_output_path(output_dir: &Path, path: &str) -> PathBuf {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        output_dir.join("index.html")
    } else {
        output_dir.join(trimmed).join("index.html")
    }
}

fn body_html<T>(entry: &Entry<T>) -> String {
    if entry.body.trim().is_empty() {
        String::new()
    } else {
        entry.render().html
    }
}

fn related<T: Schema>(
    store: &ContentStore,
    slugs: Option<&[String]>,
    title: impl Fn(&T) -> &str,
) -> Vec<ListItem> {
    slugs
        .unwrap_or_default()
        .iter()
        .filter_map(|slug| {
            let entry = store.get_entry::<T>(slug);
            if entry.is_none() {
                tracing::warn!("Unknown related {} entry: {}", T::COLLECTION, slug);
            }
            entry
        })
        .map(|entry| ListItem {
            title: title(&entry.data).to_string(),
            url: entry.url_path(),
            date: None,
            description: String::new(),
            meta: Vec::new(),
        })
        .collect()
}

fn related_writing(store: &ContentStore, slugs: Option<&[String]>) -> Vec<ListItem> {
    let published: Vec<String> = slugs
        .unwrap_or_default()
        .iter()
        .filter(|slug| !matches!(store.get_entry::<Writing>(slug), Some(e) if e.data.draft))
        .cloned()
        .collect();
    related::<Writing>(store, Some(published.as_slice()), |w| w.title.as_str())
}

fn project_item(entry: &Entry<Project>) -> ListItem {
    ListItem {
        title: entry.data.title.clone(),
        url: entry.url_path(),
        date: None,
        description: entry.data.outcome_summary.clone(),
        meta: vec![entry.data.role.clone(), entry.data.year.to_string()],
    }
}

fn writing_item(entry: &Entry<Writing>) -> ListItem {
    ListItem {
        title: entry.data.title.clone(),
        url: entry.url_path(),
        date: Some(format_date(entry.data.publish_date)),
        description: entry.data.description.clone(),
        meta: entry.data.tags.clone().unwrap_or_default(),
    }
}

fn rant_item(entry: &Entry<Rant>) -> ListItem {
    ListItem {
        title: entry.data.title.clone(),
        url: entry.url_path(),
        date: Some(format_date(entry.data.date)),
        description: entry.data.context.clone(),
        meta: entry.data.tags.clone().unwrap_or_default(),
    }
}

fn note_item(entry: &Entry<Note>) -> ListItem {
    ListItem {
        title: entry.data.title.clone(),
        url: entry.url_path(),
        date: Some(format_date(entry.data.date)),
        description: entry.data.description.clone(),
        meta: Vec::new(),
    }
}
