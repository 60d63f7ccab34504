//! Loading and querying content collections.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use walkdir::WalkDir;

use crate::error::ContentError;
use crate::frontmatter::{extract_frontmatter, FrontmatterError};
use crate::markdown::{render_markdown, RenderedBody};
use crate::order::{sort_newest_first, Dated};
use crate::schema::{Note, Project, Rant, Uses, Writing};
use crate::slug::entry_slug;

/// The content collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Projects,
    Writing,
    Rants,
    Notes,
    Uses,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Projects,
        Collection::Writing,
        Collection::Rants,
        Collection::Notes,
        Collection::Uses,
    ];

    /// Directory name below the content root, also the URL prefix.
    pub fn dir_name(self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Writing => "writing",
            Collection::Rants => "rants",
            Collection::Notes => "notes",
            Collection::Uses => "uses",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One content file with validated frontmatter.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T> {
    pub slug: String,
    pub collection: Collection,
    pub data: T,
    /// Markdown body without frontmatter
    pub body: String,
    pub path: PathBuf,
}

impl<T> Entry<T> {
    pub fn render(&self) -> RenderedBody {
        render_markdown(&self.body)
    }

    /// Site path of the entry's detail page.
    pub fn url_path(&self) -> String {
        format!("/{}/{}/", self.collection, self.slug)
    }
}

/// A frontmatter schema bound to its collection.
pub trait Schema: DeserializeOwned + Sized {
    const COLLECTION: Collection;

    fn entries(store: &ContentStore) -> &[Entry<Self>];
}

macro_rules! schema {
    ($ty:ty, $collection:ident, $field:ident) => {
        impl Schema for $ty {
            const COLLECTION: Collection = Collection::$collection;

            fn entries(store: &ContentStore) -> &[Entry<Self>] {
                &store.$field
            }
        }
    };
}

schema!(Project, Projects, projects);
schema!(Writing, Writing, writing);
schema!(Rant, Rants, rants);
schema!(Note, Notes, notes);
schema!(Uses, Uses, uses);

/// Every collection, loaded and validated. Entries are held in slug order.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    projects: Vec<Entry<Project>>,
    writing: Vec<Entry<Writing>>,
    rants: Vec<Entry<Rant>>,
    notes: Vec<Entry<Note>>,
    uses: Vec<Entry<Uses>>,
}

impl ContentStore {
    /// Load all collections below `root`. A missing collection directory is empty.
    pub fn load(root: &Path) -> Result<Self, ContentError> {
        if !root.is_dir() {
            return Err(ContentError::RootNotFound(root.to_path_buf()));
        }

        let store = Self {
            projects: load_collection(root)?,
            writing: load_collection(root)?,
            rants: load_collection(root)?,
            notes: load_collection(root)?,
            uses: load_collection(root)?,
        };

        tracing::info!(
            "Loaded content: {} projects, {} writing, {} rants, {} notes, {} uses",
            store.projects.len(),
            store.writing.len(),
            store.rants.len(),
            store.notes.len(),
            store.uses.len()
        );

        Ok(store)
    }

    /// All entries of a collection in slug order.
    pub fn entries<T: Schema>(&self) -> &[Entry<T>] {
        T::entries(self)
    }

    /// Entries matching `filter`, in slug order.
    pub fn get_collection<T, F>(&self, filter: F) -> Vec<&Entry<T>>
    where
        T: Schema,
        F: Fn(&Entry<T>) -> bool,
    {
        self.entries::<T>().iter().filter(|e| filter(e)).collect()
    }

    pub fn get_entry<T: Schema>(&self, slug: &str) -> Option<&Entry<T>> {
        self.entries::<T>()
            .binary_search_by(|e| e.slug.as_str().cmp(slug))
            .ok()
            .map(|i| &self.entries::<T>()[i])
    }

    /// Entries matching `filter`, newest first. Same-day entries stay in slug order.
    pub fn select<T, F>(&self, filter: F) -> Vec<&Entry<T>>
    where
        T: Schema + Dated,
        F: Fn(&Entry<T>) -> bool,
    {
        let mut selected = self.get_collection(filter);
        sort_newest_first(&mut selected);
        selected
    }

    /// Non-draft writing, newest first.
    pub fn published_writing(&self) -> Vec<&Entry<Writing>> {
        self.select(|e: &Entry<Writing>| !e.data.draft)
    }
}

fn load_collection<T: Schema>(root: &Path) -> Result<Vec<Entry<T>>, ContentError> {
    let collection = T::COLLECTION;
    let dir = root.join(collection.dir_name());
    if !dir.is_dir() {
        tracing::debug!("No {} directory at {}", collection, dir.display());
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for item in WalkDir::new(&dir).follow_links(true) {
        let item = item.map_err(|e| ContentError::Walk {
            path: dir.clone(),
            message: e.to_string(),
        })?;
        let path = item.path();

        if !path.is_file() {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext != "mdx" && ext != "md" {
            continue;
        }

        let source = fs::read_to_string(path).map_err(|e| ContentError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let relative = path.strip_prefix(&dir).unwrap_or(path);
        entries.push(parse_entry(collection, relative, path, &source)?);
    }

    entries.sort_by(|a: &Entry<T>, b| a.slug.cmp(&b.slug));

    let mut seen = HashSet::new();
    for entry in &entries {
        if !seen.insert(entry.slug.as_str()) {
            return Err(ContentError::DuplicateSlug {
                collection: collection.to_string(),
                slug: entry.slug.clone(),
            });
        }
    }

    Ok(entries)
}

fn parse_entry<T: DeserializeOwned>(
    collection: Collection,
    relative: &Path,
    path: &Path,
    source: &str,
) -> Result<Entry<T>, ContentError> {
    let invalid = |source: FrontmatterError| ContentError::Frontmatter {
        path: path.to_path_buf(),
        source,
    };

    let (data, body) = extract_frontmatter::<T>(source).map_err(invalid)?;
    let data = data.ok_or_else(|| ContentError::MissingFrontmatter(path.to_path_buf()))?;

    Ok(Entry {
        slug: entry_slug(relative),
        collection,
        data,
        body: body.to_string(),
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn writing(title: &str, date: &str, draft: bool) -> String {
        format!(
            "---\ntitle: {title}\ndescription: About {title}\npublishDate: {date}\ndraft: {draft}\n---\n\n# {title}\n"
        )
    }

    fn slugs<T>(entries: &[&Entry<T>]) -> Vec<String> {
        entries.iter().map(|e| e.slug.clone()).collect()
    }

    #[test]
    fn loads_collections_in_slug_order() {
        let temp = tempdir().unwrap();
        write(temp.path(), "writing/zeta.md", &writing("Zeta", "2024-01-01", false));
        write(temp.path(), "writing/Alpha Post.mdx", &writing("Alpha", "2024-01-01", false));
        write(temp.path(), "writing/notes.txt", "ignored");

        let store = ContentStore::load(temp.path()).unwrap();

        let all: Vec<_> = store.entries::<Writing>().iter().collect();
        assert_eq!(slugs(&all), vec!["alpha-post", "zeta"]);
        assert!(store.entries::<Project>().is_empty());
        assert_eq!(all[0].url_path(), "/writing/alpha-post/");
    }

    #[test]
    fn published_writing_is_newest_first_without_drafts() {
        let temp = tempdir().unwrap();
        write(temp.path(), "writing/new-year.md", &writing("New year", "2024-01-01", false));
        write(temp.path(), "writing/summer.md", &writing("Summer", "2024-06-01", false));
        write(temp.path(), "writing/secret.md", &writing("Secret", "2024-12-01", true));

        let store = ContentStore::load(temp.path()).unwrap();

        assert_eq!(slugs(&store.published_writing()), vec!["summer", "new-year"]);
    }

    #[test]
    fn get_entry_finds_nested_slugs() {
        let temp = tempdir().unwrap();
        write(temp.path(), "writing/2024/launch.md", &writing("Launch", "2024-02-02", false));
        write(temp.path(), "writing/about.md", &writing("About", "2024-02-02", false));

        let store = ContentStore::load(temp.path()).unwrap();

        let entry = store.get_entry::<Writing>("2024/launch").unwrap();
        assert_eq!(entry.data.title, "Launch");
        assert!(store.get_entry::<Writing>("missing").is_none());
    }

    #[test]
    fn schema_errors_name_the_file() {
        let temp = tempdir().unwrap();
        write(temp.path(), "notes/broken.md", "---\ntitle: No date\ndescription: x\n---\n");

        let err = ContentStore::load(temp.path()).unwrap_err();

        assert!(matches!(err, ContentError::Frontmatter { .. }));
        assert!(err.to_string().contains("broken.md"));
    }

    #[test]
    fn rejects_missing_frontmatter() {
        let temp = tempdir().unwrap();
        write(temp.path(), "notes/bare.md", "# Just text\n");

        let err = ContentStore::load(temp.path()).unwrap_err();

        assert!(matches!(err, ContentError::MissingFrontmatter(_)));
    }

    #[test]
    fn unclosed_frontmatter_names_the_file() {
        let temp = tempdir().unwrap();
        write(temp.path(), "notes/open.md", "---
date: 2024-01-01
title: Open
");

        let err = ContentStore::load(temp.path()).unwrap_err();

        assert!(matches!(
            err,
            ContentError::Frontmatter {
                source: FrontmatterError::Unclosed,
                ..
            }
        ));
        assert!(err.to_string().contains("open.md"));
    }

    #[test]
    fn rejects_colliding_slugs() {
        let temp = tempdir().unwrap();
        write(temp.path(), "writing/Hello World.md", &writing("A", "2024-01-01", false));
        write(temp.path(), "writing/hello-world.md", &writing("B", "2024-01-01", false));

        let err = ContentStore::load(temp.path()).unwrap_err();

        assert!(matches!(err, ContentError::DuplicateSlug { .. }));
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = tempdir().unwrap();

        let err = ContentStore::load(&temp.path().join("content")).unwrap_err();

        assert!(matches!(err, ContentError::RootNotFound(_)));
    }
}
